use std::fmt;

/// One ranked result from the hand-pose classifier
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    /// Confidence in [0, 1]
    pub score: f32,
}

impl Classification {
    pub fn new(category: &str, score: f32) -> Self {
        Self {
            category: category.to_string(),
            score,
        }
    }
}

/// Errors from the optional camera and classifier subsystem.
///
/// None of these are fatal: the scene keeps running with manual control.
#[derive(Debug, Clone, PartialEq)]
pub enum VisionError {
    /// Browser offers no media devices (insecure context, old browser)
    MediaUnsupported,
    /// User denied the camera or no device is present
    CameraDenied(String),
    /// Host page did not provide the recognizer loader
    LoaderMissing,
    /// Model or runtime failed to load
    ClassifierLoad(String),
    /// A single inference call failed
    Inference(String),
}

impl fmt::Display for VisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisionError::MediaUnsupported => write!(f, "Camera access is not supported in this context"),
            VisionError::CameraDenied(msg) => write!(f, "Camera unavailable: {}", msg),
            VisionError::LoaderMissing => write!(f, "Gesture recognizer loader not found on the page"),
            VisionError::ClassifierLoad(msg) => write!(f, "Failed to load gesture recognizer: {}", msg),
            VisionError::Inference(msg) => write!(f, "Gesture recognition failed: {}", msg),
        }
    }
}

impl std::error::Error for VisionError {}

/// A source of ranked hand-pose classifications for the latest camera frame
pub trait GestureClassifier {
    /// True once the frame source has a decodable frame
    fn is_frame_ready(&self) -> bool;

    /// Classify the current frame. Results are ranked, best first.
    fn recognize(&mut self, timestamp_ms: f64) -> Result<Vec<Classification>, VisionError>;
}

/// Capability handle for the classifier.
///
/// The classifier does not exist until the asynchronous load finishes, so
/// callers match on the slot instead of assuming it is there.
#[derive(Debug)]
pub enum ClassifierSlot<C> {
    NotRequested,
    Loading,
    Ready(C),
    Unavailable(VisionError),
}

impl<C> Default for ClassifierSlot<C> {
    fn default() -> Self {
        ClassifierSlot::NotRequested
    }
}

impl<C> ClassifierSlot<C> {
    pub fn get_mut(&mut self) -> Option<&mut C> {
        match self {
            ClassifierSlot::Ready(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ClassifierSlot::Ready(_))
    }

    /// Move from `NotRequested` to `Loading`. Returns false if a load was
    /// already requested, so the load runs at most once.
    pub fn begin_loading(&mut self) -> bool {
        if matches!(self, ClassifierSlot::NotRequested) {
            *self = ClassifierSlot::Loading;
            true
        } else {
            false
        }
    }

    pub fn finish(&mut self, result: Result<C, VisionError>) {
        *self = match result {
            Ok(c) => ClassifierSlot::Ready(c),
            Err(e) => ClassifierSlot::Unavailable(e),
        };
    }

    pub fn status(&self) -> VisionStatus {
        match self {
            ClassifierSlot::NotRequested => VisionStatus::AwaitingPermission,
            ClassifierSlot::Loading => VisionStatus::Loading,
            ClassifierSlot::Ready(_) => VisionStatus::Ready,
            ClassifierSlot::Unavailable(e) => VisionStatus::Unavailable(e.to_string()),
        }
    }
}

/// Status of the vision subsystem as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum VisionStatus {
    AwaitingPermission,
    Loading,
    Ready,
    Unavailable(String),
}

impl VisionStatus {
    /// Short HUD label
    pub fn label(&self) -> &str {
        match self {
            VisionStatus::AwaitingPermission => "Camera off",
            VisionStatus::Loading => "Loading AI...",
            VisionStatus::Ready => "Ready",
            VisionStatus::Unavailable(_) => "Gestures unavailable",
        }
    }
}
