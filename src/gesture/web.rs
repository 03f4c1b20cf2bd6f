//! Browser side of gesture input
//!
//! Camera acquisition, the recognizer binding and the per-frame poll task.
//! The recognizer module itself is imported by the host page, which exposes
//! `loadGestureRecognizer(wasmRoot, modelPath)` returning a promise of a
//! recognizer running in video mode.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Array, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use crate::config::GestureConfig;
use crate::state::MorphState;
use super::{
    CancellationToken, Classification, GestureBridge, GestureClassifier, GesturePoller,
    VisionError, VisionStatus,
};

const LOADER_NAME: &str = "loadGestureRecognizer";

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`
const HAVE_ENOUGH_DATA: u16 = 4;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_name = loadGestureRecognizer)]
    fn load_gesture_recognizer(wasm_root: &str, model_path: &str) -> Result<Promise, JsValue>;

    /// Recognizer object handed back by the host loader
    pub type Recognizer;

    #[wasm_bindgen(method, catch, js_name = recognizeForVideo)]
    fn recognize_for_video(
        this: &Recognizer,
        video: &HtmlVideoElement,
        timestamp: f64,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method)]
    fn close(this: &Recognizer);
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", err))
}

/// Read `{ gestures: [[{ categoryName, score }, ...]] }`, first hand only
fn parse_gestures(result: &JsValue) -> Vec<Classification> {
    let Some(hands) = Reflect::get(result, &JsValue::from_str("gestures"))
        .ok()
        .and_then(|g| g.dyn_into::<Array>().ok())
    else {
        return Vec::new();
    };
    let Ok(first_hand) = hands.get(0).dyn_into::<Array>() else {
        return Vec::new();
    };

    first_hand
        .iter()
        .filter_map(|entry| {
            let category = Reflect::get(&entry, &JsValue::from_str("categoryName"))
                .ok()?
                .as_string()?;
            let score = Reflect::get(&entry, &JsValue::from_str("score")).ok()?.as_f64()?;
            Some(Classification {
                category,
                score: score as f32,
            })
        })
        .collect()
}

/// Live user-facing camera stream. Tracks stop when the feed is dropped.
pub struct CameraFeed {
    stream: MediaStream,
}

impl CameraFeed {
    pub async fn acquire(width: u32, height: u32) -> Result<Self, VisionError> {
        let window = web_sys::window().ok_or(VisionError::MediaUnsupported)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| VisionError::MediaUnsupported)?;

        let video = Object::new();
        let set = |key: &str, value: JsValue| Reflect::set(&video, &JsValue::from_str(key), &value);
        set("facingMode", JsValue::from_str("user"))
            .and_then(|_| set("width", JsValue::from(width)))
            .and_then(|_| set("height", JsValue::from(height)))
            .map_err(|e| VisionError::CameraDenied(describe(&e)))?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(|e| VisionError::CameraDenied(describe(&e)))?;
        let stream = JsFuture::from(promise)
            .await
            .map_err(|e| VisionError::CameraDenied(describe(&e)))?
            .dyn_into::<MediaStream>()
            .map_err(|_| VisionError::CameraDenied("getUserMedia returned no stream".to_string()))?;

        log::info!("Camera stream acquired ({}x{})", width, height);
        Ok(Self { stream })
    }

    /// Show the stream in `video`. Returns false when it was already attached.
    pub fn attach(&self, video: &HtmlVideoElement) -> bool {
        let attached = video
            .src_object()
            .map_or(false, |current| JsValue::from(current) == JsValue::from(self.stream.clone()));
        if attached {
            return false;
        }

        video.set_muted(true);
        video.set_src_object(Some(&self.stream));
        match video.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Video play interrupted: {}", describe(&e));
                }
            }),
            Err(e) => log::warn!("Video play failed: {}", describe(&e)),
        }
        true
    }

    fn stop(&self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
    }
}

impl Drop for CameraFeed {
    fn drop(&mut self) {
        self.stop();
        log::debug!("Camera tracks stopped");
    }
}

/// Classifier backed by the host-loaded recognizer, reading from one video element
pub struct MediaPipeClassifier {
    recognizer: Recognizer,
    video: HtmlVideoElement,
}

impl GestureClassifier for MediaPipeClassifier {
    fn is_frame_ready(&self) -> bool {
        self.video.ready_state() >= HAVE_ENOUGH_DATA
    }

    fn recognize(&mut self, timestamp_ms: f64) -> Result<Vec<Classification>, VisionError> {
        let result = self
            .recognizer
            .recognize_for_video(&self.video, timestamp_ms)
            .map_err(|e| VisionError::Inference(describe(&e)))?;
        Ok(parse_gestures(&result))
    }
}

impl Drop for MediaPipeClassifier {
    fn drop(&mut self) {
        self.recognizer.close();
    }
}

/// Await the host loader and wrap the recognizer it resolves to
pub async fn load_classifier(
    config: &GestureConfig,
    video: HtmlVideoElement,
) -> Result<MediaPipeClassifier, VisionError> {
    let has_loader = Reflect::has(&js_sys::global(), &JsValue::from_str(LOADER_NAME)).unwrap_or(false);
    if !has_loader {
        return Err(VisionError::LoaderMissing);
    }

    log::info!("Loading gesture recognizer...");
    let promise = load_gesture_recognizer(&config.wasm_root, &config.model_path)
        .map_err(|e| VisionError::ClassifierLoad(describe(&e)))?;
    let recognizer = JsFuture::from(promise)
        .await
        .map_err(|e| VisionError::ClassifierLoad(describe(&e)))?;
    if recognizer.is_undefined() || recognizer.is_null() {
        return Err(VisionError::ClassifierLoad("loader resolved to nothing".to_string()));
    }

    Ok(MediaPipeClassifier {
        recognizer: recognizer.unchecked_into(),
        video,
    })
}

type FrameCallback = Closure<dyn FnMut(f64)>;

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

/// Self-requeuing animation-frame task driving the poller.
///
/// The callback owns a handle to its own slot; `stop` breaks that cycle.
pub struct GestureLoop {
    token: CancellationToken,
    frame_id: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl GestureLoop {
    pub fn start(
        poller: Rc<RefCell<GesturePoller<MediaPipeClassifier>>>,
        state: Rc<RefCell<MorphState>>,
    ) -> Result<Self, String> {
        let token = poller.borrow().token().clone();
        let frame_id = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let slot = callback.clone();
        let next_id = frame_id.clone();
        *callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            let result = {
                let mut state = state.borrow_mut();
                poller.borrow_mut().tick(&mut state, timestamp)
            };
            if !result.should_requeue() {
                next_id.set(None);
                return;
            }
            if let Some(cb) = slot.borrow().as_ref() {
                next_id.set(request_frame(cb));
            }
        }));

        let first = callback.borrow().as_ref().and_then(request_frame);
        if first.is_none() {
            callback.borrow_mut().take();
            return Err("Failed to schedule gesture polling".to_string());
        }
        frame_id.set(first);

        Ok(Self {
            token,
            frame_id,
            callback,
        })
    }

    pub fn stop(&self) {
        self.token.cancel();
        if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for GestureLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the camera, the classifier and the poll task for one experience
pub struct VisionRuntime {
    config: GestureConfig,
    poller: Rc<RefCell<GesturePoller<MediaPipeClassifier>>>,
    camera: Rc<RefCell<Option<CameraFeed>>>,
    gesture_loop: Rc<RefCell<Option<GestureLoop>>>,
    token: CancellationToken,
}

impl VisionRuntime {
    pub fn new(config: GestureConfig) -> Self {
        let token = CancellationToken::new();
        let poller = GesturePoller::new(GestureBridge::from_config(&config), token.clone());
        Self {
            config,
            poller: Rc::new(RefCell::new(poller)),
            camera: Rc::new(RefCell::new(None)),
            gesture_loop: Rc::new(RefCell::new(None)),
            token,
        }
    }

    pub fn status(&self) -> VisionStatus {
        self.poller.borrow().status()
    }

    pub fn last_gesture(&self) -> String {
        self.poller.borrow().bridge().last_gesture().to_string()
    }

    /// Acquire the camera, load the recognizer, then start polling.
    /// Only the first call after permission does anything.
    pub fn start(&self, video: HtmlVideoElement, state: Rc<RefCell<MorphState>>) {
        if self.token.is_cancelled() || !self.poller.borrow_mut().slot_mut().begin_loading() {
            return;
        }

        let config = self.config.clone();
        let poller = self.poller.clone();
        let camera = self.camera.clone();
        let gesture_loop = self.gesture_loop.clone();
        let token = self.token.clone();

        spawn_local(async move {
            let feed = match CameraFeed::acquire(config.video_width, config.video_height).await {
                Ok(feed) => feed,
                Err(e) => {
                    log::error!("{}", e);
                    poller.borrow_mut().slot_mut().finish(Err(e));
                    return;
                }
            };
            if token.is_cancelled() {
                return;
            }
            feed.attach(&video);
            *camera.borrow_mut() = Some(feed);

            let loaded = load_classifier(&config, video).await;
            if token.is_cancelled() {
                return;
            }
            match loaded {
                Ok(classifier) => {
                    log::info!("Gesture recognizer loaded");
                    poller.borrow_mut().slot_mut().finish(Ok(classifier));
                    match GestureLoop::start(poller, state) {
                        Ok(running) => *gesture_loop.borrow_mut() = Some(running),
                        Err(e) => log::error!("{}", e),
                    }
                }
                Err(e) => {
                    log::error!("{}", e);
                    poller.borrow_mut().slot_mut().finish(Err(e));
                }
            }
        });
    }

    /// Show the live stream in another video element, e.g. the selfie view.
    /// Returns false while the camera is not ready yet.
    pub fn attach(&self, video: &HtmlVideoElement) -> bool {
        match self.camera.borrow().as_ref() {
            Some(feed) => {
                feed.attach(video);
                true
            }
            None => false,
        }
    }

    /// Stop polling and release the camera
    pub fn shutdown(&self) {
        self.token.cancel();
        if let Some(running) = self.gesture_loop.borrow_mut().take() {
            running.stop();
        }
        self.camera.borrow_mut().take();
    }
}

impl Drop for VisionRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
