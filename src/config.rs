//! Scene configuration
//!
//! Every tunable constant of the experience lives here. The defaults reproduce
//! the shipped look; a host page can override any subset through YAML.

use serde::{Deserialize, Serialize};
use crate::state::Layout;

/// Top-level configuration for the particle tree experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Fixed RNG seed; `None` draws a fresh seed at startup
    pub seed: Option<u64>,
    /// Count the host asks for (see `LayoutConfig::working_count`)
    pub requested_count: usize,
    pub layout: LayoutConfig,
    pub motion: MotionConfig,
    pub gesture: GestureConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: None,
            requested_count: 220,
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
            gesture: GestureConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parse from YAML string; missing sections fall back to defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let config: SceneConfig = serde_yaml::from_str(yaml)
            .map_err(|e| format!("YAML parse error: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the generator or animator cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let layout = &self.layout;
        if layout.working_count == 0 {
            return Err("layout.working_count must be positive".to_string());
        }
        if layout.photo_slots == 0 || layout.photo_slots > layout.working_count {
            return Err(format!(
                "layout.photo_slots must be between 1 and working_count ({})",
                layout.working_count
            ));
        }
        if layout.brand_slots_end == 0 || layout.brand_slots_end > layout.photo_slots {
            return Err("layout.brand_slots_end must be between 1 and photo_slots".to_string());
        }
        if layout.brand_photo_ids.is_empty() || layout.seasonal_photo_ids.is_empty() {
            return Err("photo id pools must not be empty".to_string());
        }
        if !(layout.scatter_radius_min > 0.0 && layout.scatter_radius_min < layout.scatter_radius_max) {
            return Err("scatter radius band must satisfy 0 < min < max".to_string());
        }
        if !(layout.radial_jitter_min > 0.0 && layout.radial_jitter_min <= layout.radial_jitter_max) {
            return Err("radial jitter band must satisfy 0 < min <= max".to_string());
        }
        if self.motion.form_rate <= 0.0 || self.motion.scatter_rate <= 0.0 {
            return Err("morph rates must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.gesture.confidence_threshold) {
            return Err("gesture.confidence_threshold must be within [0, 1]".to_string());
        }
        if self.camera.min_distance > self.camera.max_distance {
            return Err("camera.min_distance exceeds camera.max_distance".to_string());
        }
        Ok(())
    }
}

/// Parameters of the two procedural layouts and attribute assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Particle count actually generated. Kept above the host's request so the
    /// spiral stays dense; 450 is the most the mobile frame budget carries.
    pub working_count: usize,
    pub height: f32,
    pub radius_bottom: f32,
    /// Spiral wraps from apex to base
    pub turns: f32,
    pub y_offset: f32,
    /// Exponent of the radius curve `t^e`; below 1 widens the base quickly
    pub radius_exponent: f32,
    pub radial_jitter_min: f32,
    pub radial_jitter_max: f32,
    pub scatter_radius_min: f32,
    pub scatter_radius_max: f32,
    /// Leading indices reserved for photos (index 0 is the clue)
    pub photo_slots: usize,
    /// Photos before this index are brand photos, the rest seasonal
    pub brand_slots_end: usize,
    pub photo_base_url: String,
    pub brand_photo_ids: Vec<u32>,
    pub seasonal_photo_ids: Vec<u32>,
    pub clue_photo_id: u32,
    /// Ornament draws above this become star accents
    pub star_threshold: f32,
    /// Ornament draws above this (and below the star cut) become gifts
    pub gift_threshold: f32,
    pub photo_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            working_count: 450,
            height: 28.0,
            radius_bottom: 13.0,
            turns: 7.0,
            y_offset: -12.0,
            radius_exponent: 0.8,
            radial_jitter_min: 0.9,
            radial_jitter_max: 1.15,
            scatter_radius_min: 35.0,
            scatter_radius_max: 55.0,
            photo_slots: 30,
            brand_slots_end: 12,
            photo_base_url: "https://picsum.photos".to_string(),
            brand_photo_ids: vec![201, 250, 180, 160, 119, 48],
            seasonal_photo_ids: vec![364, 342, 338, 326, 319, 292, 266, 252, 221, 193],
            clue_photo_id: 433,
            star_threshold: 0.92,
            gift_threshold: 0.75,
            photo_scale: 3.0,
        }
    }
}

/// Per-frame motion constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Approach rate toward the tree, multiplied by each particle's speed
    pub form_rate: f32,
    /// Uniform approach rate toward the scatter cloud
    pub scatter_rate: f32,
    pub swirl_radius: f32,
    pub swirl_frequency: f32,
    pub float_amplitude: f32,
    pub spin_rate_x: f32,
    pub spin_rate_y: f32,
    /// Fraction of the remaining angle a photo turns toward the camera per tick
    pub billboard_smoothing: f32,
    /// Non-photo particles smaller than this pulse like lights
    pub light_scale_threshold: f32,
    pub light_base: f32,
    pub light_amplitude: f32,
    pub light_frequency: f32,
    pub hover_emissive: f32,
    pub base_emissive: f32,
    pub photo_frame_emissive: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            form_rate: 2.5,
            scatter_rate: 3.0,
            swirl_radius: 0.05,
            swirl_frequency: 2.0,
            float_amplitude: 0.4,
            spin_rate_x: 0.5,
            spin_rate_y: 0.3,
            billboard_smoothing: 0.1,
            light_scale_threshold: 0.8,
            light_base: 2.0,
            light_amplitude: 3.0,
            light_frequency: 3.0,
            hover_emissive: 1.0,
            base_emissive: 0.2,
            photo_frame_emissive: 0.5,
        }
    }
}

/// A classifier category and the layout it requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureRule {
    pub category: String,
    pub layout: Layout,
}

impl GestureRule {
    pub fn new(category: &str, layout: Layout) -> Self {
        Self {
            category: category.to_string(),
            layout,
        }
    }
}

/// Gesture recognition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Top score must exceed this for a classification to count
    pub confidence_threshold: f32,
    pub rules: Vec<GestureRule>,
    /// Location of the classifier's wasm fileset
    pub wasm_root: String,
    pub model_path: String,
    pub video_width: u32,
    pub video_height: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            rules: vec![
                GestureRule::new("Open_Palm", Layout::Scattered),
                GestureRule::new("Victory", Layout::Scattered),
                GestureRule::new("Closed_Fist", Layout::Tree),
                GestureRule::new("Thumb_Up", Layout::Tree),
            ],
            wasm_root: "https://cdn.jsdelivr.net/npm/@google/mediapipe-tasks-vision@0.10.14/wasm".to_string(),
            model_path: "https://storage.googleapis.com/mediapipe-models/gesture_recognizer/gesture_recognizer/float16/1/gesture_recognizer.task".to_string(),
            video_width: 320,
            video_height: 240,
        }
    }
}

/// Orbit camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub height: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    /// Radians per second while the tree is formed (half a turn per minute
    /// times 0.5)
    pub auto_rotate_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 60.0,
            height: 5.0,
            fov_degrees: 35.0,
            near: 0.1,
            far: 300.0,
            min_distance: 30.0,
            max_distance: 90.0,
            min_polar: std::f32::consts::PI / 2.5,
            max_polar: std::f32::consts::PI / 1.8,
            auto_rotate_speed: std::f32::consts::TAU / 60.0 * 0.5,
        }
    }
}
