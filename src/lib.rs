use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlVideoElement, WebGl2RenderingContext};

pub mod animation;
pub mod camera;
pub mod config;
pub mod data;
pub mod gesture;
pub mod interaction;
pub mod layout;
pub mod math;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod state;

use camera::OrbitCamera;
use config::SceneConfig;
use data::Particle;
use gesture::web::VisionRuntime;
use interaction::{PickCamera, RayPicker};
use math::Vec3;
use render::RenderPipeline;
use scene::TreeScene;
use state::{MorphState, Transition, UiEvent};

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct ParticleTreeExperience {
    pipeline: RenderPipeline,
    picker: RayPicker,
    scene: TreeScene,
    camera: OrbitCamera,
    vision: VisionRuntime,
    width: i32,
    height: i32,
    disposed: bool,
}

#[wasm_bindgen]
impl ParticleTreeExperience {
    /// Create an engine with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ParticleTreeExperience, JsValue> {
        Self::build(canvas, SceneConfig::default())
    }

    /// Create an engine from a YAML configuration; missing keys use defaults
    #[wasm_bindgen]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<ParticleTreeExperience, JsValue> {
        let config = SceneConfig::from_yaml(yaml).map_err(|e| JsValue::from_str(&e))?;
        Self::build(canvas, config)
    }

    fn build(canvas: HtmlCanvasElement, config: SceneConfig) -> Result<ParticleTreeExperience, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let mut pipeline = RenderPipeline::new(gl, width, height)
            .map_err(|e| JsValue::from_str(&e))?;

        let seed = config
            .seed
            .unwrap_or_else(|| (js_sys::Math::random() * u32::MAX as f64) as u64);
        let scene = TreeScene::new(&config, seed);
        pipeline.request_photos(scene.particles());

        let camera = OrbitCamera::new(config.camera.clone());
        pipeline.fov = camera.fov();
        pipeline.near = camera.near();
        pipeline.far = camera.far();

        log::info!("Particle tree ready: {} particles, seed {}", scene.particles().len(), seed);

        Ok(Self {
            pipeline,
            picker: RayPicker::new(),
            scene,
            camera,
            vision: VisionRuntime::new(config.gesture),
            width,
            height,
            disposed: false,
        })
    }

    /// Update and render a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        if self.disposed {
            return;
        }

        self.camera.auto_rotate(self.scene.layout(), dt);
        let camera_position = self.camera.position();

        self.scene.tick(dt, camera_position);
        self.picker.set_targets(self.scene.pick_targets());

        self.pipeline.camera_position = camera_position;
        self.pipeline.camera_target = self.camera.target;
        self.pipeline
            .render(self.scene.particles(), self.scene.transforms(), self.scene.time());
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
        self.pipeline.resize(width, height);
    }

    fn pick_camera(&self) -> PickCamera {
        PickCamera {
            position: self.pipeline.camera_position,
            target: self.pipeline.camera_target,
            up: Vec3::UP,
            fov_y: self.pipeline.fov,
            aspect: self.pipeline.aspect(),
        }
    }

    /// Hover detection; returns the hovered particle id
    #[wasm_bindgen]
    pub fn on_mouse_move(&mut self, x: f32, y: f32) -> Option<u32> {
        let hit = self.picker.pick(x, y, self.width as f32, self.height as f32, &self.pick_camera());
        let hovered = hit.map(|hit| hit.particle_id);
        self.scene.set_hovered(hovered);
        hovered.map(|id| id as u32)
    }

    /// Click on a photo; returns its id when the tap opened it
    #[wasm_bindgen]
    pub fn on_click(&mut self, x: f32, y: f32) -> Option<u32> {
        let particles = self.scene.particles();
        let hit = self.picker.pick_where(
            x,
            y,
            self.width as f32,
            self.height as f32,
            &self.pick_camera(),
            |id| particles.get(id).is_some_and(Particle::is_photo),
        )?;

        match self.scene.dispatch(UiEvent::Tap(hit.particle_id)) {
            Transition::Applied => Some(hit.particle_id as u32),
            Transition::Ignored => None,
        }
    }

    /// Hold-to-scatter control pressed
    #[wasm_bindgen]
    pub fn press_start(&mut self) {
        self.scene.dispatch(UiEvent::PressStart);
    }

    /// Hold-to-scatter control released
    #[wasm_bindgen]
    pub fn press_end(&mut self) {
        self.scene.dispatch(UiEvent::PressEnd);
    }

    /// Enable gesture control and start the camera feeding `video`
    #[wasm_bindgen]
    pub fn grant_permission(&mut self, video: HtmlVideoElement) {
        self.scene.dispatch(UiEvent::GrantPermission);
        self.vision.start(video, self.scene.state());
    }

    /// Show the camera stream in another video element (selfie view)
    #[wasm_bindgen]
    pub fn attach_video(&self, video: HtmlVideoElement) -> bool {
        self.vision.attach(&video)
    }

    #[wasm_bindgen]
    pub fn close_photo(&mut self) -> bool {
        self.scene.dispatch(UiEvent::ClosePhoto).is_applied()
    }

    #[wasm_bindgen]
    pub fn start_selfie(&mut self) -> bool {
        self.scene.dispatch(UiEvent::StartSelfie).is_applied()
    }

    #[wasm_bindgen]
    pub fn reward(&mut self) -> bool {
        self.scene.dispatch(UiEvent::Reward).is_applied()
    }

    /// Orbit camera
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.camera.orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    /// Current state for the host UI (returns JSON string)
    #[wasm_bindgen]
    pub fn get_state(&self) -> String {
        let state = self.scene.state();
        let state = state.borrow();
        state_json(
            &state,
            self.scene.hovered(),
            &self.vision.last_gesture(),
            self.vision.status().label(),
        )
    }

    /// Get photo info by particle id (returns JSON string)
    #[wasm_bindgen]
    pub fn get_photo_info(&self, id: u32) -> Option<String> {
        self.scene
            .particle(id as usize)
            .filter(|p| p.is_photo())
            .map(photo_json)
    }

    /// HUD label of the gesture subsystem
    #[wasm_bindgen]
    pub fn gesture_status(&self) -> String {
        self.vision.status().label().to_string()
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> u32 {
        self.scene.particles().len() as u32
    }

    /// Stop the gesture loop, release the camera and GPU resources
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.vision.shutdown();
        self.pipeline.dispose();
        log::info!("Particle tree disposed");
    }
}

impl Drop for ParticleTreeExperience {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn json_opt(value: Option<usize>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

fn state_json(state: &MorphState, hovered: Option<usize>, gesture: &str, vision: &str) -> String {
    format!(
        r#"{{"layout":"{}","permission":{},"overlay":"{}","selected":{},"selfie":{},"reward":{},"hovered":{},"gesture":"{}","vision":"{}"}}"#,
        state.layout().as_str(),
        state.permission_granted(),
        state.overlay().as_str(),
        json_opt(state.selected()),
        state.selfie_active(),
        state.reward_active(),
        json_opt(hovered),
        escape_json(gesture),
        escape_json(vision)
    )
}

fn photo_json(particle: &Particle) -> String {
    format!(
        r#"{{"id":{},"role":"{}","url":"{}","clue":{}}}"#,
        particle.id,
        particle.role.as_str(),
        escape_json(particle.texture_url.as_deref().unwrap_or_default()),
        particle.is_clue()
    )
}

/// Escape special characters for JSON
fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
