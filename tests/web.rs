#![cfg(target_arch = "wasm32")]

use particle_tree_morph::config::SceneConfig;
use particle_tree_morph::scene::TreeScene;
use particle_tree_morph::state::{Layout, Transition, UiEvent};
use particle_tree_morph::ParticleTreeExperience;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(320);
    canvas.set_height(240);
    canvas
}

#[wasm_bindgen_test]
fn scene_ticks_in_browser() {
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let mut scene = TreeScene::new(&SceneConfig::default(), seed);
    scene.tick(1.0 / 60.0, particle_tree_morph::math::Vec3::new(0.0, 5.0, 60.0));
    assert_eq!(scene.transforms().len(), 450);
    assert_eq!(scene.dispatch(UiEvent::PressStart), Transition::Ignored);
    assert_eq!(scene.layout(), Layout::Tree);
}

#[wasm_bindgen_test]
fn experience_renders_and_disposes() {
    // Headless runners without WebGL2 cannot build the pipeline
    let mut experience = match ParticleTreeExperience::with_config(canvas(), "seed: 7\n") {
        Ok(experience) => experience,
        Err(_) => return,
    };
    assert_eq!(experience.particle_count(), 450);

    experience.press_start();
    experience.render(1.0 / 60.0);
    assert!(experience.get_state().starts_with(r#"{"layout":"tree","permission":false"#));
    assert_eq!(experience.gesture_status(), "Camera off");

    experience.dispose();
    experience.render(1.0 / 60.0);
}
