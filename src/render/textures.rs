use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

/// Load state of one photo texture
#[derive(Debug, Clone, PartialEq)]
pub enum TextureState<T> {
    Pending,
    Ready(T),
    /// Load or upload failed; the photo keeps its placeholder
    Failed,
}

/// Per-URL texture states. Several particles may share one URL.
#[derive(Debug)]
pub struct PhotoTextureCache<T> {
    entries: HashMap<String, TextureState<T>>,
}

impl<T> Default for PhotoTextureCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> PhotoTextureCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `url` as pending. Returns true only the first time a URL is seen.
    pub fn request(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), TextureState::Pending);
        true
    }

    pub fn resolve(&mut self, url: &str, result: Result<T, String>) {
        let state = match result {
            Ok(texture) => TextureState::Ready(texture),
            Err(e) => {
                log::warn!("Photo texture {} unavailable, using placeholder: {}", url, e);
                TextureState::Failed
            }
        };
        self.entries.insert(url.to_string(), state);
    }

    pub fn state(&self, url: &str) -> Option<&TextureState<T>> {
        self.entries.get(url)
    }

    /// The texture to draw, if it finished loading
    pub fn texture(&self, url: &str) -> Option<&T> {
        match self.entries.get(url) {
            Some(TextureState::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.count(|s| matches!(s, TextureState::Pending))
    }

    pub fn ready_count(&self) -> usize {
        self.count(|s| matches!(s, TextureState::Ready(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, TextureState::Failed))
    }

    fn count(&self, pred: impl Fn(&TextureState<T>) -> bool) -> usize {
        self.entries.values().filter(|s| pred(s)).count()
    }

    /// Drop every entry, returning the loaded textures for cleanup
    pub fn drain_ready(&mut self) -> Vec<T> {
        self.entries
            .drain()
            .filter_map(|(_, state)| match state {
                TextureState::Ready(texture) => Some(texture),
                _ => None,
            })
            .collect()
    }
}

type LoadResult = (String, Result<HtmlImageElement, String>);

/// Fetches images in the background; finished loads are collected each frame
#[derive(Default)]
pub struct ImageLoader {
    finished: Rc<RefCell<Vec<LoadResult>>>,
    /// Keeps the load/error callbacks alive until the image settles
    in_flight: HashMap<String, (HtmlImageElement, Closure<dyn FnMut()>, Closure<dyn FnMut()>)>,
}

impl ImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, url: &str) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                self.finished
                    .borrow_mut()
                    .push((url.to_string(), Err(format!("{:?}", e))));
                return;
            }
        };
        image.set_cross_origin(Some("anonymous"));

        let on_load = {
            let finished = self.finished.clone();
            let image = image.clone();
            let url = url.to_string();
            Closure::<dyn FnMut()>::new(move || {
                finished.borrow_mut().push((url.clone(), Ok(image.clone())));
            })
        };
        let on_error = {
            let finished = self.finished.clone();
            let url = url.to_string();
            Closure::<dyn FnMut()>::new(move || {
                finished
                    .borrow_mut()
                    .push((url.clone(), Err("image failed to load".to_string())));
            })
        };

        image.set_onload(Some(on_load.as_ref().unchecked_ref()));
        image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        image.set_src(url);
        self.in_flight.insert(url.to_string(), (image, on_load, on_error));
    }

    /// Loads that settled since the last call
    pub fn take_finished(&mut self) -> Vec<LoadResult> {
        let finished: Vec<LoadResult> = self.finished.borrow_mut().drain(..).collect();
        for (url, _) in &finished {
            if let Some((image, _, _)) = self.in_flight.remove(url) {
                image.set_onload(None);
                image.set_onerror(None);
            }
        }
        finished
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
