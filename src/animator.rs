//! The scene animator.
//!
//! [`Animator`] owns every [`SceneObject`] and the [`Camera`]. It is plain CPU
//! state: the host calls [`Animator::on_frame`] once per frame and
//! [`Animator::on_scroll`] for every scroll event, and the showcase flow copies
//! the result into the GPU scene graph afterwards. Objects are registered once
//! during startup and never removed.

use crate::{
    camera::Camera,
    config::{SceneConfig, ScrollRig},
    data_structures::scene_object::SceneObject,
};

#[derive(Clone, Debug)]
pub struct Animator {
    objects: Vec<SceneObject>,
    camera: Camera,
    scroll: ScrollRig,
    frames: u64,
}

impl Animator {
    pub fn new(config: &SceneConfig, objects: Vec<SceneObject>) -> Self {
        Self {
            objects,
            camera: Camera::from(&config.camera),
            scroll: config.scroll,
            frames: 0,
        }
    }

    /// Adds an object during initialization and returns its index.
    pub fn register(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Advances every spinning object by its per-frame increment.
    pub fn on_frame(&mut self) {
        for object in &mut self.objects {
            if let Some(spin) = object.spin {
                object.transform.rotate_by(spin.delta);
            }
        }
        self.frames += 1;
    }

    /// Places the camera for the given document scroll offset.
    ///
    /// The position depends on `offset` alone, so repeated calls with the same
    /// offset are idempotent. The camera orientation is left untouched.
    pub fn on_scroll(&mut self, offset: f64) {
        self.camera.position = self.scroll.camera_position(offset);
    }

    /// Advances every object that spins per scroll event.
    pub fn spin_on_scroll(&mut self) {
        for object in &mut self.objects {
            if let Some(spin) = object.scroll_spin {
                object.transform.rotate_by(spin.delta);
            }
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
