//! starscape
//!
//! A scroll-driven decorative 3D scene for the web and native windows: a
//! starfield, a spinning torus, a ghostly dodecahedron, a normal mapped moon
//! and a ring of textured badge cubes. The camera glides through the scene as
//! the page scrolls and can be orbited by dragging.
//!
//! High-level modules
//! - `animator`: the CPU-side scene state (objects, camera, frame and scroll updates)
//! - `camera`: camera types, orbit controller and uniforms for view/projection
//! - `config`: tuned constants and the `SceneConfig`
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: scene objects, meshes, instances, textures, the scene graph
//! - `flow`: the event loop and the flow abstraction it drives
//! - `pipelines`: the lit, unlit and background render pipelines
//! - `portfolio`: the layout of the scene
//! - `resources`: texture loading and procedural geometry
//! - `render`: render composition for efficient pipeline reuse
//! - `showcase`: the flow that puts the scene on screen
//!

pub mod animator;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod portfolio;
pub mod render;
pub mod resources;
pub mod showcase;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Opens the window (or binds the `bg` canvas) and runs the scene until it is closed.
pub fn launch() -> anyhow::Result<()> {
    flow::run(vec![showcase::constructor()])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    launch().map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
