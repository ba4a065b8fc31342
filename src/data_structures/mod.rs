//! Engine data structures: scene objects, models, textures, and instances.
//!
//! - `scene_object` describes what an object looks like and how it moves
//! - `star_field` scatters the background stars
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds per-instance transformation data
//! - `scene_graph` groups objects into instanced model nodes

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod scene_object;
pub mod star_field;
pub mod texture;
