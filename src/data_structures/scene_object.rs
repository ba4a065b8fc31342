//! CPU-side description of everything that gets drawn.
//!
//! A [`SceneObject`] says what an object looks like ([`Shape`], [`Surface`]),
//! where it is ([`Instance`]) and how it moves ([`Spin`]). The GPU scene graph is
//! built from these descriptors and refreshed from them every frame.

use cgmath::Vector3;

use crate::data_structures::instance::Instance;

/// Primitive kind plus dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Dodecahedron {
        radius: f32,
    },
}

impl Shape {
    pub fn cube(size: f32) -> Self {
        Shape::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Sphere { .. } => "sphere",
            Shape::Torus { .. } => "torus",
            Shape::Box { .. } => "box",
            Shape::Dodecahedron { .. } => "dodecahedron",
        }
    }
}

/// Lit surfaces react to the point light, unlit ones show their texture as is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shading {
    Lit,
    Unlit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Surface {
    Colour {
        rgba: [u8; 4],
        shading: Shading,
    },
    Texture {
        path: String,
        normal_map: Option<String>,
        shading: Shading,
    },
}

impl Surface {
    pub fn colour(rgba: [u8; 4], shading: Shading) -> Self {
        Surface::Colour { rgba, shading }
    }

    pub fn texture(path: &str, shading: Shading) -> Self {
        Surface::Texture {
            path: path.to_string(),
            normal_map: None,
            shading,
        }
    }

    pub fn with_normal_map(self, normal: &str) -> Self {
        match self {
            Surface::Texture { path, shading, .. } => Surface::Texture {
                path,
                normal_map: Some(normal.to_string()),
                shading,
            },
            colour => colour,
        }
    }

    pub fn shading(&self) -> Shading {
        match self {
            Surface::Colour { shading, .. } | Surface::Texture { shading, .. } => *shading,
        }
    }
}

/// A fixed rotation increment in radians per axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spin {
    pub delta: Vector3<f32>,
}

impl Spin {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            delta: Vector3::new(x, y, z),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub surface: Surface,
    pub transform: Instance,
    /// Applied once per frame.
    pub spin: Option<Spin>,
    /// Applied once per scroll event.
    pub scroll_spin: Option<Spin>,
}

impl SceneObject {
    pub fn new(name: &str, shape: Shape, surface: Surface) -> Self {
        Self {
            name: name.to_string(),
            shape,
            surface,
            transform: Instance::new(),
            spin: None,
            scroll_spin: None,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn spinning(mut self, spin: Spin) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn spinning_on_scroll(mut self, spin: Spin) -> Self {
        self.scroll_spin = Some(spin);
        self
    }

    /// Two objects with the same mesh key can share one instanced draw.
    pub fn shares_mesh_with(&self, other: &SceneObject) -> bool {
        self.shape == other.shape && self.surface == other.surface
    }
}
