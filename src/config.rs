//! Tuned constants for the scene.
//!
//! The values reproduce the look of the portfolio page. They were picked by eye,
//! so they are kept as named settings instead of being derived from anything.

use cgmath::{Deg, Point3, Vector3};

/// Number of background stars.
pub const STAR_COUNT: usize = 200;
/// Edge length of the cube the stars are scattered in (centred on the origin).
pub const STAR_SPREAD: f32 = 100.0;

/// Camera displacement per pixel of scroll offset, per axis.
pub const SCROLL_GAIN_X: f32 = 0.0002;
pub const SCROLL_GAIN_Y: f32 = 0.0002;
pub const SCROLL_GAIN_Z: f32 = 0.01;

/// Deepest offset the native wheel emulation scrolls to, in pixels.
pub const MAX_SCROLL_OFFSET: f64 = 4000.0;
/// Pixels per wheel notch in the native wheel emulation.
pub const PIXELS_PER_LINE: f64 = 40.0;

/// Maps a document scroll offset to a camera position.
///
/// The offset is the signed distance of the document's top edge from the
/// viewport's top edge, so it is negative while the page is scrolled down and
/// the camera moves towards positive x, y and z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRig {
    pub gain: Vector3<f32>,
}

impl ScrollRig {
    pub fn camera_position(&self, offset: f64) -> Point3<f32> {
        let offset = offset as f32;
        Point3::new(
            -self.gain.x * offset,
            -self.gain.y * offset,
            -self.gain.z * offset,
        )
    }
}

impl Default for ScrollRig {
    fn default() -> Self {
        Self {
            gain: Vector3::new(SCROLL_GAIN_X, SCROLL_GAIN_Y, SCROLL_GAIN_Z),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CameraSettings {
    pub position: Point3<f32>,
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            // looking down -z
            position: Point3::new(0.0, 0.0, 30.0),
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
            fovy: Deg(75.0),
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightSettings {
    pub position: [f32; 3],
    pub colour: [f32; 3],
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            position: [17.0, 17.0, 17.0],
            colour: [1.0, 1.0, 1.0],
        }
    }
}

/// Everything the showcase needs to build and animate its scene.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub star_count: usize,
    pub star_spread: f32,
    pub scroll: ScrollRig,
    pub camera: CameraSettings,
    pub light: LightSettings,
    pub clear_colour: wgpu::Color,
    pub background: Option<String>,
    /// Adds the textured badge cubes around the torus.
    pub show_badges: bool,
    /// Deepest scroll offset the native wheel emulation can reach.
    pub max_scroll_offset: f64,
    /// Pixels scrolled per wheel "line" in the native emulation.
    pub pixels_per_line: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: STAR_COUNT,
            star_spread: STAR_SPREAD,
            scroll: ScrollRig::default(),
            camera: CameraSettings::default(),
            light: LightSettings::default(),
            clear_colour: wgpu::Color::BLACK,
            background: Some("space.jpg".to_string()),
            show_badges: true,
            max_scroll_offset: MAX_SCROLL_OFFSET,
            pixels_per_line: PIXELS_PER_LINE,
        }
    }
}
