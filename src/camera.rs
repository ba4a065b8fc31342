//! Camera, projection and the orbit controller.
//!
//! The [`Camera`] is plain CPU state (position plus yaw/pitch) so that the scene
//! animator can own and test it without a GPU. [`CameraResources`] is the GPU
//! side living in the [`crate::context::Context`].

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

use crate::config::CameraSettings;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// keeps look_to_rh away from a degenerate up vector
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    /// Turns the camera towards `target` without moving it.
    pub fn look_at(&mut self, target: Point3<f32>) {
        let direction = target - self.position;
        if direction.magnitude2() == 0.0 {
            return;
        }
        let direction = direction.normalize();
        self.yaw = Rad(direction.z.atan2(direction.x));
        self.pitch = Rad(direction.y.asin().clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

impl From<&CameraSettings> for Camera {
    fn from(settings: &CameraSettings) -> Self {
        Camera::new(settings.position, settings.yaw, settings.pitch)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from(&CameraSettings::default())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn from_settings(width: u32, height: u32, settings: &CameraSettings) -> Self {
        Self::new(width, height, settings.fovy, settings.znear, settings.zfar)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

/// Drag-to-orbit around a fixed target.
///
/// Mouse deltas are collected while dragging and applied once per frame in
/// [`OrbitController::update`]. The distance to the target never changes.
#[derive(Clone, Debug)]
pub struct OrbitController {
    pub target: Point3<f32>,
    sensitivity: f32,
    dragging: bool,
    rotate_horizontal: f32,
    rotate_vertical: f32,
}

impl OrbitController {
    pub fn new(target: Point3<f32>, sensitivity: f32) -> Self {
        Self {
            target,
            sensitivity,
            dragging: false,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        if !self.dragging {
            return;
        }
        self.rotate_horizontal += dx as f32;
        self.rotate_vertical += dy as f32;
    }

    pub fn update(&mut self, camera: &mut Camera) {
        if self.rotate_horizontal == 0.0 && self.rotate_vertical == 0.0 {
            return;
        }
        let offset = camera.position - self.target;
        let radius = offset.magnitude();
        if radius > 0.0 {
            let azimuth = offset.x.atan2(offset.z) - self.rotate_horizontal * self.sensitivity;
            let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos()
                - self.rotate_vertical * self.sensitivity)
                .clamp(0.01, std::f32::consts::PI - 0.01);
            let (sin_polar, cos_polar) = polar.sin_cos();
            let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
            camera.position = self.target
                + Vector3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth) * radius;
            camera.look_at(self.target);
        }
        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 0.0), 0.005)
    }
}
