//! The GPU and window context shared by all flows.
//!
//! [`Context`] owns the surface, device and queue together with everything
//! that lives for the whole run of the app: the camera and light uniforms, the
//! render pipelines and their bind group layouts, and the native scroll
//! emulation.

use std::sync::Arc;

use anyhow::Context as _;
use wgpu::util::DeviceExt;
use winit::{event::MouseScrollDelta, window::Window};

use crate::{
    camera::{Camera, CameraResources, CameraUniform, Projection},
    config::{CameraSettings, LightSettings, MAX_SCROLL_OFFSET, PIXELS_PER_LINE},
    data_structures::texture,
    pipelines::{
        Pipelines, background,
        light::{LightResources, LightUniform},
    },
    resources::diffuse_normal_layout,
};

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub background_layout: wgpu::BindGroupLayout,
    pub clear_colour: wgpu::Color,
    pub scroll: VirtualScroll,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter is compatible with the surface")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("Failed to request a device")?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface; anything else comes out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("The surface supports no texture format")?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera_settings = CameraSettings::default();
        let camera = Camera::from(&camera_settings);
        let projection = Projection::from_settings(config.width, config.height, &camera_settings);
        let camera = mk_camera_resources(&device, camera, &projection);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(LightUniform::from(&LightSettings::default()), &device);

        let material_layout = diffuse_normal_layout(&device);
        let background_layout = background::mk_bind_group_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &config,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &background_layout,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            material_layout,
            background_layout,
            clear_colour: wgpu::Color::BLACK,
            scroll: VirtualScroll::default(),
            window,
            depth_texture,
        })
    }

    /// Recomputes the camera uniform and uploads it.
    pub fn write_camera(&mut self) {
        self.camera
            .uniform
            .update_view_proj(&self.camera.camera, &self.projection);
        self.queue.write_buffer(
            &self.camera.buffer,
            0,
            bytemuck::cast_slice(&[self.camera.uniform]),
        );
    }
}

fn mk_camera_resources(
    device: &wgpu::Device,
    camera: Camera,
    projection: &Projection,
) -> CameraResources {
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, projection);

    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: &bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("camera_bind_group"),
    });

    CameraResources {
        camera,
        uniform,
        buffer,
        bind_group,
        bind_group_layout,
    }
}

/// Handles a flow constructor gets to create its GPU resources.
///
/// Device and queue are reference counted internally, so the clones are cheap.
#[derive(Clone, Debug)]
pub struct InitContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl From<&Context> for InitContext {
    fn from(ctx: &Context) -> Self {
        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
        }
    }
}

/// Document scroll emulation for native windows.
///
/// A browser reports how far the document's top edge has moved above the
/// viewport. Native windows have no document, so the wheel drives a virtual
/// one instead: the offset starts at zero, goes negative while scrolling down
/// and is clamped to `[-max_offset, 0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VirtualScroll {
    offset: f64,
    max_offset: f64,
    pixels_per_line: f64,
}

impl VirtualScroll {
    pub fn new(max_offset: f64, pixels_per_line: f64) -> Self {
        Self {
            offset: 0.0,
            max_offset: max_offset.max(0.0),
            pixels_per_line,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn configure(&mut self, max_offset: f64, pixels_per_line: f64) {
        self.max_offset = max_offset.max(0.0);
        self.pixels_per_line = pixels_per_line;
        self.offset = self.offset.clamp(-self.max_offset, 0.0);
    }

    /// Moves the virtual document by one wheel event and returns the new offset.
    pub fn apply(&mut self, delta: &MouseScrollDelta) -> f64 {
        let moved = match delta {
            MouseScrollDelta::LineDelta(_, lines) => *lines as f64 * self.pixels_per_line,
            MouseScrollDelta::PixelDelta(position) => position.y,
        };
        self.offset = (self.offset + moved).clamp(-self.max_offset, 0.0);
        self.offset
    }
}

impl Default for VirtualScroll {
    fn default() -> Self {
        Self::new(MAX_SCROLL_OFFSET, PIXELS_PER_LINE)
    }
}
