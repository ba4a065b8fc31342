//! Render pipelines owned by the [`crate::context::Context`].
//!
//! - `basic` draws lit, normal mapped surfaces
//! - `unlit` draws surfaces that show their texture without shading
//! - `background` draws the full screen backdrop
//! - `light` holds the point light uniform shared by the lit pipeline

pub mod background;
pub mod basic;
pub mod light;
pub mod unlit;

#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub unlit: wgpu::RenderPipeline,
    pub background: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        material_layout: &wgpu::BindGroupLayout,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
        background_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                material_layout,
                camera_layout,
                light_layout,
            ),
            unlit: unlit::mk_unlit_pipeline(
                device,
                config,
                material_layout,
                camera_layout,
                light_layout,
            ),
            background: background::mk_background_pipeline(device, config, background_layout),
        }
    }
}
