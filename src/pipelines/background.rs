use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{PipelineOptions, mk_render_pipeline},
    resources::AssetState,
};

/// Full screen backdrop behind the scene.
///
/// Draws a single triangle covering the viewport without vertex buffers and
/// never writes depth, so anything rendered afterwards lands in front of it.
pub fn mk_background_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let pipeline_layout = mk_pipeline_layout(device, texture_bind_group_layout);
    mk_render_pipeline(
        device,
        &pipeline_layout,
        config.format,
        &[],
        wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        },
        PipelineOptions::BACKDROP,
    )
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("background_bind_group_layout"),
    })
}

fn mk_pipeline_layout(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Background Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
        label: Some("background_bind_group"),
    })
}

/// The scene background image. Until it has loaded, and forever if it fails,
/// nothing is drawn and the clear colour shows through.
#[derive(Debug, Default)]
pub struct Backdrop {
    pub state: AssetState<Texture>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Backdrop {
    /// A backdrop that never shows an image.
    pub fn none() -> Self {
        Self {
            state: AssetState::Failed,
            bind_group: None,
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.bind_group.as_ref()
    }

    pub fn resolve(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        loaded: anyhow::Result<Texture>,
    ) {
        self.bind_group = match &loaded {
            Ok(texture) => Some(mk_bind_group(device, layout, texture)),
            Err(_) => None,
        };
        self.state.settle(loaded);
    }
}
