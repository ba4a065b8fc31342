use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
    },
    pipelines::basic::{PipelineOptions, mk_mesh_layout, mk_render_pipeline},
};

/**
 * Pipeline for surfaces that ignore the light and show their diffuse texture as is.
 *
 * It shares the bind group layout of the lit pipeline so that one material type
 * and one draw routine serve both; the unlit shader just never reads the normal
 * map or the light.
 */
pub fn mk_unlit_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    material_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = mk_mesh_layout(
        device,
        "Unlit Render Pipeline Layout",
        material_bind_group_layout,
        camera_bind_group_layout,
        light_bind_group_layout,
    );
    mk_render_pipeline(
        device,
        &layout,
        config.format,
        &[ModelVertex::desc(), InstanceRaw::desc()],
        wgpu::ShaderModuleDescriptor {
            label: Some("Unlit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("unlit.wgsl").into()),
        },
        PipelineOptions::MESH,
    )
}
