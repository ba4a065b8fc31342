//! Meshes, materials and models on the GPU.
//!
//! A [`Model`] is a list of [`Mesh`]es plus the [`Material`]s they index into.
//! Materials are two-state: every texture channel starts with a fallback and is
//! swapped for the real image once the asset loader resolves it.

use std::ops::Range;

use crate::{
    data_structures::texture::Texture,
    resources::AssetState,
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Which texture of a material a loaded image belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Diffuse,
    Normal,
}

/// One texture channel of a material: the loaded texture once it arrives and
/// the fallback bound until then.
#[derive(Debug)]
pub struct TextureSlot {
    pub state: AssetState<Texture>,
    fallback: Texture,
}

impl TextureSlot {
    /// A slot that waits for a texture and shows `fallback` meanwhile.
    pub fn pending(fallback: Texture) -> Self {
        Self {
            state: AssetState::Pending,
            fallback,
        }
    }

    /// A slot that will never be replaced (flat colours, default normal maps).
    pub fn fixed(texture: Texture) -> Self {
        Self {
            state: AssetState::Ready(texture.clone()),
            fallback: texture,
        }
    }

    pub fn active(&self) -> &Texture {
        self.state.get().unwrap_or(&self.fallback)
    }
}

#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub diffuse: TextureSlot,
    pub normal: TextureSlot,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        diffuse: TextureSlot,
        normal: TextureSlot,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let bind_group = mk_bind_group(device, name, &diffuse, &normal, layout);
        Self {
            name: name.to_string(),
            diffuse,
            normal,
            bind_group,
        }
    }

    /// Installs the outcome of a texture load.
    ///
    /// A successful load rebinds the material; a failed one keeps the fallback.
    pub fn resolve(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        channel: Channel,
        loaded: anyhow::Result<Texture>,
    ) {
        let slot = match channel {
            Channel::Diffuse => &mut self.diffuse,
            Channel::Normal => &mut self.normal,
        };
        match loaded {
            Ok(texture) => {
                slot.state = AssetState::Ready(texture);
                self.bind_group =
                    mk_bind_group(device, &self.name, &self.diffuse, &self.normal, layout);
            }
            Err(e) => {
                log::debug!(
                    "{:?} texture of material {} keeps its fallback: {}",
                    channel,
                    self.name,
                    e
                );
                slot.state = AssetState::Failed;
            }
        }
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    name: &str,
    diffuse: &TextureSlot,
    normal: &TextureSlot,
    layout: &wgpu::BindGroupLayout,
) -> wgpu::BindGroup {
    let diffuse = diffuse.active();
    let normal = normal.active();
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&normal.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&normal.sampler),
            },
        ],
        label: Some(name),
    })
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: usize,
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        material: &'a Material,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );

    fn draw_model_instanced(
        &mut self,
        model: &'a Model,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'b> DrawModel<'b> for wgpu::RenderPass<'_> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        material: &'b Material,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }

    fn draw_model_instanced(
        &mut self,
        model: &'b Model,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        for mesh in &model.meshes {
            match model.materials.get(mesh.material) {
                Some(material) => self.draw_mesh_instanced(
                    mesh,
                    material,
                    instances.clone(),
                    camera_bind_group,
                    light_bind_group,
                ),
                None => log::warn!("mesh {} references a missing material", mesh.name),
            }
        }
    }
}
