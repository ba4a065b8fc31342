//! Instanced scene graph.
//!
//! The graph is flat: one [`ModelNode`] per distinct mesh, each drawing all the
//! scene objects that share that mesh with a single instanced draw call. Nodes
//! remember which objects they draw, so refreshing them from the animator's
//! transforms is a straight copy.

use wgpu::{Device, Queue, util::DeviceExt};

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{self, Channel, Material, TextureSlot},
        scene_object::{SceneObject, Shading, Surface},
        texture::Texture,
    },
    render::{Instanced, Render},
    resources::{TextureRequest, TextureTarget, mesh},
};

/// Colour bound while a diffuse texture is loading, and for good if it fails.
pub const FALLBACK_DIFFUSE: [u8; 4] = [255, 255, 255, 255];

/// Partitions `objects` into groups that can share one instanced draw.
///
/// Groups keep the order in which their first member appears; members keep
/// their order too.
pub fn group_by_mesh(objects: &[SceneObject]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (idx, object) in objects.iter().enumerate() {
        match groups
            .iter_mut()
            .find(|group| objects[group[0]].shares_mesh_with(object))
        {
            Some(group) => group.push(idx),
            None => groups.push(vec![idx]),
        }
    }
    groups
}

#[derive(Debug)]
pub struct ModelNode {
    instance_buffer: wgpu::Buffer,
    instances: Vec<Instance>,
    /// Indices of the scene objects drawn by this node, one per instance.
    members: Vec<usize>,
    model: model::Model,
    shading: Shading,
    id: u32,
}

impl ModelNode {
    pub fn from_model(
        id: u32,
        device: &Device,
        model: model::Model,
        shading: Shading,
        members: Vec<usize>,
        instances: Vec<Instance>,
    ) -> Self {
        let instance_data = instances.iter().map(Instance::to_raw).collect::<Vec<_>>();

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            instance_buffer,
            instances,
            members,
            model,
            shading,
            id,
        }
    }

    /// Copies the current transforms of this node's objects.
    pub fn sync(&mut self, objects: &[SceneObject]) {
        for (instance, member) in self.instances.iter_mut().zip(&self.members) {
            match objects.get(*member) {
                Some(object) => *instance = object.transform.clone(),
                None => log::warn!("scene node {} lost object {}", self.id, member),
            }
        }
    }

    pub fn write_to_buffer(&self, queue: &Queue) {
        let raw_instances: Vec<InstanceRaw> = self.instances.iter().map(Instance::to_raw).collect();
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&raw_instances),
        );
    }

    fn resolve(
        &mut self,
        device: &Device,
        layout: &wgpu::BindGroupLayout,
        channel: Channel,
        loaded: anyhow::Result<Texture>,
    ) {
        match self.model.materials.first_mut() {
            Some(material) => material.resolve(device, layout, channel, loaded),
            None => log::warn!("scene node {} has no material to put a texture in", self.id),
        }
    }

    pub fn get_render(&self) -> Render<'_> {
        let instanced = Instanced {
            instance: &self.instance_buffer,
            model: &self.model,
            amount: self.instances.len(),
        };
        match self.shading {
            Shading::Lit => Render::Default(instanced),
            Shading::Unlit => Render::Unlit(instanced),
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<ModelNode>,
}

impl SceneGraph {
    /// Builds one node per mesh group and lists the textures those nodes wait for.
    pub fn build(
        device: &Device,
        queue: &Queue,
        layout: &wgpu::BindGroupLayout,
        objects: &[SceneObject],
    ) -> (Self, Vec<TextureRequest>) {
        let mut requests = Vec::new();
        let nodes = group_by_mesh(objects)
            .into_iter()
            .enumerate()
            .map(|(node_idx, members)| {
                let first = &objects[members[0]];
                let material = mk_material(device, queue, layout, node_idx, first, &mut requests);
                let mesh = mesh::build(&first.shape).upload(&first.name, 0, device);
                let instances = members
                    .iter()
                    .map(|&member| objects[member].transform.clone())
                    .collect();
                ModelNode::from_model(
                    node_idx as u32,
                    device,
                    model::Model {
                        meshes: vec![mesh],
                        materials: vec![material],
                    },
                    first.surface.shading(),
                    members,
                    instances,
                )
            })
            .collect::<Vec<_>>();
        log::debug!(
            "scene graph: {} objects in {} nodes",
            objects.len(),
            nodes.len()
        );
        (Self { nodes }, requests)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn instance_count(&self) -> usize {
        self.nodes.iter().map(|node| node.instances.len()).sum()
    }

    pub fn sync(&mut self, objects: &[SceneObject]) {
        self.nodes.iter_mut().for_each(|node| node.sync(objects));
    }

    pub fn write_to_buffers(&self, queue: &Queue) {
        self.nodes
            .iter()
            .for_each(|node| node.write_to_buffer(queue));
    }

    /// Installs a loaded (or failed) texture into the material of `node`.
    pub fn resolve(
        &mut self,
        device: &Device,
        layout: &wgpu::BindGroupLayout,
        node: usize,
        channel: Channel,
        loaded: anyhow::Result<Texture>,
    ) {
        match self.nodes.get_mut(node) {
            Some(node) => node.resolve(device, layout, channel, loaded),
            None => log::warn!("texture arrived for unknown scene node {}", node),
        }
    }

    pub fn get_render(&self) -> Render<'_> {
        Render::Composed(self.nodes.iter().map(ModelNode::get_render).collect())
    }
}

fn mk_material(
    device: &Device,
    queue: &Queue,
    layout: &wgpu::BindGroupLayout,
    node: usize,
    object: &SceneObject,
    requests: &mut Vec<TextureRequest>,
) -> Material {
    let flat_normal = || TextureSlot::fixed(Texture::create_default_normal_map(device, queue));
    match &object.surface {
        Surface::Colour { rgba, .. } => Material::new(
            device,
            &object.name,
            TextureSlot::fixed(Texture::create_solid(device, queue, *rgba, &object.name, false)),
            flat_normal(),
            layout,
        ),
        Surface::Texture {
            path, normal_map, ..
        } => {
            requests.push(TextureRequest {
                target: TextureTarget::Material {
                    node,
                    channel: Channel::Diffuse,
                },
                path: path.clone(),
            });
            let normal = match normal_map {
                Some(normal_path) => {
                    requests.push(TextureRequest {
                        target: TextureTarget::Material {
                            node,
                            channel: Channel::Normal,
                        },
                        path: normal_path.clone(),
                    });
                    TextureSlot::pending(Texture::create_default_normal_map(device, queue))
                }
                None => flat_normal(),
            };
            Material::new(
                device,
                &object.name,
                TextureSlot::pending(Texture::create_solid(
                    device,
                    queue,
                    FALLBACK_DIFFUSE,
                    path,
                    false,
                )),
                normal,
                layout,
            )
        }
    }
}
