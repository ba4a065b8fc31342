use cgmath::{InnerSpace, Vector2, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::{model, scene_object::Shape};

/// Triangle list on the CPU, ready to be uploaded.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<model::ModelVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn upload(&self, name: &str, material: usize, device: &wgpu::Device) -> model::Mesh {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        model::Mesh {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: self.indices.len() as u32,
            material,
        }
    }
}

pub fn build(shape: &Shape) -> MeshData {
    let mut mesh = match *shape {
        Shape::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments, height_segments),
        Shape::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => torus(radius, tube, radial_segments, tubular_segments),
        Shape::Box {
            width,
            height,
            depth,
        } => cuboid(width, height, depth),
        Shape::Dodecahedron { radius } => dodecahedron(radius),
    };
    compute_tangents(&mut mesh);
    mesh
}

fn vertex(position: Vector3<f32>, normal: Vector3<f32>, uv: [f32; 2]) -> model::ModelVertex {
    model::ModelVertex {
        position: position.into(),
        tex_coords: uv,
        normal: normal.into(),
        // filled in by `compute_tangents`
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }
}

/// UV sphere. Texture row 0 sits at the north pole.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * std::f32::consts::PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * std::f32::consts::TAU;
            let normal = Vector3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            mesh.vertices.push(vertex(normal * radius, normal, [u, v]));
        }
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // the pole rows collapse one triangle of each quad
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Ring around the z axis, `radius` to the centre of a tube of radius `tube`.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let radial_segments = radial_segments.max(3);
    let tubular_segments = tubular_segments.max(3);
    let mut mesh = MeshData::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * std::f32::consts::TAU;
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let centre = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - centre).normalize();
            let uv = [
                i as f32 / tubular_segments as f32,
                1.0 - j as f32 / radial_segments as f32,
            ];
            mesh.vertices.push(vertex(position, normal, uv));
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Axis-aligned box with one full texture per face, upright on the side faces.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
    // (outward normal, face right); face up is normal x right so every face winds CCW
    let faces = [
        (Vector3::unit_z(), Vector3::unit_x()),
        (-Vector3::unit_z(), -Vector3::unit_x()),
        (Vector3::unit_x(), -Vector3::unit_z()),
        (-Vector3::unit_x(), Vector3::unit_z()),
        (Vector3::unit_y(), Vector3::unit_x()),
        (-Vector3::unit_y(), Vector3::unit_x()),
    ];
    let mut mesh = MeshData::default();
    for (normal, right) in faces {
        let up: Vector3<f32> = normal.cross(right);
        let base = mesh.vertices.len() as u32;
        for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner: Vector3<f32> = normal + right * s + up * t;
            let position = Vector3::new(corner.x * half.x, corner.y * half.y, corner.z * half.z);
            let uv = [(s + 1.0) / 2.0, (1.0 - t) / 2.0];
            mesh.vertices.push(vertex(position, normal, uv));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Regular dodecahedron with flat faces and a spherical UV projection.
///
/// Built as the dual of the icosahedron: every icosahedron vertex becomes a
/// pentagonal face whose corners are the centres of the five triangles around it.
pub fn dodecahedron(radius: f32) -> MeshData {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut ico = Vec::with_capacity(12);
    for a in [-1.0, 1.0] {
        for b in [-phi, phi] {
            ico.push(Vector3::new(0.0, a, b));
            ico.push(Vector3::new(a, b, 0.0));
            ico.push(Vector3::new(b, 0.0, a));
        }
    }

    // icosahedron edges have length 2
    let is_edge = |p: Vector3<f32>, q: Vector3<f32>| ((p - q).magnitude() - 2.0).abs() < 1e-3;
    let mut triangles = Vec::with_capacity(20);
    for i in 0..ico.len() {
        for j in i + 1..ico.len() {
            for k in j + 1..ico.len() {
                if is_edge(ico[i], ico[j]) && is_edge(ico[j], ico[k]) && is_edge(ico[i], ico[k]) {
                    triangles.push([i, j, k]);
                }
            }
        }
    }
    let centres: Vec<Vector3<f32>> = triangles
        .iter()
        .map(|t| ((ico[t[0]] + ico[t[1]] + ico[t[2]]) / 3.0).normalize() * radius)
        .collect();

    let mut mesh = MeshData::default();
    for (idx, axis) in ico.iter().enumerate() {
        let axis = axis.normalize();
        let helper = if axis.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        let e1 = axis.cross(helper).normalize();
        let e2 = axis.cross(e1);
        let mut corners: Vec<Vector3<f32>> = triangles
            .iter()
            .zip(centres.iter())
            .filter(|(t, _)| t.contains(&idx))
            .map(|(_, c)| *c)
            .collect();
        // counter-clockwise when looking at the face from outside
        corners.sort_by(|p, q| {
            let angle = |v: &Vector3<f32>| v.dot(e2).atan2(v.dot(e1));
            angle(p).total_cmp(&angle(q))
        });

        for n in 1..corners.len().saturating_sub(1) {
            let (p0, mut p1, mut p2) = (corners[0], corners[n], corners[n + 1]);
            let normal = (p1 - p0).cross(p2 - p0);
            if normal.dot(axis) < 0.0 {
                std::mem::swap(&mut p1, &mut p2);
            }
            let normal = (p1 - p0).cross(p2 - p0).normalize();
            for p in [p0, p1, p2] {
                let dir = p.normalize();
                let uv = [
                    0.5 + dir.x.atan2(dir.z) / std::f32::consts::TAU,
                    0.5 - dir.y.asin() / std::f32::consts::PI,
                ];
                mesh.indices.push(mesh.vertices.len() as u32);
                mesh.vertices.push(vertex(p, normal, uv));
            }
        }
    }
    mesh
}

/**
 * Generated meshes don't come with tangents and bitangents so they are derived
 * from the triangles for normal maps to work.
 *
 * Triangles with a degenerate UV mapping contribute nothing; vertices that end up
 * without a usable tangent get one perpendicular to their normal.
 */
pub fn compute_tangents(mesh: &mut MeshData) {
    let vertices = &mut mesh.vertices;
    let mut tangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];
    let mut bitangents = vec![Vector3::new(0.0f32, 0.0, 0.0); vertices.len()];

    for c in mesh.indices.chunks_exact(3) {
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: Vector3<_> = v0.position.into();
        let pos1: Vector3<_> = v1.position.into();
        let pos2: Vector3<_> = v2.position.into();

        let uv0: Vector2<_> = v0.tex_coords.into();
        let uv1: Vector2<_> = v1.tex_coords.into();
        let uv2: Vector2<_> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solving
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // flipped to get right-handed normal maps with wgpu's texture coordinates
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for &i in c {
            tangents[i as usize] += tangent;
            bitangents[i as usize] += bitangent;
        }
    }

    for (i, v) in vertices.iter_mut().enumerate() {
        let normal: Vector3<f32> = v.normal.into();
        // Gram-Schmidt against the normal, then fall back to any perpendicular
        let mut tangent = tangents[i] - normal * normal.dot(tangents[i]);
        if !(tangent.magnitude2() > 1e-12) || !tangent.x.is_finite() {
            let helper = if normal.x.abs() < 0.9 {
                Vector3::unit_x()
            } else {
                Vector3::unit_y()
            };
            tangent = normal.cross(helper);
        }
        let tangent = tangent.normalize();
        let mut bitangent = bitangents[i];
        if !(bitangent.magnitude2() > 1e-12) || !bitangent.x.is_finite() {
            bitangent = normal.cross(tangent);
        }
        v.tangent = tangent.into();
        v.bitangent = bitangent.normalize().into();
    }
}
