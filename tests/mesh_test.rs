use cgmath::{InnerSpace, Vector3};
use starscape::{
    data_structures::scene_object::Shape,
    resources::mesh::{self, MeshData},
};

fn shapes() -> Vec<Shape> {
    vec![
        Shape::Sphere {
            radius: 3.0,
            width_segments: 32,
            height_segments: 32,
        },
        Shape::Sphere {
            radius: 0.25,
            width_segments: 24,
            height_segments: 24,
        },
        Shape::Torus {
            radius: 10.0,
            tube: 3.0,
            radial_segments: 16,
            tubular_segments: 100,
        },
        Shape::cube(2.5),
        Shape::Dodecahedron { radius: 3.0 },
    ]
}

fn position(mesh: &MeshData, idx: u32) -> Vector3<f32> {
    mesh.vertices[idx as usize].position.into()
}

#[test]
fn sphere_counts_follow_segments() {
    let mesh = mesh::sphere(3.0, 32, 32);
    assert_eq!(mesh.vertices.len(), 33 * 33);
    assert_eq!(mesh.indices.len(), 6 * 32 * 31);

    let star = mesh::sphere(0.25, 24, 24);
    assert_eq!(star.vertices.len(), 25 * 25);
    assert_eq!(star.indices.len(), 6 * 24 * 23);
}

#[test]
fn torus_counts_follow_segments() {
    let mesh = mesh::torus(10.0, 3.0, 16, 100);
    assert_eq!(mesh.vertices.len(), 17 * 101);
    assert_eq!(mesh.indices.len(), 6 * 16 * 100);
    assert_eq!(mesh.triangle_count(), 2 * 16 * 100);
}

#[test]
fn box_and_dodecahedron_counts() {
    let cube = mesh::cuboid(1.0, 2.0, 3.0);
    assert_eq!(cube.vertices.len(), 24);
    assert_eq!(cube.indices.len(), 36);

    let dodecahedron = mesh::dodecahedron(3.0);
    assert_eq!(dodecahedron.vertices.len(), 108);
    assert_eq!(dodecahedron.indices.len(), 108);
}

#[test]
fn segment_counts_are_clamped() {
    let sphere = mesh::sphere(1.0, 0, 1);
    assert_eq!(sphere.vertices.len(), 4 * 3);
    assert_eq!(sphere.indices.len(), 6 * 3);

    let torus = mesh::torus(1.0, 0.5, 1, 2);
    assert_eq!(torus.vertices.len(), 4 * 4);
    assert_eq!(torus.indices.len(), 6 * 3 * 3);
}

#[test]
fn indices_are_in_range() {
    for shape in shapes() {
        let mesh = mesh::build(&shape);
        assert_eq!(mesh.indices.len() % 3, 0, "{}", shape.label());
        let count = mesh.vertices.len() as u32;
        assert!(
            mesh.indices.iter().all(|&i| i < count),
            "{} has an index out of range",
            shape.label()
        );
    }
}

#[test]
fn tangents_are_usable() {
    for shape in shapes() {
        let mesh = mesh::build(&shape);
        for vertex in &mesh.vertices {
            let tangent: Vector3<f32> = vertex.tangent.into();
            let bitangent: Vector3<f32> = vertex.bitangent.into();
            for v in [tangent, bitangent] {
                assert!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
                assert!(v.magnitude() > 0.5, "{} has a degenerate tangent", shape.label());
            }
        }
    }
}

#[test]
fn convex_shapes_wind_counter_clockwise_from_outside() {
    let convex = [
        mesh::build(&Shape::cube(2.5)),
        mesh::build(&Shape::Dodecahedron { radius: 3.0 }),
        mesh::build(&Shape::Sphere {
            radius: 3.0,
            width_segments: 32,
            height_segments: 32,
        }),
    ];
    for mesh in convex {
        for tri in mesh.indices.chunks_exact(3) {
            let (a, b, c) = (
                position(&mesh, tri[0]),
                position(&mesh, tri[1]),
                position(&mesh, tri[2]),
            );
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }
}

#[test]
fn torus_faces_point_away_from_the_tube() {
    let mesh = mesh::build(&Shape::Torus {
        radius: 10.0,
        tube: 3.0,
        radial_segments: 16,
        tubular_segments: 100,
    });
    for tri in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (
            position(&mesh, tri[0]),
            position(&mesh, tri[1]),
            position(&mesh, tri[2]),
        );
        let face_normal = (b - a).cross(c - a);
        let vertex_normal: Vector3<f32> = mesh.vertices[tri[0] as usize].normal.into();
        assert!(face_normal.dot(vertex_normal) > 0.0);
    }
}

#[test]
fn box_faces_are_upright() {
    let cube = mesh::cuboid(2.0, 2.0, 2.0);
    // front face: first vertex bottom left, third top right
    let v0 = cube.vertices[0];
    let v2 = cube.vertices[2];
    assert_eq!(v0.normal, [0.0, 0.0, 1.0]);
    assert_eq!(v0.position, [-1.0, -1.0, 1.0]);
    assert_eq!(v0.tex_coords, [0.0, 1.0]);
    assert_eq!(v2.position, [1.0, 1.0, 1.0]);
    assert_eq!(v2.tex_coords, [1.0, 0.0]);
}

#[test]
fn sphere_vertices_lie_on_the_surface() {
    let mesh = mesh::sphere(3.0, 16, 12);
    for vertex in &mesh.vertices {
        let p: Vector3<f32> = vertex.position.into();
        assert!((p.magnitude() - 3.0).abs() < 1e-4);
    }
}
