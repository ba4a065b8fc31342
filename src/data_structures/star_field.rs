use rand::Rng;

use crate::data_structures::scene_object::{SceneObject, Shading, Shape, Surface};

pub const STAR_RADIUS: f32 = 0.25;
pub const STAR_SEGMENTS: u32 = 24;

/// A uniform sample from `(-range / 2, range / 2]`.
pub fn rand_float_spread<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    range * (0.5 - rng.gen_range(0.0..1.0))
}

/**
 * Scatters `count` small white spheres in a cube of edge length `spread`
 * centred on the origin.
 *
 * Every axis is sampled independently, so the stars fill the cube uniformly.
 * They are placed once and never move afterwards. All stars share one shape
 * and surface and therefore end up in a single instanced draw.
 */
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, count: usize, spread: f32) -> Vec<SceneObject> {
    (0..count)
        .map(|i| {
            let x = rand_float_spread(rng, spread);
            let y = rand_float_spread(rng, spread);
            let z = rand_float_spread(rng, spread);
            star(&format!("star-{}", i)).at(x, y, z)
        })
        .collect()
}

fn star(name: &str) -> SceneObject {
    SceneObject::new(
        name,
        Shape::Sphere {
            radius: STAR_RADIUS,
            width_segments: STAR_SEGMENTS,
            height_segments: STAR_SEGMENTS,
        },
        Surface::colour([255, 255, 255, 255], Shading::Lit),
    )
}
