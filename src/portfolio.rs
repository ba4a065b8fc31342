//! The portfolio scene: a torus, a ghostly dodecahedron, the moon, the badge
//! cubes and the star field.

use rand::Rng;

use crate::{
    config::SceneConfig,
    data_structures::{
        scene_object::{SceneObject, Shading, Shape, Spin, Surface},
        star_field,
    },
};

pub const BADGE_SIZE: f32 = 2.5;

/// Name, texture and position (x, y) of every badge cube.
pub const BADGES: [(&str, &str, f32, f32); 9] = [
    ("word", "Word.png", 17.0, 7.0),
    ("powerbi", "power-bi.png", -17.0, -12.0),
    ("python", "python.png", -17.0, 9.0),
    ("powerpoint", "powerpoint.png", 17.0, -11.0),
    ("excel", "excel.png", -28.0, 18.0),
    ("java", "java.png", -28.0, -18.0),
    ("c", "c.png", -36.0, 4.0),
    ("matlab", "matlab.jpg", 36.0, -4.0),
    ("ladderlogic", "ladderlogic.png", 0.0, 20.0),
];

pub fn torus() -> SceneObject {
    SceneObject::new(
        "torus",
        Shape::Torus {
            radius: 10.0,
            tube: 3.0,
            radial_segments: 16,
            tubular_segments: 100,
        },
        Surface::colour([255, 255, 255, 255], Shading::Lit),
    )
    .spinning(Spin::new(0.01, 0.005, 0.01))
}

pub fn ghost() -> SceneObject {
    SceneObject::new(
        "ghost",
        Shape::Dodecahedron { radius: 3.0 },
        Surface::texture("ghost.jpg", Shading::Unlit),
    )
    .at(15.0, 0.0, 0.0)
    .spinning(Spin::new(0.0, 0.01, 0.01))
}

pub fn moon() -> SceneObject {
    SceneObject::new(
        "moon",
        Shape::Sphere {
            radius: 3.0,
            width_segments: 32,
            height_segments: 32,
        },
        Surface::texture("moon.jpg", Shading::Lit).with_normal_map("bumpy.jpg"),
    )
    .at(-10.0, 0.0, 10.0)
    .spinning_on_scroll(Spin::new(0.05, 0.075, 0.05))
}

pub fn badges() -> Vec<SceneObject> {
    BADGES
        .iter()
        .map(|(name, texture, x, y)| {
            SceneObject::new(
                name,
                Shape::cube(BADGE_SIZE),
                Surface::texture(texture, Shading::Unlit),
            )
            .at(*x, *y, 0.0)
            .spinning(Spin::new(-0.001, 0.005, 0.005))
        })
        .collect()
}

/// Every object of the scene, stars last.
pub fn build_objects<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Vec<SceneObject> {
    let mut objects = vec![torus(), ghost(), moon()];
    if config.show_badges {
        objects.extend(badges());
    }
    objects.extend(star_field::scatter(rng, config.star_count, config.star_spread));
    objects
}
