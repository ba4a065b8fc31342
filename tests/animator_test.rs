use std::f64::consts::TAU;

use rand::{SeedableRng, rngs::StdRng};
use starscape::{
    animator::Animator,
    config::SceneConfig,
    data_structures::scene_object::{SceneObject, Shading, Shape, Spin, Surface},
    portfolio,
};

const EPS: f32 = 1e-4;

fn rotation(object: &SceneObject) -> [f32; 3] {
    let r = &object.transform.rotation;
    [r.x.0 as f32, r.y.0 as f32, r.z.0 as f32]
}

/// Shortest distance between two angles on the circle.
fn angular_error(actual: f64, expected: f64) -> f64 {
    let diff = (actual - expected).rem_euclid(TAU);
    diff.min(TAU - diff)
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < EPS, "{:?} != {:?}", actual, expected);
    }
}

fn full_scene(seed: u64) -> Animator {
    let config = SceneConfig::default();
    let objects = portfolio::build_objects(&config, &mut StdRng::seed_from_u64(seed));
    Animator::new(&config, objects)
}

#[test]
fn torus_spins_by_its_increment_every_frame() {
    let mut animator = Animator::new(&SceneConfig::default(), vec![portfolio::torus()]);
    for _ in 0..100 {
        animator.on_frame();
    }
    let torus = animator.object("torus").expect("torus is registered");
    assert_close(rotation(torus), [1.0, 0.5, 1.0]);
    assert_eq!(animator.frames(), 100);
}

#[test]
fn every_spin_holds_over_long_runs() {
    let mut animator = full_scene(8);
    let spinning: Vec<_> = animator
        .objects()
        .iter()
        .filter_map(|object| object.spin.map(|spin| (object.name.clone(), spin.delta)))
        .collect();
    // torus, ghost and the nine badges
    assert_eq!(spinning.len(), 11);

    let mut frames = 0u64;
    for checkpoint in [1u64, 100, 10_000, 100_000, 200_000] {
        while frames < checkpoint {
            animator.on_frame();
            frames += 1;
        }
        for (name, delta) in &spinning {
            let r = &animator.object(name).expect("registered").transform.rotation;
            let actual = [r.x.0, r.y.0, r.z.0];
            let delta = [delta.x, delta.y, delta.z];
            for (angle, d) in actual.iter().zip(delta) {
                let expected = (d as f64 * frames as f64).rem_euclid(TAU);
                assert!(
                    angular_error(*angle, expected) < 1e-6,
                    "{} after {} frames: {} != {}",
                    name,
                    frames,
                    angle,
                    expected
                );
                assert!((0.0..=TAU).contains(angle));
            }
        }
    }
    assert_eq!(animator.frames(), 200_000);
}

#[test]
fn objects_without_spin_never_rotate() {
    let mut animator = full_scene(7);
    for _ in 0..50 {
        animator.on_frame();
    }
    for star in animator
        .objects()
        .iter()
        .filter(|object| object.name.starts_with("star-"))
    {
        assert_eq!(rotation(star), [0.0, 0.0, 0.0]);
    }
}

#[test]
fn scroll_moves_camera_linearly() {
    let mut animator = full_scene(1);
    animator.on_scroll(-1000.0);
    let position = animator.camera().position;
    assert!((position.x - 0.2).abs() < 1e-5);
    assert!((position.y - 0.2).abs() < 1e-5);
    assert!((position.z - 10.0).abs() < 1e-5);
}

#[test]
fn scroll_to_top_puts_camera_at_origin() {
    let mut animator = full_scene(1);
    animator.on_scroll(-250.0);
    animator.on_scroll(0.0);
    let position = animator.camera().position;
    assert_eq!([position.x, position.y, position.z], [0.0, 0.0, 0.0]);
}

#[test]
fn scroll_is_idempotent() {
    let mut animator = full_scene(2);
    animator.on_scroll(-640.0);
    let first = animator.camera().position;
    animator.on_scroll(-640.0);
    assert_eq!(animator.camera().position, first);
}

#[test]
fn scroll_keeps_camera_orientation_and_objects() {
    let mut animator = full_scene(3);
    let before = animator.objects().to_vec();
    let (yaw, pitch) = (animator.camera().yaw, animator.camera().pitch);
    animator.on_scroll(-1234.5);
    assert_eq!(animator.objects(), &before[..]);
    assert_eq!(animator.camera().yaw, yaw);
    assert_eq!(animator.camera().pitch, pitch);
}

#[test]
fn camera_starts_behind_the_torus() {
    let animator = full_scene(4);
    let position = animator.camera().position;
    assert_eq!([position.x, position.y, position.z], [0.0, 0.0, 30.0]);
}

#[test]
fn object_count_is_constant() {
    let mut animator = full_scene(5);
    // torus, ghost, moon, nine badges and the stars
    assert_eq!(animator.len(), 3 + 9 + 200);
    for i in 0..20 {
        animator.on_frame();
        animator.on_scroll(-(i as f64) * 100.0);
        animator.spin_on_scroll();
    }
    assert_eq!(animator.len(), 212);
}

#[test]
fn moon_only_turns_when_scrolled() {
    let mut animator = full_scene(6);
    for _ in 0..10 {
        animator.on_frame();
    }
    let moon = animator.object("moon").expect("moon is registered");
    assert_eq!(rotation(moon), [0.0, 0.0, 0.0]);

    animator.on_scroll(-100.0);
    animator.spin_on_scroll();
    animator.spin_on_scroll();
    let moon = animator.object("moon").expect("moon is registered");
    assert_close(rotation(moon), [0.1, 0.15, 0.1]);
}

#[test]
fn registered_objects_are_found_by_name() {
    let mut animator = Animator::new(&SceneConfig::default(), Vec::new());
    assert!(animator.is_empty());
    let idx = animator.register(
        SceneObject::new(
            "pebble",
            Shape::cube(1.0),
            Surface::colour([10, 20, 30, 255], Shading::Unlit),
        )
        .at(1.0, 2.0, 3.0)
        .spinning(Spin::new(0.1, 0.0, 0.0)),
    );
    assert_eq!(idx, 0);
    animator.on_frame();
    let pebble = animator.object("pebble").expect("pebble is registered");
    assert_close(rotation(pebble), [0.1, 0.0, 0.0]);
    assert!(animator.object("boulder").is_none());
}

#[test]
fn layout_without_badges() {
    let config = SceneConfig {
        show_badges: false,
        star_count: 10,
        ..Default::default()
    };
    let objects = portfolio::build_objects(&config, &mut StdRng::seed_from_u64(0));
    assert_eq!(objects.len(), 3 + 10);
    assert!(objects.iter().all(|object| object.name != "word"));
}

#[test]
fn badges_sit_at_their_offsets() {
    let objects = portfolio::badges();
    assert_eq!(objects.len(), 9);
    let matlab = objects
        .iter()
        .find(|object| object.name == "matlab")
        .expect("matlab badge");
    assert_eq!(matlab.transform.position, cgmath::Vector3::new(36.0, -4.0, 0.0));
    assert_eq!(matlab.surface, Surface::texture("matlab.jpg", Shading::Unlit));
    assert!(objects.iter().all(|object| object.shape == Shape::cube(2.5)));
}
