use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};
use starscape::{
    config::SceneConfig,
    data_structures::{
        scene_graph::group_by_mesh,
        scene_object::Shape,
        star_field::{self, STAR_RADIUS, rand_float_spread},
    },
    portfolio,
};

#[test]
fn stars_stay_inside_the_cube() {
    for seed in 0..100 {
        let stars = star_field::scatter(&mut StdRng::seed_from_u64(seed), 200, 100.0);
        assert_eq!(stars.len(), 200);
        for star in &stars {
            let p = star.transform.position;
            for coord in [p.x, p.y, p.z] {
                assert!(coord > -50.0 && coord <= 50.0, "seed {}: {}", seed, coord);
                assert!((-100.0..=100.0).contains(&coord));
            }
        }
    }
}

#[test]
fn spread_samples_are_half_open() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10_000 {
        let v = rand_float_spread(&mut rng, 4.0);
        assert!(v > -2.0 && v <= 2.0, "{}", v);
    }
}

#[test]
fn stars_are_small_still_spheres() {
    let stars = star_field::scatter(&mut StdRng::seed_from_u64(9), 50, 100.0);
    let names: HashSet<_> = stars.iter().map(|star| star.name.clone()).collect();
    assert_eq!(names.len(), 50);
    for star in &stars {
        assert_eq!(
            star.shape,
            Shape::Sphere {
                radius: STAR_RADIUS,
                width_segments: 24,
                height_segments: 24,
            }
        );
        assert!(star.spin.is_none());
        assert!(star.scroll_spin.is_none());
    }
}

#[test]
fn same_seed_same_sky() {
    let a = star_field::scatter(&mut StdRng::seed_from_u64(3), 200, 100.0);
    let b = star_field::scatter(&mut StdRng::seed_from_u64(3), 200, 100.0);
    let c = star_field::scatter(&mut StdRng::seed_from_u64(4), 200, 100.0);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn zero_stars() {
    let stars = star_field::scatter(&mut StdRng::seed_from_u64(0), 0, 100.0);
    assert!(stars.is_empty());
}

#[test]
fn all_stars_share_one_draw() {
    let config = SceneConfig::default();
    let objects = portfolio::build_objects(&config, &mut StdRng::seed_from_u64(11));
    let groups = group_by_mesh(&objects);
    // torus, ghost, moon, nine differently textured badges, and the stars
    assert_eq!(groups.len(), 13);
    let stars = groups
        .iter()
        .find(|group| objects[group[0]].name.starts_with("star-"))
        .expect("a star group");
    assert_eq!(stars.len(), config.star_count);

    let mut seen: Vec<usize> = groups.into_iter().flatten().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..objects.len()).collect::<Vec<_>>());
}
