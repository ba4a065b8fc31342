use cgmath::{Deg, InnerSpace, MetricSpace, Point3, Rad};
use starscape::{
    camera::{Camera, OrbitController},
    config::{CameraSettings, ScrollRig},
};

#[test]
fn default_camera_looks_down_negative_z() {
    let camera = Camera::from(&CameraSettings::default());
    let forward = camera.forward();
    assert!((forward.z + 1.0).abs() < 1e-5);
    assert!(forward.x.abs() < 1e-5 && forward.y.abs() < 1e-5);
}

#[test]
fn look_at_points_forward_at_target() {
    let mut camera = Camera::new((4.0, 3.0, -2.0), Deg(0.0), Deg(0.0));
    let target = Point3::new(-1.0, 0.5, 6.0);
    camera.look_at(target);
    let expected = (target - camera.position).normalize();
    assert!((camera.forward() - expected).magnitude() < 1e-4);
}

#[test]
fn orbit_ignores_motion_while_not_dragging() {
    let mut orbit = OrbitController::default();
    let mut camera = Camera::default();
    let before = camera;
    orbit.handle_mouse(120.0, -40.0);
    orbit.update(&mut camera);
    assert_eq!(camera, before);
}

#[test]
fn orbit_keeps_distance_to_target() {
    let mut orbit = OrbitController::default();
    let mut camera = Camera::default();
    let target = orbit.target;
    let distance = camera.position.distance(target);

    orbit.set_dragging(true);
    assert!(orbit.is_dragging());
    for (dx, dy) in [(30.0, 0.0), (0.0, 25.0), (-80.0, -60.0), (5.0, 900.0)] {
        orbit.handle_mouse(dx, dy);
        orbit.update(&mut camera);
        assert!((camera.position.distance(target) - distance).abs() < 1e-3);
        let to_target = (target - camera.position).normalize();
        assert!((camera.forward() - to_target).magnitude() < 1e-3);
    }
    assert_ne!(camera.position, Camera::default().position);
}

#[test]
fn orbit_stops_short_of_the_poles() {
    let mut orbit = OrbitController::default();
    let mut camera = Camera::default();
    orbit.set_dragging(true);
    orbit.handle_mouse(0.0, 1.0e6);
    orbit.update(&mut camera);
    assert!(camera.pitch.0.is_finite());
    assert!(camera.pitch < Rad(std::f32::consts::FRAC_PI_2));
    assert!(camera.pitch > Rad(-std::f32::consts::FRAC_PI_2));
}

#[test]
fn orbit_at_the_target_does_nothing() {
    let mut orbit = OrbitController::default();
    let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(-90.0), Deg(0.0));
    orbit.set_dragging(true);
    orbit.handle_mouse(10.0, 10.0);
    orbit.update(&mut camera);
    assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn scroll_rig_is_linear_in_offset() {
    let rig = ScrollRig::default();
    let p = rig.camera_position(-500.0);
    assert!((p.x - 0.1).abs() < 1e-6);
    assert!((p.y - 0.1).abs() < 1e-6);
    assert!((p.z - 5.0).abs() < 1e-5);
    // scrolling above the top is not clamped
    let above = rig.camera_position(200.0);
    assert!(above.z < 0.0);
}
