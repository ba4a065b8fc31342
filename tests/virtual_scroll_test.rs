use starscape::context::VirtualScroll;
use winit::{dpi::PhysicalPosition, event::MouseScrollDelta};

#[test]
fn wheel_down_scrolls_the_document_up() {
    let mut scroll = VirtualScroll::new(1000.0, 40.0);
    let offset = scroll.apply(&MouseScrollDelta::LineDelta(0.0, -3.0));
    assert_eq!(offset, -120.0);
    assert_eq!(scroll.offset(), -120.0);
}

#[test]
fn offset_never_leaves_the_document() {
    let mut scroll = VirtualScroll::new(200.0, 40.0);
    assert_eq!(scroll.apply(&MouseScrollDelta::LineDelta(0.0, 5.0)), 0.0);
    for _ in 0..100 {
        let offset = scroll.apply(&MouseScrollDelta::LineDelta(0.0, -1.0));
        assert!((-200.0..=0.0).contains(&offset));
    }
    assert_eq!(scroll.offset(), -200.0);
}

#[test]
fn pixel_deltas_are_taken_as_is() {
    let mut scroll = VirtualScroll::new(1000.0, 40.0);
    scroll.apply(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -75.5)));
    assert_eq!(scroll.offset(), -75.5);
    scroll.apply(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 25.5)));
    assert_eq!(scroll.offset(), -50.0);
}

#[test]
fn shrinking_the_limit_clamps_the_offset() {
    let mut scroll = VirtualScroll::new(1000.0, 40.0);
    scroll.apply(&MouseScrollDelta::LineDelta(0.0, -20.0));
    scroll.configure(300.0, 10.0);
    assert_eq!(scroll.offset(), -300.0);
    scroll.apply(&MouseScrollDelta::LineDelta(0.0, 1.0));
    assert_eq!(scroll.offset(), -290.0);
}
