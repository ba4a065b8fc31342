#![cfg(feature = "integration-tests")]

use starscape::flow::ImageTestResult;
use wgpu::Color;

use crate::common::test_utils::{FrameCounter, TestRender, pixel_of};

mod common;

#[test]
fn should_render_clear_colour() {
    golden_image_test!(
        FrameCounter,
        (),
        TestRender::new(
            |ctx| {
                ctx.clear_colour = Color::WHITE;
                ctx.camera.camera.position = [0.0, 5.0, 2.0].into();
            },
            |ctx, state, texture| {
                if state.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                let desired_pixel = pixel_of(Color::WHITE);
                let (width, height) = (ctx.config.width, ctx.config.height);
                for (x, y, pixel) in texture.enumerate_pixels() {
                    if x < width && y < height {
                        assert_eq!(*pixel, desired_pixel, "pixel ({}, {})", x, y);
                    }
                }
                Ok(ImageTestResult::Passed)
            },
        )
    );
}
