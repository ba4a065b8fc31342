#![cfg(feature = "integration-tests")]

use starscape::{
    context::Context,
    flow::{FlowConstructor, GraphicsFlow, ImageTestResult, Out},
    render::Render,
};
use wgpu::Color;

use crate::common::test_utils::{State, pixel_of};

mod common;

enum Event {
    Test,
}

struct GraphicsElement;

impl GraphicsFlow<State, Event> for GraphicsElement {
    fn on_init(&mut self, ctx: &mut Context, state: &mut State) -> Out<Event> {
        ctx.clear_colour = Color::TRANSPARENT;
        assert_eq!(state.frame_counter(), 0);
        assert_eq!(state.init_invocations(), 0);
        assert_eq!(state.custom_invocations(), 0);

        state.init();
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut State, _: std::time::Duration) -> Out<Event> {
        assert_eq!(state.init_invocations(), 1);
        state.frame();

        match state.frame_counter() {
            3 => Out::FutEvent(vec![Box::new(async move { Event::Test })]),
            4 => Out::Configure(Box::new(|ctx: &mut Context| {
                ctx.clear_colour = Color::RED;
            })),
            _ => Out::Empty,
        }
    }

    fn on_scroll(&mut self, _: &Context, state: &mut State, _: f64) -> Out<Event> {
        state.scroll();
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut State,
        _: &starscape::DeviceEvent,
    ) -> Out<Event> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut State,
        _: &starscape::WindowEvent,
    ) -> Out<Event> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, state: &mut State, event: Event) -> Option<Event> {
        match event {
            Event::Test => {
                assert!(state.frame_counter() >= 3);
                state.custom();
                None
            }
        }
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut State,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        if ctx.clear_colour == Color::RED {
            state.configured();
        }
        if state.custom_invocations() == 0 || !state.is_configured() {
            return Ok(ImageTestResult::Waiting);
        }
        assert_eq!(state.custom_invocations(), 1);
        let red = pixel_of(Color::RED);
        let first = texture.get_pixel(0, 0);
        // the surface may be BGRA, so only check that red and blue swapped at most
        assert!(
            *first == red || *first == image::Rgba([0, 0, 255, 255]),
            "unexpected clear pixel {:?}",
            first
        );
        Ok(ImageTestResult::Passed)
    }
}

#[test]
fn flow_lifecycle_and_outputs() {
    let constructor: FlowConstructor<State, Event> = Box::new(|_| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow<State, Event>> = Box::new(GraphicsElement);
            flow
        })
    });
    starscape::flow::run(vec![constructor]).expect("Failed to run flow for integration test.");
}
