//! The showcase flow: ties the [`Animator`] to the GPU scene graph and to the
//! host's lifecycle hooks.
//!
//! The animator and the orbit controller live in [`SceneState`], the app
//! state the host owns. [`SceneFlow`] holds what only exists on the GPU: the
//! instanced scene graph and the backdrop.

use instant::Duration;
use winit::event::{DeviceEvent, ElementState, MouseButton, WindowEvent};

use crate::{
    animator::Animator,
    camera::{OrbitController, Projection},
    config::SceneConfig,
    context::Context,
    data_structures::{scene_graph::SceneGraph, texture::Texture},
    flow::{FlowConstructor, GraphicsFlow, Out},
    pipelines::{background::Backdrop, light::LightUniform},
    portfolio,
    render::Render,
    resources::{TextureRequest, TextureTarget},
};

#[cfg(feature = "integration-tests")]
use crate::flow::ImageTestResult;

/// Everything the scene knows without a GPU.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub animator: Animator,
    pub orbit: OrbitController,
    pub config: SceneConfig,
}

impl SceneState {
    pub fn new<R: rand::Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Self {
        let objects = portfolio::build_objects(&config, rng);
        Self {
            animator: Animator::new(&config, objects),
            orbit: OrbitController::default(),
            config,
        }
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(SceneConfig::default(), &mut rand::thread_rng())
    }
}

#[derive(Debug)]
pub enum SceneEvent {
    TextureLoaded(TextureTarget, anyhow::Result<Texture>),
}

#[derive(Debug, Default)]
pub struct SceneFlow {
    graph: SceneGraph,
    backdrop: Backdrop,
}

impl SceneFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }
}

pub fn constructor() -> FlowConstructor<SceneState, SceneEvent> {
    Box::new(|_| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow<SceneState, SceneEvent>> = Box::new(SceneFlow::new());
            flow
        })
    })
}

fn load(ctx: &Context, requests: Vec<TextureRequest>) -> Out<SceneEvent> {
    if requests.is_empty() {
        return Out::Empty;
    }
    Out::FutEvent(
        requests
            .into_iter()
            .map(|request| {
                let device = ctx.device.clone();
                let queue = ctx.queue.clone();
                let fut: Box<dyn Future<Output = SceneEvent>> = Box::new(async move {
                    let (target, loaded) = request.fetch(device, queue).await;
                    SceneEvent::TextureLoaded(target, loaded)
                });
                fut
            })
            .collect(),
    )
}

fn follow_camera(state: &SceneState) -> Out<SceneEvent> {
    let camera = *state.animator.camera();
    Out::Configure(Box::new(move |ctx: &mut Context| ctx.camera.camera = camera))
}

impl GraphicsFlow<SceneState, SceneEvent> for SceneFlow {
    fn on_init(&mut self, ctx: &mut Context, state: &mut SceneState) -> Out<SceneEvent> {
        let config = &state.config;
        ctx.clear_colour = config.clear_colour;
        ctx.camera.camera = *state.animator.camera();
        ctx.projection =
            Projection::from_settings(ctx.config.width, ctx.config.height, &config.camera);
        ctx.light.uniform = LightUniform::from(&config.light);
        ctx.light.write_to_buffer(&ctx.queue);
        ctx.scroll
            .configure(config.max_scroll_offset, config.pixels_per_line);
        ctx.write_camera();

        let (graph, mut requests) = SceneGraph::build(
            &ctx.device,
            &ctx.queue,
            &ctx.material_layout,
            state.animator.objects(),
        );
        self.graph = graph;
        self.backdrop = match &config.background {
            Some(path) => {
                requests.push(TextureRequest {
                    target: TextureTarget::Background,
                    path: path.clone(),
                });
                Backdrop::default()
            }
            None => Backdrop::none(),
        };
        log::info!(
            "scene ready: {} objects, {} instances in {} draw calls, {} textures to load",
            state.animator.len(),
            self.graph.instance_count(),
            self.graph.len(),
            requests.len()
        );
        load(ctx, requests)
    }

    fn on_update(
        &mut self,
        ctx: &Context,
        state: &mut SceneState,
        _: Duration,
    ) -> Out<SceneEvent> {
        state.orbit.update(state.animator.camera_mut());
        state.animator.on_frame();
        self.graph.sync(state.animator.objects());
        self.graph.write_to_buffers(&ctx.queue);
        follow_camera(state)
    }

    fn on_scroll(&mut self, _: &Context, state: &mut SceneState, offset: f64) -> Out<SceneEvent> {
        state.animator.on_scroll(offset);
        state.animator.spin_on_scroll();
        follow_camera(state)
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        state: &mut SceneState,
        event: &DeviceEvent,
    ) -> Out<SceneEvent> {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.orbit.handle_mouse(*dx, *dy);
        }
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        state: &mut SceneState,
        event: &WindowEvent,
    ) -> Out<SceneEvent> {
        match event {
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => state
                .orbit
                .set_dragging(*button_state == ElementState::Pressed),
            WindowEvent::CursorLeft { .. } => state.orbit.set_dragging(false),
            _ => (),
        }
        Out::Empty
    }

    fn on_custom_events(
        &mut self,
        ctx: &Context,
        _: &mut SceneState,
        event: SceneEvent,
    ) -> Option<SceneEvent> {
        match event {
            SceneEvent::TextureLoaded(TextureTarget::Material { node, channel }, loaded) => self
                .graph
                .resolve(&ctx.device, &ctx.material_layout, node, channel, loaded),
            SceneEvent::TextureLoaded(TextureTarget::Background, loaded) => {
                self.backdrop
                    .resolve(&ctx.device, &ctx.background_layout, loaded)
            }
        }
        None
    }

    fn on_render(&self) -> Render<'_> {
        let background = match self.backdrop.bind_group() {
            Some(group) => Render::Background(group),
            None => Render::None,
        };
        Render::Composed(vec![background, self.graph.get_render()])
    }

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut SceneState,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        // a few frames so that the first updates have reached the GPU
        if state.animator.frames() < 3 {
            return Ok(ImageTestResult::Waiting);
        }
        let (width, height) = (ctx.config.width, ctx.config.height);
        let clear = ctx.clear_colour;
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let clear = image::Rgba([to_u8(clear.r), to_u8(clear.g), to_u8(clear.b), to_u8(clear.a)]);
        let drew_something = texture
            .enumerate_pixels()
            .any(|(x, y, pixel)| x < width && y < height && *pixel != clear);
        Ok(if drew_something {
            ImageTestResult::Passed
        } else {
            ImageTestResult::Failed
        })
    }
}
