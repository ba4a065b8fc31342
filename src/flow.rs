//! Flow control and application event loop.
//!
//! This module provides the main event loop and the flow abstraction. A "flow"
//! is a self-contained part of the app that reacts to input and scroll events,
//! updates its state every frame and says what it wants rendered. The engine
//! owns the window and GPU context, fans events out to every flow and draws
//! their renders with batched pipelines.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S, E>`] is the trait for scenes that handle events and rendering
//! - [`Out<E>`] is the output type for async event handling and context configuration
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window/device events and scroll offsets
//! 2. Call `on_<device/window/custom>_events` and `on_scroll` on all flows
//! 3. Call flows' `on_render()` and draw the batches (background, lit, unlit)
//! 4. Present the frame
//! 5. Call `on_update` on all flows, then upload camera and light uniforms
//! 6. Hand every finished `Out::FutEvent` future to `on_custom_events`
//!
//! The first frame is therefore drawn before the first update, and before any
//! asset requested in `on_init` has arrived.

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};
#[cfg(not(target_arch = "wasm32"))]
use std::task::Poll;

#[cfg(not(target_arch = "wasm32"))]
use futures::{
    StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};

use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{Batches, Instanced, Render},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Id of the canvas element the scene renders into on the web.
pub const CANVAS_ID: &str = "bg";

///
/// This is the Output Type for every lifecycle hook where the user can pass async events that are
/// handled according to the platform you're running on.
///
/// `Out::FutEvent` can be used to resolve futures of Events without blocking the frame loop. Each
/// event is delivered to `on_custom_events` on its own as soon as its future resolves. The caller
/// is responsible for handling the event later on and it will have no side effects unless handled.
///
/// `Out::Configure` can be used to modify the Context during runtime for instance to move the
/// camera or change the clear colour.
///
/// `Empty` is the default output used when no eventing/futures need to be handled.
///
pub enum Out<E> {
    FutEvent(Vec<Box<dyn Future<Output = E>>>),
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl<E> Default for Out<E> {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(feature = "integration-tests")]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// Trait for implementing a renderable scene.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure context (camera, clear color, etc.)
/// 2. `on_window_events()` and `on_device_events()` are called for each winit input event
/// 3. `on_scroll()` is called whenever the document scroll offset changes
/// 4. `on_custom_events()` is called for events produced by resolved `Out::FutEvent`s
/// 5. `on_render()` is called each frame and specifies how to render `self`
/// 6. `on_update()` is called every frame after rendering
///
pub trait GraphicsFlow<S, E> {
    /// Initialize the flow and configure the context.
    ///
    /// This is the only place with mutable access to the Context outside of
    /// `Out::Configure` and is the place to start loading assets.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out<E>;

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`. Use for animations and
    /// other per-frame logic.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out<E>;

    /// React to a new scroll offset.
    ///
    /// `offset` is the signed distance of the document's top edge from the
    /// viewport's top edge: zero at the top of the page, negative below it.
    fn on_scroll(&mut self, ctx: &Context, state: &mut S, offset: f64) -> Out<E>;

    /// Handle raw device events (mouse motion and other hardware input).
    fn on_device_events(&mut self, ctx: &Context, state: &mut S, event: &DeviceEvent) -> Out<E>;

    /// Handle window events (mouse buttons, window resizing, etc.).
    fn on_window_events(&mut self, ctx: &Context, state: &mut S, event: &WindowEvent) -> Out<E>;

    /// Handle custom application events.
    ///
    /// Returns the event if it was not consumed, allowing it to be passed to
    /// the next flow. Returning `None` means the event was consumed.
    fn on_custom_events(&mut self, ctx: &Context, state: &mut S, event: E) -> Option<E>;

    /// Return renderable objects for this flow.
    ///
    /// Called each frame. Collect your objects into a [`Render`] and return it.
    /// The engine will batch and render all flows' renders in pipeline order.
    fn on_render(&self) -> Render<'_>;

    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut S,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>;
}

// Dummy impl to make wasm work
impl<State, Event> Debug for dyn GraphicsFlow<State, Event> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`. This allows lazy initialization and resource loading.
pub type FlowConstructor<S, E> =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = Box<dyn GraphicsFlow<S, E>>>>>>;

/// Custom events that are still being computed.
///
/// Every future is polled on its own and its event is handed out as soon as it
/// resolves, so a slow asset never holds back a fast one and nothing waits for
/// them to finish. Natively the host polls the set once per frame after
/// rendering; futures that need tokio have to be polled inside the runtime
/// context (see [`tokio::runtime::Runtime::enter`]).
#[cfg(not(target_arch = "wasm32"))]
pub struct PendingEvents<E> {
    futures: FuturesUnordered<LocalBoxFuture<'static, E>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl<E> PendingEvents<E> {
    pub fn new() -> Self {
        Self {
            futures: FuturesUnordered::new(),
        }
    }

    pub fn push(&mut self, futures: Vec<Box<dyn Future<Output = E>>>) {
        futures
            .into_iter()
            .for_each(|future| self.futures.push(Box::into_pin(future)));
    }

    pub fn len(&self) -> usize {
        self.futures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.futures.is_empty()
    }

    /// Polls every pending future once and returns the events that are done.
    pub fn take_ready(&mut self) -> Vec<E> {
        let mut cx = std::task::Context::from_waker(futures::task::noop_waker_ref());
        let mut ready = Vec::new();
        while let Poll::Ready(Some(event)) = self.futures.poll_next_unpin(&mut cx) {
            ready.push(event);
        }
        ready
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl<E> Default for PendingEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Application state bundle: GPU context, app state, and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        Ok(Self {
            ctx,
            state: State::default(),
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
            self.ctx.write_camera();
        }
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctx.config.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_depth_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Depth Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Texture::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    #[cfg(feature = "integration-tests")]
    fn get_with_height(&self) -> (u32, u32) {
        // Rows of a texture copy have to be 256 byte aligned
        let width = self.ctx.config.width;
        let height = self.ctx.config.height;
        let width = width + 256 - (width % 256);
        let height = height + 256 - (height % 256);
        (width, height)
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_3d_extent(&self) -> wgpu::Extent3d {
        let (width, height) = self.get_with_height();
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        }
    }

    fn render<Event>(
        &mut self,
        graphics_flows: &[Box<dyn GraphicsFlow<State, Event>>],
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] event_loop: &EventLoopProxy<FlowEvent<State, Event>>,
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg(not(feature = "integration-tests"))]
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (tex, depth) = {
            let extent3d = self.get_test_3d_extent();
            let tex = self.get_test_texture(extent3d);
            let depth = self.get_test_depth_texture(extent3d);
            (tex, depth)
        };

        let mut encoder: wgpu::CommandEncoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass: wgpu::RenderPass<'_> =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &tex.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                        #[cfg(feature = "integration-tests")]
                        view: &depth.create_view(&wgpu::TextureViewDescriptor::default()),
                        #[cfg(not(feature = "integration-tests"))]
                        view: &self.ctx.depth_texture.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    }),
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });

            let mut batches = Batches::default();
            graphics_flows
                .iter()
                .for_each(|flow| flow.on_render().set_pipelines(&mut batches));

            if !batches.background.is_empty() {
                render_pass.set_pipeline(&self.ctx.pipelines.background);
                for group in batches.background {
                    render_pass.set_bind_group(0, group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }
            draw_batch(
                &mut render_pass,
                &self.ctx,
                &self.ctx.pipelines.basic,
                batches.lit,
            );
            draw_batch(
                &mut render_pass,
                &self.ctx,
                &self.ctx.pipelines.unlit,
                batches.unlit,
            );
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let (width, height) = self.get_with_height();
            let output_buffer_size = (u32_size * width * height) as wgpu::BufferAddress;
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: output_buffer_size,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: None,
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &tex,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * width),
                        rows_per_image: Some(height),
                    },
                },
                self.get_test_3d_extent(),
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        let fut_img = async {
            let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
            let buffer_slice = output_buffer.slice(..);
            buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                tx.send(result).expect("The readback receiver was dropped");
            });
            self.ctx
                .device
                .poll(wgpu::PollType::Wait {
                    submission_index: None,
                    timeout: Some(Duration::from_secs(3)),
                })
                .expect("The device did not finish the golden image render");
            rx.receive()
                .await
                .expect("The readback sender was dropped")
                .expect("The golden image buffer could not be mapped");
            let data = buffer_slice.get_mapped_range();
            let (width, height) = self.get_with_height();
            image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(width, height, data)
                .expect("The readback buffer is smaller than the image")
        };
        #[cfg(feature = "integration-tests")]
        {
            let mut img: image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView> =
                async_runtime.block_on(fut_img);
            let state = &mut self.state;
            let all_passed = graphics_flows
                .iter()
                .map(|flow| flow.render_to_texture(&self.ctx, state, &mut img))
                .map(|res| match res {
                    Err(e) => panic!("{}", e),
                    Ok(ImageTestResult::Passed) => true,
                    Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                    Ok(ImageTestResult::Waiting) => false,
                })
                .fold(true, |all, passed| all && passed);
            if all_passed {
                event_loop
                    .send_event(FlowEvent::Exit)
                    .expect("All assertions passed but the winit event-loop could not safely exit")
            }
        }

        output.present();
        Ok(())
    }
}

fn draw_batch(
    render_pass: &mut wgpu::RenderPass<'_>,
    ctx: &Context,
    pipeline: &wgpu::RenderPipeline,
    batch: Vec<Instanced<'_>>,
) {
    if batch.is_empty() {
        return;
    }
    render_pass.set_pipeline(pipeline);
    for instanced in batch {
        if instanced.amount == 0 || instanced.instance.size() == 0 {
            log::warn!("you attempted to render something with zero instances");
            continue;
        }
        render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
        render_pass.draw_model_instanced(
            instanced.model,
            0..instanced.amount as u32,
            &ctx.camera.bind_group,
            &ctx.light.bind_group,
        );
    }
}

pub struct App<State: 'static, Event: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<FlowEvent<State, Event>>,
    #[cfg(not(target_arch = "wasm32"))]
    pending: PendingEvents<Event>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State, Event>>>,
    // This holds the constructors at the start.
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State, Event>>>,
    last_time: Instant,
}

impl<State, Event> App<State, Event>
where
    State: 'static + Default,
    Event: 'static,
{
    fn new(
        event_loop: &EventLoop<FlowEvent<State, Event>>,
        constructors: Vec<FlowConstructor<State, Event>>,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            #[cfg(not(target_arch = "wasm32"))]
            pending: PendingEvents::new(),
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
        })
    }

    /// Calls one lifecycle hook on every flow and handles what they return.
    fn broadcast<F>(&mut self, mut hook: F)
    where
        F: FnMut(&mut dyn GraphicsFlow<State, Event>, &mut Context, &mut State) -> Out<Event>,
    {
        let Some(app_state) = self.state.as_mut() else {
            return;
        };
        for flow in self.graphics_flows.iter_mut() {
            let out = hook(flow.as_mut(), &mut app_state.ctx, &mut app_state.state);
            handle_flow_output(
                &mut app_state.ctx,
                #[cfg(not(target_arch = "wasm32"))]
                &mut self.pending,
                &self.proxy,
                out,
            );
        }
    }

    fn init_flows(&mut self) {
        self.broadcast(|flow, ctx, state| flow.on_init(ctx, state));
    }

    /// Offers a custom event to the flows in order until one consumes it.
    fn dispatch(&mut self, event: Event) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let result = self
            .graphics_flows
            .iter_mut()
            .fold(Some(event), |event, flow| {
                flow.on_custom_events(&state.ctx, &mut state.state, event?)
            });
        if result.is_some() {
            log::warn!("Warning! Custom event was not consumed this cycle");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn poll_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let ready = {
            let _runtime = self.async_runtime.enter();
            self.pending.take_ready()
        };
        ready.into_iter().for_each(|event| self.dispatch(event));
    }

    fn scroll_to(&mut self, offset: f64) {
        self.broadcast(|flow, ctx, state| flow.on_scroll(ctx, state, offset));
    }

    fn redraw(&mut self) {
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        let Some(state) = self.state.as_mut() else {
            return;
        };
        match state.render(
            &self.graphics_flows,
            #[cfg(feature = "integration-tests")]
            &self.async_runtime,
            #[cfg(feature = "integration-tests")]
            &self.proxy,
        ) {
            Ok(_) => {
                self.broadcast(|flow, ctx, state| flow.on_update(ctx, state, dt));
                if let Some(state) = self.state.as_mut() {
                    state.ctx.write_camera();
                    state.ctx.light.write_to_buffer(&state.ctx.queue);
                }
                #[cfg(not(target_arch = "wasm32"))]
                self.poll_pending();
            }
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
            }
            Err(e) => {
                log::error!("Unable to render {}", e);
            }
        }
    }
}

pub(crate) enum FlowEvent<State: 'static, Event: 'static> {
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State, Event>>>,
    },
    #[allow(dead_code)]
    Custom(Event),
    #[allow(dead_code)]
    Scroll(f64),
    #[allow(dead_code)]
    Exit,
}

impl<State, Event> Debug for FlowEvent<State, Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => {
                f.debug_struct("Initialized").field("flows", flows).finish()
            }
            Self::Custom(_) => f.write_str("Custom(E)"),
            Self::Scroll(offset) => f.debug_tuple("Scroll").field(offset).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

impl<State: 'static + Default, Event: 'static> ApplicationHandler<FlowEvent<State, Event>>
    for App<State, Event>
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("starscape");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match find_canvas() {
                Some(canvas) => {
                    window_attributes = window_attributes
                        .with_canvas(Some(canvas))
                        // the page itself has to keep scrolling
                        .with_prevent_default(false);
                }
                None => log::warn!("no canvas with id {} found, creating one", CANVAS_ID),
            }
            if let Err(e) = listen_for_scroll(self.proxy.clone()) {
                log::error!("could not listen for scroll events: {:?}", e);
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create the main window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init_future = async move {
            let app_state = AppState::new(window).await?;

            let flow_futures: Vec<_> = constructors
                .into_iter()
                // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows: Vec<_> = futures::future::join_all(flow_futures).await;
            Ok::<_, anyhow::Error>((app_state, flows))
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok((app_state, flows)) => {
                    self.state = Some(app_state);
                    self.graphics_flows = flows;
                    self.init_flows();
                }
                Err(e) => {
                    log::error!("App initialization failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match init_future.await {
                    Ok((state, flows)) => {
                        if proxy
                            .send_event(FlowEvent::Initialized { state, flows })
                            .is_err()
                        {
                            log::error!("The event loop closed before the app was initialized");
                        }
                    }
                    Err(e) => {
                        log::error!("App initialization failed: {:#}", e);
                        let _ = proxy.send_event(FlowEvent::Exit);
                    }
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State, Event>) {
        match event {
            FlowEvent::Initialized { state, flows } => {
                // This is the message from our wasm `spawn_local`
                let size = state.ctx.window.inner_size();
                self.state = Some(state);
                self.graphics_flows = flows;

                // Trigger a resize and redraw now that we are initialized
                if let Some(app_state) = self.state.as_mut() {
                    app_state.resize(size.width, size.height);
                }
                self.init_flows();
                if let Some(app_state) = &self.state {
                    app_state.ctx.window.request_redraw();
                }
            }
            FlowEvent::Custom(custom_event) => self.dispatch(custom_event),
            FlowEvent::Scroll(offset) => self.scroll_to(offset),
            FlowEvent::Exit => {
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        self.broadcast(|flow, ctx, state| flow.on_device_events(ctx, state, &event));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.state.is_none() {
            return;
        }

        self.broadcast(|flow, ctx, state| flow.on_window_events(ctx, state, &event));

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            // Browsers report the document scroll themselves
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(state) = self.state.as_mut() {
                    let offset = state.ctx.scroll.apply(&delta);
                    self.scroll_to(offset);
                }
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn find_canvas() -> Option<web_sys::HtmlCanvasElement> {
    let canvas = web_sys::window()?
        .document()?
        .get_element_by_id(CANVAS_ID)?;
    canvas.dyn_into().ok()
}

/// Distance of the document body's top edge from the viewport's top edge.
#[cfg(target_arch = "wasm32")]
fn document_top() -> Option<f64> {
    let body = web_sys::window()?.document()?.body()?;
    Some(body.get_bounding_client_rect().top())
}

#[cfg(target_arch = "wasm32")]
fn listen_for_scroll<State: 'static, Event: 'static>(
    proxy: EventLoopProxy<FlowEvent<State, Event>>,
) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        if let Some(top) = document_top() {
            if proxy.send_event(FlowEvent::Scroll(top)).is_err() {
                log::warn!("scroll event dropped, the event loop is closed");
            }
        }
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    // the listener lives as long as the page
    on_scroll.forget();
    Ok(())
}

fn handle_flow_output<State, Event>(
    ctx: &mut Context,
    #[cfg(not(target_arch = "wasm32"))] pending: &mut PendingEvents<Event>,
    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))] proxy: &EventLoopProxy<
        FlowEvent<State, Event>,
    >,
    out: Out<Event>,
) {
    match out {
        // Resolved events come back through `on_custom_events`, one by one
        Out::FutEvent(futures) => {
            #[cfg(not(target_arch = "wasm32"))]
            pending.push(futures);

            #[cfg(target_arch = "wasm32")]
            for future in futures {
                let proxy = proxy.clone();
                let future = Pin::from(future);
                wasm_bindgen_futures::spawn_local(async move {
                    let event = future.await;
                    if proxy.send_event(FlowEvent::Custom(event)).is_err() {
                        log::error!("Event loop was closed before the event could be processed");
                    }
                });
            }
        }
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

pub fn run<State: 'static + Default, Event: 'static>(
    constructors: Vec<FlowConstructor<State, Event>>,
) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<State, Event>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<State, Event>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        winit::event_loop::EventLoop::with_user_event()
            .with_any_thread(true)
            .build()?
    };

    #[cfg(not(feature = "integration-tests"))]
    let event_loop: EventLoop<FlowEvent<State, Event>> = EventLoop::with_user_event().build()?;

    let mut app: App<State, Event> = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
