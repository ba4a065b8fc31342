use starscape::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

/// Counts lifecycle calls so tests can assert on their order.
#[derive(Default)]
pub(crate) struct State {
    frame_counter: u32,
    init_invocations: u32,
    scroll_invocations: u32,
    custom_invocations: u32,
    configured: bool,
}

impl State {
    pub fn frame(&mut self) {
        self.frame_counter += 1;
    }

    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn scroll(&mut self) {
        self.scroll_invocations += 1;
    }

    pub fn custom(&mut self) {
        self.custom_invocations += 1;
    }

    pub fn configured(&mut self) {
        self.configured = true;
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn scroll_invocations(&self) -> u32 {
        self.scroll_invocations
    }

    pub fn custom_invocations(&self) -> u32 {
        self.custom_invocations
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

#[derive(Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

type Setup = Box<dyn Fn(&mut Context)>;
type Validate = Box<
    dyn Fn(
        &Context,
        &mut FrameCounter,
        &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error>,
>;

/// A flow that draws nothing itself and checks the frame it is handed.
pub(crate) struct TestRender {
    setup: Setup,
    validate: Validate,
}

impl TestRender {
    pub(crate) fn new(
        setup: impl Fn(&mut Context) + 'static,
        validate: impl Fn(
            &Context,
            &mut FrameCounter,
            &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error>
        + 'static,
    ) -> Self {
        Self {
            setup: Box::new(setup),
            validate: Box::new(validate),
        }
    }
}

impl GraphicsFlow<FrameCounter, ()> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, _: &mut FrameCounter) -> Out<()> {
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut FrameCounter, _: std::time::Duration) -> Out<()> {
        state.progress();
        Out::Empty
    }

    fn on_scroll(&mut self, _: &Context, _: &mut FrameCounter, _: f64) -> Out<()> {
        Out::Empty
    }

    fn on_device_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &starscape::DeviceEvent,
    ) -> Out<()> {
        Out::Empty
    }

    fn on_window_events(
        &mut self,
        _: &Context,
        _: &mut FrameCounter,
        _: &starscape::WindowEvent,
    ) -> Out<()> {
        Out::Empty
    }

    fn on_custom_events(&mut self, _: &Context, _: &mut FrameCounter, event: ()) -> Option<()> {
        Some(event)
    }

    fn on_render(&self) -> Render<'_> {
        Render::None
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> Result<ImageTestResult, anyhow::Error> {
        (self.validate)(ctx, state, texture)
    }
}

/// Converts a clear colour into the pixel the readback should contain.
pub(crate) fn pixel_of(colour: wgpu::Color) -> image::Rgba<u8> {
    let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    image::Rgba([
        to_u8(colour.r),
        to_u8(colour.g),
        to_u8(colour.b),
        to_u8(colour.a),
    ])
}

#[macro_export]
macro_rules! golden_image_test {
    ($state:ty, $event:ty, $graphics_elem:expr) => {{
        use starscape::flow::{FlowConstructor, GraphicsFlow};
        let constructor: FlowConstructor<$state, $event> = Box::new(|_| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<$state, $event>> = Box::new($graphics_elem);
                g_flow
            })
        });

        starscape::flow::run(vec![constructor]).expect("Failed to run flow for integration test.");
    }};
}
