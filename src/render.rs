//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows return from
//! `on_render` to describe what they want drawn. The engine sorts the
//! variants into one batch per pipeline (background, lit, unlit) and draws the
//! batches in that order, so a flow never has to touch a render pass itself.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model + instance buffer)
//! - [`Batches<'a>`] is the per-pipeline sorting of one frame's renders
//!

use crate::data_structures::model::Model;

/// Data for instanced object rendering: a model and its instance buffer.
///
/// The instance buffer holds one [`crate::data_structures::instance::InstanceRaw`]
/// per drawn copy of the model.
#[derive(Clone, Debug)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single lit instanced object
/// - `Unlit(Instanced)` renders a single instanced object without shading
/// - `Background(&BindGroup)` stretches a texture over the whole viewport behind everything
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
#[derive(Clone, Debug)]
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Unlit(Instanced<'a>),
    Background(&'a wgpu::BindGroup),
    Composed(Vec<Render<'a>>),
}

/// One frame's renders sorted by the pipeline that draws them.
#[derive(Debug, Default)]
pub struct Batches<'a> {
    pub background: Vec<&'a wgpu::BindGroup>,
    pub lit: Vec<Instanced<'a>>,
    pub unlit: Vec<Instanced<'a>>,
}

impl<'a> Render<'a> {
    pub fn set_pipelines(self, batches: &mut Batches<'a>) {
        match self {
            Render::Default(instanced) => batches.lit.push(instanced),
            Render::Unlit(instanced) => batches.unlit.push(instanced),
            Render::Background(group) => batches.background.push(group),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(batches)),
            Render::None => (),
        }
    }
}
