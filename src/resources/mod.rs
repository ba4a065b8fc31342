//! Asset loading and procedural geometry.
//!
//! Textures are requested up front and resolved asynchronously. Until a request
//! resolves, the texture slot it targets is [`AssetState::Pending`] and the
//! renderer binds a fallback; a failed request leaves the slot
//! [`AssetState::Failed`] and the fallback in place for good.

use crate::data_structures::{model::Channel, texture::Texture};

pub mod mesh;
pub mod texture;

pub use texture::{diffuse_normal_layout, load_binary, load_texture};

/// Loading state of an asynchronously resolved asset.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AssetState<T> {
    #[default]
    Pending,
    Ready(T),
    Failed,
}

impl<T> AssetState<T> {
    pub fn get(&self) -> Option<&T> {
        match self {
            AssetState::Ready(asset) => Some(asset),
            AssetState::Pending | AssetState::Failed => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, AssetState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AssetState::Failed)
    }

    /// Moves to `Ready` or `Failed` depending on the outcome of the load.
    pub fn settle<E>(&mut self, outcome: Result<T, E>) {
        *self = match outcome {
            Ok(asset) => AssetState::Ready(asset),
            Err(_) => AssetState::Failed,
        };
    }
}

/// Where a loaded texture has to be installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Material { node: usize, channel: Channel },
    Background,
}

/// A texture the scene wants, identified by its path below `assets/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureRequest {
    pub target: TextureTarget,
    pub path: String,
}

impl TextureRequest {
    pub fn is_normal_map(&self) -> bool {
        matches!(
            self.target,
            TextureTarget::Material {
                channel: Channel::Normal,
                ..
            }
        )
    }

    /// Loads the texture. The device and queue are cheap handle clones.
    pub async fn fetch(
        self,
        device: wgpu::Device,
        queue: wgpu::Queue,
    ) -> (TextureTarget, anyhow::Result<Texture>) {
        log::debug!("loading texture {}", self.path);
        let loaded = load_texture(&self.path, self.is_normal_map(), &device, &queue).await;
        if let Err(e) = &loaded {
            log::warn!("texture {} could not be loaded: {}", self.path, e);
        }
        (self.target, loaded)
    }
}
