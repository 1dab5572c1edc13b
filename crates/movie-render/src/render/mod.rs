//! Mesh batching and drawing.
//!
//! [`BatchRenderer`] groups meshes that share textures and blend mode into
//! as few draws as possible and drives a [`DrawBackend`]. [`gpu`] is the
//! wgpu backend.
//!
//! Convention:
//! - positions are composition pixels (top-left origin, +Y down)
//! - the vertex shader applies the viewport's orthographic projection

mod backend;
mod batch;
mod ctx;
pub mod gpu;
mod state;
mod vertex;

pub use backend::{DrawBackend, DrawPass};
pub use batch::{
    BatchConfig, BatchRenderer, FlushPolicy, FrameStats, SubmitError, MAX_INDICES, MAX_VERTICES,
};
pub use ctx::{RenderCtx, RenderTarget};
pub use gpu::{GpuTextures, MeshFrame, MeshGpu, TextureStore};
pub use state::{BindingState, DrawMode, MeshTextures};
pub use vertex::DrawVertex;
