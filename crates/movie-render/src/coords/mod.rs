//! Coordinate and geometry types shared by the batch renderer and matte compositing.
//!
//! Canonical CPU space:
//! - Composition pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The GPU converts to clip space with a fixed orthographic projection built
//! from the composition size (see [`Viewport::ortho_matrix`]).

mod uv;
mod vec2;
mod viewport;

pub use uv::{ProjectionError, UvProjector};
pub use vec2::Vec2;
pub use viewport::Viewport;
