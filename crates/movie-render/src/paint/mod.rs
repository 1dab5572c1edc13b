//! Paint model shared by the batch renderer and the GPU backend.
//!
//! Scope:
//! - per-mesh flat color (straight RGB + separate opacity) and its packed vertex form
//! - blend modes selected per batch
//!
//! Geometry types remain in `coords`.

pub mod blend;
pub mod color;

pub use blend::BlendMode;
pub use color::{pack_color, unpack_color, Rgb};
