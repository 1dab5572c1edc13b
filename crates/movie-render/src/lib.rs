//! Movie render crate.
//!
//! Batches the per-frame meshes of a composition engine into a small number
//! of GPU draws, plus the platform and GPU runtime used to host it.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod resource;
pub mod mesh;
pub mod render;

pub mod engine;
pub mod matte;
pub mod movie;
pub mod composition;

#[cfg(test)]
mod testing;
