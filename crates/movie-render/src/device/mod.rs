//! wgpu device and window surface.
//!
//! One [`Gpu`] per window: adapter/device/queue selection, surface
//! configuration and per-frame swapchain acquisition.

mod context;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use frame::{FrameRecovery, SurfaceFrame};
pub use init::GpuInit;
