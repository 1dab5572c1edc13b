/// Swapchain image acquired for one frame, with the encoder recording into it.
///
/// Present it promptly with [`Gpu::present`](super::Gpu::present); while it
/// is held the next swapchain image cannot be acquired.
pub struct SurfaceFrame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// What to do after a frame could not be acquired.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameRecovery {
    /// Surface reconfigured; the next frame may succeed.
    Retry,
    /// Nothing is drawn this frame.
    Skip,
    /// Out of memory; stop rendering.
    Abort,
}
