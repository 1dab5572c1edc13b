use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{FrameRecovery, GpuInit, SurfaceFrame};

/// Device, queue and configured surface of one window.
///
/// `'w` is the window borrow held by the surface.
pub struct Gpu<'w> {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'w>,
    adapter_info: wgpu::AdapterInfo,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    // Last size reported by the window, possibly zero while minimized.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Picks an adapter for `window`, opens a device and configures the surface.
    ///
    /// Optional features the adapter lacks are logged and left disabled.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(surface::is_drawable(size), "window has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let features = enabled_features(&init, adapter.features());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("movie-render device"),
                required_features: features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::pick_format(&caps, init.prefer_srgb)
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            alpha_mode: surface::pick_alpha_mode(&caps, init.alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        let adapter_info = adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), surface {:?}, features {:?}",
            adapter_info.name,
            adapter_info.backend,
            format,
            features
        );

        Ok(Self {
            _instance: instance,
            surface,
            adapter_info,
            device,
            queue,
            config,
            size,
        })
    }

    #[inline]
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Features enabled on the device.
    #[inline]
    pub fn features(&self) -> wgpu::Features {
        self.device.features()
    }

    #[inline]
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Drawable size in physical pixels.
    #[inline]
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface; a zero size is remembered but not applied.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !surface::is_drawable(new_size) {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Acquires the next swapchain image and opens the frame encoder.
    pub fn acquire_frame(&self) -> std::result::Result<SurfaceFrame, wgpu::SurfaceError> {
        let texture = self.surface.get_current_texture()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("movie-render frame encoder"),
            });

        Ok(SurfaceFrame {
            texture,
            view,
            encoder,
        })
    }

    /// Submits the frame's commands, then presents its image.
    pub fn present(&self, frame: SurfaceFrame) {
        let SurfaceFrame {
            texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture.present();
    }

    /// Decides how to continue after [`acquire_frame`](Self::acquire_frame) failed.
    pub fn recover(&mut self, err: wgpu::SurfaceError) -> FrameRecovery {
        log::debug!("frame acquisition failed: {err}");
        surface::recover(&self.surface, &self.device, &self.config, self.size, err)
    }
}

/// Required features plus whichever optional ones `available` covers.
fn enabled_features(init: &GpuInit, available: wgpu::Features) -> wgpu::Features {
    let missing = init.optional_features - available;
    if !missing.is_empty() {
        log::warn!("adapter lacks optional features {missing:?}");
    }
    init.required_features | (init.optional_features & available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_features_are_intersected_with_adapter() {
        let init = GpuInit::default();
        assert_eq!(
            enabled_features(&init, wgpu::Features::POLYGON_MODE_LINE),
            wgpu::Features::POLYGON_MODE_LINE
        );
        assert_eq!(enabled_features(&init, wgpu::Features::empty()), wgpu::Features::empty());
    }

    #[test]
    fn required_features_are_always_requested() {
        let init = GpuInit {
            required_features: wgpu::Features::DEPTH_CLIP_CONTROL,
            ..GpuInit::default()
        };
        assert_eq!(
            enabled_features(&init, wgpu::Features::empty()),
            wgpu::Features::DEPTH_CLIP_CONTROL
        );
    }
}
