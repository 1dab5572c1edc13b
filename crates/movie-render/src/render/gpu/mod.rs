//! wgpu implementation of the batch renderer's backend seam.
//!
//! [`MeshGpu`] holds everything that outlives a frame (pipelines, the fixed
//! vertex/index buffers, uploaded textures). [`MeshGpu::frame`] borrows it
//! together with the frame's encoder as a [`MeshFrame`], which is what the
//! batch renderer draws through.

mod frame;
mod pipeline;
mod textures;

use std::collections::HashMap;

use crate::paint::BlendMode;
use crate::render::{BatchConfig, DrawVertex, RenderCtx, RenderTarget};
use crate::resource::TextureId;

pub use frame::MeshFrame;
pub use textures::{GpuTextures, TextureStore};

use pipeline::{Layouts, Program, SLOTS, WVP_SIZE};

/// Persistent GPU state for batched mesh drawing.
///
/// Created once per window; lazily builds its wgpu objects on first use
/// and rebuilds pipelines when the surface format changes.
pub struct MeshGpu {
    max_vertices: usize,
    max_indices: usize,

    pipeline_format: Option<wgpu::TextureFormat>,
    layouts: Option<Layouts>,
    shader: Option<wgpu::ShaderModule>,
    shader_failed: bool,
    pipelines: [Option<wgpu::RenderPipeline>; SLOTS],
    wire_supported: bool,
    warned_no_wire: bool,

    wvp_ubo: Option<wgpu::Buffer>,
    wvp_bind_group: Option<wgpu::BindGroup>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,

    textures: TextureStore,
    bind_groups: HashMap<(TextureId, TextureId), wgpu::BindGroup>,
    bind_group_generation: u64,
}

impl MeshGpu {
    /// Sizes the GPU buffers to hold one full batch of `config`.
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            max_vertices: config.max_vertices,
            max_indices: config.max_indices,
            pipeline_format: None,
            layouts: None,
            shader: None,
            shader_failed: false,
            pipelines: Default::default(),
            wire_supported: false,
            warned_no_wire: false,
            wvp_ubo: None,
            wvp_bind_group: None,
            vbo: None,
            ibo: None,
            textures: TextureStore::default(),
            bind_groups: HashMap::new(),
            bind_group_generation: 0,
        }
    }

    /// Texture upload surface backed by this renderer's texture store.
    pub fn textures<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
    ) -> GpuTextures<'a> {
        GpuTextures::new(device, queue, &mut self.textures)
    }

    #[inline]
    pub fn texture_store(&self) -> &TextureStore {
        &self.textures
    }

    /// Prepares per-frame state and returns the backend for this frame.
    ///
    /// The projection uniform is written here, once per frame.
    pub fn frame<'f, 'c>(
        &'f mut self,
        ctx: &'f RenderCtx<'c>,
        target: &'f mut RenderTarget<'c>,
    ) -> MeshFrame<'f, 'c> {
        self.ensure_layouts(ctx);
        self.ensure_pipelines_valid(ctx);
        self.ensure_buffers(ctx);
        self.write_wvp(ctx);
        self.sync_bind_groups();

        MeshFrame::new(self, ctx, target)
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.layouts.is_some() {
            return;
        }

        let layouts = Layouts::new(ctx.device);

        let wvp_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("movie mesh wvp ubo"),
            size: WVP_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let wvp_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("movie mesh wvp bind group"),
            layout: &layouts.uniforms,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wvp_ubo.as_entire_binding(),
            }],
        });

        self.wire_supported = ctx.features.contains(wgpu::Features::POLYGON_MODE_LINE);
        if !self.wire_supported {
            log::warn!("POLYGON_MODE_LINE unavailable; wireframe draws are skipped");
        }

        self.layouts = Some(layouts);
        self.wvp_ubo = Some(wvp_ubo);
        self.wvp_bind_group = Some(wvp_bind_group);
    }

    fn ensure_pipelines_valid(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) {
            return;
        }

        self.pipelines = Default::default();
        self.pipeline_format = Some(ctx.surface_format);
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        let vbo_size = (self.max_vertices.max(1) * std::mem::size_of::<DrawVertex>()) as u64;
        // Copies into the index buffer are padded to 4 bytes.
        let ibo_size = ((self.max_indices.max(1) + 1) * std::mem::size_of::<u16>()) as u64;
        let ibo_size = ibo_size.next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT);

        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("movie mesh vbo"),
            size: vbo_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));

        self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("movie mesh ibo"),
            size: ibo_size,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }

    fn write_wvp(&self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.wvp_ubo.as_ref() else { return };
        let wvp = ctx.viewport.ortho_matrix();
        ctx.queue.write_buffer(ubo, 0, bytemuck::cast_slice(&wvp));
    }

    fn sync_bind_groups(&mut self) {
        if self.bind_group_generation != self.textures.generation() {
            self.bind_groups.clear();
            self.bind_group_generation = self.textures.generation();
        }
    }

    /// Builds the pipeline for `(program, blend)` on first use.
    ///
    /// `false` when it cannot exist: no line polygon mode for the wire
    /// program, or a shader that failed to compile.
    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, program: Program, blend: BlendMode) -> bool {
        if program == Program::Wire && !self.wire_supported {
            if !self.warned_no_wire {
                log::warn!("wireframe pass requested but not supported by the device");
                self.warned_no_wire = true;
            }
            return false;
        }

        let slot = pipeline::slot(program, blend);
        if self.pipelines[slot].is_some() {
            return true;
        }

        if self.shader.is_none() && !self.shader_failed {
            self.shader = pipeline::create_shader(ctx.device);
            self.shader_failed = self.shader.is_none();
        }

        let (Some(layouts), Some(shader)) = (self.layouts.as_ref(), self.shader.as_ref()) else {
            return false;
        };

        self.pipelines[slot] = Some(pipeline::create_pipeline(
            ctx.device,
            layouts,
            shader,
            ctx.surface_format,
            program,
            blend,
        ));
        true
    }

    /// Builds the bind group for a texture pair on first use.
    fn ensure_bind_group(&mut self, ctx: &RenderCtx<'_>, rgb: TextureId, alpha: TextureId) -> bool {
        if self.bind_groups.contains_key(&(rgb, alpha)) {
            return true;
        }

        let Some(layouts) = self.layouts.as_ref() else { return false };
        let (Some(t0), Some(t1)) = (self.textures.get(rgb), self.textures.get(alpha)) else {
            log::warn!("draw references unknown texture {rgb:?}/{alpha:?}; skipped");
            return false;
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("movie mesh textures bind group"),
            layout: &layouts.textures,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&t0.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&t0.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&t1.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&t1.sampler),
                },
            ],
        });
        self.bind_groups.insert((rgb, alpha), bind_group);

        true
    }
}
