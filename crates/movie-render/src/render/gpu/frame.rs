use wgpu::util::DeviceExt;

use crate::paint::BlendMode;
use crate::render::{DrawBackend, DrawPass, DrawVertex, RenderCtx, RenderTarget};
use crate::resource::TextureId;

use super::pipeline::{self, Program};
use super::MeshGpu;

/// One frame's [`DrawBackend`] over wgpu.
///
/// Every flush records into the frame encoder: a copy of the batch into the
/// fixed GPU buffers, then one render pass per draw with `LoadOp::Load`.
/// Queue writes would all land before the frame's first pass, so batch data
/// goes through encoder copies to keep each flush's contents in order.
pub struct MeshFrame<'f, 'c> {
    gpu: &'f mut MeshGpu,
    ctx: &'f RenderCtx<'c>,
    target: &'f mut RenderTarget<'c>,

    blend: BlendMode,
    textures: Option<(TextureId, TextureId)>,
    // Whether the GPU buffers hold a batch that may be drawn.
    uploaded: bool,
}

impl<'f, 'c> MeshFrame<'f, 'c> {
    pub(super) fn new(
        gpu: &'f mut MeshGpu,
        ctx: &'f RenderCtx<'c>,
        target: &'f mut RenderTarget<'c>,
    ) -> Self {
        Self {
            gpu,
            ctx,
            target,
            blend: BlendMode::Alpha,
            textures: None,
            uploaded: false,
        }
    }

    fn upload(&mut self, vertices: &[DrawVertex], indices: &[u16]) -> bool {
        let (Some(vbo), Some(ibo)) = (self.gpu.vbo.as_ref(), self.gpu.ibo.as_ref()) else {
            return false;
        };

        if vertices.len() > self.gpu.max_vertices || indices.len() > self.gpu.max_indices {
            log::warn!(
                "batch of {} vertices / {} indices exceeds GPU buffers; dropped",
                vertices.len(),
                indices.len()
            );
            return false;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);

        // Buffer copies move whole 4-byte words.
        let mut index_words: Vec<u16> = indices.to_vec();
        if index_words.len() % 2 == 1 {
            index_words.push(0);
        }
        let index_bytes: &[u8] = bytemuck::cast_slice(&index_words);

        let device = self.ctx.device;
        let encoder = &mut *self.target.encoder;

        let staging_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("movie mesh vertex staging"),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        encoder.copy_buffer_to_buffer(&staging_vertices, 0, vbo, 0, vertex_bytes.len() as u64);

        let staging_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("movie mesh index staging"),
            contents: index_bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        encoder.copy_buffer_to_buffer(&staging_indices, 0, ibo, 0, index_bytes.len() as u64);

        true
    }
}

impl DrawBackend for MeshFrame<'_, '_> {
    fn map_buffers(&mut self) {
        self.uploaded = false;
    }

    fn unmap_buffers(&mut self, vertices: &[DrawVertex], indices: &[u16]) {
        if vertices.is_empty() || indices.is_empty() {
            return;
        }
        self.uploaded = self.upload(vertices, indices);
    }

    fn set_blend(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn bind_textures(&mut self, rgb: TextureId, alpha: TextureId) {
        self.textures = Some((rgb, alpha));
    }

    fn draw(&mut self, pass: DrawPass, index_count: u32) {
        if !self.uploaded || index_count == 0 {
            return;
        }
        let Some((rgb, alpha)) = self.textures else {
            log::warn!("draw without bound textures; skipped");
            return;
        };

        let program = Program::for_pass(pass);
        if !self.gpu.ensure_pipeline(self.ctx, program, self.blend) {
            return;
        }
        if !self.gpu.ensure_bind_group(self.ctx, rgb, alpha) {
            return;
        }

        let gpu = &*self.gpu;
        let Some(pipeline) = gpu.pipelines[pipeline::slot(program, self.blend)].as_ref() else {
            return;
        };
        let Some(textures) = gpu.bind_groups.get(&(rgb, alpha)) else { return };
        let Some(wvp) = gpu.wvp_bind_group.as_ref() else { return };
        let Some(vbo) = gpu.vbo.as_ref() else { return };
        let Some(ibo) = gpu.ibo.as_ref() else { return };

        let mut rpass = self.target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("movie mesh pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, wvp, &[]);
        rpass.set_bind_group(1, textures, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }
}
