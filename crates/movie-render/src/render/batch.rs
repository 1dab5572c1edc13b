use thiserror::Error;

use crate::mesh::RenderMesh;
use crate::paint::{pack_color, BlendMode};
use crate::resource::TextureId;

use super::{BindingState, DrawBackend, DrawMode, DrawPass, DrawVertex, MeshTextures};

/// Default vertex capacity of one batch.
pub const MAX_VERTICES: usize = 4 * 1024;
/// Default index capacity of one batch.
pub const MAX_INDICES: usize = 6 * 1024;

/// When accumulated geometry is drawn, besides binding changes and capacity.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum FlushPolicy {
    /// Keep appending until a binding change, a full batch or the end of the frame.
    #[default]
    Deferred,
    /// Flush right after every mesh.
    EveryMesh,
}

/// Batch sizing and flush behavior.
///
/// Indices are 16-bit and rebased by the batch vertex count, so
/// `max_vertices` above 65536 makes rebased indices wrap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchConfig {
    pub max_vertices: usize,
    pub max_indices: usize,
    pub flush_policy: FlushPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_vertices: MAX_VERTICES,
            max_indices: MAX_INDICES,
            flush_policy: FlushPolicy::Deferred,
        }
    }
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SubmitError {
    #[error("batch renderer is not recording a frame")]
    NotRecording,
    #[error(
        "mesh with {vertices} vertices / {indices} indices can never fit a batch \
         of {max_vertices} vertices / {max_indices} indices"
    )]
    MeshTooLarge {
        vertices: usize,
        indices: usize,
        max_vertices: usize,
        max_indices: usize,
    },
    #[error("mesh has {positions} positions but {uvs} uvs")]
    UvCountMismatch { positions: usize, uvs: usize },
    #[error("alternate uv set has {alt} entries for {positions} positions")]
    AltUvCountMismatch { positions: usize, alt: usize },
}

/// Counters for one frame, returned by [`BatchRenderer::end_frame`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub meshes: u32,
    pub rejected_meshes: u32,
    pub flushes: u32,
    pub draw_calls: u32,
    pub vertices: u32,
    pub indices: u32,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BatchState {
    Idle,
    Recording,
}

/// Accumulates meshes into one bounded vertex/index batch and decides when
/// to draw it.
///
/// A batch shares one [`BindingState`]. A mesh that needs different
/// textures or a different blend mode, or that does not fit in the space
/// left, flushes the batch first. Binding state survives a flush and only
/// changes on the next submit.
///
/// Lifecycle per frame: [`begin_frame`](Self::begin_frame), any number of
/// [`submit`](Self::submit) / [`flush`](Self::flush), then
/// [`end_frame`](Self::end_frame).
#[derive(Debug)]
pub struct BatchRenderer {
    config: BatchConfig,
    state: BatchState,
    mode: DrawMode,
    fallback: TextureId,
    binding: BindingState,

    // CPU side of the mapped buffer pair.
    vertices: Vec<DrawVertex>,
    indices: Vec<u16>,
    mapped: bool,

    stats: FrameStats,
}

impl BatchRenderer {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            state: BatchState::Idle,
            mode: DrawMode::Solid,
            fallback: TextureId::new(0),
            binding: BindingState::neutral(TextureId::new(0)),
            vertices: Vec::with_capacity(config.max_vertices),
            indices: Vec::with_capacity(config.max_indices),
            mapped: false,
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.state == BatchState::Recording
    }

    #[inline]
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    #[inline]
    pub fn binding(&self) -> BindingState {
        self.binding
    }

    /// Vertices accumulated since the last flush.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Indices accumulated since the last flush.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Counts a mesh the caller dropped before it reached [`submit`](Self::submit).
    #[inline]
    pub fn reject(&mut self) {
        self.stats.rejected_meshes += 1;
    }

    /// Maps the buffers and resets counts and binding state.
    ///
    /// `fallback` is bound wherever a mesh has no texture. A frame left open
    /// is ended first.
    pub fn begin_frame<B>(&mut self, backend: &mut B, mode: DrawMode, fallback: TextureId)
    where
        B: DrawBackend + ?Sized,
    {
        if self.state == BatchState::Recording {
            log::warn!("begin_frame while a frame is still recording; ending it first");
            self.end_frame(backend);
        }

        backend.map_buffers();
        self.mapped = true;

        self.vertices.clear();
        self.indices.clear();
        self.fallback = fallback;
        self.binding = BindingState::neutral(fallback);
        self.mode = mode;
        self.stats = FrameStats::default();
        self.state = BatchState::Recording;
    }

    /// Appends `mesh` to the batch, flushing first when needed.
    ///
    /// `alt_uv`, when given, becomes `uv1` of every vertex (one entry per
    /// position); otherwise `uv1` repeats the mesh UVs.
    pub fn submit<B>(
        &mut self,
        backend: &mut B,
        mesh: &RenderMesh,
        textures: MeshTextures,
        alt_uv: Option<&[[f32; 2]]>,
    ) -> Result<(), SubmitError>
    where
        B: DrawBackend + ?Sized,
    {
        if self.state != BatchState::Recording {
            return Err(SubmitError::NotRecording);
        }

        if let Err(e) = self.check_mesh(mesh, alt_uv) {
            self.stats.rejected_meshes += 1;
            return Err(e);
        }

        let required = self.required_binding(mesh, textures);
        let fits = self.vertices.len() + mesh.vertex_count() <= self.config.max_vertices
            && self.indices.len() + mesh.index_count() <= self.config.max_indices;

        if !fits || required != self.binding {
            self.flush(backend);
        }

        self.binding = required;
        self.append(mesh, alt_uv);
        self.stats.meshes += 1;

        if self.config.flush_policy == FlushPolicy::EveryMesh {
            self.flush(backend);
        }

        Ok(())
    }

    /// Draws the accumulated batch and starts an empty one.
    ///
    /// No draw is issued when the batch has no indices.
    pub fn flush<B>(&mut self, backend: &mut B)
    where
        B: DrawBackend + ?Sized,
    {
        if self.state != BatchState::Recording {
            return;
        }

        if !self.indices.is_empty() {
            let BindingState {
                texture_rgb,
                texture_alpha,
                blend,
            } = self.binding;
            let count = self.indices.len() as u32;

            backend.set_blend(blend);

            backend.unmap_buffers(&self.vertices, &self.indices);
            self.mapped = false;

            backend.bind_textures(texture_rgb, texture_alpha);

            if self.mode.draws_solid() {
                backend.draw(
                    DrawPass::Solid {
                        premultiplied: blend.is_premultiplied(),
                    },
                    count,
                );
                self.stats.draw_calls += 1;
            }

            if self.mode.draws_wireframe() {
                backend.draw(DrawPass::Wireframe, count);
                self.stats.draw_calls += 1;
            }

            backend.map_buffers();
            self.mapped = true;

            self.stats.flushes += 1;
            self.stats.vertices += self.vertices.len() as u32;
            self.stats.indices += count;
        }

        self.vertices.clear();
        self.indices.clear();
    }

    /// Flushes what is left, unmaps the buffers and returns the frame counters.
    pub fn end_frame<B>(&mut self, backend: &mut B) -> FrameStats
    where
        B: DrawBackend + ?Sized,
    {
        if self.state != BatchState::Recording {
            return FrameStats::default();
        }

        self.flush(backend);

        backend.unmap_buffers(&self.vertices, &self.indices);
        self.mapped = false;
        self.state = BatchState::Idle;

        self.stats
    }

    fn check_mesh(&self, mesh: &RenderMesh, alt_uv: Option<&[[f32; 2]]>) -> Result<(), SubmitError> {
        let positions = mesh.vertex_count();

        if mesh.uvs.len() != positions {
            return Err(SubmitError::UvCountMismatch {
                positions,
                uvs: mesh.uvs.len(),
            });
        }

        if let Some(alt) = alt_uv
            && alt.len() != positions
        {
            return Err(SubmitError::AltUvCountMismatch {
                positions,
                alt: alt.len(),
            });
        }

        if positions > self.config.max_vertices || mesh.index_count() > self.config.max_indices {
            return Err(SubmitError::MeshTooLarge {
                vertices: positions,
                indices: mesh.index_count(),
                max_vertices: self.config.max_vertices,
                max_indices: self.config.max_indices,
            });
        }

        Ok(())
    }

    fn required_binding(&self, mesh: &RenderMesh, textures: MeshTextures) -> BindingState {
        let texture_rgb = textures.rgb.and_then(|b| b.texture).unwrap_or(self.fallback);
        let texture_alpha = textures.alpha.and_then(|b| b.texture).unwrap_or(self.fallback);

        let mut blend = if textures.rgb.is_some_and(|b| b.premultiplied) {
            BlendMode::PremultipliedAlpha
        } else {
            BlendMode::Alpha
        };
        if mesh.is_additive() {
            blend = BlendMode::Add;
        }

        BindingState {
            texture_rgb,
            texture_alpha,
            blend,
        }
    }

    fn append(&mut self, mesh: &RenderMesh, alt_uv: Option<&[[f32; 2]]>) {
        debug_assert!(self.mapped, "batch written while unmapped");

        let base = self.vertices.len();
        let color = pack_color(mesh.color, mesh.opacity);

        for (i, (pos, uv)) in mesh.positions.iter().zip(&mesh.uvs).enumerate() {
            let uv1 = alt_uv.map_or(*uv, |alt| alt[i]);
            self.vertices.push(DrawVertex {
                pos: *pos,
                uv0: *uv,
                uv1,
                color,
            });
        }

        self.indices
            .extend(mesh.indices.iter().map(|&index| rebase_index(index, base)));
    }
}

/// Offsets a mesh-local index by the batch vertex base, truncated to 16 bits.
#[inline]
fn rebase_index(index: u16, base: usize) -> u16 {
    ((usize::from(index) + base) & 0xFFFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{LayerType, MeshBlend};
    use crate::paint::Rgb;
    use crate::resource::ImageBinding;
    use crate::testing::{BackendCall, RecordingBackend};

    const FALLBACK: TextureId = TextureId::new(1);
    const TEX_A: TextureId = TextureId::new(7);

    fn binding(id: TextureId, premultiplied: bool) -> MeshTextures {
        MeshTextures::rgb(Some(ImageBinding {
            texture: Some(id),
            premultiplied,
        }))
    }

    fn quad() -> RenderMesh {
        RenderMesh::quad(LayerType::Solid, 0.0, 0.0, 10.0, 10.0)
    }

    fn mesh_with_vertices(count: usize) -> RenderMesh {
        let mut mesh = RenderMesh::new(LayerType::Shape);
        mesh.positions = vec![[0.0; 3]; count];
        mesh.uvs = vec![[0.0; 2]; count];
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    fn start(mode: DrawMode) -> (BatchRenderer, RecordingBackend) {
        let mut batch = BatchRenderer::new(BatchConfig::default());
        let mut backend = RecordingBackend::default();
        batch.begin_frame(&mut backend, mode, FALLBACK);
        (batch, backend)
    }

    #[test]
    fn binding_change_flushes_only_previous_mesh() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        assert!(backend.draws().is_empty());

        batch.submit(&mut backend, &quad(), binding(TEX_A, false), None).unwrap();
        assert_eq!(backend.draws(), vec![(DrawPass::Solid { premultiplied: false }, 6)]);
        assert_eq!(backend.binds(), vec![(FALLBACK, FALLBACK)]);
        assert_eq!(batch.vertex_count(), 4);

        let stats = batch.end_frame(&mut backend);
        assert_eq!(backend.binds(), vec![(FALLBACK, FALLBACK), (TEX_A, FALLBACK)]);
        assert_eq!(stats.flushes, 2);
        assert_eq!(stats.meshes, 2);
    }

    #[test]
    fn flush_follows_backend_protocol() {
        let (mut batch, mut backend) = start(DrawMode::Solid);
        backend.clear();

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.flush(&mut backend);

        assert!(matches!(backend.calls[0], BackendCall::SetBlend(BlendMode::Alpha)));
        assert!(matches!(backend.calls[1], BackendCall::Unmap { .. }));
        assert!(matches!(backend.calls[2], BackendCall::Bind(..)));
        assert!(matches!(backend.calls[3], BackendCall::Draw(..)));
        assert!(matches!(backend.calls[4], BackendCall::Map));
        assert_eq!(backend.calls.len(), 5);
    }

    #[test]
    fn full_batch_flushes_before_append() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch
            .submit(&mut backend, &mesh_with_vertices(MAX_VERTICES - 2), MeshTextures::NONE, None)
            .unwrap();
        assert!(backend.draws().is_empty());

        batch
            .submit(&mut backend, &mesh_with_vertices(3), MeshTextures::NONE, None)
            .unwrap();

        assert_eq!(backend.draws().len(), 1);
        assert_eq!(backend.drawn_batches()[0].0.len(), MAX_VERTICES - 2);
        assert_eq!(batch.vertex_count(), 3);
        assert_eq!(batch.index_count(), 3);
    }

    #[test]
    fn exact_fit_does_not_flush() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch
            .submit(&mut backend, &mesh_with_vertices(MAX_VERTICES - 3), MeshTextures::NONE, None)
            .unwrap();
        batch
            .submit(&mut backend, &mesh_with_vertices(3), MeshTextures::NONE, None)
            .unwrap();

        assert!(backend.draws().is_empty());
        assert_eq!(batch.vertex_count(), MAX_VERTICES);
    }

    fn mesh_with_indices(count: usize) -> RenderMesh {
        let mut mesh = mesh_with_vertices(3);
        mesh.indices = (0..count).map(|i| (i % 3) as u16).collect();
        mesh
    }

    #[test]
    fn full_index_buffer_flushes_before_append() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch
            .submit(&mut backend, &mesh_with_indices(MAX_INDICES - 2), MeshTextures::NONE, None)
            .unwrap();
        assert!(backend.draws().is_empty());
        assert_eq!(batch.vertex_count(), 3);

        batch
            .submit(&mut backend, &mesh_with_vertices(3), MeshTextures::NONE, None)
            .unwrap();

        assert_eq!(backend.draws().len(), 1);
        let drawn = backend.drawn_batches();
        assert_eq!(drawn[0].0.len(), 3);
        assert_eq!(drawn[0].1.len(), MAX_INDICES - 2);
        assert_eq!(batch.vertex_count(), 3);
        assert_eq!(batch.index_count(), 3);
    }

    #[test]
    fn small_index_limit_flushes_on_indices_alone() {
        let config = BatchConfig {
            max_vertices: 64,
            max_indices: 6,
            ..BatchConfig::default()
        };
        let mut batch = BatchRenderer::new(config);
        let mut backend = RecordingBackend::default();
        batch.begin_frame(&mut backend, DrawMode::Solid, FALLBACK);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch
            .submit(&mut backend, &mesh_with_vertices(3), MeshTextures::NONE, None)
            .unwrap();

        assert_eq!(backend.draws(), vec![(DrawPass::Solid { premultiplied: false }, 6)]);
        assert_eq!(batch.index_count(), 3);
    }

    #[test]
    fn indices_are_rebased_by_batch_vertex_count() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.end_frame(&mut backend);

        let batches = backend.drawn_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].1, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(batches[0].0.len(), 8);
    }

    #[test]
    fn rebase_truncates_to_sixteen_bits() {
        assert_eq!(rebase_index(2, 10), 12);
        assert_eq!(rebase_index(1, 0xFFFF), 0);
        assert_eq!(rebase_index(5, 0x1_0000), 5);
    }

    #[test]
    fn overlay_mode_draws_solid_then_wire() {
        let (mut batch, mut backend) = start(DrawMode::SolidWithWireOverlay);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        let stats = batch.end_frame(&mut backend);

        assert_eq!(
            backend.draws(),
            vec![
                (DrawPass::Solid { premultiplied: false }, 6),
                (DrawPass::Wireframe, 6),
            ]
        );
        assert_eq!(stats.flushes, 1);
        assert_eq!(stats.draw_calls, 2);
    }

    #[test]
    fn wireframe_mode_skips_solid_pass() {
        let (mut batch, mut backend) = start(DrawMode::Wireframe);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.end_frame(&mut backend);

        assert_eq!(backend.draws(), vec![(DrawPass::Wireframe, 6)]);
    }

    #[test]
    fn empty_flush_issues_no_draw() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch.flush(&mut backend);
        let stats = batch.end_frame(&mut backend);

        assert_eq!(
            backend.calls,
            vec![
                BackendCall::Map,
                BackendCall::Unmap {
                    vertices: vec![],
                    indices: vec![],
                },
            ]
        );
        assert_eq!(stats, FrameStats::default());
        assert!(!batch.is_recording());
    }

    #[test]
    fn binding_survives_explicit_flush() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch.submit(&mut backend, &quad(), binding(TEX_A, false), None).unwrap();
        batch.flush(&mut backend);
        assert_eq!(batch.binding().texture_rgb, TEX_A);

        batch.submit(&mut backend, &quad(), binding(TEX_A, false), None).unwrap();
        assert_eq!(backend.draws().len(), 1);

        batch.end_frame(&mut backend);
        assert_eq!(backend.binds(), vec![(TEX_A, FALLBACK), (TEX_A, FALLBACK)]);
    }

    #[test]
    fn begin_frame_resets_binding() {
        let (mut batch, mut backend) = start(DrawMode::Solid);
        batch.submit(&mut backend, &quad(), binding(TEX_A, true), None).unwrap();
        batch.end_frame(&mut backend);

        batch.begin_frame(&mut backend, DrawMode::Solid, FALLBACK);
        assert_eq!(batch.binding(), BindingState::neutral(FALLBACK));
        assert_eq!(batch.vertex_count(), 0);
    }

    #[test]
    fn premultiplied_and_additive_select_blend() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        batch.submit(&mut backend, &quad(), binding(TEX_A, true), None).unwrap();

        let mut additive = quad();
        additive.blend = MeshBlend::Add;
        batch.submit(&mut backend, &additive, binding(TEX_A, true), None).unwrap();
        batch.end_frame(&mut backend);

        assert_eq!(backend.blends(), vec![BlendMode::PremultipliedAlpha, BlendMode::Add]);
        assert_eq!(
            backend.draws(),
            vec![
                (DrawPass::Solid { premultiplied: true }, 6),
                (DrawPass::Solid { premultiplied: false }, 6),
            ]
        );
    }

    #[test]
    fn image_without_texture_binds_fallback() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        let textures = MeshTextures::rgb(Some(ImageBinding {
            texture: None,
            premultiplied: true,
        }));
        batch.submit(&mut backend, &quad(), textures, None).unwrap();
        batch.end_frame(&mut backend);

        assert_eq!(backend.binds(), vec![(FALLBACK, FALLBACK)]);
        assert_eq!(backend.blends(), vec![BlendMode::PremultipliedAlpha]);
    }

    #[test]
    fn vertices_carry_color_and_alternate_uvs() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        let mut mesh = quad();
        mesh.color = Rgb::new(1.0, 0.0, 0.0);
        mesh.opacity = 0.5;
        let alt = [[0.5, 0.5], [0.6, 0.5], [0.6, 0.6], [0.5, 0.6]];

        batch.submit(&mut backend, &mesh, MeshTextures::NONE, Some(&alt)).unwrap();
        batch.end_frame(&mut backend);

        let (vertices, _) = &backend.drawn_batches()[0];
        assert_eq!(vertices[0].color, 0x7F00_00FF);
        assert_eq!(vertices[1].uv0, [1.0, 0.0]);
        assert_eq!(vertices[1].uv1, [0.6, 0.5]);
        assert_eq!(vertices[3].pos, [0.0, 10.0, 0.0]);
    }

    #[test]
    fn without_alternate_uvs_uv1_repeats_uv0() {
        let (mut batch, mut backend) = start(DrawMode::Solid);
        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.end_frame(&mut backend);

        let (vertices, _) = &backend.drawn_batches()[0];
        assert!(vertices.iter().all(|v| v.uv0 == v.uv1));
    }

    #[test]
    fn oversized_mesh_is_rejected() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        let err = batch
            .submit(&mut backend, &mesh_with_vertices(MAX_VERTICES + 1), MeshTextures::NONE, None)
            .unwrap_err();
        assert!(matches!(err, SubmitError::MeshTooLarge { vertices, .. } if vertices == MAX_VERTICES + 1));

        let stats = batch.end_frame(&mut backend);
        assert_eq!(stats.rejected_meshes, 1);
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn mesh_with_too_many_indices_is_rejected() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        let err = batch
            .submit(&mut backend, &mesh_with_indices(MAX_INDICES + 1), MeshTextures::NONE, None)
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::MeshTooLarge { vertices: 3, indices, .. } if indices == MAX_INDICES + 1
        ));
        assert_eq!(batch.vertex_count(), 0);

        let stats = batch.end_frame(&mut backend);
        assert_eq!(stats.rejected_meshes, 1);
        assert_eq!(stats.meshes, 0);
        assert!(backend.draws().is_empty());
    }

    #[test]
    fn mismatched_uvs_are_rejected() {
        let (mut batch, mut backend) = start(DrawMode::Solid);

        let mut mesh = quad();
        mesh.uvs.pop();
        assert_eq!(
            batch.submit(&mut backend, &mesh, MeshTextures::NONE, None),
            Err(SubmitError::UvCountMismatch { positions: 4, uvs: 3 })
        );

        let alt = [[0.0, 0.0]; 2];
        assert_eq!(
            batch.submit(&mut backend, &quad(), MeshTextures::NONE, Some(&alt)),
            Err(SubmitError::AltUvCountMismatch { positions: 4, alt: 2 })
        );
    }

    #[test]
    fn submit_outside_frame_fails() {
        let mut batch = BatchRenderer::new(BatchConfig::default());
        let mut backend = RecordingBackend::default();

        assert_eq!(
            batch.submit(&mut backend, &quad(), MeshTextures::NONE, None),
            Err(SubmitError::NotRecording)
        );
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn every_mesh_policy_flushes_each_submit() {
        let config = BatchConfig {
            flush_policy: FlushPolicy::EveryMesh,
            ..BatchConfig::default()
        };
        let mut batch = BatchRenderer::new(config);
        let mut backend = RecordingBackend::default();
        batch.begin_frame(&mut backend, DrawMode::Solid, FALLBACK);

        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        batch.submit(&mut backend, &quad(), MeshTextures::NONE, None).unwrap();
        let stats = batch.end_frame(&mut backend);

        assert_eq!(backend.draws().len(), 2);
        assert_eq!(stats.flushes, 2);
        assert_eq!(stats.indices, 12);
    }
}
