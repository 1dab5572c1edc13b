//! A playable composition bound to the batch renderer.
//!
//! [`Composition`] owns one engine instance and everything the host keeps on
//! its behalf: accepted nodes, track mattes, the batch renderer and the matte
//! UV scratch buffer.

use crate::coords::{UvProjector, Viewport};
use crate::engine::{
    CameraDesc, CompositionEngine, CompositionEvent, CompositionProviders, CompositionState,
    NodeDesc, NodeReply, TrackMatteRequest, TrackMatteUpdate, UpdateState,
};
use crate::matte::{MatteUvScratch, TrackMatteStore};
use crate::mesh::{LayerType, NodeId, RenderMesh};
use crate::render::{BatchConfig, BatchRenderer, DrawBackend, DrawMode, FrameStats, MeshTextures};
use crate::resource::ResourceCache;

// ── node host ─────────────────────────────────────────────────────────────

/// Host side of the engine callbacks.
#[derive(Debug, Default)]
pub struct NodeHost {
    mattes: TrackMatteStore,
    live_nodes: usize,
}

impl NodeHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mattes(&self) -> &TrackMatteStore {
        &self.mattes
    }

    /// Nodes provided and not yet deleted.
    #[inline]
    pub fn live_nodes(&self) -> usize {
        self.live_nodes
    }
}

impl CompositionProviders for NodeHost {
    fn provide_node(&mut self, node: &NodeDesc<'_>) -> NodeReply {
        self.live_nodes += 1;
        let layer = node.layer;

        if layer.is_track_matte {
            log::debug!("node {:?}: '{}' is a track matte layer", node.node, layer.name);
            return NodeReply::Accept { element: None };
        }

        let Some(matte_layer) = node.track_matte_layer else {
            log::debug!("node {:?}: '{}' ({:?})", node.node, layer.name, layer.layer_type);
            return NodeReply::Accept { element: None };
        };

        log::debug!(
            "node {:?}: '{}' ({:?}) matted by '{}'",
            node.node,
            layer.name,
            layer.layer_type,
            matte_layer.name
        );

        let element = match layer.layer_type {
            LayerType::Image => matte_layer.resource,
            _ => None,
        };
        NodeReply::Accept { element }
    }

    fn delete_node(&mut self, node: &NodeDesc<'_>) {
        self.live_nodes = self.live_nodes.saturating_sub(1);
        log::debug!("node {:?} deleted ({:?})", node.node, node.layer.layer_type);
    }

    fn update_node(&mut self, _node: &NodeDesc<'_>, _state: UpdateState) {}

    fn provide_camera(&mut self, camera: &CameraDesc) -> bool {
        log::debug!("camera '{}' {}x{}", camera.name, camera.width, camera.height);
        true
    }

    fn provide_track_matte(&mut self, request: &TrackMatteRequest<'_>) -> bool {
        self.mattes.provide(request);
        true
    }

    fn update_track_matte(&mut self, update: &TrackMatteUpdate<'_>) {
        self.mattes.update(update);
    }

    fn delete_track_matte(&mut self, node: NodeId) {
        self.mattes.remove(node);
    }

    fn composition_event(&mut self, event: &CompositionEvent) {
        log::debug!("composition event '{}' from {:?}", event.name, event.node);
    }

    fn composition_state(&mut self, state: CompositionState) {
        log::debug!("composition state {state:?}");
    }
}

// ── composition ───────────────────────────────────────────────────────────

/// One engine composition with its host state.
///
/// Created started; dropping it runs the engine's deleters.
pub struct Composition<E: CompositionEngine> {
    engine: E,
    host: NodeHost,
    batch: BatchRenderer,
    matte_uvs: MatteUvScratch,
}

impl<E: CompositionEngine> Composition<E> {
    pub fn new(mut engine: E, config: BatchConfig) -> Self {
        let mut host = NodeHost::new();
        engine.start(&mut host);

        let size = engine.size();
        log::info!(
            "composition '{}' ready: {}x{}, {:.2}s, {} track mattes",
            engine.name(),
            size.width,
            size.height,
            engine.duration(),
            host.mattes.len()
        );

        Self {
            engine,
            host,
            batch: BatchRenderer::new(config),
            matte_uvs: MatteUvScratch::with_capacity(config.max_vertices),
        }
    }

    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[inline]
    pub fn host(&self) -> &NodeHost {
        &self.host
    }

    // ── playback ─────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        self.engine.name()
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.engine.duration()
    }

    #[inline]
    pub fn current_time(&self) -> f32 {
        self.engine.current_time()
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.engine.size()
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    /// Resumes a paused composition, or starts a stopped one at `start_time`.
    pub fn play(&mut self, start_time: f32) {
        if self.engine.is_paused() {
            self.engine.resume();
        } else if !self.engine.is_playing() {
            self.engine.play(start_time);
        }
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn set_loop(&mut self, looped: bool) {
        self.engine.set_loop(looped);
    }

    #[inline]
    pub fn is_looped(&self) -> bool {
        self.engine.is_looped()
    }

    // ── sub-compositions ─────────────────────────────────────────────────

    #[inline]
    pub fn sub_composition_count(&self) -> usize {
        self.engine.sub_composition_count()
    }

    pub fn sub_composition_name(&self, index: usize) -> Option<&str> {
        self.engine.sub_composition_name(index)
    }

    pub fn play_sub_composition(&mut self, index: usize) {
        if self.has_sub_composition(index) {
            self.engine.play_sub_composition(index);
        }
    }

    pub fn pause_sub_composition(&mut self, index: usize) {
        if self.has_sub_composition(index) {
            self.engine.pause_sub_composition(index);
        }
    }

    pub fn stop_sub_composition(&mut self, index: usize) {
        if self.has_sub_composition(index) {
            self.engine.stop_sub_composition(index);
        }
    }

    pub fn set_sub_composition_time(&mut self, index: usize, time: f32) {
        if self.has_sub_composition(index) {
            self.engine.set_sub_composition_time(index, time);
        }
    }

    pub fn set_sub_composition_loop(&mut self, index: usize, looped: bool) {
        if self.has_sub_composition(index) {
            self.engine.set_sub_composition_loop(index, looped);
        }
    }

    pub fn is_sub_composition_looped(&self, index: usize) -> bool {
        self.has_sub_composition(index) && self.engine.is_sub_composition_looped(index)
    }

    fn has_sub_composition(&self, index: usize) -> bool {
        let count = self.engine.sub_composition_count();
        if index >= count {
            log::warn!("sub-composition {index} out of range ({count})");
            return false;
        }
        true
    }

    // ── frame ────────────────────────────────────────────────────────────

    /// Advances the engine by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.engine.update(dt, &mut self.host);
    }

    /// Draws the current frame through `backend`.
    ///
    /// Textures are resolved in `cache`, which must be initialized; an
    /// uninitialized cache draws nothing.
    pub fn draw<B>(&mut self, backend: &mut B, cache: &ResourceCache, mode: DrawMode) -> FrameStats
    where
        B: DrawBackend + ?Sized,
    {
        let Some(fallback) = cache.fallback_texture() else {
            log::warn!("composition '{}' not drawn: resource cache not initialized", self.engine.name());
            return FrameStats::default();
        };

        let Self {
            engine,
            host,
            batch,
            matte_uvs,
        } = self;

        batch.begin_frame(backend, mode, fallback);

        let mut pass = MeshPass {
            batch,
            backend,
            cache,
            mattes: &host.mattes,
            matte_uvs,
        };
        engine.for_each_mesh(&mut |mesh: &RenderMesh| pass.draw(mesh));

        pass.batch.end_frame(pass.backend)
    }
}

impl<E: CompositionEngine> Drop for Composition<E> {
    fn drop(&mut self) {
        self.engine.finish(&mut self.host);
        log::debug!("composition '{}' finished", self.engine.name());
    }
}

/// Per-frame routing of engine meshes into the batch renderer.
struct MeshPass<'a, B: ?Sized> {
    batch: &'a mut BatchRenderer,
    backend: &'a mut B,
    cache: &'a ResourceCache,
    mattes: &'a TrackMatteStore,
    matte_uvs: &'a mut MatteUvScratch,
}

impl<B: DrawBackend + ?Sized> MeshPass<'_, B> {
    fn draw(&mut self, mesh: &RenderMesh) {
        match mesh.track_matte {
            None => self.draw_plain(mesh),
            Some(node) => self.draw_matted(mesh, node),
        }
    }

    fn draw_plain(&mut self, mesh: &RenderMesh) {
        if mesh.is_empty() {
            return;
        }

        let textures = if mesh.layer_type.is_untextured() {
            MeshTextures::NONE
        } else if mesh.layer_type.is_image() {
            MeshTextures::rgb(mesh.resource.and_then(|h| self.cache.binding(h)))
        } else {
            return;
        };

        if let Err(e) = self.batch.submit(self.backend, mesh, textures, None) {
            log::warn!("{:?} mesh skipped: {e}", mesh.layer_type);
        }
    }

    fn draw_matted(&mut self, mesh: &RenderMesh, node: NodeId) {
        if !mesh.layer_type.is_image() || mesh.vertex_count() < 3 {
            return;
        }
        let Some(element) = mesh.element else {
            return;
        };

        let Some(matte) = self.mattes.get(node) else {
            log::debug!("no track matte stored for {node:?}; mesh skipped");
            return;
        };

        let projector = match UvProjector::from_mesh_front(&mesh.positions, &mesh.uvs) {
            Some(Ok(projector)) => projector,
            Some(Err(e)) => {
                log::debug!("matted mesh of {node:?} skipped: {e}");
                self.batch.reject();
                return;
            }
            None => {
                log::debug!("matted mesh of {node:?} has fewer than three uvs; skipped");
                self.batch.reject();
                return;
            }
        };

        let alt_uv = match self.matte_uvs.project(&projector, &matte.mesh.positions) {
            Ok(uvs) => uvs,
            Err(e) => {
                log::warn!("track matte of {node:?} skipped: {e}");
                self.batch.reject();
                return;
            }
        };

        let textures = MeshTextures {
            rgb: self.cache.binding(element),
            alpha: mesh.resource.and_then(|h| self.cache.binding(h)),
        };

        if let Err(e) = self.batch.submit(self.backend, &matte.mesh, textures, Some(alt_uv)) {
            log::warn!("track matte of {node:?} skipped: {e}");
        }
    }
}
