//! Interface to the external composition engine.
//!
//! The engine owns timelines, keyframes and playback; it computes one
//! [`RenderMesh`] per visible layer per frame. It talks back to the host
//! through [`CompositionProviders`] while nodes, cameras and track mattes
//! come and go, and through [`ResourceProvider`] while movie data loads.

use crate::coords::Viewport;
use crate::mesh::{LayerType, NodeId, RenderMesh};
use crate::resource::ResourceHandle;

// ── resources ─────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Image,
    Sequence,
    Video,
    Sound,
    Slot,
    Other,
}

/// Atlas page an image is cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasRef {
    /// Path relative to the movie's base folder.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageResource {
    pub name: String,
    /// Path relative to the movie's base folder.
    pub path: String,
    pub trim_width: f32,
    pub trim_height: f32,
    pub has_mesh: bool,
    pub atlas: Option<AtlasRef>,
}

/// Resource declared by movie data at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieResource {
    Image(ImageResource),
    Sequence { name: String },
    Video { path: String },
    Sound { path: String },
    Slot { width: f32, height: f32 },
    Other { name: String },
}

impl MovieResource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            MovieResource::Image(_) => ResourceKind::Image,
            MovieResource::Sequence { .. } => ResourceKind::Sequence,
            MovieResource::Video { .. } => ResourceKind::Video,
            MovieResource::Sound { .. } => ResourceKind::Sound,
            MovieResource::Slot { .. } => ResourceKind::Slot,
            MovieResource::Other { .. } => ResourceKind::Other,
        }
    }
}

/// Host side of movie data loading.
pub trait ResourceProvider {
    /// Resolves a declared resource; `None` leaves the resource without a handle.
    fn provide_resource(&mut self, resource: &MovieResource) -> Option<ResourceHandle>;

    /// Called when the movie data releasing a resource of `kind` is dropped.
    fn delete_resource(&mut self, kind: ResourceKind, handle: Option<ResourceHandle>);
}

// ── nodes ─────────────────────────────────────────────────────────────────

/// Static description of a composition layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDesc {
    pub name: String,
    pub layer_type: LayerType,
    /// The layer only serves as another layer's track matte.
    pub is_track_matte: bool,
    /// Handle resolved by the [`ResourceProvider`] for this layer's resource.
    pub resource: Option<ResourceHandle>,
}

/// A node the engine is about to create, delete or update.
#[derive(Debug, Copy, Clone)]
pub struct NodeDesc<'a> {
    pub node: NodeId,
    pub layer: &'a LayerDesc,
    /// Layer acting as this node's track matte.
    pub track_matte_layer: Option<&'a LayerDesc>,
}

/// Host answer to [`CompositionProviders::provide_node`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NodeReply {
    /// Node is kept; `element` is carried on its render meshes.
    Accept { element: Option<ResourceHandle> },
    Decline,
}

/// Phase of an update tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UpdateState {
    Begin,
    Process,
    Pause,
    Resume,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraDesc {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

// ── track mattes ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MatteMode {
    #[default]
    Alpha,
    AlphaInverted,
    Luma,
    LumaInverted,
}

/// Track matte handed to the host when the engine first needs it.
#[derive(Debug, Copy, Clone)]
pub struct TrackMatteRequest<'a> {
    /// Node whose meshes the matte applies to.
    pub node: NodeId,
    pub matrix: &'a [f32; 16],
    pub mesh: &'a RenderMesh,
    pub mode: MatteMode,
}

/// Per-tick refresh of a track matte.
#[derive(Debug, Copy, Clone)]
pub struct TrackMatteUpdate<'a> {
    pub node: NodeId,
    pub state: UpdateState,
    pub matrix: &'a [f32; 16],
    pub mesh: &'a RenderMesh,
}

// ── composition ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionEvent {
    pub node: NodeId,
    pub name: String,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CompositionState {
    Play,
    Pause,
    Resume,
    Stop,
    Interrupt,
    End,
    Loop,
}

/// Host callbacks raised by a composition during start, update and teardown.
pub trait CompositionProviders {
    fn provide_node(&mut self, node: &NodeDesc<'_>) -> NodeReply;
    fn delete_node(&mut self, node: &NodeDesc<'_>);
    fn update_node(&mut self, node: &NodeDesc<'_>, state: UpdateState);

    fn provide_camera(&mut self, camera: &CameraDesc) -> bool;

    fn provide_track_matte(&mut self, request: &TrackMatteRequest<'_>) -> bool;
    fn update_track_matte(&mut self, update: &TrackMatteUpdate<'_>);
    fn delete_track_matte(&mut self, node: NodeId);

    fn composition_event(&mut self, event: &CompositionEvent);
    fn composition_state(&mut self, state: CompositionState);
}

/// A playable composition instance owned by the external engine.
///
/// Playback methods are forwarded verbatim; the engine decides what they
/// mean. Times are in seconds.
pub trait CompositionEngine {
    fn name(&self) -> &str;
    fn duration(&self) -> f32;
    fn current_time(&self) -> f32;

    fn is_playing(&self) -> bool;
    fn is_paused(&self) -> bool;
    fn play(&mut self, start_time: f32);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn set_loop(&mut self, looped: bool);
    fn is_looped(&self) -> bool;

    /// Size of the composition canvas.
    fn size(&self) -> Viewport;

    /// Creates nodes, cameras and track mattes through `providers`.
    fn start(&mut self, providers: &mut dyn CompositionProviders);

    /// Advances playback by `dt` seconds.
    fn update(&mut self, dt: f32, providers: &mut dyn CompositionProviders);

    /// Visits the meshes of the current frame in paint order.
    fn for_each_mesh(&self, visit: &mut dyn FnMut(&RenderMesh));

    /// Releases nodes and track mattes through `providers`.
    fn finish(&mut self, providers: &mut dyn CompositionProviders);

    // ── sub-compositions ─────────────────────────────────────────────────

    fn sub_composition_count(&self) -> usize {
        0
    }

    fn sub_composition_name(&self, index: usize) -> Option<&str> {
        let _ = index;
        None
    }

    fn play_sub_composition(&mut self, index: usize) {
        let _ = index;
    }

    fn pause_sub_composition(&mut self, index: usize) {
        let _ = index;
    }

    fn stop_sub_composition(&mut self, index: usize) {
        let _ = index;
    }

    fn set_sub_composition_time(&mut self, index: usize, time: f32) {
        let _ = (index, time);
    }

    fn set_sub_composition_loop(&mut self, index: usize, looped: bool) {
        let _ = (index, looped);
    }

    fn is_sub_composition_looped(&self, index: usize) -> bool {
        let _ = index;
        false
    }
}
