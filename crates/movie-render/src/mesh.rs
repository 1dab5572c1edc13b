//! Per-frame render meshes produced by the composition engine.

use crate::paint::Rgb;
use crate::resource::ResourceHandle;

/// Stable node identity supplied by the engine.
///
/// Used to key per-node host state (track mattes) across lifecycle callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Kind of layer a mesh was generated from.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayerType {
    Shape,
    Solid,
    Image,
    Sequence,
    Video,
    Sound,
    Slot,
    Particle,
    Text,
    Other,
}

impl LayerType {
    /// Layers whose meshes are flat colored, with no texture.
    #[inline]
    pub fn is_untextured(self) -> bool {
        matches!(self, LayerType::Shape | LayerType::Solid)
    }

    /// Layers that sample an image resource.
    #[inline]
    pub fn is_image(self) -> bool {
        matches!(self, LayerType::Image | LayerType::Sequence)
    }
}

/// Blend flag carried by a mesh.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MeshBlend {
    #[default]
    Normal,
    Add,
}

/// Snapshot of one layer's geometry for the current frame.
///
/// `positions`, `uvs` are parallel arrays; `indices` form a triangle list over
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    pub layer_type: LayerType,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
    pub color: Rgb,
    pub opacity: f32,
    pub blend: MeshBlend,
    /// Node owning the track matte applied to this layer, if any.
    pub track_matte: Option<NodeId>,
    /// Image resource of the layer itself.
    pub resource: Option<ResourceHandle>,
    /// Element handle returned by the node provider (the matte's image for
    /// track-matted layers).
    pub element: Option<ResourceHandle>,
}

impl RenderMesh {
    pub fn new(layer_type: LayerType) -> Self {
        Self {
            layer_type,
            positions: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            color: Rgb::WHITE,
            opacity: 1.0,
            blend: MeshBlend::Normal,
            track_matte: None,
            resource: None,
            element: None,
        }
    }

    /// Axis-aligned quad `(x, y, w, h)` with full-range UVs, as two triangles.
    pub fn quad(layer_type: LayerType, x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut mesh = Self::new(layer_type);
        mesh.positions = vec![[x, y, 0.0], [x + w, y, 0.0], [x + w, y + h, 0.0], [x, y + h, 0.0]];
        mesh.uvs = vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        mesh.indices = vec![0, 1, 2, 0, 2, 3];
        mesh
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    #[inline]
    pub fn is_additive(&self) -> bool {
        self.blend == MeshBlend::Add
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_has_two_triangles() {
        let q = RenderMesh::quad(LayerType::Solid, 0.0, 0.0, 100.0, 100.0);
        assert_eq!(q.vertex_count(), 4);
        assert_eq!(q.index_count(), 6);
        assert_eq!(q.positions[2], [100.0, 100.0, 0.0]);
        assert!(!q.is_empty());
    }

    #[test]
    fn layer_classification() {
        assert!(LayerType::Shape.is_untextured());
        assert!(LayerType::Sequence.is_image());
        assert!(!LayerType::Video.is_image());
        assert!(!LayerType::Video.is_untextured());
    }
}
