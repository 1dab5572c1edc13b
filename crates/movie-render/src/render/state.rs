use crate::paint::BlendMode;
use crate::resource::{ImageBinding, TextureId};

/// Which passes a flush issues; chosen once per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum DrawMode {
    #[default]
    Solid,
    Wireframe,
    SolidWithWireOverlay,
}

impl DrawMode {
    /// Picks the mode for a pair of viewer toggles; `None` when both are off.
    pub fn from_toggles(solid: bool, wireframe: bool) -> Option<Self> {
        match (solid, wireframe) {
            (true, true) => Some(DrawMode::SolidWithWireOverlay),
            (true, false) => Some(DrawMode::Solid),
            (false, true) => Some(DrawMode::Wireframe),
            (false, false) => None,
        }
    }

    #[inline]
    pub fn draws_solid(self) -> bool {
        matches!(self, DrawMode::Solid | DrawMode::SolidWithWireOverlay)
    }

    #[inline]
    pub fn draws_wireframe(self) -> bool {
        matches!(self, DrawMode::Wireframe | DrawMode::SolidWithWireOverlay)
    }
}

/// GPU state shared by every mesh in one batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BindingState {
    pub texture_rgb: TextureId,
    pub texture_alpha: TextureId,
    pub blend: BlendMode,
}

impl BindingState {
    /// Fallback textures on both slots with plain alpha blending.
    #[inline]
    pub fn neutral(fallback: TextureId) -> Self {
        Self {
            texture_rgb: fallback,
            texture_alpha: fallback,
            blend: BlendMode::Alpha,
        }
    }
}

/// Texture sources for one submitted mesh.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct MeshTextures {
    /// Color source; also decides premultiplied vs. straight alpha.
    pub rgb: Option<ImageBinding>,
    /// Alpha/matte source, sampled with `uv1`.
    pub alpha: Option<ImageBinding>,
}

impl MeshTextures {
    pub const NONE: MeshTextures = MeshTextures { rgb: None, alpha: None };

    #[inline]
    pub fn rgb(rgb: Option<ImageBinding>) -> Self {
        Self { rgb, alpha: None }
    }
}
