use crate::paint::BlendMode;
use crate::resource::TextureId;

use super::DrawVertex;

/// One indexed triangle-list draw issued by a flush.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawPass {
    /// Filled triangles through the textured program.
    Solid { premultiplied: bool },
    /// Triangle edges through the flat vertex-color program.
    Wireframe,
}

/// Ordered GPU command surface driven by [`BatchRenderer`](super::BatchRenderer).
///
/// Calls arrive in submission order and are treated as blocking. A flush is
/// always `set_blend`, `unmap_buffers`, `bind_textures`, one or two `draw`s,
/// then `map_buffers`; draws never happen while the buffers are mapped.
pub trait DrawBackend {
    /// Makes the vertex/index buffers writable for the next batch.
    fn map_buffers(&mut self);

    /// Ends writing and hands the batch contents to the GPU.
    fn unmap_buffers(&mut self, vertices: &[DrawVertex], indices: &[u16]);

    fn set_blend(&mut self, mode: BlendMode);

    /// Binds the color texture to slot 0 and the alpha texture to slot 1.
    fn bind_textures(&mut self, rgb: TextureId, alpha: TextureId);

    /// Draws `index_count` indices from the start of the unmapped buffers.
    fn draw(&mut self, pass: DrawPass, index_count: u32);
}
