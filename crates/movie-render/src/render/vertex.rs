use bytemuck::{Pod, Zeroable};

/// Vertex layout shared by the CPU staging buffer and the GPU vertex buffer.
///
/// `uv0` addresses the color source, `uv1` the alpha/matte source. Both are
/// always written; without a matte `uv1` repeats `uv0`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct DrawVertex {
    pub pos: [f32; 3],
    pub uv0: [f32; 2],
    pub uv1: [f32; 2],
    /// Packed `a, b, g, r` (high to low), see [`crate::paint::pack_color`].
    pub color: u32,
}

impl DrawVertex {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x2, // uv0
        2 => Float32x2, // uv1
        3 => Unorm8x4   // color
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DrawVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<DrawVertex>(), 32);
    }
}
