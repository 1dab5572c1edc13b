/// Blend function applied to a whole batch.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// `src * src_alpha + dst * (1 - src_alpha)`.
    #[default]
    Alpha,
    /// `src + dst * (1 - src_alpha)`; the fragment is already scaled by alpha.
    PremultipliedAlpha,
    /// `src + dst`.
    Add,
}

impl BlendMode {
    pub const ALL: [BlendMode; 3] = [BlendMode::Alpha, BlendMode::PremultipliedAlpha, BlendMode::Add];

    /// Whether the fragment shader must output premultiplied color for this mode.
    #[inline]
    pub fn is_premultiplied(self) -> bool {
        self == BlendMode::PremultipliedAlpha
    }

    /// Dense index used for pipeline tables.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            BlendMode::Alpha => 0,
            BlendMode::PremultipliedAlpha => 1,
            BlendMode::Add => 2,
        }
    }

    pub fn blend_state(self) -> wgpu::BlendState {
        let (src_factor, dst_factor) = match self {
            BlendMode::Alpha => (wgpu::BlendFactor::SrcAlpha, wgpu::BlendFactor::OneMinusSrcAlpha),
            BlendMode::PremultipliedAlpha => {
                (wgpu::BlendFactor::One, wgpu::BlendFactor::OneMinusSrcAlpha)
            }
            BlendMode::Add => (wgpu::BlendFactor::One, wgpu::BlendFactor::One),
        };

        // Same function for color and alpha, like a single glBlendFunc.
        let component = wgpu::BlendComponent {
            src_factor,
            dst_factor,
            operation: wgpu::BlendOperation::Add,
        };

        wgpu::BlendState {
            color: component,
            alpha: component,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_premultiplied_mode_uses_premultiplied_shader() {
        assert!(!BlendMode::Alpha.is_premultiplied());
        assert!(BlendMode::PremultipliedAlpha.is_premultiplied());
        assert!(!BlendMode::Add.is_premultiplied());
    }

    #[test]
    fn indices_are_dense_and_distinct() {
        let idx: Vec<usize> = BlendMode::ALL.iter().map(|m| m.index()).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn additive_blend_is_one_one() {
        let s = BlendMode::Add.blend_state();
        assert_eq!(s.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(s.color.dst_factor, wgpu::BlendFactor::One);
    }
}
