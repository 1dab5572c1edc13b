/// Straight (non-premultiplied) RGB color with channels in `[0, 1]`.
///
/// Opacity travels separately; meshes carry a flat color plus an opacity
/// value and the two are only combined when packed into a vertex.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamps all channels to `[0, 1]`.
    ///
    /// `pack_color` does not clamp; callers holding untrusted values should
    /// clamp first.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

#[inline]
fn channel_to_byte(channel: f32) -> u32 {
    // Values at or above 256 wrap; inputs are expected in [0, 1].
    ((channel * 255.5) as u32) & 0xFF
}

/// Packs a color and a separate alpha into a 32-bit vertex color.
///
/// Byte layout from high to low is `a, b, g, r`, so the little-endian memory
/// order is `r, g, b, a` and the value can be fed to an `Unorm8x4` attribute.
#[inline]
pub fn pack_color(color: Rgb, alpha: f32) -> u32 {
    let r = channel_to_byte(color.r);
    let g = channel_to_byte(color.g);
    let b = channel_to_byte(color.b);
    let a = channel_to_byte(alpha);

    (a << 24) | (b << 16) | (g << 8) | r
}

/// Splits a packed vertex color back into `[r, g, b, a]` bytes.
#[inline]
pub fn unpack_color(packed: u32) -> [u8; 4] {
    packed.to_le_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_white_packs_to_all_ones() {
        assert_eq!(pack_color(Rgb::WHITE, 1.0), 0xFFFF_FFFF);
    }

    #[test]
    fn transparent_black_packs_to_zero() {
        assert_eq!(pack_color(Rgb::BLACK, 0.0), 0);
    }

    #[test]
    fn byte_order_is_abgr_high_to_low() {
        let packed = pack_color(Rgb::new(1.0, 0.0, 0.0), 0.0);
        assert_eq!(packed, 0x0000_00FF);

        let packed = pack_color(Rgb::new(0.0, 0.0, 1.0), 1.0);
        assert_eq!(packed, 0xFFFF_0000);
    }

    #[test]
    fn half_alpha_rounds_up() {
        // 0.5 * 255.5 = 127.75 -> 127
        let [_, _, _, a] = unpack_color(pack_color(Rgb::WHITE, 0.5));
        assert_eq!(a, 127);
    }

    #[test]
    fn unpacked_channels_stay_within_one_step() {
        let steps = [0.0f32, 0.1, 0.25, 0.333, 0.5, 0.66, 0.75, 0.9, 0.999, 1.0];
        for &r in &steps {
            for &g in &steps {
                for &a in &steps {
                    let b = 1.0 - r;
                    let bytes = unpack_color(pack_color(Rgb::new(r, g, b), a));
                    for (byte, input) in bytes.iter().zip([r, g, b, a]) {
                        let back = *byte as f32 / 255.0;
                        assert!(
                            (back - input).abs() <= 1.0 / 255.0 + f32::EPSILON,
                            "channel {input} came back as {back}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn out_of_range_channels_wrap_instead_of_saturating() {
        // 2.0 * 255.5 = 511 -> 0x1FF -> masked to 0xFF
        let [r, ..] = unpack_color(pack_color(Rgb::new(2.0, 0.0, 0.0), 1.0));
        assert_eq!(r, 0xFF);
        // 1.5 * 255.5 = 383.25 -> 383 = 0x17F -> 0x7F
        let [r, ..] = unpack_color(pack_color(Rgb::new(1.5, 0.0, 0.0), 1.0));
        assert_eq!(r, 0x7F);
    }

    #[test]
    fn clamped_restores_unit_range() {
        let c = Rgb::new(-0.5, 0.5, 3.0).clamped();
        assert_eq!(c, Rgb::new(0.0, 0.5, 1.0));
    }
}
