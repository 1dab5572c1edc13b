/// Composition size in composition pixels.
///
/// Drives the orthographic projection shared by every draw of a frame.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Column-major orthographic projection mapping `(0, 0)..(width, height)`
    /// to clip space with +Y down and depth range `[-1, 1]`.
    pub fn ortho_matrix(self) -> [f32; 16] {
        ortho_2d(0.0, self.width.max(1.0), 0.0, self.height.max(1.0), -1.0, 1.0)
    }
}

fn ortho_2d(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> [f32; 16] {
    let mut m = [0.0f32; 16];
    m[0] = 2.0 / (right - left);
    m[5] = 2.0 / (top - bottom);
    m[10] = -2.0 / (far - near);
    m[12] = -(right + left) / (right - left);
    m[13] = -(top + bottom) / (top - bottom);
    m[14] = -(far + near) / (far - near);
    m[15] = 1.0;
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn transform(m: &[f32; 16], x: f32, y: f32) -> (f32, f32) {
        (m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13])
    }

    #[test]
    fn corners_map_to_clip_space() {
        let m = Viewport::new(1280.0, 720.0).ortho_matrix();

        let (x, y) = transform(&m, 0.0, 0.0);
        assert_abs_diff_eq!(x, -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-6);

        let (x, y) = transform(&m, 1280.0, 720.0);
        assert_abs_diff_eq!(x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn zero_size_viewport_stays_finite() {
        let m = Viewport::new(0.0, 0.0).ortho_matrix();
        assert!(m.iter().all(|v| v.is_finite()));
        assert!(!Viewport::new(0.0, 10.0).is_valid());
    }
}
