use thiserror::Error;

use super::Vec2;

/// Reasons a source triangle cannot define a UV mapping.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum ProjectionError {
    /// The three positions are collinear (or coincide), so the mapping has
    /// no inverse.
    #[error("source triangle is degenerate (determinant {det})")]
    DegenerateTriangle { det: f32 },
}

/// Affine texture-coordinate mapping derived from one source triangle.
///
/// Given positions `A, B, C` with known UVs, any point `P` is expressed as
/// `A + alpha * (B - A) + beta * (C - A)` and its UV is
/// `uv_a + alpha * (uv_b - uv_a) + beta * (uv_c - uv_a)`.
///
/// The mapping is exact at the three vertices and extrapolates linearly
/// outside the triangle; no clamping is applied. It is not perspective
/// correct.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvProjector {
    // Rows of the inverse edge matrix, dotted with [1, P.x, P.y].
    alpha: [f32; 3],
    beta: [f32; 3],
    // [uv_a, uv_b - uv_a, uv_c - uv_a] per UV component.
    u: [f32; 3],
    v: [f32; 3],
}

#[inline]
fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

impl UvProjector {
    /// Builds the mapping for triangle `positions` carrying `uvs`.
    ///
    /// Fails when the triangle has zero area; the inverse would otherwise
    /// fill every projected UV with `inf`/`NaN`.
    pub fn new(positions: [Vec2; 3], uvs: [Vec2; 3]) -> Result<Self, ProjectionError> {
        let [a, b, c] = positions;
        let [uv_a, uv_b, uv_c] = uvs;

        let ab = b - a;
        let ac = c - a;

        let det = ab.perp_dot(ac);
        let inv_det = 1.0 / det;
        if det == 0.0 || !inv_det.is_finite() {
            return Err(ProjectionError::DegenerateTriangle { det });
        }

        let ab = ab * inv_det;
        let ac = ac * inv_det;

        let alpha = [ac.x * a.y - ac.y * a.x, ac.y, -ac.x];
        let beta = [ab.y * a.x - ab.x * a.y, -ab.y, ab.x];

        let duv_ab = uv_b - uv_a;
        let duv_ac = uv_c - uv_a;

        Ok(Self {
            alpha,
            beta,
            u: [uv_a.x, duv_ab.x, duv_ac.x],
            v: [uv_a.y, duv_ab.y, duv_ac.y],
        })
    }

    /// Builds the mapping from the first triangle of a mesh (vertices 0, 1, 2).
    ///
    /// Returns `None` when the mesh has fewer than three vertices or UVs.
    pub fn from_mesh_front(
        positions: &[[f32; 3]],
        uvs: &[[f32; 2]],
    ) -> Option<Result<Self, ProjectionError>> {
        let (Some(p), Some(t)) = (positions.get(..3), uvs.get(..3)) else {
            return None;
        };
        Some(Self::new(
            [Vec2::from_xyz(p[0]), Vec2::from_xyz(p[1]), Vec2::from_xyz(p[2])],
            [Vec2::from_array(t[0]), Vec2::from_array(t[1]), Vec2::from_array(t[2])],
        ))
    }

    /// Returns the UV at `point`.
    #[inline]
    pub fn project(&self, point: Vec2) -> Vec2 {
        let p = [1.0, point.x, point.y];
        let weights = [1.0, dot3(self.alpha, p), dot3(self.beta, p)];
        Vec2::new(dot3(self.u, weights), dot3(self.v, weights))
    }
}
