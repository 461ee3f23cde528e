//! Glass interior geometry: the inverted-triangle liquid region and the
//! oriented wall slabs built around its legs
//!
//! The liquid region is an inverted isosceles triangle inscribed in the
//! glass sprite rect. Each leg (rim corner down to the apex) is additionally
//! widened into a thin oriented rectangle - a "wall slab" - so side impacts
//! can be told apart from landings in the pool even though the two regions
//! touch.

use glam::Vec2;

/// Area-sum containment tolerance in px²; near-boundary points count as
/// inside to avoid flicker at the edge
const AREA_TOLERANCE: f32 = 0.5;

/// Axis-aligned sprite rectangle (top-left origin, screen y-down)
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Place a rect of the given size with its bottom-center at `midbottom`
    pub fn from_midbottom(midbottom: Vec2, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(midbottom.x - w / 2.0, midbottom.y - h),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Unsigned triangle area from the cross product of two edges
#[inline]
fn tri_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    ((b - a).perp_dot(c - a) * 0.5).abs()
}

/// The inverted-triangle hitbox for liquid inside the glass
///
/// Rim corners sit below the sprite top and inside its horizontal extent;
/// the apex sits above the sprite bottom (the stem starts there).
#[derive(Debug, Clone, Copy)]
pub struct InnerTriangle {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom: Vec2,
}

impl InnerTriangle {
    /// Derive the liquid region from the glass sprite rect using fixed
    /// proportional offsets
    pub fn from_rect(rect: &Rect) -> Self {
        let top_y = rect.top() + rect.size.y * 0.20;
        let bottom_y = rect.top() + rect.size.y * 0.55;
        let cx = rect.center().x;
        let half_inner_w = rect.size.x * 0.35;

        Self {
            top_left: Vec2::new(cx - half_inner_w, top_y),
            top_right: Vec2::new(cx + half_inner_w, top_y),
            bottom: Vec2::new(cx, bottom_y),
        }
    }

    pub fn area(&self) -> f32 {
        tri_area(self.top_left, self.top_right, self.bottom)
    }

    /// Area-sum containment test: a point is inside iff the three
    /// sub-triangle areas add up to the total area (within tolerance)
    pub fn contains(&self, p: Vec2) -> bool {
        let total = self.area();
        let sum = tri_area(p, self.top_left, self.top_right)
            + tri_area(p, self.top_right, self.bottom)
            + tri_area(p, self.bottom, self.top_left);
        sum - total <= AREA_TOLERANCE
    }

    /// Point on the left wall at normalized fill height (0 = apex, 1 = rim)
    #[inline]
    pub fn left_surface_point(&self, fill: f32) -> Vec2 {
        self.bottom.lerp(self.top_left, fill)
    }

    /// Point on the right wall at normalized fill height (0 = apex, 1 = rim)
    #[inline]
    pub fn right_surface_point(&self, fill: f32) -> Vec2 {
        self.bottom.lerp(self.top_right, fill)
    }
}

/// An oriented rectangular hit region built around a wall segment
///
/// Stores the segment endpoints plus precomputed unit axes so containment is
/// two dot products. Degenerate segments fall back to a unit vertical axis
/// rather than dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct WallSlab {
    pub start: Vec2,
    pub end: Vec2,
    center: Vec2,
    /// Unit vector from start toward end
    along: Vec2,
    /// Unit vector perpendicular to `along`
    normal: Vec2,
    half_len: f32,
    half_thick: f32,
}

impl WallSlab {
    pub fn new(start: Vec2, end: Vec2, thickness: f32) -> Self {
        let delta = end - start;
        let len = delta.length();
        let (along, len) = if len <= f32::EPSILON {
            (Vec2::Y, 1.0)
        } else {
            (delta / len, len)
        };
        let normal = Vec2::new(-along.y, along.x);

        Self {
            start,
            end,
            center: (start + end) / 2.0,
            along,
            normal,
            half_len: len / 2.0,
            half_thick: thickness / 2.0,
        }
    }

    /// Project onto the slab's axes; inside iff both projections fall
    /// within the half extents
    pub fn contains(&self, p: Vec2) -> bool {
        let rel = p - self.center;
        rel.dot(self.along).abs() <= self.half_len && rel.dot(self.normal).abs() <= self.half_thick
    }

    /// Position along the wall segment at parameter t (0 = start, 1 = end)
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }

    /// Normalized position of a point's projection onto the wall axis,
    /// clamped to the segment
    pub fn project_t(&self, p: Vec2) -> f32 {
        if self.half_len <= f32::EPSILON {
            return 0.0;
        }
        (((p - self.start).dot(self.along)) / (self.half_len * 2.0)).clamp(0.0, 1.0)
    }

    /// Unit vector perpendicular to the wall
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.normal
    }
}

/// Build the left/right wall slabs from the triangle's legs
pub fn wall_slabs(tri: &InnerTriangle, thickness: f32) -> (WallSlab, WallSlab) {
    (
        WallSlab::new(tri.top_left, tri.bottom, thickness),
        WallSlab::new(tri.top_right, tri.bottom, thickness),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass_rect() -> Rect {
        Rect::new(100.0, 100.0, 150.0, 190.0)
    }

    #[test]
    fn test_triangle_proportions() {
        let rect = glass_rect();
        let tri = InnerTriangle::from_rect(&rect);

        assert!((tri.top_left.y - (100.0 + 190.0 * 0.20)).abs() < 1e-4);
        assert!((tri.bottom.y - (100.0 + 190.0 * 0.55)).abs() < 1e-4);
        assert!((tri.bottom.x - 175.0).abs() < 1e-4);
        assert!((tri.top_right.x - tri.top_left.x - 2.0 * 150.0 * 0.35).abs() < 1e-4);
    }

    #[test]
    fn test_triangle_contains_centroid() {
        let tri = InnerTriangle::from_rect(&glass_rect());
        let centroid = (tri.top_left + tri.top_right + tri.bottom) / 3.0;
        assert!(tri.contains(centroid));
    }

    #[test]
    fn test_triangle_rejects_outside() {
        let tri = InnerTriangle::from_rect(&glass_rect());
        assert!(!tri.contains(Vec2::new(0.0, 0.0)));
        // Just above the rim line, horizontally centered
        assert!(!tri.contains(Vec2::new(tri.bottom.x, tri.top_left.y - 5.0)));
        // Below the apex
        assert!(!tri.contains(tri.bottom + Vec2::new(0.0, 5.0)));
    }

    #[test]
    fn test_triangle_boundary_counts_as_inside() {
        let tri = InnerTriangle::from_rect(&glass_rect());
        // Midpoint of the rim edge sits exactly on the boundary
        let rim_mid = (tri.top_left + tri.top_right) / 2.0;
        assert!(tri.contains(rim_mid));
    }

    #[test]
    fn test_slab_contains_on_segment() {
        let slab = WallSlab::new(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0), 8.0);
        assert!(slab.contains(Vec2::new(15.0, 20.0)));
        assert!(slab.contains(Vec2::new(0.0, 0.0)));
        assert!(slab.contains(Vec2::new(30.0, 40.0)));
    }

    #[test]
    fn test_slab_thickness_bounds() {
        let slab = WallSlab::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 8.0);
        // 3 px off-axis is inside a 8 px thick slab, 5 px is not
        assert!(slab.contains(Vec2::new(50.0, 3.0)));
        assert!(!slab.contains(Vec2::new(50.0, 5.0)));
        // Beyond the endpoints along the axis
        assert!(!slab.contains(Vec2::new(110.0, 0.0)));
    }

    #[test]
    fn test_slab_degenerate_segment() {
        let p = Vec2::new(10.0, 10.0);
        let slab = WallSlab::new(p, p, 8.0);
        // Must not panic or produce NaN; the point itself is inside
        assert!(slab.contains(p));
        assert!(slab.point_at(0.5).is_finite());
    }

    #[test]
    fn test_slab_point_at_lerp() {
        let slab = WallSlab::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0), 8.0);
        let mid = slab.point_at(0.5);
        assert!((mid.x - 5.0).abs() < 1e-5);
        assert!((mid.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_slab_project_t() {
        let slab = WallSlab::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), 8.0);
        assert!((slab.project_t(Vec2::new(25.0, 2.0)) - 0.25).abs() < 1e-5);
        // Clamped outside the segment
        assert!((slab.project_t(Vec2::new(-50.0, 0.0)) - 0.0).abs() < 1e-5);
        assert!((slab.project_t(Vec2::new(150.0, 0.0)) - 1.0).abs() < 1e-5);
    }
}
