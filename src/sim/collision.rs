//! Ray-versus-wall collision for routing the pour stream
//!
//! The tricky part of the pour: a ray cast straight down from the shaker
//! mouth has to find which slanted glass wall (if either) the liquid lands
//! on. Standard 2D parametric ray/segment intersection via the
//! cross-product method; near-parallel configurations report no hit.

use glam::Vec2;

use super::wall::InnerTriangle;

/// Cross-product magnitudes below this are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// Which glass wall a stream or droplet contacted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    Left,
    Right,
}

/// Result of casting the pour ray against the glass walls
#[derive(Debug, Clone, Copy)]
pub struct StreamHit {
    /// Contact point in world space
    pub point: Vec2,
    /// Distance along the ray (in units of the ray direction length)
    pub t: f32,
    /// Position along the wall segment (0 = rim corner, 1 = apex)
    pub u: f32,
    pub side: WallSide,
}

/// Parametric ray/segment intersection
///
/// Solves `ray_start + t*ray_dir = seg_start + u*(seg_end - seg_start)`.
/// A valid hit requires `t >= 0` and `u` in `[0, 1]`; parallel or
/// near-parallel configurations yield `None`.
pub fn ray_segment_intersection(
    ray_start: Vec2,
    ray_dir: Vec2,
    seg_start: Vec2,
    seg_end: Vec2,
) -> Option<(f32, f32)> {
    let seg_dir = seg_end - seg_start;
    let denom = ray_dir.perp_dot(seg_dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let diff = seg_start - ray_start;
    let t = diff.perp_dot(seg_dir) / denom;
    let u = diff.perp_dot(ray_dir) / denom;

    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some((t, u))
    } else {
        None
    }
}

/// Cast the pour ray straight down from the mouth against both glass walls
///
/// If both walls are hit the nearer one (smaller t) wins. A miss means the
/// pour lands outside the glass entirely.
pub fn cast_pour_ray(mouth: Vec2, tri: &InnerTriangle) -> Option<StreamHit> {
    let dir = Vec2::Y;

    let left = ray_segment_intersection(mouth, dir, tri.top_left, tri.bottom)
        .map(|(t, u)| StreamHit {
            point: mouth + dir * t,
            t,
            u,
            side: WallSide::Left,
        });
    let right = ray_segment_intersection(mouth, dir, tri.top_right, tri.bottom)
        .map(|(t, u)| StreamHit {
            point: mouth + dir * t,
            t,
            u,
            side: WallSide::Right,
        });

    match (left, right) {
        (Some(l), Some(r)) => Some(if l.t <= r.t { l } else { r }),
        (Some(l), None) => Some(l),
        (None, Some(r)) => Some(r),
        (None, None) => None,
    }
}
