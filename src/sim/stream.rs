//! Procedural curves for the pour stream and the liquid surface
//!
//! The stream is a polyline rebuilt every tick: a falling stage sampled
//! along the vertical pour ray with a sinusoidal wiggle, and (when the ray
//! lands on a glass wall) a sliding stage that follows the wall down to the
//! current liquid surface. The liquid surface polygon is derived from the
//! fill level alone.

use glam::Vec2;
use std::f32::consts::TAU;

use super::wall::InnerTriangle;

/// Quadratic Bezier point
#[inline]
fn quadratic(a: Vec2, ctrl: Vec2, b: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    a * (inv * inv) + ctrl * (2.0 * inv * t) + b * (t * t)
}

/// Suggested stroke width for the stream polyline
#[inline]
pub fn stream_width(pour_factor: f32, base: f32, extra: f32) -> f32 {
    base + extra * pour_factor
}

/// Falling stream stage: samples down the vertical ray from `mouth` to
/// `end_y`, each perturbed horizontally by a wiggle whose phase advances
/// with elapsed time and sample position
pub fn falling_stream(
    mouth: Vec2,
    end_y: f32,
    time: f32,
    pour_factor: f32,
    amplitude: f32,
    frequency: f32,
    samples: usize,
) -> Vec<Vec2> {
    let samples = samples.max(2);
    let span = end_y - mouth.y;

    (0..samples)
        .map(|i| {
            let t = i as f32 / (samples - 1) as f32;
            let offset = (time * frequency + t * TAU).sin() * amplitude * pour_factor;
            Vec2::new(mouth.x + offset, mouth.y + span * t)
        })
        .collect()
}

/// Sliding stream stage: from the wall contact point down to where the
/// liquid surface meets that wall, perturbed along the wall normal at half
/// the falling-stage amplitude to suggest liquid clinging to the glass
pub fn sliding_stream(
    contact: Vec2,
    surface: Vec2,
    wall_normal: Vec2,
    time: f32,
    pour_factor: f32,
    amplitude: f32,
    frequency: f32,
    samples: usize,
) -> Vec<Vec2> {
    let samples = samples.max(2);
    let half_amp = amplitude * 0.5;

    (0..samples)
        .map(|i| {
            let t = i as f32 / (samples - 1) as f32;
            let offset = (time * frequency + t * TAU).sin() * half_amp * pour_factor;
            contact.lerp(surface, t) + wall_normal * offset
        })
        .collect()
}

/// The visible liquid polygon for the current fill level
///
/// Top edge: a quadratic bulge between the two wall surface points, whose
/// strength shrinks as the glass fills and which is clamped so it never
/// rises above the rim. Bottom edge: a quadratic rounded apex whose
/// reference points use only the bottom 30% of the fill range, so the
/// rounding looks the same at any fill level.
pub fn liquid_polygon(
    tri: &InnerTriangle,
    fill: f32,
    bulge_strength: f32,
    samples: usize,
) -> Vec<Vec2> {
    let fill = fill.clamp(0.0, 1.0);
    if fill <= 0.0 {
        return Vec::new();
    }

    let samples = samples.max(3);
    let surface_left = tri.left_surface_point(fill);
    let surface_right = tri.right_surface_point(fill);

    // Top bulge, fading toward full and never above the rim line
    let bulge = bulge_strength * (1.0 - 0.6 * fill);
    let mut top_ctrl = (surface_left + surface_right) / 2.0 - Vec2::new(0.0, bulge);
    top_ctrl.y = top_ctrl.y.max(tri.top_left.y);

    // Rounded apex reference points at the bottom 30% of the fill range
    let t_ref = fill.min(0.3);
    let left_ref = tri.left_surface_point(t_ref);
    let right_ref = tri.right_surface_point(t_ref);

    // Apex control pulled slightly upward, kept between apex and references
    let ref_height = tri.bottom.y - tri.left_surface_point(0.3).y;
    let lift = (ref_height * 0.25).min((tri.bottom.y - left_ref.y) * 0.8);
    let bottom_ctrl = Vec2::new(tri.bottom.x, tri.bottom.y - lift);

    let mut points = Vec::with_capacity(samples * 2 + 2);

    // Left surface corner across the bulged top to the right corner
    for i in 0..samples {
        let t = i as f32 / (samples - 1) as f32;
        points.push(quadratic(surface_left, top_ctrl, surface_right, t));
    }

    // Down the right wall to the rounding reference (zero-length when the
    // fill is within the rounded region already)
    if fill > t_ref {
        points.push(right_ref);
    }

    // Rounded bottom from right reference back to left reference; the
    // polygon closes back up the left wall to the first point
    for i in 1..samples {
        let t = i as f32 / (samples - 1) as f32;
        points.push(quadratic(right_ref, bottom_ctrl, left_ref, t));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::wall::Rect;

    fn tri() -> InnerTriangle {
        InnerTriangle::from_rect(&Rect::new(100.0, 100.0, 150.0, 190.0))
    }

    #[test]
    fn test_falling_stream_spans_mouth_to_end() {
        let mouth = Vec2::new(50.0, 10.0);
        let pts = falling_stream(mouth, 110.0, 1.3, 0.0, 3.5, 9.0, 12);
        assert_eq!(pts.len(), 12);
        // Zero pour factor means zero wiggle: a perfectly vertical line
        for p in &pts {
            assert!((p.x - 50.0).abs() < 1e-5);
        }
        assert!((pts[0].y - 10.0).abs() < 1e-5);
        assert!((pts[11].y - 110.0).abs() < 1e-5);
    }

    #[test]
    fn test_falling_stream_wiggle_bounded() {
        let mouth = Vec2::new(50.0, 10.0);
        let pts = falling_stream(mouth, 110.0, 0.7, 1.0, 3.5, 9.0, 16);
        for p in &pts {
            assert!((p.x - 50.0).abs() <= 3.5 + 1e-5);
        }
    }

    #[test]
    fn test_sliding_stream_half_amplitude() {
        let contact = Vec2::new(0.0, 0.0);
        let surface = Vec2::new(10.0, 40.0);
        let normal = Vec2::new(1.0, 0.0);
        let pts = sliding_stream(contact, surface, normal, 0.4, 1.0, 4.0, 9.0, 10);
        for (i, p) in pts.iter().enumerate() {
            let t = i as f32 / 9.0;
            let base = contact.lerp(surface, t);
            // Offset along the normal stays within half the falling amplitude
            assert!((p.x - base.x).abs() <= 2.0 + 1e-5);
            assert!((p.y - base.y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_liquid_polygon_empty_when_dry() {
        assert!(liquid_polygon(&tri(), 0.0, 6.0, 10).is_empty());
    }

    #[test]
    fn test_liquid_polygon_bulge_clamped_to_rim() {
        let tri = tri();
        // Absurd bulge strength must still stay at or below the rim line
        let pts = liquid_polygon(&tri, 0.95, 500.0, 16);
        for p in &pts {
            assert!(p.y >= tri.top_left.y - 1e-4);
        }
    }

    #[test]
    fn test_liquid_polygon_surface_height_tracks_fill() {
        let tri = tri();
        let pts = liquid_polygon(&tri, 0.5, 6.0, 12);
        let expected = tri.left_surface_point(0.5);
        // First point is the left surface corner
        assert!((pts[0] - expected).length() < 1e-4);
    }

    #[test]
    fn test_stream_width_scales_with_factor() {
        assert!((stream_width(0.0, 2.0, 3.0) - 2.0).abs() < 1e-6);
        assert!((stream_width(1.0, 2.0, 3.0) - 5.0).abs() < 1e-6);
    }
}
