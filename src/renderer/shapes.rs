//! Shape generation for 2D primitives
//!
//! Everything renders as vertex-colored triangles; these builders turn the
//! simulation's geometry (polylines, polygons, circles, sprite rects) into
//! triangle lists.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::rotate_deg;
use crate::sim::Rect;

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for an axis-aligned filled rect
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let a = rect.pos;
    let b = rect.pos + Vec2::new(rect.size.x, 0.0);
    let c = rect.pos + rect.size;
    let d = rect.pos + Vec2::new(0.0, rect.size.y);

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled rect rotated about its center
///
/// The rotation matches the simulation's sprite convention: corners are
/// rotated by `-angle` degrees, the same transform that places the shaker
/// mouth.
pub fn rotated_quad(center: Vec2, size: (f32, f32), angle_deg: f32, color: [f32; 4]) -> Vec<Vertex> {
    let half = Vec2::new(size.0 / 2.0, size.1 / 2.0);
    let corners = [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|c| center + rotate_deg(c, -angle_deg));

    vec![
        Vertex::new(corners[0].x, corners[0].y, color),
        Vertex::new(corners[1].x, corners[1].y, color),
        Vertex::new(corners[2].x, corners[2].y, color),
        Vertex::new(corners[0].x, corners[0].y, color),
        Vertex::new(corners[2].x, corners[2].y, color),
        Vertex::new(corners[3].x, corners[3].y, color),
    ]
}

/// Generate vertices for a filled polygon as a fan around its centroid
///
/// Good enough for the liquid shape, which is star-shaped about its
/// centroid.
pub fn polygon(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let mut vertices = Vec::with_capacity(points.len() * 3);

    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(centroid.x, centroid.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a stroked polyline of the given width
///
/// Each segment becomes a quad perpendicular to its direction; used for the
/// pour stream.
pub fn polyline(points: &[Vec2], width: f32, color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }

    let half = width / 2.0;
    let mut vertices = Vec::with_capacity((points.len() - 1) * 6);

    for i in 0..points.len() - 1 {
        let p1 = points[i];
        let p2 = points[i + 1];

        let dir = (p2 - p1).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);

        let v1a = p1 + perp * half;
        let v1b = p1 - perp * half;
        let v2a = p2 + perp * half;
        let v2b = p2 - perp * half;

        // Two triangles per segment
        vertices.push(Vertex::new(v1a.x, v1a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2a.x, v2a.y, color));

        vertices.push(Vertex::new(v2a.x, v2a.y, color));
        vertices.push(Vertex::new(v1b.x, v1b.y, color));
        vertices.push(Vertex::new(v2b.x, v2b.y, color));
    }

    vertices
}
