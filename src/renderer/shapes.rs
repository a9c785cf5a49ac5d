//! Shape generation for 2D primitives
//!
//! All shapes are triangle lists in screen pixels (y grows downward).

use glam::Vec2;

use super::vertex::{Vertex, colors::with_alpha};

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    quad([
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ], color)
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Square of half-size `half` rotated by `angle` radians around `center`
pub fn rotated_square(center: Vec2, half: f32, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let rot = Vec2::from_angle(angle);
    let corners = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|c| center + rot.rotate(c));
    quad(corners, color)
}

/// Thick line segment from `a` to `b`
pub fn line(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width * 0.5);
    quad([a + perp, b + perp, b - perp, a - perp], color)
}

/// Soft halo behind a rectangle: concentric rects with falling opacity
pub fn glow_rect(min: Vec2, max: Vec2, spread: f32, color: [f32; 4], layers: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((layers * 6) as usize);
    for i in (1..=layers).rev() {
        let t = i as f32 / layers as f32;
        let grow = Vec2::splat(spread * t);
        let alpha = color[3] * 0.25 * (1.0 - t + 1.0 / layers as f32);
        vertices.extend(rect(min - grow, max + grow, with_alpha(color, alpha)));
    }
    vertices
}

fn quad(corners: [Vec2; 4], color: [f32; 4]) -> Vec<Vertex> {
    let [a, b, c, d] = corners;
    // Two triangles
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}
