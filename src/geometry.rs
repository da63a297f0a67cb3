//! Cube mesh and box colours.
//!
//! Every box in the scene is the same unit cube drawn with a per-instance model
//! matrix and colour.

use nalgebra::Vector4;

/// Colours handed out to the boxes on the orbit ring, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    White,
    Yellow,
    Blue,
    Green,
    Red,
    Orange,
    Purple,
    Brown,
}

impl Color {
    /// Colour of the central box.
    pub(crate) const CENTER: Color = Color::White;

    const RING: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::Brown,
    ];

    /// Colour of ring box `index`, cycling through the palette.
    pub(crate) fn ring(index: usize) -> Color {
        Self::RING[index % Self::RING.len()]
    }
}

impl From<Color> for Vector4<f32> {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Vector4::new(0.9, 0.9, 0.9, 1.0),
            Color::Yellow => Vector4::new(1.0, 0.85, 0.1, 1.0),
            Color::Blue => Vector4::new(0.15, 0.3, 1.0, 1.0),
            Color::Green => Vector4::new(0.1, 0.8, 0.25, 1.0),
            Color::Red => Vector4::new(0.9, 0.1, 0.1, 1.0),
            Color::Orange => Vector4::new(1.0, 0.5, 0.0, 1.0),
            Color::Purple => Vector4::new(0.55, 0.2, 0.85, 1.0),
            Color::Brown => Vector4::new(0.5, 0.25, 0.0, 1.0),
        }
    }
}

/// A cube corner together with the normal of the face it belongs to.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct Vertex {
    pub(crate) position: [f32; 3],
    pub(crate) normal: [f32; 3],
}

/// 36 corners of a cube spanning `[-1, 1]` (6 faces, 2 triangles each).
///
/// Faces are listed front, right, back, left, top, bottom and wind clockwise
/// seen from outside.
#[rustfmt::skip]
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    // Front
    [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0],
    [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0],
    // Right
    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],
    // Back
    [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0],
    // Left
    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],
    // Top
    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],
    // Bottom
    [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0],
];

/// Outward normal per face, same order as [`CUBE_POSITIONS`].
const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Builds the cube's vertex list for a non-indexed draw.
pub(crate) fn cube_vertices() -> Vec<Vertex> {
    CUBE_POSITIONS
        .iter()
        .enumerate()
        .map(|(index, &position)| Vertex {
            position,
            normal: FACE_NORMALS[index / 6],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use super::*;

    #[test]
    fn every_corner_lies_on_its_face() {
        for vertex in cube_vertices() {
            let position = Vector3::from(vertex.position);
            let normal = Vector3::from(vertex.normal);
            assert_eq!(position.dot(&normal), 1.0);
        }
    }

    #[test]
    fn triangles_wind_clockwise_from_outside() {
        for triangle in cube_vertices().chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vector3::from(triangle[i].position));
            let facing = (b - a).cross(&(c - a));
            assert!(facing.dot(&Vector3::from(triangle[0].normal)) < 0.0);
        }
    }

    #[test]
    fn ring_colours_cycle() {
        assert_eq!(Color::ring(0), Color::Red);
        assert_eq!(Color::ring(7), Color::Red);
        assert_ne!(Color::ring(3), Color::CENTER);
    }
}
