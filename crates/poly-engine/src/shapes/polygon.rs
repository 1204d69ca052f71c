use std::f32::consts::TAU;

use crate::coords::{Vec2, Vec3};
use crate::graphics::{ShapeDims, ShapePrototype};
use crate::vertex::Vertex;

use super::Shape;

/// Point `i` of `sides` evenly spaced around `center`, starting at `rotation`.
#[inline]
fn ring_point(center: Vec2, radius: f32, rotation: f32, i: u32, sides: u32) -> Vec2 {
    center + Vec2::from_angle(rotation + i as f32 * TAU / sides as f32, radius)
}

/// Counts of a fan with `sides` ring vertices, if they fit in `u32`.
fn fan_dims(sides: u32) -> Option<ShapeDims> {
    Some(ShapeDims::new(sides.checked_add(1)?, sides.checked_mul(3)?))
}

/// Counts of an annulus with `sides` segments, if they fit in `u32`.
fn ring_dims(sides: u32) -> Option<ShapeDims> {
    Some(ShapeDims::new(sides.checked_mul(2)?, sides.checked_mul(6)?))
}

fn check_sides(sides: u32, dims: fn(u32) -> Option<ShapeDims>) -> Result<(), String> {
    if sides < 3 {
        return Err(format!("a regular polygon needs at least 3 sides, got {sides}"));
    }
    if dims(sides).is_none() {
        return Err(format!("{sides} sides overflow the vertex or index count"));
    }
    Ok(())
}

/// Copies `center`'s color and extra data onto a flat vertex at `pos`.
#[inline]
fn around(center: &Vertex, pos: Vec2, uv: Vec2, normal: Vec3) -> Vertex {
    Vertex { pos: pos.extend(0.0), norm: normal, uv, ..*center }
}

/// Filled regular polygon, tessellated as a fan around its center.
///
/// Vertex 0 is `center`; ring vertices `1..=sides` sit at
/// `rotation + i·2π/sides`. The UV ring is laid out independently around
/// `center.uv` with its own radius and rotation. Angles are radians.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PolygonShape {
    pub center: Vertex,
    pub sides: u32,
    pub radius: f32,
    pub rotation: f32,
    pub uv_radius: f32,
    pub uv_rotation: f32,
}

impl Shape for PolygonShape {
    const ADD_OP: &'static str = "add_regular_polygon";
    const UPDATE_OP: &'static str = "update_regular_polygon";

    fn validate(&self) -> Result<(), String> {
        check_sides(self.sides, fan_dims)
    }

    fn dims(&self) -> ShapeDims {
        fan_dims(self.sides).unwrap_or(ShapeDims::new(u32::MAX, u32::MAX))
    }

    fn prototype(&self) -> ShapePrototype {
        let n = self.sides;
        let indexes = (0..n).flat_map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        ShapePrototype::new(n + 1, indexes)
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        let c = &self.center;
        let mut out = Vec::with_capacity(self.sides as usize + 1);
        out.push(Vertex { pos: c.pos.truncate().extend(0.0), norm: normal, ..*c });
        for i in 0..self.sides {
            let pos = ring_point(c.pos.truncate(), self.radius, self.rotation, i, self.sides);
            let uv = ring_point(c.uv, self.uv_radius, self.uv_rotation, i, self.sides);
            out.push(around(c, pos, uv, normal));
        }
        out
    }
}

/// Regular polygon annulus between two radii.
///
/// Vertices alternate inner (`2i`) and outer (`2i + 1`) at the same angle;
/// each side is two triangles and the last side wraps to the first pair.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PolygonRingShape {
    pub center: Vertex,
    pub sides: u32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub rotation: f32,
    pub uv_inner_radius: f32,
    pub uv_outer_radius: f32,
    pub uv_rotation: f32,
}

impl Shape for PolygonRingShape {
    const ADD_OP: &'static str = "add_regular_polygon_ring";
    const UPDATE_OP: &'static str = "update_regular_polygon_ring";

    fn validate(&self) -> Result<(), String> {
        check_sides(self.sides, ring_dims)
    }

    fn dims(&self) -> ShapeDims {
        ring_dims(self.sides).unwrap_or(ShapeDims::new(u32::MAX, u32::MAX))
    }

    fn prototype(&self) -> ShapePrototype {
        let count = self.sides * 2;
        let indexes = (0..self.sides)
            .flat_map(|i| {
                let [a, b, c, d] = [2 * i, 2 * i + 1, 2 * i + 2, 2 * i + 3].map(|v| v % count);
                [a, b, c, b, d, c]
            })
            .collect();
        ShapePrototype::new(count, indexes)
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        let c = &self.center;
        let (center, uv_center) = (c.pos.truncate(), c.uv);
        let mut out = Vec::with_capacity(self.sides as usize * 2);
        for i in 0..self.sides {
            for (radius, uv_radius) in [
                (self.inner_radius, self.uv_inner_radius),
                (self.outer_radius, self.uv_outer_radius),
            ] {
                let pos = ring_point(center, radius, self.rotation, i, self.sides);
                let uv = ring_point(uv_center, uv_radius, self.uv_rotation, i, self.sides);
                out.push(around(c, pos, uv, normal));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::super::ShapeBatch;
    use super::super::test_support::*;
    use super::*;
    use crate::graphics::GraphicsError;

    fn hexagon() -> PolygonShape {
        PolygonShape {
            center: Vertex::at(Vec2::new(10.0, 10.0)).with_uv(Vec2::new(0.5, 0.5)),
            sides: 6,
            radius: 4.0,
            rotation: 0.0,
            uv_radius: 0.5,
            uv_rotation: FRAC_PI_2,
        }
    }

    fn hex_ring() -> PolygonRingShape {
        PolygonRingShape {
            center: Vertex::at(Vec2::new(0.0, 0.0)),
            sides: 6,
            inner_radius: 2.0,
            outer_radius: 3.0,
            ..PolygonRingShape::default()
        }
    }

    // ── fan ───────────────────────────────────────────────────────────────

    #[test]
    fn hexagon_allocates_seven_vertices_and_eighteen_indices() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon(batch, &hexagon()).unwrap();
        assert_eq!(shape.dims(), ShapeDims::new(7, 18));
    }

    #[test]
    fn fan_triangles_wrap_to_first_ring_vertex() {
        let indexes = PolygonShape { sides: 4, ..hexagon() }.prototype().indexes;
        assert_eq!(indexes, vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 4, 1]);
    }

    #[test]
    fn fan_vertices_sit_on_the_circle() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon(batch, &hexagon()).unwrap();

        assert_eq!(pos(&backend, &shape, 0), [10.0, 10.0, 0.0]);
        let first = pos(&backend, &shape, 1);
        assert!(close(first[0], 14.0) && close(first[1], 10.0));

        // UV ring starts a quarter turn later.
        let first_uv = uv(&backend, &shape, 1);
        assert!(close(first_uv[0], 0.5) && close(first_uv[1], 1.0));

        for i in 1..7 {
            let p = pos(&backend, &shape, i);
            assert!(close(Vec2::new(p[0] - 10.0, p[1] - 10.0).length(), 4.0));
        }
    }

    #[test]
    fn fewer_than_three_sides_is_invalid() {
        let (mut backend, batch) = backend();
        let err = backend
            .add_regular_polygon_ring(batch, &PolygonRingShape { sides: 1, ..hex_ring() })
            .unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidShape { op: "add_regular_polygon_ring", .. }));
    }

    #[test]
    fn side_counts_past_u32_counts_are_invalid() {
        assert!(PolygonShape { sides: u32::MAX / 3, ..hexagon() }.validate().is_ok());
        assert!(PolygonShape { sides: u32::MAX / 3 + 1, ..hexagon() }.validate().is_err());
        assert!(PolygonRingShape { sides: u32::MAX / 6, ..hex_ring() }.validate().is_ok());
        assert!(PolygonRingShape { sides: u32::MAX / 6 + 1, ..hex_ring() }.validate().is_err());
    }

    #[test]
    fn huge_side_count_is_an_error_not_a_panic() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon(batch, &hexagon()).unwrap();

        let err = backend
            .update_regular_polygon(&shape, &PolygonShape { sides: u32::MAX, ..hexagon() })
            .unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidShape { op: "update_regular_polygon", .. }));

        let err = backend
            .add_regular_polygon_ring(batch, &PolygonRingShape { sides: u32::MAX, ..hex_ring() })
            .unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidShape { op: "add_regular_polygon_ring", .. }));
        assert_eq!(backend.batch(batch).unwrap().live_shapes(), 1);
    }

    #[test]
    fn raised_center_still_draws_in_the_plane() {
        let (mut backend, batch) = backend();
        let mut raised = hexagon();
        raised.center.pos.z = 5.0;
        let shape = backend.add_regular_polygon(batch, &raised).unwrap();
        for i in 0..7 {
            assert_eq!(pos(&backend, &shape, i)[2], 0.0);
        }

        let mut ring = hex_ring();
        ring.center.pos.z = -2.0;
        let shape = backend.add_regular_polygon_ring(batch, &ring).unwrap();
        for i in 0..12 {
            assert_eq!(pos(&backend, &shape, i)[2], 0.0);
        }
    }

    #[test]
    fn update_with_other_side_count_is_rejected() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon(batch, &hexagon()).unwrap();
        let err = backend
            .update_regular_polygon(&shape, &PolygonShape { sides: 5, ..hexagon() })
            .unwrap_err();
        assert!(matches!(err, GraphicsError::DimensionMismatch { .. }));
    }

    // ── ring ──────────────────────────────────────────────────────────────

    #[test]
    fn hex_ring_allocates_twelve_vertices_and_thirty_six_indices() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon_ring(batch, &hex_ring()).unwrap();
        assert_eq!(shape.dims(), ShapeDims::new(12, 36));
    }

    #[test]
    fn ring_segments_wrap_to_first_pair() {
        let indexes = PolygonRingShape { sides: 3, ..hex_ring() }.prototype().indexes;
        assert_eq!(
            indexes,
            vec![0, 1, 2, 1, 3, 2, 2, 3, 4, 3, 5, 4, 4, 5, 0, 5, 1, 0]
        );
    }

    #[test]
    fn ring_alternates_inner_and_outer() {
        let (mut backend, batch) = backend();
        let shape = backend.add_regular_polygon_ring(batch, &hex_ring()).unwrap();
        for i in 0..12 {
            let p = pos(&backend, &shape, i);
            let r = Vec2::new(p[0], p[1]).length();
            let expected = if i % 2 == 0 { 2.0 } else { 3.0 };
            assert!(close(r, expected), "vertex {i} at radius {r}");
        }
    }
}
