use std::f32::consts::TAU;

use crate::coords::Vec3;
use crate::graphics::{ShapeDims, ShapePrototype};
use crate::vertex::Vertex;

use super::{PolygonRingShape, PolygonShape, Shape};

/// Side count giving edges of at most `resolution` along a circle of `radius`.
///
/// Never fewer than 3.
pub fn auto_sides(radius: f32, resolution: f32) -> u32 {
    // Saturating float-to-int cast: negative or NaN becomes 0.
    ((TAU * radius / resolution).ceil() as u32).max(3)
}

fn check_resolution(resolution: f32) -> Result<(), String> {
    if !(resolution.is_finite() && resolution > 0.0) {
        return Err(format!("circle resolution must be positive and finite, got {resolution}"));
    }
    Ok(())
}

/// Circle approximated by a regular polygon whose side count follows from
/// its circumference and `resolution`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CircleShape {
    pub center: Vertex,
    pub resolution: f32,
    pub radius: f32,
    pub uv_radius: f32,
    pub uv_rotation: f32,
}

impl CircleShape {
    pub fn sides(&self) -> u32 {
        auto_sides(self.radius, self.resolution)
    }

    pub fn to_polygon(&self) -> PolygonShape {
        PolygonShape {
            center: self.center,
            sides: self.sides(),
            radius: self.radius,
            rotation: 0.0,
            uv_radius: self.uv_radius,
            uv_rotation: self.uv_rotation,
        }
    }
}

impl Shape for CircleShape {
    const ADD_OP: &'static str = "add_circle";
    const UPDATE_OP: &'static str = "update_circle";

    fn validate(&self) -> Result<(), String> {
        check_resolution(self.resolution)?;
        self.to_polygon().validate()
    }

    fn dims(&self) -> ShapeDims {
        self.to_polygon().dims()
    }

    fn prototype(&self) -> ShapePrototype {
        self.to_polygon().prototype()
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        self.to_polygon().vertices(normal)
    }
}

/// Annulus whose side count is derived from the outer circumference.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CircleRingShape {
    pub center: Vertex,
    pub resolution: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub uv_inner_radius: f32,
    pub uv_outer_radius: f32,
    pub uv_rotation: f32,
}

impl CircleRingShape {
    pub fn sides(&self) -> u32 {
        auto_sides(self.outer_radius, self.resolution)
    }

    pub fn to_ring(&self) -> PolygonRingShape {
        PolygonRingShape {
            center: self.center,
            sides: self.sides(),
            inner_radius: self.inner_radius,
            outer_radius: self.outer_radius,
            rotation: 0.0,
            uv_inner_radius: self.uv_inner_radius,
            uv_outer_radius: self.uv_outer_radius,
            uv_rotation: self.uv_rotation,
        }
    }
}

impl Shape for CircleRingShape {
    const ADD_OP: &'static str = "add_circle_ring";
    const UPDATE_OP: &'static str = "update_circle_ring";

    fn validate(&self) -> Result<(), String> {
        check_resolution(self.resolution)?;
        self.to_ring().validate()
    }

    fn dims(&self) -> ShapeDims {
        self.to_ring().dims()
    }

    fn prototype(&self) -> ShapePrototype {
        self.to_ring().prototype()
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        self.to_ring().vertices(normal)
    }
}
