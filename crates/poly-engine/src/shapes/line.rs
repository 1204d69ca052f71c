use crate::coords::{Line, Vec2, Vec3};
use crate::graphics::{ShapeDims, ShapePrototype};
use crate::vertex::Vertex;

use super::Shape;

/// Thick segment between the positions (and UVs) of two vertices.
///
/// Each endpoint is offset by ± half the thickness along the segment normal;
/// UVs are offset the same way by ± half `uv_thickness`. Color and extra data
/// come from the endpoint they belong to.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LineShape {
    pub a: Vertex,
    pub b: Vertex,
    pub thickness: f32,
    pub uv_thickness: f32,
}

impl Shape for LineShape {
    const ADD_OP: &'static str = "add_line";
    const UPDATE_OP: &'static str = "update_line";

    fn dims(&self) -> ShapeDims {
        ShapeDims::new(4, 6)
    }

    fn prototype(&self) -> ShapePrototype {
        // a+, a-, b+, b-
        ShapePrototype::new(4, vec![0, 1, 3, 0, 3, 2])
    }

    fn vertices(&self, normal: Vec3) -> Vec<Vertex> {
        let line = Line::new(self.a.pos.truncate(), self.b.pos.truncate());
        let uv_line = Line::new(self.a.uv, self.b.uv);
        let (pos_plus, pos_minus) = line.perp_lines(self.thickness / 2.0);
        let (uv_plus, uv_minus) = uv_line.perp_lines(self.uv_thickness / 2.0);

        let end = |base: &Vertex, pos: Vec2, uv: Vec2| Vertex {
            pos: pos.extend(0.0),
            norm: normal,
            uv,
            ..*base
        };

        vec![
            end(&self.a, pos_plus.a, uv_plus.a),
            end(&self.a, pos_minus.a, uv_minus.a),
            end(&self.b, pos_plus.b, uv_plus.b),
            end(&self.b, pos_minus.b, uv_minus.b),
        ]
    }
}
