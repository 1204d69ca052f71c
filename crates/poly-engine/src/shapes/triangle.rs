use crate::coords::Vec3;
use crate::graphics::{ShapeDims, ShapePrototype};
use crate::vertex::Vertex;

use super::Shape;

/// Three caller-supplied vertices written as-is, normals included.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TriangleShape {
    pub vertices: [Vertex; 3],
}

impl Shape for TriangleShape {
    const ADD_OP: &'static str = "add_triangle";
    const UPDATE_OP: &'static str = "update_triangle";

    fn dims(&self) -> ShapeDims {
        ShapeDims::new(3, 3)
    }

    fn prototype(&self) -> ShapePrototype {
        ShapePrototype::new(3, vec![0, 1, 2])
    }

    fn vertices(&self, _normal: Vec3) -> Vec<Vertex> {
        self.vertices.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::super::ShapeBatch;
    use super::super::test_support::*;
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn vertices_pass_through_with_their_normals() {
        let (mut backend, batch) = backend();
        let tilted = Vec3::new(0.0, 1.0, 0.0);
        let vertices = [
            Vertex { norm: tilted, ..Vertex::at(Vec2::new(0.0, 0.0)) },
            Vertex { norm: tilted, ..Vertex::at(Vec2::new(1.0, 0.0)) },
            Vertex { norm: tilted, ..Vertex::at(Vec2::new(0.0, 1.0)) },
        ];

        let shape = backend.add_triangle(batch, vertices).unwrap();

        assert_eq!(local_indices(&backend, &shape), vec![0, 1, 2]);
        assert_eq!(pos(&backend, &shape, 1), [1.0, 0.0, 0.0]);
        assert_eq!(normal(&backend, &shape, 2), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn update_rewrites_in_place() {
        let (mut backend, batch) = backend();
        let shape = backend.add_triangle(batch, [Vertex::default(); 3]).unwrap();

        let moved = [Vertex::at(Vec2::new(5.0, 5.0)); 3];
        backend.update_triangle(&shape, moved).unwrap();

        assert_eq!(pos(&backend, &shape, 0), [5.0, 5.0, 0.0]);
        assert_eq!(backend.batch(batch).unwrap().live_shapes(), 1);
    }
}
