//! Geometry and color value types shared by the tessellator and the backends.
//!
//! Shape space:
//! - +X right, +Y up (backends report their forward axis separately)
//! - angles in radians
//!
//! UV space uses the same types; UV quads and lines are tessellated with the
//! same rules as their positional counterparts.

mod color;
mod line;
mod quad;
mod rect;
mod vec2;
mod vec3;

pub use color::ColorRgba;
pub use line::Line;
pub use quad::Quad;
pub use rect::Rect;
pub use vec2::Vec2;
pub use vec3::Vec3;
