//! Mesh kernel: indexed polygon meshes, primitives, curves and modifiers.

pub mod beautify;
pub mod bezier;
pub mod mesh;
pub mod modifiers;
pub mod primitives;

pub use beautify::beautify_fill;
pub use bezier::{BezierPoint, Curve};
pub use mesh::{going_down, going_side, going_up, normal_in_direction, Aabb, Face, Mesh, MeshData};
pub use modifiers::{apply_stack, Modifier};
