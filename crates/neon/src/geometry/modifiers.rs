//! Non-destructive modifiers evaluated over an object's base mesh.

use glam::Vec3;

use super::mesh::{Face, Mesh};
use crate::error::{NeonError, NeonResult};

const WELD_EPSILON: f32 = 1e-5;

/// Modifier stack entry
#[derive(Clone, Debug, PartialEq)]
pub enum Modifier {
    /// Round the edges of a box-aligned mesh
    Bevel { width: f32, segments: u32 },
    /// Give a surface wall thickness; negative shells inward
    Solidify { thickness: f32 },
}

impl Modifier {
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Bevel { .. } => "Bevel",
            Modifier::Solidify { .. } => "Solidify",
        }
    }

    pub fn apply(&self, mesh: &Mesh) -> NeonResult<Mesh> {
        match *self {
            Modifier::Bevel { width, segments } => bevel_box(mesh, width, segments),
            Modifier::Solidify { thickness } => Ok(solidify(mesh, thickness)),
        }
    }
}

/// Evaluate a modifier stack in order
pub fn apply_stack(mesh: &Mesh, modifiers: &[Modifier]) -> NeonResult<Mesh> {
    let mut result = mesh.clone();
    for modifier in modifiers {
        result = modifier.apply(&result)?;
        tracing::debug!(
            "{} modifier -> {} verts, {} faces",
            modifier.name(),
            result.vertex_count(),
            result.face_count()
        );
    }
    Ok(result)
}

/// Axis index and side (false = min, true = max) of the bounds plane a face lies on
fn bounds_plane(mesh: &Mesh, face: &Face, min: Vec3, max: Vec3) -> Option<(usize, bool)> {
    let normal = mesh.face_normal(face);
    let axis = (0..3).max_by(|&a, &b| normal[a].abs().total_cmp(&normal[b].abs()))?;
    if normal[axis].abs() < 0.999 {
        return None;
    }
    let on_max = normal[axis] > 0.0;
    let target = if on_max { max[axis] } else { min[axis] };
    let tol = 1e-4 * (max - min).max_element().max(1.0);
    face.vertices
        .iter()
        .all(|&v| (mesh.positions[v as usize][axis] - target).abs() < tol)
        .then_some((axis, on_max))
}

/// Grid coordinates across [lo, hi] with `steps` subdivisions in each rounded band
fn band_coords(lo: f32, hi: f32, radius: f32, steps: u32) -> Vec<f32> {
    let mut coords = Vec::new();
    for s in 0..=steps {
        coords.push(lo + radius * s as f32 / steps as f32);
    }
    for s in 0..=steps {
        coords.push(hi - radius + radius * s as f32 / steps as f32);
    }
    coords.dedup_by(|a, b| (*a - *b).abs() < 1e-7);
    coords
}

/// Round every edge and corner of a mesh whose faces all lie on its bounding box.
///
/// Each face is resampled as a grid and projected onto the rounded box
/// (inner box shrunk by `width`, swept by a sphere of radius `width`).
/// Faces missing from the input leave an open, rounded lip.
pub fn bevel_box(mesh: &Mesh, width: f32, segments: u32) -> NeonResult<Mesh> {
    let Some(bounds) = mesh.bounds() else {
        return Ok(Mesh::new());
    };
    let (min, max) = (bounds.min, bounds.max);
    let radius = width.min(0.5 * bounds.size().min_element()).max(0.0);
    if radius <= 0.0 {
        return Ok(mesh.clone());
    }
    let steps = segments.div_ceil(2).max(1);
    let inner_min = min + Vec3::splat(radius);
    let inner_max = max - Vec3::splat(radius);
    let project = |p: Vec3| {
        let inner = p.clamp(inner_min, inner_max);
        inner + (p - inner).normalize_or_zero() * radius
    };

    let mut out = Mesh::new();
    for face in &mesh.faces {
        let Some((axis, on_max)) = bounds_plane(mesh, face, min, max) else {
            return Err(NeonError::unsupported(format!(
                "bevel expects box-aligned faces, face {:?} is not",
                face.vertices
            )));
        };
        let (u_axis, v_axis) = ((axis + 1) % 3, (axis + 2) % 3);
        let corners: Vec<Vec3> = face.vertices.iter().map(|&v| mesh.positions[v as usize]).collect();
        let lo = corners.iter().fold(Vec3::splat(f32::MAX), |a, p| a.min(*p));
        let hi = corners.iter().fold(Vec3::splat(f32::MIN), |a, p| a.max(*p));
        let us = band_coords(lo[u_axis], hi[u_axis], radius, steps);
        let vs = band_coords(lo[v_axis], hi[v_axis], radius, steps);

        let base = out.vertex_count() as u32;
        for &v in &vs {
            for &u in &us {
                let mut p = Vec3::ZERO;
                p[axis] = if on_max { max[axis] } else { min[axis] };
                p[u_axis] = u;
                p[v_axis] = v;
                out.add_vertex(project(p));
            }
        }

        // u x v is +axis by cyclic order; flip for min-side faces
        let flip = !on_max;
        let row = us.len() as u32;
        for j in 0..(vs.len() as u32 - 1) {
            for i in 0..(row - 1) {
                let a = base + j * row + i;
                let mut quad = vec![a, a + 1, a + 1 + row, a + row];
                if flip {
                    quad.reverse();
                }
                out.faces.push(Face {
                    vertices: quad,
                    material_index: face.material_index,
                });
            }
        }
    }

    out.weld(WELD_EPSILON);
    let positions = &out.positions;
    out.faces.retain(|f| {
        let mut area = Vec3::ZERO;
        let n = f.vertices.len();
        for k in 0..n {
            let p = positions[f.vertices[k] as usize];
            let q = positions[f.vertices[(k + 1) % n] as usize];
            area += p.cross(q);
        }
        area.length() > 1e-10
    });
    out.remove_loose_vertices();
    Ok(out)
}

/// Per-vertex normals as the normalized sum of adjacent face normals
pub fn vertex_normals(mesh: &Mesh) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; mesh.vertex_count()];
    for face in &mesh.faces {
        let n = mesh.face_normal(face);
        for &v in &face.vertices {
            normals[v as usize] += n;
        }
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

/// Shell a surface along its vertex normals and close open edges with rim quads.
pub fn solidify(mesh: &Mesh, thickness: f32) -> Mesh {
    if thickness == 0.0 || mesh.is_empty() {
        return mesh.clone();
    }
    let normals = vertex_normals(mesh);
    let count = mesh.vertex_count() as u32;
    let boundary = mesh.boundary_edges();

    let mut out = mesh.clone();
    for (p, n) in mesh.positions.iter().zip(&normals) {
        out.positions.push(*p + *n * thickness);
    }
    for face in &mesh.faces {
        out.faces.push(Face {
            vertices: face.vertices.iter().map(|&v| v + count).collect(),
            material_index: face.material_index,
        });
    }

    // The copy facing the hollow side is the one that gets reversed
    let inward = thickness < 0.0;
    let flipped = if inward {
        mesh.faces.len()..out.faces.len()
    } else {
        0..mesh.faces.len()
    };
    for face in &mut out.faces[flipped] {
        face.vertices.reverse();
    }

    for (a, b) in boundary {
        let (a2, b2) = (a + count, b + count);
        let quad = if inward { vec![b, a, a2, b2] } else { vec![a, b, b2, a2] };
        out.add_face(quad);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;

    fn open_box() -> Mesh {
        let mut m = cube(Vec3::new(1.0, 0.5, 0.5));
        let removed = m.delete_faces(|mesh, f| mesh.face_normal(f).y < -0.5);
        assert_eq!(removed, 1);
        m
    }

    #[test]
    fn test_bevel_closed_box_stays_closed() {
        let m = bevel_box(&cube(Vec3::ONE), 0.2, 4).unwrap();
        assert!(m.boundary_edges().is_empty());
        assert!((m.dimensions() - Vec3::splat(2.0)).length() < 1e-4);
        // Rounded corner is pulled in from the sharp one
        let far = m.positions.iter().map(|p| p.length()).fold(0.0f32, f32::max);
        assert!(far < 3f32.sqrt() - 0.01);
    }

    #[test]
    fn test_bevel_keeps_orientation() {
        let m = bevel_box(&cube(Vec3::ONE), 0.2, 4).unwrap();
        for face in &m.faces {
            let n = m.face_normal(face);
            assert!(n.dot(m.face_center(face)) > 0.0);
        }
    }

    #[test]
    fn test_bevel_rejects_non_box_faces() {
        let mut m = cube(Vec3::ONE);
        m.positions[7] += Vec3::splat(0.3);
        assert!(matches!(bevel_box(&m, 0.1, 4), Err(NeonError::UnsupportedTopology(_))));
    }

    #[test]
    fn test_bevel_open_box_leaves_rim() {
        let m = bevel_box(&open_box(), 0.1, 8).unwrap();
        assert!(!m.boundary_edges().is_empty());
        assert!(m.faces.iter().all(|f| m.face_normal(f).y > -0.999));
    }

    #[test]
    fn test_solidify_inward_open_box() {
        let base = open_box();
        let rim = base.boundary_edges().len();
        assert_eq!(rim, 4);
        let m = solidify(&base, -0.05);
        assert_eq!(m.vertex_count(), 2 * base.vertex_count());
        assert_eq!(m.face_count(), 2 * base.face_count() + rim);
        assert!(m.boundary_edges().is_empty());
        // Inner shell sits inside the original bounds
        let dims = m.dimensions();
        assert!((dims - base.dimensions()).length() < 1e-5);
    }

    #[test]
    fn test_solidify_outward_grows() {
        let m = solidify(&open_box(), 0.05);
        assert!(m.boundary_edges().is_empty());
        assert!(m.dimensions().x > 2.0);
    }

    #[test]
    fn test_stack_order() {
        let stack = [
            Modifier::Bevel { width: 0.1, segments: 4 },
            Modifier::Solidify { thickness: -0.05 },
        ];
        let m = apply_stack(&open_box(), &stack).unwrap();
        assert!(m.boundary_edges().is_empty());
        assert_eq!(stack[0].name(), "Bevel");
    }
}
