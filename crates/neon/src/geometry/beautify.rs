//! Edge-flip beautify for triangulated fills.

use std::collections::HashMap;

use glam::Vec3;

use super::mesh::{Face, Mesh};

/// Default pass cap used by the glyph mesher
pub const DEFAULT_PASSES: usize = 8;

const COPLANAR_COS: f32 = 0.999;
const MIN_GAIN: f32 = 1e-4;

/// Smallest interior angle of a triangle in radians (0 for degenerate ones)
fn min_angle(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let corner = |p: Vec3, q: Vec3, r: Vec3| {
        let u = (q - p).normalize_or_zero();
        let v = (r - p).normalize_or_zero();
        if u == Vec3::ZERO || v == Vec3::ZERO {
            0.0
        } else {
            u.dot(v).clamp(-1.0, 1.0).acos()
        }
    };
    corner(a, b, c).min(corner(b, c, a)).min(corner(c, a, b))
}

fn third_vertex(face: &Face, a: u32, b: u32) -> Option<u32> {
    face.vertices.iter().copied().find(|&v| v != a && v != b)
}

/// Flip shared diagonals of coplanar triangle pairs where that raises the
/// smallest angle. Only triangles with the same material are paired.
/// Returns the number of flips performed.
pub fn beautify_fill(mesh: &mut Mesh, max_passes: usize) -> usize {
    let mut total = 0;

    for _ in 0..max_passes {
        // Directed edge -> owning triangle
        let mut edges: HashMap<(u32, u32), usize> = HashMap::new();
        for (fi, face) in mesh.faces.iter().enumerate() {
            if face.vertices.len() == 3 {
                for edge in face.edges() {
                    edges.insert(edge, fi);
                }
            }
        }

        let mut locked = vec![false; mesh.faces.len()];
        let mut flips = 0;

        for f in 0..mesh.faces.len() {
            if locked[f] || mesh.faces[f].vertices.len() != 3 {
                continue;
            }
            let tri = mesh.faces[f].clone();
            for (a, b) in tri.edges() {
                let Some(&g) = edges.get(&(b, a)) else { continue };
                if g == f || locked[g] || mesh.faces[g].material_index != tri.material_index {
                    continue;
                }
                // Opposite diagonal already exists elsewhere
                let (Some(c), Some(d)) = (third_vertex(&tri, a, b), third_vertex(&mesh.faces[g], a, b))
                else {
                    continue;
                };
                if edges.contains_key(&(c, d)) || edges.contains_key(&(d, c)) {
                    continue;
                }

                let p = |i: u32| mesh.positions[i as usize];
                let n1 = mesh.face_normal(&tri);
                let n2 = mesh.face_normal(&mesh.faces[g]);
                if n1.dot(n2) < COPLANAR_COS {
                    continue;
                }

                let left = Face { vertices: vec![a, d, c], material_index: tri.material_index };
                let right = Face { vertices: vec![d, b, c], material_index: tri.material_index };
                // Non-convex quads fold over
                if mesh.face_area_vector(&left).dot(n1) <= 0.0
                    || mesh.face_area_vector(&right).dot(n1) <= 0.0
                {
                    continue;
                }

                let before = min_angle(p(a), p(b), p(c)).min(min_angle(p(b), p(a), p(d)));
                let after = min_angle(p(a), p(d), p(c)).min(min_angle(p(d), p(b), p(c)));
                if after <= before + MIN_GAIN {
                    continue;
                }

                mesh.faces[f] = left;
                mesh.faces[g] = right;
                locked[f] = true;
                locked[g] = true;
                flips += 1;
                break;
            }
        }

        total += flips;
        if flips == 0 {
            break;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two triangles sharing the long diagonal of a flat, wide quad
    fn sliver_pair() -> Mesh {
        Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(4.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(2.0, -0.2, 0.0),
            ],
            faces: vec![Face::new(vec![0, 4, 2]), Face::new(vec![4, 1, 2]), Face::new(vec![0, 2, 3])],
        }
    }

    #[test]
    fn test_flip_improves_min_angle() {
        let mut m = Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, -0.1, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(1.0, 0.1, 0.0),
            ],
            // Long diagonal 0-2 makes two slivers
            faces: vec![Face::new(vec![0, 1, 2]), Face::new(vec![0, 2, 3])],
        };
        let flips = beautify_fill(&mut m, DEFAULT_PASSES);
        assert_eq!(flips, 1);
        assert_eq!(m.face_count(), 2);
        for face in &m.faces {
            assert!(face.vertices.contains(&1) && face.vertices.contains(&3));
            assert!(m.face_normal(face).z > 0.99);
        }
    }

    #[test]
    fn test_nonconvex_pair_untouched() {
        let mut m = Mesh {
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.2, 0.2, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![Face::new(vec![0, 1, 2]), Face::new(vec![0, 2, 3])],
        };
        let before = m.clone();
        assert_eq!(beautify_fill(&mut m, DEFAULT_PASSES), 0);
        assert_eq!(m, before);
    }

    #[test]
    fn test_keeps_area_and_orientation() {
        let mut m = sliver_pair();
        let area_before: f32 = m.faces.iter().map(|f| m.face_area_vector(f).z).sum();
        beautify_fill(&mut m, DEFAULT_PASSES);
        let area_after: f32 = m.faces.iter().map(|f| m.face_area_vector(f).z).sum();
        assert!((area_before - area_after).abs() < 1e-4);
        assert!(m.faces.iter().all(|f| m.face_normal(f).z > 0.99));
    }

    #[test]
    fn test_quads_ignored() {
        let mut m = Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            faces: vec![Face::new(vec![0, 1, 2, 3])],
        };
        assert_eq!(beautify_fill(&mut m, DEFAULT_PASSES), 0);
    }
}
