//! Primitive mesh constructors: cube, swept tubes and extruded walls.

use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};

use super::mesh::Mesh;

/// Axis-aligned box centered on the origin with shared corner vertices.
/// `cube(Vec3::ONE)` matches the host's default 2-unit cube.
pub fn cube(half_extents: Vec3) -> Mesh {
    let mut mesh = Mesh::new();
    // Vertex index bits: x = 1, y = 2, z = 4
    for i in 0..8u32 {
        let sign = |bit: u32| if i & bit != 0 { 1.0 } else { -1.0 };
        mesh.add_vertex(Vec3::new(sign(1), sign(2), sign(4)) * half_extents);
    }
    mesh.add_face(vec![0, 4, 6, 2]); // -X
    mesh.add_face(vec![1, 3, 7, 5]); // +X
    mesh.add_face(vec![0, 1, 5, 4]); // -Y
    mesh.add_face(vec![2, 6, 7, 3]); // +Y
    mesh.add_face(vec![0, 2, 3, 1]); // -Z
    mesh.add_face(vec![4, 5, 7, 6]); // +Z
    mesh
}

/// Points around a tube cross-section for a given bevel resolution
pub fn ring_segments(resolution: u32) -> usize {
    2 * (resolution as usize + 2)
}

fn dedup_path(path: &[Vec3], closed: bool) -> Vec<Vec3> {
    let mut points: Vec<Vec3> = Vec::with_capacity(path.len());
    for &p in path {
        if points.last().map_or(true, |q| q.distance_squared(p) > 1e-12) {
            points.push(p);
        }
    }
    if closed && points.len() > 1 && points[0].distance_squared(points[points.len() - 1]) <= 1e-12 {
        points.pop();
    }
    points
}

fn any_perpendicular(t: Vec3) -> Vec3 {
    let axis = if t.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    t.cross(axis).normalize()
}

/// Sweep a circular cross-section along `path`.
///
/// Closed paths produce a seamless torus-like loop; open paths get a flat
/// cap at each end. Frames are parallel-transported; planar closed loops in
/// the XY plane start from the Z axis so the seam lines up.
pub fn sweep_tube(path: &[Vec3], radius: f32, resolution: u32, closed: bool) -> Mesh {
    let points = dedup_path(path, closed);
    let n = points.len();
    let mut mesh = Mesh::new();
    if n < 2 || (closed && n < 3) || radius <= 0.0 {
        return mesh;
    }

    let tangents: Vec<Vec3> = (0..n)
        .map(|i| {
            let (prev, next) = if closed {
                (points[(i + n - 1) % n], points[(i + 1) % n])
            } else {
                (points[i.saturating_sub(1)], points[(i + 1).min(n - 1)])
            };
            (next - prev).normalize_or_zero()
        })
        .collect();

    let first_normal = if closed && tangents.iter().all(|t| t.z.abs() < 1e-4) {
        Vec3::Z
    } else {
        any_perpendicular(tangents[0])
    };

    let segments = ring_segments(resolution);
    let mut normal = first_normal;
    for i in 0..n {
        if i > 0 && tangents[i - 1] != Vec3::ZERO && tangents[i] != Vec3::ZERO {
            normal = (Quat::from_rotation_arc(tangents[i - 1], tangents[i]) * normal).normalize();
        }
        let t = tangents[i];
        // Re-orthogonalize against drift
        let normal_i = (normal - t * normal.dot(t)).normalize_or_zero();
        let binormal = t.cross(normal_i);
        for j in 0..segments {
            let theta = TAU * j as f32 / segments as f32;
            mesh.add_vertex(points[i] + (normal_i * theta.cos() + binormal * theta.sin()) * radius);
        }
    }

    let ring = |i: usize, j: usize| (i * segments + j % segments) as u32;
    let spans = if closed { n } else { n - 1 };
    for i in 0..spans {
        let next = (i + 1) % n;
        for j in 0..segments {
            mesh.add_face(vec![ring(i, j), ring(i, j + 1), ring(next, j + 1), ring(next, j)]);
        }
    }

    if !closed {
        let mut start: Vec<u32> = (0..segments).map(|j| ring(0, j)).collect();
        start.reverse();
        mesh.add_face(start);
        mesh.add_face((0..segments).map(|j| ring(n - 1, j)).collect());
    }

    mesh
}

/// Signed area of a closed 2D polygon (positive when counter-clockwise)
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

/// Side walls of a 2D contour extruded from z = -half_depth to z = +half_depth.
/// `fill_left` tells which side of the travel direction is solid; walls face away from it.
pub fn extrude_walls(contour: &[Vec2], half_depth: f32, fill_left: bool) -> Mesh {
    let mut mesh = Mesh::new();
    let n = contour.len();
    if n < 2 {
        return mesh;
    }
    for p in contour {
        mesh.add_vertex(p.extend(-half_depth));
        mesh.add_vertex(p.extend(half_depth));
    }
    for i in 0..n {
        let j = (i + 1) % n;
        let (lo_i, hi_i) = (2 * i as u32, 2 * i as u32 + 1);
        let (lo_j, hi_j) = (2 * j as u32, 2 * j as u32 + 1);
        let mut quad = vec![lo_i, lo_j, hi_j, hi_i];
        if !fill_left {
            quad.reverse();
        }
        mesh.add_face(quad);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh, center: Vec3) {
        for face in &mesh.faces {
            let n = mesh.face_normal(face);
            let c = mesh.face_center(face);
            assert!(n.dot(c - center) > 0.0, "face {:?} points inward", face.vertices);
        }
    }

    #[test]
    fn test_cube_topology() {
        let m = cube(Vec3::new(2.0, 1.0, 0.5));
        assert_eq!(m.vertex_count(), 8);
        assert_eq!(m.face_count(), 6);
        assert!(m.boundary_edges().is_empty());
        assert_outward(&m, Vec3::ZERO);
        let dims = m.dimensions();
        assert!((dims - Vec3::new(4.0, 2.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_open_tube_capped_and_outward() {
        let path = [Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 2.0)];
        let m = sweep_tube(&path, 0.1, 3, false);
        let seg = ring_segments(3);
        assert_eq!(seg, 10);
        assert_eq!(m.vertex_count(), 3 * seg);
        assert_eq!(m.face_count(), 2 * seg + 2);
        assert!(m.boundary_edges().is_empty());

        // Side faces point away from the axis, caps along it
        for face in &m.faces[..2 * seg] {
            let n = m.face_normal(face);
            let c = m.face_center(face);
            assert!(n.dot(Vec3::new(c.x, c.y, 0.0)) > 0.0);
        }
        assert!(m.face_normal(&m.faces[2 * seg]).z < -0.99);
        assert!(m.face_normal(&m.faces[2 * seg + 1]).z > 0.99);
    }

    #[test]
    fn test_closed_tube_has_no_boundary() {
        let square = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ];
        let m = sweep_tube(&square, 0.05, 0, true);
        assert_eq!(m.vertex_count(), 4 * ring_segments(0));
        assert_eq!(m.face_count(), 4 * ring_segments(0));
        assert!(m.boundary_edges().is_empty());
        let dims = m.dimensions();
        assert!((dims.z - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_paths_empty() {
        assert!(sweep_tube(&[Vec3::ZERO], 0.1, 3, false).is_empty());
        assert!(sweep_tube(&[Vec3::ZERO, Vec3::ZERO], 0.1, 3, false).is_empty());
        assert!(sweep_tube(&[Vec3::ZERO, Vec3::X], 0.1, 3, true).is_empty());
    }

    #[test]
    fn test_signed_area() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-6);
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_walls_face_away_from_fill() {
        let ccw = [Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0), Vec2::new(0.0, 2.0)];
        let walls = extrude_walls(&ccw, 0.1, true);
        assert_eq!(walls.face_count(), 4);
        assert_outward(&walls, Vec3::new(1.0, 1.0, 0.0));

        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        let walls = extrude_walls(&cw, 0.1, false);
        assert_outward(&walls, Vec3::new(1.0, 1.0, 0.0));
    }
}
