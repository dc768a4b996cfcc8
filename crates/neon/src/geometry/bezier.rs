//! Bezier curve data for cable objects.

use glam::Vec3;

use super::mesh::Mesh;
use super::primitives::sweep_tube;

/// One control point with its two handles, all in the curve's local space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BezierPoint {
    pub co: Vec3,
    pub handle_left: Vec3,
    pub handle_right: Vec3,
}

impl BezierPoint {
    /// Point with both handles collapsed onto it
    pub fn new(co: Vec3) -> Self {
        Self {
            co,
            handle_left: co,
            handle_right: co,
        }
    }
}

/// Single-spline Bezier curve with a round bevel cross-section
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub points: Vec<BezierPoint>,
    /// Cross-section radius; zero renders nothing
    pub bevel_depth: f32,
    pub bevel_resolution: u32,
    /// Samples per segment
    pub resolution_u: u32,
}

impl Curve {
    pub fn new(points: Vec<BezierPoint>) -> Self {
        Self {
            points,
            bevel_depth: 0.0,
            bevel_resolution: 0,
            resolution_u: 12,
        }
    }

    /// Sample the spline into a polyline, endpoints included
    pub fn sample(&self) -> Vec<Vec3> {
        let steps = self.resolution_u.max(1);
        let mut out = Vec::new();
        for pair in self.points.windows(2) {
            let (p0, p1, p2, p3) = (pair[0].co, pair[0].handle_right, pair[1].handle_left, pair[1].co);
            let start = if out.is_empty() { 0 } else { 1 };
            for s in start..=steps {
                out.push(cubic_point(p0, p1, p2, p3, s as f32 / steps as f32));
            }
        }
        if out.is_empty() {
            out.extend(self.points.first().map(|p| p.co));
        }
        out
    }

    /// Swept tube geometry of the beveled curve
    pub fn to_mesh(&self) -> Mesh {
        if self.bevel_depth <= 0.0 {
            return Mesh::new();
        }
        sweep_tube(&self.sample(), self.bevel_depth, self.bevel_resolution, false)
    }
}

/// Point on a cubic Bezier segment at parameter `t`
pub fn cubic_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_endpoints() {
        let (a, b, c, d) = (Vec3::ZERO, Vec3::Y, Vec3::new(1.0, 1.0, 0.0), Vec3::X);
        assert_eq!(cubic_point(a, b, c, d, 0.0), a);
        assert!((cubic_point(a, b, c, d, 1.0) - d).length() < 1e-6);
        assert!((cubic_point(a, b, c, d, 0.5) - Vec3::new(0.5, 0.75, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sample_count_and_sag() {
        let mut start = BezierPoint::new(Vec3::new(-1.0, 0.0, 0.0));
        start.handle_right.z -= 0.5;
        let curve = Curve {
            resolution_u: 12,
            ..Curve::new(vec![start, BezierPoint::new(Vec3::new(1.0, 0.0, 0.0))])
        };
        let pts = curve.sample();
        assert_eq!(pts.len(), 13);
        assert_eq!(pts[0], Vec3::new(-1.0, 0.0, 0.0));
        assert!((pts[12] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
        // Sag is biased toward the first point
        let lowest = pts.iter().enumerate().min_by(|a, b| a.1.z.total_cmp(&b.1.z)).map(|(i, _)| i);
        assert!(pts.iter().all(|p| p.z <= 1e-6));
        assert!(lowest.unwrap() < 6);
    }

    #[test]
    fn test_unbeveled_curve_has_no_mesh() {
        let curve = Curve::new(vec![BezierPoint::new(Vec3::ZERO), BezierPoint::new(Vec3::X)]);
        assert!(curve.to_mesh().is_empty());
        let beveled = Curve {
            bevel_depth: 0.02,
            bevel_resolution: 3,
            ..curve
        };
        assert!(!beveled.to_mesh().is_empty());
    }
}
