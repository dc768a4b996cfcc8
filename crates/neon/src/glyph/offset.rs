//! Rim offset of glyph contours

use kurbo::{Point, Vec2};

/// Miter length cap, as a multiple of the offset distance
pub const MITER_LIMIT: f64 = 4.0;

/// Signed area of a closed contour (positive when counter-clockwise)
pub fn signed_area(contour: &[Point]) -> f64 {
    let n = contour.len();
    (0..n)
        .map(|i| {
            let (a, b) = (contour[i], contour[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

/// Whether the filled region lies left of the travel direction, judged by the
/// largest contour (outer contours dominate holes)
pub fn fill_is_left(contours: &[Vec<Point>]) -> bool {
    contours
        .iter()
        .map(|c| signed_area(c))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()))
        .map_or(true, |area| area >= 0.0)
}

fn right_normal(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let len = d.hypot();
    (len > 1e-12).then(|| Vec2::new(d.y / len, -d.x / len))
}

/// Offset one closed contour by `distance` to the right of its travel
/// direction (negative moves left), with mitred corners.
pub fn offset_contour(contour: &[Point], distance: f64) -> Vec<Point> {
    let points: Vec<Point> = contour
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            let next = contour[(i + 1) % contour.len()];
            (next - **p).hypot() > 1e-12
        })
        .map(|(_, p)| *p)
        .collect();
    let n = points.len();
    if n < 3 || distance == 0.0 {
        return points;
    }

    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let (Some(n1), Some(n2)) = (right_normal(prev, cur), right_normal(cur, next)) else {
                return cur;
            };
            let bisector = n1 + n2;
            let len = bisector.hypot();
            if len < 1e-9 {
                // Hairpin: push straight out along the incoming edge normal
                return cur + n1 * distance;
            }
            let miter = bisector / len;
            let scale = (1.0 / miter.dot(n1)).min(MITER_LIMIT);
            cur + miter * (distance * scale)
        })
        .collect()
}

/// Grow every contour of a glyph away from its fill by `distance`
pub fn offset_outline(contours: &[Vec<Point>], distance: f64) -> Vec<Vec<Point>> {
    let signed = if fill_is_left(contours) { distance } else { -distance };
    contours.iter().map(|c| offset_contour(c, signed)).collect()
}
