//! Polygon fill via lyon

use glam::Vec2;
use kurbo::Point;
use lyon_tessellation::math::point;
use lyon_tessellation::path::Path;
use lyon_tessellation::{BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers};

use crate::error::{NeonError, NeonResult};

/// Triangulated planar region
#[derive(Debug, Clone, Default)]
pub struct Fill {
    pub vertices: Vec<Vec2>,
    /// Counter-clockwise triangles
    pub triangles: Vec<[u32; 3]>,
}

/// Fill the region enclosed by `contours` using the non-zero rule
pub fn fill_contours(contours: &[Vec<Point>], tolerance: f32) -> NeonResult<Fill> {
    let mut builder = Path::builder();
    let mut any = false;
    for contour in contours.iter().filter(|c| c.len() >= 3) {
        builder.begin(point(contour[0].x as f32, contour[0].y as f32));
        for p in &contour[1..] {
            builder.line_to(point(p.x as f32, p.y as f32));
        }
        builder.end(true);
        any = true;
    }
    if !any {
        return Ok(Fill::default());
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let options = FillOptions::tolerance(tolerance).with_fill_rule(FillRule::NonZero);
    FillTessellator::new()
        .tessellate_path(
            &path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                let p = v.position();
                Vec2::new(p.x, p.y)
            }),
        )
        .map_err(|e| NeonError::tessellation(format!("{e:?}")))?;

    let vertices = buffers.vertices;
    let mut triangles: Vec<[u32; 3]> = buffers
        .indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]);
            if (b - a).perp_dot(c - a) < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect();
    remove_slivers(&vertices, &mut triangles);

    Ok(Fill { vertices, triangles })
}

/// Relative area below which a triangle counts as collinear
const SLIVER_EPSILON: f32 = 1e-6;

fn is_sliver(vertices: &[Vec2], t: &[u32; 3]) -> bool {
    let (a, b, c) = (vertices[t[0] as usize], vertices[t[1] as usize], vertices[t[2] as usize]);
    let longest = (b - a).length_squared().max((c - b).length_squared()).max((a - c).length_squared());
    (b - a).perp_dot(c - a).abs() <= SLIVER_EPSILON * longest.max(f32::MIN_POSITIVE)
}

/// Replace zero-area triangles. A sliver `(p, m, q)` with `m` on the segment
/// `pq` is dropped and the triangle across `pq` is split at `m`, so the fill
/// keeps its shared edges.
pub fn remove_slivers(vertices: &[Vec2], triangles: &mut Vec<[u32; 3]>) {
    let mut budget = triangles.len();
    while let Some(i) = triangles.iter().position(|t| is_sliver(vertices, t)) {
        let sliver = triangles.swap_remove(i);
        if budget == 0 {
            continue;
        }
        budget -= 1;

        // The middle vertex is opposite the longest edge
        let length = |k: usize| {
            vertices[sliver[(k + 1) % 3] as usize].distance_squared(vertices[sliver[(k + 2) % 3] as usize])
        };
        let mid = (0..3).max_by(|&x, &y| length(x).total_cmp(&length(y))).unwrap_or(0);
        let m = sliver[mid];
        let (p, q) = (sliver[(mid + 1) % 3], sliver[(mid + 2) % 3]);
        if vertices[p as usize].distance_squared(vertices[q as usize]) <= f32::MIN_POSITIVE {
            continue;
        }

        let across = triangles.iter().enumerate().find_map(|(j, t)| {
            (0..3)
                .find(|&k| {
                    let (u, v) = (t[k], t[(k + 1) % 3]);
                    (u == p && v == q) || (u == q && v == p)
                })
                .map(|k| (j, k))
        });
        if let Some((j, k)) = across {
            let t = triangles[j];
            let (u, v, w) = (t[k], t[(k + 1) % 3], t[(k + 2) % 3]);
            triangles[j] = [u, m, w];
            triangles.push([m, v, w]);
        }
    }
}

impl Fill {
    pub fn area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|t| {
                let (a, b, c) = (
                    self.vertices[t[0] as usize],
                    self.vertices[t[1] as usize],
                    self.vertices[t[2] as usize],
                );
                0.5 * (b - a).perp_dot(c - a)
            })
            .sum()
    }
}
