//! TrueType / OpenType glyph outlines via ttf-parser.

use std::path::Path;

use kurbo::{BezPath, PathEl, Point};
use ttf_parser::{Face, OutlineBuilder};

use crate::error::{NeonError, NeonResult};

use super::source::{GlyphOutline, GlyphSource};

/// Collects font outline commands into a kurbo path in scene units
struct PathSink {
    path: BezPath,
    scale: f64,
}

impl PathSink {
    fn pt(&self, x: f32, y: f32) -> Point {
        Point::new(x as f64 * self.scale, y as f64 * self.scale)
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.pt(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (c, p) = (self.pt(x1, y1), self.pt(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (c1, c2, p) = (self.pt(x1, y1), self.pt(x2, y2), self.pt(x, y));
        self.path.curve_to(c1, c2, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

fn finish(current: &mut Vec<Point>, contours: &mut Vec<Vec<Point>>) {
    let closed = match (current.first(), current.last()) {
        (Some(first), Some(last)) => current.len() > 1 && first.distance(*last) < 1e-9,
        _ => false,
    };
    if closed {
        current.pop();
    }
    if current.len() >= 3 {
        contours.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Flatten a path into closed polylines, dropping repeated closing points
pub fn flatten_contours(path: &BezPath, tolerance: f64) -> Vec<Vec<Point>> {
    let mut contours = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    kurbo::flatten(path.iter(), tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            finish(&mut current, &mut contours);
            current.push(p);
        }
        PathEl::LineTo(p) => {
            if current.last().map_or(true, |q| q.distance(p) > 1e-9) {
                current.push(p);
            }
        }
        PathEl::ClosePath => finish(&mut current, &mut contours),
        // flatten only emits lines
        PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => current.push(p),
    });
    finish(&mut current, &mut contours);
    contours
}

/// Glyphs from a font file
pub struct FontGlyphSource {
    data: Vec<u8>,
    name: String,
    size: f64,
    tolerance: f64,
}

impl FontGlyphSource {
    /// Parse font bytes; `size` is the em size in scene units
    pub fn from_bytes(data: Vec<u8>, name: impl Into<String>, size: f32, tolerance: f64) -> NeonResult<Self> {
        let face = Face::parse(&data, 0).map_err(|e| NeonError::font_load(e.to_string()))?;
        if face.units_per_em() == 0 {
            return Err(NeonError::font_load("font has zero units per em"));
        }
        Ok(Self {
            data,
            name: name.into(),
            size: size as f64,
            tolerance,
        })
    }

    pub fn from_file(path: &Path, size: f32, tolerance: f64) -> NeonResult<Self> {
        let data = std::fs::read(path)
            .map_err(|e| NeonError::font_load(format!("{}: {e}", path.display())))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "font".to_string());
        Self::from_bytes(data, name, size, tolerance)
    }

    fn face(&self) -> NeonResult<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| NeonError::font_load(e.to_string()))
    }
}

impl GlyphSource for FontGlyphSource {
    fn outline(&self, ch: char) -> NeonResult<GlyphOutline> {
        let face = self.face()?;
        let gid = face.glyph_index(ch).ok_or(NeonError::MissingGlyph(ch))?;
        let scale = self.size / face.units_per_em() as f64;

        let mut sink = PathSink {
            path: BezPath::new(),
            scale,
        };
        // Blank glyphs such as space have no outline
        let contours = match face.outline_glyph(gid, &mut sink) {
            Some(_) => flatten_contours(&sink.path, self.tolerance),
            None => Vec::new(),
        };
        let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f64 * scale;

        Ok(GlyphOutline { contours, advance })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
