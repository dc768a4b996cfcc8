//! Built-in 5x7 block font.
//!
//! Lets the generator run without a font file. Each lit pixel is a square
//! cell; the cells of a character are traced into closed outlines with the
//! filled side on the left (counter-clockwise outers, clockwise holes).
//! Cells touching only at a corner count as connected.

use std::collections::HashMap;

use kurbo::Point;

use crate::error::{NeonError, NeonResult};

use super::source::{GlyphOutline, GlyphSource};

const COLS: usize = 5;
const ROWS: usize = 7;
/// Pixels per em
const EM_PIXELS: f64 = 8.0;
/// Pen advance in pixels
const ADVANCE_PIXELS: f64 = 6.0;

type Bitmap = [&'static str; ROWS];

fn bitmap(ch: char) -> Option<Bitmap> {
    let rows = match ch {
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'B' => ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        'E' => ["#####", "#....", "#....", "####.", "#....", "#....", "#####"],
        'F' => ["#####", "#....", "#....", "####.", "#....", "#....", "#...."],
        'G' => [".###.", "#...#", "#....", "#.###", "#...#", "#...#", ".####"],
        'H' => ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'I' => [".###.", "..#..", "..#..", "..#..", "..#..", "..#..", ".###."],
        'J' => ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."],
        'K' => ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"],
        'L' => ["#....", "#....", "#....", "#....", "#....", "#....", "#####"],
        'M' => ["#...#", "##.##", "#.#.#", "#.#.#", "#...#", "#...#", "#...#"],
        'N' => ["#...#", "#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#"],
        'O' => [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'P' => ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."],
        'Q' => [".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"],
        'R' => ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"],
        'S' => [".####", "#....", "#....", ".###.", "....#", "....#", "####."],
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'U' => ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."],
        'V' => ["#...#", "#...#", "#...#", "#...#", "#...#", ".#.#.", "..#.."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "#.#.#", ".#.#."],
        'X' => ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"],
        'Y' => ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."],
        'Z' => ["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"],
        '0' => [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => ["#####", "...#.", "..#..", "...#.", "....#", "#...#", ".###."],
        '4' => ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
        '!' => ["..#..", "..#..", "..#..", "..#..", "..#..", ".....", "..#.."],
        '?' => [".###.", "#...#", "....#", "...#.", "..#..", ".....", "..#.."],
        '.' => [".....", ".....", ".....", ".....", ".....", ".##..", ".##.."],
        ',' => [".....", ".....", ".....", ".....", ".##..", "..#..", ".#..."],
        ':' => [".....", ".##..", ".##..", ".....", ".##..", ".##..", "....."],
        '\'' => ["..#..", "..#..", ".#...", ".....", ".....", ".....", "....."],
        '-' => [".....", ".....", ".....", "#####", ".....", ".....", "....."],
        '+' => [".....", "..#..", "..#..", "#####", "..#..", "..#..", "....."],
        '&' => [".##..", "#..#.", "#.#..", ".#...", "#.#.#", "#..#.", ".##.#"],
        ' ' => [".....", ".....", ".....", ".....", ".....", ".....", "....."],
        _ => return None,
    };
    Some(rows)
}

/// Lattice point in pixel units, y up from the baseline
type Corner = (i32, i32);

fn lit(rows: &Bitmap, col: i32, row_from_bottom: i32) -> bool {
    if col < 0 || row_from_bottom < 0 || col >= COLS as i32 || row_from_bottom >= ROWS as i32 {
        return false;
    }
    let row = rows[ROWS - 1 - row_from_bottom as usize];
    row.as_bytes().get(col as usize) == Some(&b'#')
}

/// Directed cell boundary edges with the lit cell on the left
fn boundary_edges(rows: &Bitmap) -> Vec<(Corner, Corner)> {
    let mut edges = Vec::new();
    for y in 0..ROWS as i32 {
        for x in 0..COLS as i32 {
            if !lit(rows, x, y) {
                continue;
            }
            if !lit(rows, x, y - 1) {
                edges.push(((x, y), (x + 1, y)));
            }
            if !lit(rows, x + 1, y) {
                edges.push(((x + 1, y), (x + 1, y + 1)));
            }
            if !lit(rows, x, y + 1) {
                edges.push(((x + 1, y + 1), (x, y + 1)));
            }
            if !lit(rows, x - 1, y) {
                edges.push(((x, y + 1), (x, y)));
            }
        }
    }
    edges
}

fn cross(a: Corner, b: Corner) -> i32 {
    a.0 * b.1 - a.1 * b.0
}

/// Chain edges into loops. Where outlines touch at a corner the sharpest
/// right turn is taken, so diagonal neighbours join one outline.
fn trace_loops(edges: &[(Corner, Corner)]) -> Vec<Vec<Corner>> {
    let mut outgoing: HashMap<Corner, Vec<usize>> = HashMap::new();
    for (i, (from, _)) in edges.iter().enumerate() {
        outgoing.entry(*from).or_default().push(i);
    }
    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut points = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let (from, to) = edges[current];
            points.push(from);
            let dir = (to.0 - from.0, to.1 - from.1);
            // The turn rule pairs each incoming edge with one outgoing edge
            let next = outgoing
                .get(&to)
                .into_iter()
                .flatten()
                .copied()
                .min_by_key(|&e| {
                    let (a, b) = edges[e];
                    cross(dir, (b.0 - a.0, b.1 - a.1))
                });
            match next {
                Some(e) if e != start && !used[e] => current = e,
                _ => break,
            }
        }
        loops.push(simplify(points));
    }
    loops
}

/// Drop points where the outline runs straight on
fn simplify(points: Vec<Corner>) -> Vec<Corner> {
    let n = points.len();
    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            cross((cur.0 - prev.0, cur.1 - prev.1), (next.0 - cur.0, next.1 - cur.1)) != 0
        })
        .map(|i| points[i])
        .collect()
}

/// Block-font glyph source
pub struct BlockGlyphSource {
    pixel: f64,
}

impl BlockGlyphSource {
    /// `size` is the em size in scene units
    pub fn new(size: f32) -> Self {
        Self {
            pixel: size as f64 / EM_PIXELS,
        }
    }

    pub fn supports(ch: char) -> bool {
        bitmap(ch.to_ascii_uppercase()).is_some()
    }
}

impl GlyphSource for BlockGlyphSource {
    fn outline(&self, ch: char) -> NeonResult<GlyphOutline> {
        let rows = bitmap(ch.to_ascii_uppercase()).ok_or(NeonError::MissingGlyph(ch))?;
        let contours = trace_loops(&boundary_edges(&rows))
            .into_iter()
            .map(|l| {
                l.into_iter()
                    .map(|(x, y)| Point::new(x as f64 * self.pixel, y as f64 * self.pixel))
                    .collect()
            })
            .collect();
        Ok(GlyphOutline {
            contours,
            advance: ADVANCE_PIXELS * self.pixel,
        })
    }

    fn name(&self) -> &str {
        "block"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(contour: &[Point]) -> f64 {
        let n = contour.len();
        (0..n)
            .map(|i| {
                let (a, b) = (contour[i], contour[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_l_is_one_ccw_hexagon() {
        let font = BlockGlyphSource::new(8.0);
        let outline = font.outline('L').unwrap();
        assert_eq!(outline.contours.len(), 1);
        assert_eq!(outline.contours[0].len(), 6);
        // 7 pixels of stem plus 4 of foot
        assert!((area(&outline.contours[0]) - 11.0).abs() < 1e-9);
        assert_eq!(outline.advance, 6.0);
    }

    #[test]
    fn test_o_has_hole() {
        let font = BlockGlyphSource::new(8.0);
        let outline = font.outline('O').unwrap();
        assert_eq!(outline.contours.len(), 2);
        let areas: Vec<f64> = outline.contours.iter().map(|c| area(c)).collect();
        assert_eq!(areas.iter().filter(|a| **a > 0.0).count(), 1);
        assert_eq!(areas.iter().filter(|a| **a < 0.0).count(), 1);
    }

    #[test]
    fn test_x_traces_without_holes() {
        let font = BlockGlyphSource::new(8.0);
        // Every loop of X is counter-clockwise: no holes
        let outline = font.outline('X').unwrap();
        assert!(outline.contours.iter().all(|c| area(c) > 0.0));
        let total: f64 = outline.contours.iter().map(|c| area(c)).sum();
        assert!((total - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_space_and_case_folding() {
        let font = BlockGlyphSource::new(2.0);
        let space = font.outline(' ').unwrap();
        assert!(space.is_empty());
        assert!((space.advance - 1.5).abs() < 1e-12);
        assert_eq!(font.outline('a').unwrap(), font.outline('A').unwrap());
    }

    #[test]
    fn test_unknown_character() {
        let font = BlockGlyphSource::new(2.0);
        assert!(matches!(font.outline('\u{2603}'), Err(NeonError::MissingGlyph('\u{2603}'))));
        assert!(!BlockGlyphSource::supports('~'));
        assert!(BlockGlyphSource::supports('z'));
    }

    #[test]
    fn test_every_bitmap_is_five_wide() {
        for ch in ('A'..='Z').chain('0'..='9').chain("!?.,:'-+& ".chars()) {
            let rows = bitmap(ch).unwrap();
            assert!(rows.iter().all(|r| r.len() == COLS), "bad row width for {ch:?}");
        }
    }
}
