use kurbo::Point;

use crate::error::NeonResult;
use crate::settings::GlyphSettings;

use super::{BlockGlyphSource, FontGlyphSource};

/// Flattened outline of one character in scene units.
/// Baseline at y = 0, pen origin at x = 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    /// Closed polylines, the closing point not repeated
    pub contours: Vec<Vec<Point>>,
    /// Horizontal pen advance
    pub advance: f64,
}

impl GlyphOutline {
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for contour in &mut self.contours {
            for p in contour.iter_mut() {
                p.x += dx;
                p.y += dy;
            }
        }
    }
}

/// Typesetting backend that turns a character into outlines
pub trait GlyphSource: Send + Sync {
    /// Outline of `ch`, or `MissingGlyph` when the font has none
    fn outline(&self, ch: char) -> NeonResult<GlyphOutline>;

    fn name(&self) -> &str;
}

/// Font file from the settings, or the built-in block font
pub fn load_source(settings: &GlyphSettings) -> NeonResult<Box<dyn GlyphSource>> {
    match &settings.font_path {
        Some(path) => {
            let font = FontGlyphSource::from_file(path, settings.size, settings.flatten_tolerance)?;
            tracing::info!("Using font '{}'", font.name());
            Ok(Box::new(font))
        }
        None => Ok(Box::new(BlockGlyphSource::new(settings.size))),
    }
}
