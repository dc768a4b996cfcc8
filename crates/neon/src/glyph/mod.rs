//! Glyph construction: outline sources, rim offsets, fills and the mesher.

pub mod block;
pub mod font;
pub mod mesher;
pub mod offset;
pub mod source;
pub mod tessellate;

pub use block::BlockGlyphSource;
pub use font::FontGlyphSource;
pub use mesher::{horizontal_extent, GlyphMesher};
pub use source::{load_source, GlyphOutline, GlyphSource};
