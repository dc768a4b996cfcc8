//! Layout engine: lays glyphs out left to right

use shared::{ObjectId, Rgb};

use crate::error::NeonResult;
use crate::glyph::{horizontal_extent, GlyphMesher};
use crate::scene::SceneContext;

/// Glyph objects in text order and the width they cover together
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub glyphs: Vec<ObjectId>,
    pub total_width: f32,
}

/// Build one glyph per character of `text`, each starting where the previous
/// one ended.
pub fn layout(
    scene: &mut SceneContext,
    mesher: &GlyphMesher<'_>,
    text: &str,
    color: Rgb,
) -> NeonResult<Layout> {
    let mut cursor = 0.0f32;
    let mut glyphs = Vec::with_capacity(text.chars().count());
    for ch in text.chars() {
        let id = mesher.make_glyph(scene, ch, color, cursor)?;
        cursor += horizontal_extent(scene.object(&id)?)?;
        glyphs.push(id);
    }
    tracing::info!("Laid out {} glyphs, width {:.3}", glyphs.len(), cursor);
    Ok(Layout {
        glyphs,
        total_width: cursor,
    })
}
