//! Glyph mesher: one character to one upright glyph object

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use kurbo::Point;
use shared::{ObjectId, Rgb};

use crate::error::NeonResult;
use crate::geometry::beautify::{beautify_fill, DEFAULT_PASSES};
use crate::geometry::primitives::{extrude_walls, sweep_tube};
use crate::geometry::Mesh;
use crate::material::{assign, emissive, matte, MaterialRole};
use crate::scene::{ObjectRole, SceneContext, SceneObject};
use crate::settings::{GlyphSettings, MaterialSettings};

use super::offset::{fill_is_left, offset_outline};
use super::source::{GlyphOutline, GlyphSource};
use super::tessellate::fill_contours;

const WELD_EPSILON: f32 = 1e-5;
/// Widths below this count as "no geometry"
const MIN_EXTENT: f32 = 1e-6;

fn to_vec2(p: &Point) -> Vec2 {
    Vec2::new(p.x as f32, p.y as f32)
}

/// Horizontal space a glyph occupies in the layout: its world width, or the
/// font advance for blank characters
pub fn horizontal_extent(object: &SceneObject) -> NeonResult<f32> {
    let width = object.dimensions()?.x;
    if width > MIN_EXTENT {
        return Ok(width);
    }
    Ok(match object.kind {
        ObjectRole::Glyph { advance, .. } => advance,
        _ => 0.0,
    })
}

pub struct GlyphMesher<'a> {
    pub source: &'a dyn GlyphSource,
    pub glyph: &'a GlyphSettings,
    pub material: &'a MaterialSettings,
}

impl<'a> GlyphMesher<'a> {
    pub fn new(source: &'a dyn GlyphSource, glyph: &'a GlyphSettings, material: &'a MaterialSettings) -> Self {
        Self { source, glyph, material }
    }

    /// Emissive tube following the outline just outside the ink
    pub fn inner_mesh(&self, outline: &GlyphOutline) -> Mesh {
        let mut mesh = Mesh::new();
        for contour in offset_outline(&outline.contours, self.glyph.inner_offset as f64) {
            let path: Vec<Vec3> = contour.iter().map(|p| to_vec2(p).extend(0.0)).collect();
            let tube = sweep_tube(&path, self.glyph.tube_radius, self.glyph.tube_resolution, true);
            mesh.append(&tube, 0);
        }
        mesh
    }

    /// Housing: walls around the wider outline, closed at the back
    pub fn outer_mesh(&self, outline: &GlyphOutline) -> NeonResult<Mesh> {
        let mut mesh = Mesh::new();
        if outline.is_empty() {
            return Ok(mesh);
        }
        let half_depth = self.glyph.outer_extrude;
        let fill_left = fill_is_left(&outline.contours);
        let contours = offset_outline(&outline.contours, self.glyph.outer_offset as f64);

        for contour in &contours {
            let points: Vec<Vec2> = contour.iter().map(to_vec2).collect();
            mesh.append(&extrude_walls(&points, half_depth, fill_left), 0);
        }

        let cap = fill_contours(&contours, self.glyph.flatten_tolerance as f32)?;
        let base = mesh.vertex_count() as u32;
        for v in &cap.vertices {
            mesh.add_vertex(v.extend(-half_depth));
        }
        for [a, b, c] in &cap.triangles {
            // Back cap faces away from the viewer
            mesh.add_face(vec![base + a, base + c, base + b]);
        }
        mesh.weld(WELD_EPSILON);
        Ok(mesh)
    }

    /// Build the glyph for `character` and place its left edge at `x_position`.
    pub fn make_glyph(
        &self,
        scene: &mut SceneContext,
        character: char,
        color: Rgb,
        x_position: f32,
    ) -> NeonResult<ObjectId> {
        let mut outline = self.source.outline(character)?;
        let advance = outline.advance as f32;
        outline.translate(-outline.advance / 2.0, 0.0);

        let upright = Vec3::new(FRAC_PI_2, 0.0, 0.0);

        let mut inner = SceneObject::with_mesh("Text", ObjectRole::Text, self.inner_mesh(&outline));
        inner.rotation = upright;
        inner.location = Vec3::new(0.0, 0.0, self.glyph.baseline_height);
        let inner_id = scene.add_object(inner)?;
        scene.with_edit_mesh(&inner_id, |mesh| Ok(beautify_fill(mesh, DEFAULT_PASSES)))?;
        let (base, emission) = emissive(color);
        assign(scene, &inner_id, base, emission, MaterialRole::Inside.as_str(), self.material)?;

        let mut outer = SceneObject::with_mesh("Text", ObjectRole::Text, self.outer_mesh(&outline)?);
        outer.rotation = upright;
        outer.location = Vec3::new(0.0, self.glyph.outer_depth_offset, self.glyph.baseline_height);
        let outer_id = scene.add_object(outer)?;
        let flips = scene.with_edit_mesh(&outer_id, |mesh| Ok(beautify_fill(mesh, DEFAULT_PASSES)))?;
        let (base, emission) = matte();
        assign(scene, &outer_id, base, emission, MaterialRole::Outside.as_str(), self.material)?;

        scene.deselect_all();
        scene.select(&outer_id)?;
        scene.select(&inner_id)?;
        scene.set_active(&inner_id)?;
        scene.join(&inner_id, &[outer_id])?;

        let glyph = scene.object_mut(&inner_id)?;
        let mesh = glyph.mesh_mut()?;
        if let Some(bounds) = mesh.bounds() {
            mesh.translate(Vec3::new(-bounds.center().x, 0.0, 0.0));
        }
        glyph.kind = ObjectRole::Glyph { character, advance };

        let extent = horizontal_extent(glyph)?;
        glyph.location.x = x_position + extent / 2.0;
        tracing::debug!(
            "Glyph {character:?}: extent {extent:.3} at x {:.3}, {flips} fill flips",
            glyph.location.x
        );
        Ok(inner_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::BlockGlyphSource;
    use crate::settings::SignSettings;

    fn mesher_parts() -> (BlockGlyphSource, SignSettings) {
        let settings = SignSettings::default();
        (BlockGlyphSource::new(settings.glyph.size), settings)
    }

    #[test]
    fn test_inner_tube_per_contour() {
        let (source, settings) = mesher_parts();
        let mesher = GlyphMesher::new(&source, &settings.glyph, &settings.material);
        let outline = source.outline('O').unwrap();
        let inner = mesher.inner_mesh(&outline);
        assert!(!inner.is_empty());
        assert!(inner.boundary_edges().is_empty());
        // Tube diameter in depth
        assert!((inner.dimensions().z - 2.0 * settings.glyph.tube_radius).abs() < 1e-4);
    }

    #[test]
    fn test_outer_is_closed_except_front() {
        let (source, settings) = mesher_parts();
        let mesher = GlyphMesher::new(&source, &settings.glyph, &settings.material);
        let outline = source.outline('L').unwrap();
        let outer = mesher.outer_mesh(&outline).unwrap();
        let e = settings.glyph.outer_extrude;
        assert!((outer.dimensions().z - 2.0 * e).abs() < 1e-5);
        // Only the front rim is open
        let rim = outer.boundary_edges();
        assert!(!rim.is_empty());
        assert!(rim
            .iter()
            .all(|&(a, b)| (outer.positions[a as usize].z - e).abs() < 1e-5
                && (outer.positions[b as usize].z - e).abs() < 1e-5));
        // No face points toward the front
        assert!(outer.faces.iter().all(|f| outer.face_normal(f).z < 0.5));
    }

    #[test]
    fn test_make_glyph_places_left_edge() {
        let (source, settings) = mesher_parts();
        let mesher = GlyphMesher::new(&source, &settings.glyph, &settings.material);
        let mut scene = SceneContext::new();
        let id = mesher.make_glyph(&mut scene, 'A', Rgb(1.0, 0.0, 0.0), 3.0).unwrap();

        assert_eq!(scene.len(), 1);
        let glyph = scene.object(&id).unwrap();
        assert!(matches!(glyph.kind, ObjectRole::Glyph { character: 'A', .. }));
        assert_eq!(glyph.material_slots.len(), 2);
        assert_eq!(scene.slot_names(glyph), vec!["Text_inside", "Text_outside"]);

        let world = glyph.world_mesh().unwrap().bounds().unwrap();
        assert!((world.min.x - 3.0).abs() < 1e-4);
        assert!((world.center().x - glyph.location.x).abs() < 1e-4);
        // Upright: glyph height runs along Z, housing sits behind along +Y
        assert!(world.size().z > world.size().y);
        assert!(world.max.y > 0.06);
    }

    #[test]
    fn test_space_reserves_advance() {
        let (source, settings) = mesher_parts();
        let mesher = GlyphMesher::new(&source, &settings.glyph, &settings.material);
        let mut scene = SceneContext::new();
        let id = mesher.make_glyph(&mut scene, ' ', Rgb::WHITE, 0.0).unwrap();
        let glyph = scene.object(&id).unwrap();
        assert!(glyph.mesh().unwrap().is_empty());
        let extent = horizontal_extent(glyph).unwrap();
        assert!((extent - 1.5).abs() < 1e-6);
        assert!((glyph.location.x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_missing_glyph_leaves_scene_untouched() {
        let (source, settings) = mesher_parts();
        let mesher = GlyphMesher::new(&source, &settings.glyph, &settings.material);
        let mut scene = SceneContext::new();
        assert!(mesher.make_glyph(&mut scene, '\u{2603}', Rgb::WHITE, 0.0).is_err());
        assert!(scene.is_empty());
    }
}
