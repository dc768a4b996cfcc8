//! Backing plate builder

use glam::Vec3;
use shared::ObjectId;

use crate::error::NeonResult;
use crate::geometry::primitives::cube;
use crate::geometry::{normal_in_direction, Modifier};
use crate::glyph::horizontal_extent;
use crate::material::{assign, matte, MaterialRole};
use crate::scene::{ObjectRole, SceneContext, SceneObject};
use crate::settings::{MaterialSettings, PlateSettings};

/// The finished plate and what the front-face cut removed
#[derive(Debug, Clone, PartialEq)]
pub struct Plate {
    pub id: ObjectId,
    pub total_width: f32,
    pub removed_faces: usize,
}

/// Sum of the glyphs' horizontal extents
pub fn total_width(scene: &SceneContext, glyphs: &[ObjectId]) -> NeonResult<f32> {
    glyphs
        .iter()
        .map(|id| horizontal_extent(scene.object(id)?))
        .sum()
}

/// Delete the faces of `id`'s base mesh that face the viewer, in edit mode.
/// Returns the number of faces removed.
pub fn remove_front_faces(
    scene: &mut SceneContext,
    id: &str,
    viewer: Vec3,
    threshold: f32,
) -> NeonResult<usize> {
    let rotation = scene.object(id)?.rotation_quat();
    scene.with_object_mode(|scene| {
        scene.with_edit_mesh(id, |mesh| {
            Ok(mesh.delete_faces(|m, face| {
                normal_in_direction(rotation * m.face_normal(face), viewer, threshold)
            }))
        })
    })
}

/// Build the plate behind the glyph row. Returns `None` when there is no
/// glyph to back.
pub fn build_plate(
    scene: &mut SceneContext,
    glyphs: &[ObjectId],
    settings: &PlateSettings,
    materials: &MaterialSettings,
) -> NeonResult<Option<Plate>> {
    if glyphs.is_empty() {
        tracing::warn!("No glyphs, skipping backing plate");
        return Ok(None);
    }
    let width = total_width(scene, glyphs)?;
    let scale = Vec3::new(settings.width_factor * width, settings.half_depth, settings.half_height);

    let mut plate = SceneObject::with_mesh(
        "Cube",
        ObjectRole::BackingPlate { applied_scale: scale },
        cube(Vec3::ONE),
    );
    plate.scale = scale;
    plate.apply_scale()?;
    plate.location = Vec3::new(width / 2.0, 0.0, settings.height);
    let id = scene.add_object(plate)?;

    let (base, emission) = matte();
    assign(scene, &id, base, emission, MaterialRole::Cover.as_str(), materials)?;

    let object = scene.object_mut(&id)?;
    object.modifiers.push(Modifier::Bevel {
        width: settings.bevel_width,
        segments: settings.bevel_segments,
    });
    object.modifiers.push(Modifier::Solidify {
        thickness: settings.solidify_thickness,
    });

    let removed = remove_front_faces(scene, &id, settings.viewer(), settings.facing_threshold)?;
    tracing::info!("Backing plate: width {width:.3}, scale {scale:?}, removed {removed} front faces");

    Ok(Some(Plate {
        id,
        total_width: width,
        removed_faces: removed,
    }))
}
