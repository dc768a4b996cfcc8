//! Surface materials and slot assignment

use serde::{Deserialize, Serialize};
use shared::Rgb;

use crate::error::NeonResult;
use crate::scene::{MaterialId, SceneContext};
use crate::settings::MaterialSettings;

/// Prefix of every generated material name
pub const MATERIAL_PREFIX: &str = "Text_";

/// The shading inputs the generator writes, by name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipledInputs {
    pub base_color: Rgb,
    pub emission_color: Rgb,
    pub emission_strength: f32,
}

impl PrincipledInputs {
    /// Whether the surface glows
    pub fn is_emissive(&self) -> bool {
        self.emission_strength > 0.0 && self.emission_color != Rgb::BLACK
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub inputs: PrincipledInputs,
}

/// Logical material roles of a sign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRole {
    Inside,
    Outside,
    Connector,
    Curve,
    Cover,
}

impl MaterialRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MaterialRole::Inside => "inside",
            MaterialRole::Outside => "outside",
            MaterialRole::Connector => "connector",
            MaterialRole::Curve => "curve",
            MaterialRole::Cover => "cover",
        }
    }
}

/// Base and emission colors for a glowing surface
pub fn emissive(color: Rgb) -> (Rgb, Rgb) {
    (Rgb::WHITE, color)
}

/// Base and emission colors for a black non-glowing surface
pub fn matte() -> (Rgb, Rgb) {
    (Rgb::BLACK, Rgb::BLACK)
}

/// Create a material named `Text_<role>` and put it in the object's first
/// slot, replacing whatever was there. An object without slots gets one.
pub fn assign(
    scene: &mut SceneContext,
    object_id: &str,
    base_color: Rgb,
    emission_color: Rgb,
    role: &str,
    settings: &MaterialSettings,
) -> NeonResult<MaterialId> {
    // Fail before touching the library
    scene.object(object_id)?;

    let material = Material {
        name: format!("{MATERIAL_PREFIX}{role}"),
        inputs: PrincipledInputs {
            base_color,
            emission_color,
            emission_strength: settings.emission_strength,
        },
    };
    let material_id = scene.add_material(material);

    let object = scene.object_mut(object_id)?;
    match object.material_slots.first_mut() {
        Some(slot) => *slot = Some(material_id),
        None => object.material_slots.push(Some(material_id)),
    }
    tracing::debug!("Assigned material #{material_id} ({role}) to '{}'", object.name);
    Ok(material_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::cube;
    use crate::scene::{ObjectRole, SceneObject};
    use glam::Vec3;

    fn scene_with_cube() -> (SceneContext, String) {
        let mut scene = SceneContext::new();
        let id = scene
            .add_object(SceneObject::with_mesh("Cube", ObjectRole::Connector, cube(Vec3::ONE)))
            .unwrap();
        (scene, id)
    }

    #[test]
    fn test_first_assign_appends_slot() {
        let (mut scene, id) = scene_with_cube();
        let (base, emission) = emissive(Rgb(1.0, 0.0, 0.0));
        let mat = assign(&mut scene, &id, base, emission, "inside", &MaterialSettings::default())
            .unwrap();
        let obj = scene.object(&id).unwrap();
        assert_eq!(obj.material_slots, vec![Some(mat)]);

        let m = scene.material(mat).unwrap();
        assert_eq!(m.name, "Text_inside");
        assert_eq!(m.inputs.base_color, Rgb::WHITE);
        assert_eq!(m.inputs.emission_color, Rgb(1.0, 0.0, 0.0));
        assert_eq!(m.inputs.emission_strength, 15.0);
        assert!(m.inputs.is_emissive());
    }

    #[test]
    fn test_reassign_replaces_slot_zero() {
        let (mut scene, id) = scene_with_cube();
        let settings = MaterialSettings::default();
        let (base, emission) = emissive(Rgb(0.0, 1.0, 0.0));
        assign(&mut scene, &id, base, emission, "inside", &settings).unwrap();
        let (base, emission) = matte();
        let second = assign(&mut scene, &id, base, emission, "outside", &settings).unwrap();

        let obj = scene.object(&id).unwrap();
        assert_eq!(obj.material_slots.len(), 1);
        assert_eq!(obj.material_slots[0], Some(second));
        let m = scene.material(second).unwrap();
        assert_eq!(m.inputs.base_color, Rgb::BLACK);
        assert!(!m.inputs.is_emissive());
    }

    #[test]
    fn test_names_are_uniquified() {
        let (mut scene, id) = scene_with_cube();
        let settings = MaterialSettings::default();
        let (base, emission) = matte();
        let a = assign(&mut scene, &id, base, emission, "cover", &settings).unwrap();
        let b = assign(&mut scene, &id, base, emission, "cover", &settings).unwrap();
        assert_eq!(scene.material(a).unwrap().name, "Text_cover");
        assert_eq!(scene.material(b).unwrap().name, "Text_cover.001");
    }

    #[test]
    fn test_missing_object_adds_no_material() {
        let mut scene = SceneContext::new();
        let (base, emission) = matte();
        assert!(assign(&mut scene, "nope", base, emission, "cover", &MaterialSettings::default()).is_err());
        assert!(scene.materials().is_empty());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(MaterialRole::Curve.as_str(), "curve");
        assert_eq!(MaterialRole::Cover.as_str(), "cover");
    }
}
