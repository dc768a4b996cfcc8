//! Cable router: connectors and hanging cables between neighbouring glyphs

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;
use shared::{AnchorStrategy, ObjectId, Rgb};

use crate::error::NeonResult;
use crate::geometry::primitives::cube;
use crate::geometry::{BezierPoint, Curve};
use crate::material::{assign, matte, MaterialRole};
use crate::scene::{ObjectRole, SceneContext, SceneObject};
use crate::settings::{CableSettings, MaterialSettings};

/// Objects created for one glyph pair
#[derive(Debug, Clone, PartialEq)]
pub struct CableLink {
    pub connectors: [ObjectId; 2],
    pub curve: ObjectId,
}

/// Pick the glyph-local vertex a cable attaches to. Glyphs without geometry
/// anchor at their origin.
pub fn pick_anchor(vertices: &[Vec3], strategy: AnchorStrategy, rng: &mut dyn RngCore) -> Vec3 {
    let picked = match strategy {
        AnchorStrategy::Random => vertices.choose(rng),
        AnchorStrategy::NearestBaseline => vertices
            .iter()
            .enumerate()
            .min_by(|(ia, a), (ib, b)| a.y.abs().total_cmp(&b.y.abs()).then(ia.cmp(ib)))
            .map(|(_, v)| v),
    };
    picked.copied().unwrap_or(Vec3::ZERO)
}

/// World-space anchor on a glyph, pushed to the fixed cable depth
fn world_anchor(
    scene: &SceneContext,
    glyph: &str,
    settings: &CableSettings,
    rng: &mut dyn RngCore,
) -> NeonResult<Vec3> {
    let object = scene.object(glyph)?;
    let vertex = pick_anchor(&object.mesh()?.positions, settings.anchors, rng);
    let local = Vec3::new(vertex.x, vertex.y, settings.anchor_depth);
    Ok(object.matrix_world().transform_point3(local))
}

fn add_connector(
    scene: &mut SceneContext,
    at: Vec3,
    settings: &CableSettings,
    materials: &MaterialSettings,
) -> NeonResult<ObjectId> {
    let mut connector = SceneObject::with_mesh("Cube", ObjectRole::Connector, cube(Vec3::ONE));
    connector.location = at;
    connector.scale = Vec3::splat(settings.connector_size);
    let id = scene.add_object(connector)?;
    let (base, emission) = matte();
    assign(scene, &id, base, emission, MaterialRole::Connector.as_str(), materials)?;
    Ok(id)
}

/// Bezier cable from `start` to `end` with its origin at the midpoint. The
/// first handle is dragged down so the cable sags toward the start.
pub fn cable_curve(start: Vec3, end: Vec3, settings: &CableSettings) -> (Vec3, Curve) {
    let origin = (start + end) * 0.5;
    let mut first = BezierPoint::new(start - origin);
    first.handle_right.z -= settings.handle_drop;
    let last = BezierPoint::new(end - origin);
    let curve = Curve {
        points: vec![first, last],
        bevel_depth: settings.bevel_radius,
        bevel_resolution: settings.bevel_resolution,
        resolution_u: settings.curve_resolution,
    };
    (origin, curve)
}

/// Connect every adjacent glyph pair with two connectors and one cable.
pub fn connect(
    scene: &mut SceneContext,
    glyphs: &[ObjectId],
    settings: &CableSettings,
    materials: &MaterialSettings,
    rng: &mut dyn RngCore,
) -> NeonResult<Vec<CableLink>> {
    let mut links = Vec::with_capacity(glyphs.len().saturating_sub(1));
    for pair in glyphs.windows(2) {
        let start = world_anchor(scene, &pair[0], settings, rng)?;
        let end = world_anchor(scene, &pair[1], settings, rng)?;

        let first = add_connector(scene, start, settings, materials)?;
        let second = add_connector(scene, end, settings, materials)?;

        let (origin, curve) = cable_curve(start, end, settings);
        let mut object = SceneObject::with_curve("BezierCurve", ObjectRole::CableCurve, curve);
        object.location = origin;
        let curve_id = scene.add_object(object)?;
        assign(
            scene,
            &curve_id,
            Rgb::grey(materials.curve_grey),
            Rgb::BLACK,
            MaterialRole::Curve.as_str(),
            materials,
        )?;
        tracing::debug!("Cable {start:?} -> {end:?}");

        links.push(CableLink {
            connectors: [first, second],
            curve: curve_id,
        });
    }
    tracing::info!("Routed {} cables", links.len());
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::ObjectKind;

    fn glyph_at(scene: &mut SceneContext, x: f32) -> ObjectId {
        let mut obj = SceneObject::with_mesh(
            "Text",
            ObjectRole::Glyph { character: 'X', advance: 1.0 },
            cube(Vec3::splat(0.5)),
        );
        obj.rotation.x = std::f32::consts::FRAC_PI_2;
        obj.location = Vec3::new(x, 0.0, 0.5);
        scene.add_object(obj).unwrap()
    }

    #[test]
    fn test_counts_per_pair() {
        let mut scene = SceneContext::new();
        let glyphs: Vec<_> = (0..4).map(|i| glyph_at(&mut scene, i as f32)).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let links = connect(&mut scene, &glyphs, &CableSettings::default(), &MaterialSettings::default(), &mut rng)
            .unwrap();
        assert_eq!(links.len(), 3);
        assert_eq!(scene.objects_of_kind(ObjectKind::Connector).len(), 6);
        assert_eq!(scene.objects_of_kind(ObjectKind::CableCurve).len(), 3);
    }

    #[test]
    fn test_single_glyph_no_cables() {
        let mut scene = SceneContext::new();
        let glyphs = vec![glyph_at(&mut scene, 0.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let links = connect(&mut scene, &glyphs, &CableSettings::default(), &MaterialSettings::default(), &mut rng)
            .unwrap();
        assert!(links.is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_anchor_depth_and_curve_origin() {
        let mut scene = SceneContext::new();
        let glyphs = vec![glyph_at(&mut scene, 0.0), glyph_at(&mut scene, 2.0)];
        let settings = CableSettings::default();
        let mut rng = StdRng::seed_from_u64(9);
        let link = connect(&mut scene, &glyphs, &settings, &MaterialSettings::default(), &mut rng)
            .unwrap()
            .remove(0);

        let a = scene.object(&link.connectors[0]).unwrap();
        let b = scene.object(&link.connectors[1]).unwrap();
        // Glyph-local depth -0.15 becomes world +Y 0.15 for upright glyphs
        assert!((a.location.y - 0.15).abs() < 1e-5);
        assert!((b.location.y - 0.15).abs() < 1e-5);
        assert_eq!(a.scale, Vec3::splat(0.02));

        let curve_obj = scene.object(&link.curve).unwrap();
        assert!((curve_obj.location - (a.location + b.location) * 0.5).length() < 1e-5);
        let curve = curve_obj.curve().unwrap();
        assert!((curve.points[0].co + curve_obj.location - a.location).length() < 1e-5);
        assert!((curve.points[0].handle_right.z - curve.points[0].co.z + 0.5).abs() < 1e-6);
        assert_eq!(curve.points[1].handle_right, curve.points[1].co);
        assert_eq!(curve.bevel_depth, 0.022);
        assert_eq!(scene.slot_names(curve_obj), vec!["Text_curve"]);
        let mat = scene.material(curve_obj.material_slots[0].unwrap()).unwrap();
        assert_eq!(mat.inputs.base_color, Rgb::grey(0.1));
    }

    #[test]
    fn test_seeded_choice_is_repeatable() {
        let vertices: Vec<Vec3> = (0..50).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let picks_a: Vec<Vec3> = (0..5).map(|_| pick_anchor(&vertices, AnchorStrategy::Random, &mut a)).collect();
        let picks_b: Vec<Vec3> = (0..5).map(|_| pick_anchor(&vertices, AnchorStrategy::Random, &mut b)).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn test_nearest_baseline_prefers_lowest_index_on_tie() {
        let vertices = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, -0.1, 0.0),
            Vec3::new(2.0, 0.1, 0.0),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            pick_anchor(&vertices, AnchorStrategy::NearestBaseline, &mut rng),
            Vec3::new(1.0, -0.1, 0.0)
        );
        assert_eq!(pick_anchor(&[], AnchorStrategy::Random, &mut rng), Vec3::ZERO);
    }
}
