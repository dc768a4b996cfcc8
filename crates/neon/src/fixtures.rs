//! Factory functions for creating test data.
//!
//! Helpers to construct requests, settings and pre-populated scenes used in
//! tests and by the command interface.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use shared::{AnchorStrategy, ObjectId, Rgb, SignRequest};

use crate::error::NeonResult;
use crate::geometry::primitives::cube;
use crate::scene::{ObjectRole, SceneContext, SceneObject};
use crate::settings::SignSettings;

// ── Requests ────────────────────────────────────────────────────

pub const RED: Rgb = Rgb(1.0, 0.0, 0.0);
pub const CYAN: Rgb = Rgb(0.0, 1.0, 1.0);

/// Seeded request with the given text and color.
pub fn request(text: &str, color: Rgb, seed: u64) -> SignRequest {
    SignRequest::new(text, color).with_seed(seed)
}

/// Seeded white request.
pub fn white_request(text: &str, seed: u64) -> SignRequest {
    request(text, Rgb::WHITE, seed)
}

/// Seeded request anchoring cables at the baseline.
pub fn baseline_request(text: &str) -> SignRequest {
    SignRequest::new(text, Rgb::WHITE).with_anchors(AnchorStrategy::NearestBaseline)
}

// ── Settings ────────────────────────────────────────────────────

/// Default settings with a fixed cable seed.
pub fn seeded_settings(seed: u64) -> SignSettings {
    let mut settings = SignSettings::default();
    settings.cable.seed = Some(seed);
    settings
}

/// Settings with coarse tessellation for fast geometry checks.
pub fn coarse_settings() -> SignSettings {
    let mut settings = SignSettings::default();
    settings.glyph.tube_resolution = 0;
    settings.cable.bevel_resolution = 0;
    settings.cable.curve_resolution = 4;
    settings.plate.bevel_segments = 2;
    settings
}

// ── Scenes ──────────────────────────────────────────────────────

/// Upright box glyph of the given width, standing on the baseline at `x`.
pub fn box_glyph(scene: &mut SceneContext, x: f32, width: f32) -> NeonResult<ObjectId> {
    let mut obj = SceneObject::with_mesh(
        "Text",
        ObjectRole::Glyph {
            character: '#',
            advance: width,
        },
        cube(Vec3::new(width / 2.0, 0.5, 0.05)),
    );
    obj.rotation.x = FRAC_PI_2;
    obj.location = Vec3::new(x + width / 2.0, 0.0, 0.5);
    scene.add_object(obj)
}

/// A row of `count` abutting box glyphs of width 1.
pub fn glyph_row(scene: &mut SceneContext, count: usize) -> NeonResult<Vec<ObjectId>> {
    (0..count).map(|i| box_glyph(scene, i as f32, 1.0)).collect()
}
