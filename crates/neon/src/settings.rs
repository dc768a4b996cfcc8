//! Generator settings

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shared::AnchorStrategy;

use crate::error::NeonResult;

/// Glyph construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphSettings {
    /// Font file (TrueType/OpenType); built-in block font when unset
    pub font_path: Option<PathBuf>,
    /// Em size in scene units
    pub size: f32,
    /// Height of the glyph baseline above the ground plane
    pub baseline_height: f32,
    /// Rim offset of the emissive tube outline
    pub inner_offset: f32,
    /// Tube cross-section radius
    pub tube_radius: f32,
    /// Extra ring steps per quarter turn of the tube cross-section
    pub tube_resolution: u32,
    /// Rim offset of the housing outline
    pub outer_offset: f32,
    /// Half-depth of the housing walls
    pub outer_extrude: f32,
    /// Distance the housing sits behind the tube
    pub outer_depth_offset: f32,
    /// Curve flattening tolerance for font outlines
    pub flatten_tolerance: f64,
}

impl Default for GlyphSettings {
    fn default() -> Self {
        Self {
            font_path: None,
            size: 2.0,
            baseline_height: 0.5,
            inner_offset: 0.02,
            tube_radius: 0.008,
            tube_resolution: 3,
            outer_offset: 0.04,
            outer_extrude: 0.06,
            outer_depth_offset: 0.06,
            flatten_tolerance: 0.01,
        }
    }
}

/// Cable and connector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CableSettings {
    /// Glyph-local extrude-axis coordinate of every anchor
    pub anchor_depth: f32,
    /// Downward offset of the first control point's handle
    pub handle_drop: f32,
    /// Cable cross-section radius
    pub bevel_radius: f32,
    pub bevel_resolution: u32,
    /// Samples per Bezier segment
    pub curve_resolution: u32,
    /// Half-size of the connector cubes
    pub connector_size: f32,
    pub anchors: AnchorStrategy,
    /// Fixed anchor seed; requests may override it
    pub seed: Option<u64>,
}

impl Default for CableSettings {
    fn default() -> Self {
        Self {
            anchor_depth: -0.15,
            handle_drop: 0.5,
            bevel_radius: 0.022,
            bevel_resolution: 3,
            curve_resolution: 12,
            connector_size: 0.02,
            anchors: AnchorStrategy::Random,
            seed: None,
        }
    }
}

/// Backing plate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateSettings {
    /// Plate half-width as a fraction of the total glyph width
    pub width_factor: f32,
    pub half_depth: f32,
    pub half_height: f32,
    /// Height of the plate center
    pub height: f32,
    pub bevel_width: f32,
    pub bevel_segments: u32,
    /// Shell thickness; negative shells inward
    pub solidify_thickness: f32,
    /// Direction from the sign toward the viewer
    pub viewer_direction: [f32; 3],
    /// Faces with `normal . viewer_direction` above this are removed
    pub facing_threshold: f32,
}

impl PlateSettings {
    pub fn viewer(&self) -> Vec3 {
        Vec3::from_array(self.viewer_direction).normalize_or_zero()
    }
}

impl Default for PlateSettings {
    fn default() -> Self {
        Self {
            width_factor: 0.55,
            half_depth: 0.25,
            half_height: 1.0,
            height: 1.18,
            bevel_width: 0.1,
            bevel_segments: 32,
            solidify_thickness: -0.05,
            viewer_direction: [0.0, -1.0, 0.0],
            facing_threshold: 0.5,
        }
    }
}

/// Material settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    /// Emission strength written on every generated material
    pub emission_strength: f32,
    /// Grey level of the cable material
    pub curve_grey: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            emission_strength: 15.0,
            curve_grey: 0.1,
        }
    }
}

/// All generator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignSettings {
    pub glyph: GlyphSettings,
    pub cable: CableSettings,
    pub plate: PlateSettings,
    pub material: MaterialSettings,
}

impl SignSettings {
    /// Default settings file location
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "neon-sign", "neon-sign")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the default location, or return defaults if not found
    pub fn load() -> Self {
        if let Some(path) = Self::default_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring unreadable settings {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    /// Load settings from an explicit file
    pub fn load_from(path: &Path) -> NeonResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to the default location
    pub fn save(&self) -> NeonResult<()> {
        if let Some(path) = Self::default_path() {
            self.save_to(&path)?;
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> NeonResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
