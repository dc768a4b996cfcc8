use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Text used when the request does not provide one
pub const DEFAULT_TEXT: &str = "NEON";

/// Longest text accepted by the generator (in characters)
pub const MAX_TEXT_LEN: usize = 1024;

/// Linear RGB color, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);

    pub fn to_array(self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }

    /// RGBA with opaque alpha
    pub fn to_rgba(self) -> [f32; 4] {
        [self.0, self.1, self.2, 1.0]
    }

    pub fn grey(v: f32) -> Self {
        Rgb(v, v, v)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How cable anchors are picked on each glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorStrategy {
    /// Uniform choice over the glyph's vertices
    #[default]
    Random,
    /// Vertex closest to the glyph baseline
    NearestBaseline,
}

/// Input of one "Create Text" invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequest {
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default)]
    pub color: Rgb,
    /// Fixes the anchor RNG; `None` draws from entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Overrides the configured anchor strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<AnchorStrategy>,
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

impl Default for SignRequest {
    fn default() -> Self {
        Self {
            text: default_text(),
            color: Rgb::default(),
            seed: None,
            anchors: None,
        }
    }
}

impl SignRequest {
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self {
            text: text.into(),
            color,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_anchors(mut self, anchors: AnchorStrategy) -> Self {
        self.anchors = Some(anchors);
        self
    }
}

/// Role of a generated scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Glyph,
    Connector,
    CableCurve,
    BackingPlate,
    /// Intermediate text mesh before it is joined into a glyph
    Text,
}

/// Snapshot of one scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub location: [f32; 3],
    pub dimensions: [f32; 3],
    pub materials: Vec<String>,
    pub vertex_count: usize,
    pub face_count: usize,
}

/// Result of one sign generation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignSummary {
    pub text: String,
    pub glyphs: Vec<ObjectId>,
    pub connectors: Vec<ObjectId>,
    pub curves: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<ObjectId>,
    /// Sum of the glyphs' horizontal extents
    pub total_width: f32,
    #[serde(default)]
    pub objects: Vec<ObjectSummary>,
}

impl SignSummary {
    pub fn object(&self, id: &str) -> Option<&ObjectSummary> {
        self.objects.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_match_panel() {
        let req = SignRequest::default();
        assert_eq!(req.text, "NEON");
        assert_eq!(req.color, Rgb::WHITE);
        assert!(req.seed.is_none());
    }

    #[test]
    fn test_request_missing_fields_use_defaults() {
        let req: SignRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, SignRequest::default());

        let req: SignRequest = serde_json::from_str(r#"{"text":"AB","color":[1.0,0.0,0.0]}"#).unwrap();
        assert_eq!(req.text, "AB");
        assert_eq!(req.color, Rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_anchor_strategy_snake_case() {
        let req = SignRequest::new("A", Rgb::WHITE).with_anchors(AnchorStrategy::NearestBaseline);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""anchors":"nearest_baseline""#));
        assert!(!json.contains("seed"));
    }

    #[test]
    fn test_object_kind_serde() {
        let json = serde_json::to_string(&ObjectKind::CableCurve).unwrap();
        assert_eq!(json, r#""cable_curve""#);
    }

    #[test]
    fn test_summary_lookup() {
        let summary = SignSummary {
            objects: vec![ObjectSummary {
                id: "a".into(),
                name: "font_curve".into(),
                kind: ObjectKind::Glyph,
                location: [0.0; 3],
                dimensions: [1.0; 3],
                materials: vec![],
                vertex_count: 0,
                face_count: 0,
            }],
            ..Default::default()
        };
        assert!(summary.object("a").is_some());
        assert!(summary.object("b").is_none());
    }
}
