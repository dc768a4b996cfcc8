//! Headless test harness for programmatic sign generation.

use shared::{ObjectKind, SignRequest, SignSummary};

use crate::error::NeonResult;
use crate::export::build_glb;
use crate::geometry::Mesh;
use crate::glyph::GlyphSource;
use crate::scene::SceneContext;
use crate::settings::SignSettings;
use crate::sign::{summarize, GeneratedSign, SignGenerator};
use crate::validation::MeshValidator;

/// Headless test harness: a scene plus the generator that fills it
pub struct TestHarness {
    pub scene: SceneContext,
    pub generator: SignGenerator,
    last_sign: Option<GeneratedSign>,
    last_error: Option<String>,
}

impl TestHarness {
    /// Harness with default settings and the built-in block font.
    pub fn new() -> Self {
        Self::with_generator(SignGenerator::default())
    }

    pub fn with_settings(settings: SignSettings) -> NeonResult<Self> {
        Ok(Self::with_generator(SignGenerator::new(settings)?))
    }

    pub fn with_source(settings: SignSettings, source: Box<dyn GlyphSource>) -> Self {
        Self::with_generator(SignGenerator::with_source(settings, source))
    }

    fn with_generator(generator: SignGenerator) -> Self {
        Self {
            scene: SceneContext::new(),
            generator,
            last_sign: None,
            last_error: None,
        }
    }

    // ── Generation ────────────────────────────────────────────

    /// Run one "Create Text" invocation on the current scene
    pub fn create_text(&mut self, request: &SignRequest) -> NeonResult<SignSummary> {
        match self.generator.generate(&mut self.scene, request) {
            Ok(sign) => {
                let summary = summarize(&self.scene, &request.text, &sign);
                self.last_sign = Some(sign);
                self.last_error = None;
                summary
            }
            Err(e) => {
                self.last_sign = None;
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Seeded request with the default color
    pub fn create(&mut self, text: &str, seed: u64) -> NeonResult<SignSummary> {
        self.create_text(&SignRequest::new(text, shared::Rgb::WHITE).with_seed(seed))
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.scene.clear();
        self.last_sign = None;
        self.last_error = None;
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn object_count(&self) -> usize {
        self.scene.len()
    }

    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.scene.objects_of_kind(kind).len()
    }

    pub fn object_names(&self) -> Vec<String> {
        self.scene.objects().iter().map(|o| o.name.clone()).collect()
    }

    pub fn last_sign(&self) -> Option<&GeneratedSign> {
        self.last_sign.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// World-space mesh of an object with modifiers applied
    pub fn mesh_of(&self, id: &str) -> Option<Mesh> {
        self.scene.object(id).ok()?.world_mesh().ok()
    }

    /// Validation errors of an object's evaluated mesh. `None` if the object
    /// is missing.
    pub fn validate_mesh(&self, id: &str) -> Option<Vec<String>> {
        let mesh = self.mesh_of(id)?;
        Some(MeshValidator::new(&mesh).validate_all())
    }

    pub fn export_glb(&self) -> NeonResult<Vec<u8>> {
        build_glb(&self.scene)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
