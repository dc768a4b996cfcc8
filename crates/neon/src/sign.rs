//! Orchestrator: text and color in, glyphs, cables and plate out

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use shared::{ObjectId, SignRequest, SignSummary, MAX_TEXT_LEN};

use crate::cable::{self, CableLink};
use crate::error::{NeonError, NeonResult};
use crate::glyph::{load_source, BlockGlyphSource, GlyphMesher, GlyphSource};
use crate::layout::layout;
use crate::plate::{build_plate, Plate};
use crate::scene::SceneContext;
use crate::settings::SignSettings;

/// Reject input the panel would not accept
pub fn validate_request(request: &SignRequest) -> NeonResult<()> {
    let len = request.text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(NeonError::TextTooLong {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    for (channel, value) in request.color.to_array().into_iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(NeonError::InvalidColor { channel, value });
        }
    }
    Ok(())
}

/// Objects created by one invocation
#[derive(Debug, Clone, Default)]
pub struct GeneratedSign {
    pub glyphs: Vec<ObjectId>,
    pub cables: Vec<CableLink>,
    pub plate: Option<Plate>,
    pub total_width: f32,
}

impl GeneratedSign {
    pub fn connectors(&self) -> Vec<ObjectId> {
        self.cables.iter().flat_map(|c| c.connectors.iter().cloned()).collect()
    }

    pub fn curves(&self) -> Vec<ObjectId> {
        self.cables.iter().map(|c| c.curve.clone()).collect()
    }

    /// Every object of this sign in creation order
    pub fn object_ids(&self) -> Vec<ObjectId> {
        let mut ids = self.glyphs.clone();
        for link in &self.cables {
            ids.extend(link.connectors.iter().cloned());
            ids.push(link.curve.clone());
        }
        ids.extend(self.plate.as_ref().map(|p| p.id.clone()));
        ids
    }
}

pub struct SignGenerator {
    pub settings: SignSettings,
    source: Box<dyn GlyphSource>,
}

impl SignGenerator {
    /// Generator using the font named in the settings, or the block font
    pub fn new(settings: SignSettings) -> NeonResult<Self> {
        let source = load_source(&settings.glyph)?;
        Ok(Self { settings, source })
    }

    pub fn with_source(settings: SignSettings, source: Box<dyn GlyphSource>) -> Self {
        Self { settings, source }
    }

    pub fn source(&self) -> &dyn GlyphSource {
        self.source.as_ref()
    }

    /// Anchor RNG: the request seed, else the configured seed, else entropy
    pub fn rng_for(&self, request: &SignRequest) -> StdRng {
        match request.seed.or(self.settings.cable.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Run layout, cable routing and the plate for one request.
    /// A failing stage aborts; objects created before it stay in the scene.
    pub fn generate(&self, scene: &mut SceneContext, request: &SignRequest) -> NeonResult<GeneratedSign> {
        let mut rng = self.rng_for(request);
        self.generate_with_rng(scene, request, &mut rng)
    }

    pub fn generate_with_rng(
        &self,
        scene: &mut SceneContext,
        request: &SignRequest,
        rng: &mut dyn RngCore,
    ) -> NeonResult<GeneratedSign> {
        validate_request(request)?;
        tracing::info!(
            "Creating sign {:?} ({} chars, font '{}')",
            request.text,
            request.text.chars().count(),
            self.source.name()
        );

        let mut cable_settings = self.settings.cable.clone();
        if let Some(anchors) = request.anchors {
            cable_settings.anchors = anchors;
        }

        scene.with_object_mode(|scene| {
            let mesher = GlyphMesher::new(self.source.as_ref(), &self.settings.glyph, &self.settings.material);
            let laid_out = layout(scene, &mesher, &request.text, request.color)?;
            let cables = cable::connect(scene, &laid_out.glyphs, &cable_settings, &self.settings.material, rng)?;
            let plate = build_plate(scene, &laid_out.glyphs, &self.settings.plate, &self.settings.material)?;
            Ok(GeneratedSign {
                glyphs: laid_out.glyphs,
                cables,
                plate,
                total_width: laid_out.total_width,
            })
        })
    }

    /// Generate and describe the result
    pub fn create_text(&self, scene: &mut SceneContext, request: &SignRequest) -> NeonResult<SignSummary> {
        let sign = self.generate(scene, request)?;
        summarize(scene, &request.text, &sign)
    }
}

impl Default for SignGenerator {
    fn default() -> Self {
        let settings = SignSettings::default();
        let source = Box::new(BlockGlyphSource::new(settings.glyph.size));
        Self::with_source(settings, source)
    }
}

/// Summary of a generated sign with a snapshot of each object
pub fn summarize(scene: &SceneContext, text: &str, sign: &GeneratedSign) -> NeonResult<SignSummary> {
    let objects = sign
        .object_ids()
        .iter()
        .map(|id| scene.object_summary(id))
        .collect::<NeonResult<Vec<_>>>()?;
    Ok(SignSummary {
        text: text.to_string(),
        glyphs: sign.glyphs.clone(),
        connectors: sign.connectors(),
        curves: sign.curves(),
        plate: sign.plate.as_ref().map(|p| p.id.clone()),
        total_width: sign.total_width,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Rgb;

    #[test]
    fn test_validate_text_length() {
        let long = SignRequest::new("A".repeat(MAX_TEXT_LEN + 1), Rgb::WHITE);
        assert!(matches!(
            validate_request(&long),
            Err(NeonError::TextTooLong { len: 1025, max: 1024 })
        ));
        let max = SignRequest::new("A".repeat(MAX_TEXT_LEN), Rgb::WHITE);
        assert!(validate_request(&max).is_ok());
    }

    #[test]
    fn test_validate_color_channels() {
        let req = SignRequest::new("A", Rgb(0.5, 1.2, 0.0));
        assert!(matches!(
            validate_request(&req),
            Err(NeonError::InvalidColor { channel: 1, .. })
        ));
        let req = SignRequest::new("A", Rgb(f32::NAN, 0.0, 0.0));
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_invalid_request_creates_nothing() {
        let generator = SignGenerator::default();
        let mut scene = SceneContext::new();
        let req = SignRequest::new("AB", Rgb(-0.1, 0.0, 0.0));
        assert!(generator.generate(&mut scene, &req).is_err());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_rng_seed_precedence() {
        let mut generator = SignGenerator::default();
        generator.settings.cable.seed = Some(5);
        let from_settings = generator.rng_for(&SignRequest::default()).next_u64();
        let again = generator.rng_for(&SignRequest::default()).next_u64();
        assert_eq!(from_settings, again);
        let from_request = generator.rng_for(&SignRequest::default().with_seed(6)).next_u64();
        assert_eq!(from_request, StdRng::seed_from_u64(6).next_u64());
    }

    #[test]
    fn test_object_ids_order() {
        let sign = GeneratedSign {
            glyphs: vec!["g1".into(), "g2".into()],
            cables: vec![CableLink {
                connectors: ["c1".into(), "c2".into()],
                curve: "k1".into(),
            }],
            plate: Some(Plate {
                id: "p".into(),
                total_width: 1.0,
                removed_faces: 1,
            }),
            total_width: 1.0,
        };
        assert_eq!(sign.object_ids(), vec!["g1", "g2", "c1", "c2", "k1", "p"]);
        assert_eq!(sign.connectors().len(), 2);
    }
}
