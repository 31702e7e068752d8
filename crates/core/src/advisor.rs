//! Advisory pipeline.
//!
//! [`LensAdvisor`] composes the engine: prescription (parsed from text or entered by hand) →
//! spherical equivalent → vision type, required index and frame safety. The last three are
//! independent of one another and share only the spherical equivalent and the frame type.

use crate::config::AdvisorConfig;
use crate::frame::FrameType;
use crate::index::{resolve_index, IndexRecommendation};
use crate::parser::PrescriptionParser;
use crate::power::SphericalEquivalent;
use crate::prescription::{ManualEntry, ParsedPrescription};
use crate::safety::{evaluate_safety, FrameSafetyResult};
use crate::vision::{classify, ClassifierInput, VisionNeed, VisionTypeResult};
use crate::{LensError, LensResult};
use lens_types::Age;
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

/// Where the prescription comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrescriptionSource {
    /// Recognised text from an uploaded image.
    Text(String),
    /// Values typed into a form.
    Manual(ManualEntry),
    /// A prescription parsed earlier.
    Parsed(ParsedPrescription),
}

/// Everything needed to produce a lens specification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryRequest {
    pub source: PrescriptionSource,
    pub age: Option<Age>,
    pub vision_need: VisionNeed,
    pub frame_type: FrameType,
    /// The customer reports an existing addition even if none was recognised.
    pub has_add: bool,
}

impl AdvisoryRequest {
    /// Build a request from loosely typed caller input.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::Range`] if the age is outside the accepted range and
    /// [`LensError::InvalidInput`] if the vision need is not recognised.
    pub fn from_inputs(
        source: PrescriptionSource,
        age_years: Option<i64>,
        vision_need: &str,
        frame_type: &str,
        has_add: bool,
    ) -> LensResult<Self> {
        Ok(Self {
            source,
            age: age_years.map(Age::new).transpose().map_err(LensError::from)?,
            vision_need: vision_need.parse()?,
            frame_type: FrameType::parse(frame_type),
            has_add,
        })
    }
}

/// Lens specification handed to pricing and presentation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LensAdvice {
    pub parsed_prescription: ParsedPrescription,
    pub spherical_equivalent: SphericalEquivalent,
    #[serde(rename = "maxAbsSE", serialize_with = "rust_decimal::serde::float::serialize")]
    pub max_abs_se: Decimal,
    pub vision_type: VisionTypeResult,
    pub required_index: IndexRecommendation,
    pub frame_safety: FrameSafetyResult,
}

/// Entry point for callers of the engine.
#[derive(Clone, Debug)]
pub struct LensAdvisor {
    cfg: Arc<AdvisorConfig>,
    parser: PrescriptionParser,
}

impl LensAdvisor {
    /// Creates a new advisor from configuration resolved at startup.
    pub fn new(cfg: Arc<AdvisorConfig>) -> Self {
        let parser = PrescriptionParser::from_config(&cfg);
        Self { cfg, parser }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.cfg
    }

    /// Parse recognised text using this advisor's configuration.
    pub fn parse(&self, text: &str) -> ParsedPrescription {
        self.parser.parse(text)
    }

    /// Produce the full lens specification for a request.
    pub fn advise(&self, request: &AdvisoryRequest) -> LensAdvice {
        let parsed_prescription = match &request.source {
            PrescriptionSource::Text(text) => self.parse(text),
            PrescriptionSource::Manual(entry) => entry.to_prescription(),
            PrescriptionSource::Parsed(rx) => rx.clone(),
        };

        if parsed_prescription.has_ambiguous_axis() {
            tracing::warn!("advice uses a positionally recovered axis; confirm with the customer");
        }

        let spherical_equivalent = SphericalEquivalent::of(&parsed_prescription);
        let max_abs_se = spherical_equivalent.max_abs;

        let vision_type = classify(&ClassifierInput {
            max_abs_se,
            add: parsed_prescription.add,
            age: request.age,
            vision_need: request.vision_need,
            has_add: request.has_add,
        });
        let required_index = resolve_index(request.frame_type, max_abs_se);
        let frame_safety = evaluate_safety(request.frame_type, max_abs_se);

        tracing::debug!(
            %max_abs_se,
            primary = ?vision_type.primary,
            %required_index,
            level = ?frame_safety.level,
            "lens advice produced"
        );

        LensAdvice {
            parsed_prescription,
            spherical_equivalent,
            max_abs_se,
            vision_type,
            required_index,
            frame_safety,
        }
    }
}

/// Render advice as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::LensError::InvalidJson`] if serialisation fails.
pub fn render_json<T: Serialize>(value: &T) -> LensResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
