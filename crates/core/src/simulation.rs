//! Simulated analysis outcome.
//!
//! This is a stub standing in for a detection engine. It looks at nothing:
//! every field is an independent uniform draw.

use std::ops::Range;

use rand::Rng;
use serde::Serialize;

use crate::analysis::{AnalysisDetails, AnalysisResult};

/// Confidence percentages are drawn uniformly from this half-open range.
pub const CONFIDENCE_RANGE: Range<i32> = 70..100;

/// One randomly drawn verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulatedOutcome {
    pub result: AnalysisResult,
    pub confidence_score: i32,
    pub details: AnalysisDetails,
}

impl SimulatedOutcome {
    /// Draw a verdict: a fair coin between authentic and deepfake, a
    /// confidence in [`CONFIDENCE_RANGE`], and four independent signal flags.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let result = if rng.random_bool(0.5) {
            AnalysisResult::Authentic
        } else {
            AnalysisResult::Deepfake
        };
        let confidence_score = rng.random_range(CONFIDENCE_RANGE);
        let details = AnalysisDetails {
            facial_inconsistencies: rng.random_bool(0.5),
            temporal_anomalies: rng.random_bool(0.5),
            audio_visual_mismatch: rng.random_bool(0.5),
            frequency_artifacts: rng.random_bool(0.5),
        };

        Self {
            result,
            confidence_score,
            details,
        }
    }
}
