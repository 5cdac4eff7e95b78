//! Video analysis record vocabulary: status/result enums, the detail
//! signal flags, and dashboard aggregation.
//!
//! Status and result values are persisted as lowercase text; the
//! [`TryFrom<String>`] impls let the db layer decode them straight from rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Storage bucket (and URL path segment) that holds uploaded videos.
pub const VIDEO_BUCKET: &str = "deepfake-videos";

/// Default delay before the simulated analysis completes a record.
pub const DEFAULT_ANALYSIS_DELAY_SECS: u64 = 5;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a video analysis record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [AnalysisStatus; 4] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
    ];

    /// Database / wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown analysis status '{s}'")))
    }
}

impl TryFrom<String> for AnalysisStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Verdict attached to a record. Only `Authentic` and `Deepfake` are ever
/// produced by the simulator; `Suspicious` is representable for imported rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisResult {
    Unknown,
    Authentic,
    Deepfake,
    Suspicious,
}

impl AnalysisResult {
    pub const ALL: [AnalysisResult; 4] = [
        Self::Unknown,
        Self::Authentic,
        Self::Deepfake,
        Self::Suspicious,
    ];

    /// Database / wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Authentic => "authentic",
            Self::Deepfake => "deepfake",
            Self::Suspicious => "suspicious",
        }
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisResult {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|result| result.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown analysis result '{s}'")))
    }
}

impl TryFrom<String> for AnalysisResult {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Details
// ---------------------------------------------------------------------------

/// Fixed-shape detail record: four independent signal flags.
///
/// These are drawn at random by the simulator; they do not describe any
/// property of the uploaded video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub facial_inconsistencies: bool,
    pub temporal_anomalies: bool,
    pub audio_visual_mismatch: bool,
    pub frequency_artifacts: bool,
}

// ---------------------------------------------------------------------------
// Dashboard aggregation
// ---------------------------------------------------------------------------

/// Counts shown on the dashboard, computed from the in-memory list.
///
/// `total == authentic + deepfake + other` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub deepfake: usize,
    pub authentic: usize,
    pub other: usize,
}

impl AnalysisSummary {
    pub fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = AnalysisResult>,
    {
        results
            .into_iter()
            .fold(Self::default(), |mut summary, result| {
                summary.total += 1;
                match result {
                    AnalysisResult::Deepfake => summary.deepfake += 1,
                    AnalysisResult::Authentic => summary.authentic += 1,
                    AnalysisResult::Unknown | AnalysisResult::Suspicious => summary.other += 1,
                }
                summary
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
