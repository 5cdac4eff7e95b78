//! Video analysis record model and DTOs.

use deepguard_core::analysis::{AnalysisDetails, AnalysisResult, AnalysisStatus};
use deepguard_core::simulation::SimulatedOutcome;
use deepguard_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `video_analyses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VideoAnalysis {
    pub id: DbId,
    pub user_id: UserId,
    pub video_url: String,
    pub file_name: String,
    pub file_size: i64,
    #[sqlx(try_from = "String")]
    pub status: AnalysisStatus,
    #[sqlx(try_from = "String")]
    pub result: AnalysisResult,
    /// Integer percentage; only present once the record is completed.
    pub confidence_score: Option<i32>,
    pub analysis_details: Option<Json<AnalysisDetails>>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

/// DTO for inserting a freshly uploaded video.
///
/// Status and result are not part of the DTO: new rows are always
/// `pending` / `unknown`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVideoAnalysis {
    pub user_id: UserId,
    pub video_url: String,
    pub file_name: String,
    pub file_size: i64,
}

/// DTO applied by the analysis simulator when a record completes.
#[derive(Debug, Clone)]
pub struct CompleteVideoAnalysis {
    pub result: AnalysisResult,
    pub confidence_score: i32,
    pub details: AnalysisDetails,
    pub completed_at: Timestamp,
}

impl CompleteVideoAnalysis {
    pub fn from_outcome(outcome: SimulatedOutcome, completed_at: Timestamp) -> Self {
        Self {
            result: outcome.result,
            confidence_score: outcome.confidence_score,
            details: outcome.details,
            completed_at,
        }
    }
}
