//! Repository for the `video_analyses` table.

use deepguard_core::analysis::{AnalysisResult, AnalysisStatus};
use deepguard_core::types::{DbId, UserId};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::video_analysis::{CompleteVideoAnalysis, CreateVideoAnalysis, VideoAnalysis};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, video_url, file_name, file_size, status, result, \
                       confidence_score, analysis_details, created_at, completed_at, updated_at";

/// Provides CRUD operations for video analysis records. Records are never
/// deleted.
pub struct VideoAnalysisRepo;

impl VideoAnalysisRepo {
    /// Insert a new record in `pending` / `unknown` state, returning the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVideoAnalysis,
    ) -> Result<VideoAnalysis, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_analyses (user_id, video_url, file_name, file_size, status, result)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoAnalysis>(&query)
            .bind(input.user_id)
            .bind(&input.video_url)
            .bind(&input.file_name)
            .bind(input.file_size)
            .bind(AnalysisStatus::Pending.as_str())
            .bind(AnalysisResult::Unknown.as_str())
            .fetch_one(pool)
            .await
    }

    /// Mark every not-yet-completed record with the given storage URL as
    /// completed. Returns the number of rows updated.
    pub async fn complete_by_video_url(
        pool: &PgPool,
        video_url: &str,
        input: &CompleteVideoAnalysis,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video_analyses SET
                status = $2,
                result = $3,
                confidence_score = $4,
                analysis_details = $5,
                completed_at = $6,
                updated_at = NOW()
             WHERE video_url = $1 AND status IN ($7, $8)",
        )
        .bind(video_url)
        .bind(AnalysisStatus::Completed.as_str())
        .bind(input.result.as_str())
        .bind(input.confidence_score)
        .bind(Json(input.details))
        .bind(input.completed_at)
        .bind(AnalysisStatus::Pending.as_str())
        .bind(AnalysisStatus::Processing.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a user's records, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<VideoAnalysis>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_analyses
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, VideoAnalysis>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a single record, scoped to its owner.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<VideoAnalysis>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_analyses WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, VideoAnalysis>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
