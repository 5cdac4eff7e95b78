//! Handler for the dashboard: the caller's analyses plus verdict counts.

use axum::extract::State;
use axum::Json;
use deepguard_core::analysis::AnalysisSummary;
use deepguard_db::models::video_analysis::VideoAnalysis;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Newest first.
    pub analyses: Vec<VideoAnalysis>,
    pub summary: AnalysisSummary,
}

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<DashboardData>>> {
    let analyses = state.analyses.list_for_user(auth.user_id).await?;
    let summary = AnalysisSummary::from_results(analyses.iter().map(|a| a.result));

    Ok(Json(DataResponse {
        data: DashboardData { analyses, summary },
    }))
}
