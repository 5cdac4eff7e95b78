//! HTTP-level integration tests for the dashboard and list views.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, build_test_app, get_auth, sign_up};
use deepguard_core::analysis::{AnalysisDetails, AnalysisResult};
use deepguard_db::models::video_analysis::{CompleteVideoAnalysis, CreateVideoAnalysis};
use deepguard_db::store::{AnalysisStore, MemoryAnalysisStore};
use uuid::Uuid;

async fn seed(store: &MemoryAnalysisStore, user_id: Uuid, name: &str, result: Option<AnalysisResult>) {
    let url = format!("memory://deepfake-videos/{user_id}/{name}");
    store
        .insert(&CreateVideoAnalysis {
            user_id,
            video_url: url.clone(),
            file_name: name.to_string(),
            file_size: 1,
        })
        .await
        .unwrap();

    if let Some(result) = result {
        let update = CompleteVideoAnalysis {
            result,
            confidence_score: 80,
            details: AnalysisDetails::default(),
            completed_at: Utc::now(),
        };
        store.complete_by_video_url(&url, &update).await.unwrap();
    }
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = build_test_app();
    let session = sign_up(app.router(), "ada@example.com", "secret1").await;
    let token = session["access_token"].as_str().unwrap();
    let user_id: Uuid = session["user"]["id"].as_str().unwrap().parse().unwrap();

    seed(&app.analyses, user_id, "a.mp4", Some(AnalysisResult::Authentic)).await;
    seed(&app.analyses, user_id, "b.mp4", Some(AnalysisResult::Deepfake)).await;
    seed(&app.analyses, user_id, "c.mp4", Some(AnalysisResult::Deepfake)).await;
    seed(&app.analyses, user_id, "d.mp4", None).await;
    seed(&app.analyses, Uuid::new_v4(), "other.mp4", Some(AnalysisResult::Deepfake)).await;

    let response = get_auth(app.router(), "/api/v1/dashboard", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let summary = &json["data"]["summary"];
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["authentic"], 1);
    assert_eq!(summary["deepfake"], 2);
    assert_eq!(summary["other"], 1);

    let names: Vec<&str> = json["data"]["analyses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["file_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["d.mp4", "c.mp4", "b.mp4", "a.mp4"]);
}

#[tokio::test]
async fn test_empty_dashboard() {
    let app = build_test_app();
    let session = sign_up(app.router(), "ada@example.com", "secret1").await;
    let token = session["access_token"].as_str().unwrap();

    let json = body_json(get_auth(app.router(), "/api/v1/dashboard", token).await).await;
    assert_eq!(json["data"]["analyses"].as_array().unwrap().len(), 0);
    assert_eq!(
        json["data"]["summary"],
        serde_json::json!({ "total": 0, "deepfake": 0, "authentic": 0, "other": 0 })
    );
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let app = build_test_app();
    let session = sign_up(app.router(), "ada@example.com", "secret1").await;
    let token = session["access_token"].as_str().unwrap();
    let user_id: Uuid = session["user"]["id"].as_str().unwrap().parse().unwrap();

    seed(&app.analyses, user_id, "first.mp4", None).await;
    seed(&app.analyses, user_id, "second.mp4", None).await;

    let json = body_json(get_auth(app.router(), "/api/v1/analyses", token).await).await;
    let list = json["data"].as_array().unwrap();
    assert_eq!(list[0]["file_name"], "second.mp4");
    assert_eq!(list[1]["file_name"], "first.mp4");
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let app = build_test_app();
    let session = sign_up(app.router(), "ada@example.com", "secret1").await;
    let token = session["access_token"].as_str().unwrap();

    let response = get_auth(app.router(), "/api/v1/analyses/999", token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}
