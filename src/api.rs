// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::MonitorConfig;
use crate::ingest::types::Candidate;
use crate::monitor::{Monitor, StatusSnapshot};

#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/status", get(status))
        .route("/check", post(force_check))
        .route("/recent", get(recent))
        .route("/keywords", put(update_keywords))
        .route("/config", put(update_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn status(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.monitor.status().await)
}

#[derive(Serialize)]
struct ForceCheckResp {
    queued: bool,
}

async fn force_check(State(state): State<AppState>) -> Json<ForceCheckResp> {
    Json(ForceCheckResp {
        queued: state.monitor.force_check(),
    })
}

#[derive(Deserialize)]
struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    limit: usize,
}

fn default_recent_limit() -> usize {
    20
}

async fn recent(
    State(state): State<AppState>,
    Query(q): Query<RecentQuery>,
) -> Json<Vec<Candidate>> {
    Json(state.monitor.recent_snapshot(q.limit))
}

#[derive(Serialize)]
struct OkResp {
    ok: bool,
}

#[derive(Deserialize)]
struct KeywordsReq {
    keywords: Vec<String>,
}

async fn update_keywords(
    State(state): State<AppState>,
    Json(req): Json<KeywordsReq>,
) -> Json<OkResp> {
    state.monitor.update_keywords(req.keywords).await;
    Json(OkResp { ok: true })
}

async fn update_config(
    State(state): State<AppState>,
    Json(cfg): Json<MonitorConfig>,
) -> Json<OkResp> {
    state.monitor.update_config(cfg).await;
    Json(OkResp { ok: true })
}
