use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use crate::api::{ApiAnalysisResponse, ApiDemoQuery, ApiInsightsResponse};
use competitor_analytics::analysis::InsightGenerator;
use competitor_analytics::config::AnalyticsConfig;
use competitor_analytics::ingest::{dataset_to_json, parse_dataset};
use competitor_analytics::synthetic::generate_dataset;
use competitor_analytics::{build_report, AnalyticsError};

const MAX_DEMO_POSTS: usize = 500;

#[derive(Clone)]
struct AppState {
    config: Arc<AnalyticsConfig>,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs, config: AnalyticsConfig) -> Result<(), String> {
    let state = AppState {
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/insights", post(insights_handler))
        .route("/api/demo", get(demo_handler))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;

    tracing::info!(%addr, "serving analytics API");
    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn analyze_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiAnalysisResponse>, (StatusCode, String)> {
    let request_id = generate_request_id();
    let dataset = parse_dataset(&body).map_err(rejection)?;
    let report = build_report(&dataset, &state.config).map_err(rejection)?;
    tracing::debug!(%request_id, profiles = dataset.len(), "analysis complete");
    Ok(Json(ApiAnalysisResponse::from_report(report, request_id)))
}

async fn insights_handler(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ApiInsightsResponse>, (StatusCode, String)> {
    let request_id = generate_request_id();
    let dataset = parse_dataset(&body).map_err(rejection)?;
    let insights = InsightGenerator::new(state.config.recommendations.clone())
        .generate(&dataset)
        .map_err(rejection)?;
    Ok(Json(ApiInsightsResponse {
        request_id,
        insights,
    }))
}

async fn demo_handler(
    Query(query): Query<ApiDemoQuery>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let posts = query.posts.unwrap_or(20).min(MAX_DEMO_POSTS);
    let dataset = generate_dataset(&query.usernames(), posts, query.seed.unwrap_or(42));
    let payload = dataset_to_json(&dataset).map_err(rejection)?;
    Ok(Json(payload))
}

fn rejection(err: AnalyticsError) -> (StatusCode, String) {
    let status = match &err {
        AnalyticsError::InvalidInput { .. } | AnalyticsError::Parse(_) => StatusCode::BAD_REQUEST,
        AnalyticsError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::warn!(%status, error = %err, "request rejected");
    (status, err.to_string())
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}
