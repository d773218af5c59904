//! HTTP API server.
//!
//! Exposes the question-answering pipeline and the stored history as JSON
//! endpoints with permissive CORS.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::KikkError;
use crate::orchestrator::Orchestrator;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

/// Run the HTTP API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::warning(&format!("{}", e));
        Output::warning("Requests that need the model providers will fail until this is fixed.");
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let app = build_router(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("kikk API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /api/health");
    Output::kv("Summarize", "POST /api/summarize-youtube");
    Output::kv("History", "GET  /api/history");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router around a shared orchestrator.
pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/summarize-youtube", post(summarize_youtube))
        .route("/api/history", get(history))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(orchestrator)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SummarizeRequest {
    #[serde(default)]
    video_url: String,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Deserialize)]
struct HistoryQuery {
    user_id: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

/// Map a pipeline failure onto a status code and client-facing message.
fn pipeline_error(e: KikkError) -> Response {
    match e {
        KikkError::InvalidVideoUrl(_) => error_response(StatusCode::BAD_REQUEST, "Invalid YouTube URL"),
        KikkError::Transcript(reason) => {
            warn!("Transcript unavailable: {}", reason);
            error_response(StatusCode::BAD_REQUEST, "No transcript available")
        }
        e if e.is_upstream() => {
            error!("Upstream provider failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        e => {
            error!("Request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn summarize_youtube(
    State(orchestrator): State<Arc<Orchestrator>>,
    body: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    match orchestrator
        .summarize(&req.video_url, req.question.as_deref(), req.user_id.as_deref())
        .await
    {
        Ok(outcome) => Json(SummarizeResponse {
            summary: outcome.answer,
        })
        .into_response(),
        Err(e) => pipeline_error(e),
    }
}

async fn history(State(orchestrator): State<Arc<Orchestrator>>, Query(query): Query<HistoryQuery>) -> Response {
    match orchestrator
        .history()
        .list(query.user_id.as_deref(), query.limit)
        .await {
        Ok(records) => Json(records).into_response(),
        Err(e) => pipeline_error(e),
    }
}
