//! REST API Server for the fund chatbot
//!
//! `POST /chat` always answers `200 {"answer": ...}`; failures of any kind
//! collapse to the fixed refusal.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::pipeline::{Pipeline, FALLBACK_ANSWER};

/// =============================
/// Request / Response Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatResponse {
    pub answer: String,
}

impl ChatResponse {
    fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
}

/// =============================
/// Info + Health Endpoints
/// =============================

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Fund RAG Chatbot API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /chat": "Send a question to the chatbot",
            "GET /health": "Health check endpoint"
        }
    }))
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let dataset = state.pipeline.retrieval().dataset();

    Json(serde_json::json!({
        "status": "healthy",
        "data_loaded": true,
        "holdings_rows": dataset.holdings().len(),
        "trades_rows": dataset.trades().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Chat Endpoint
/// =============================

async fn chat(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected chat request body");
            return Json(ChatResponse::fallback());
        }
    };

    info!("Received chat question: {}", req.question);

    // a panic inside the pipeline surfaces as a JoinError, not a dropped connection
    let pipeline = state.pipeline.clone();
    let handle = tokio::spawn(async move { pipeline.answer(&req.question).await });

    match handle.await {
        Ok(answer) => Json(ChatResponse { answer }),
        Err(e) => {
            error!(error = %e, "Pipeline task aborted");
            Json(ChatResponse::fallback())
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(pipeline: Arc<Pipeline>) -> Router {
    let state = ApiState { pipeline };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    pipeline: Arc<Pipeline>,
    bind_address: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(pipeline);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;

    info!("API Server listening on http://{}", bind_address);

    axum::serve(listener, router).await?;

    Ok(())
}
