use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ledger_core::{Adoption, Block, Chain, LedgerError, Submission};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<Chain>,
}

#[derive(Deserialize)]
struct Payload {
    data: String,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

#[derive(Serialize)]
struct Head {
    height: u64,
    hash: String,
}

pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }

    fn internal(message: impl ToString) -> Self {
        let message = message.to_string();
        error!(%message, "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::internal(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_chain).post(write_block))
        .route("/chain", get(get_chain).post(offer_chain))
        .route("/chain/head", get(head))
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The chain as indented JSON, for people reading it with curl.
async fn get_chain(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(&state.chain.snapshot()).map_err(ApiError::internal)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn head(State(state): State<AppState>) -> Result<Json<Head>, ApiError> {
    let tip = state.chain.tip()?;
    Ok(Json(Head {
        height: tip.index,
        hash: tip.hash,
    }))
}

/// Mining is CPU-bound and unbounded, so it runs on the blocking pool.
async fn write_block(
    State(state): State<AppState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<(StatusCode, Json<Submission>), ApiError> {
    let Json(payload) = payload.map_err(ApiError::bad_request)?;
    let chain = Arc::clone(&state.chain);
    let submission = tokio::task::spawn_blocking(move || chain.submit_data(payload.data)).await??;
    Ok((StatusCode::ACCEPTED, Json(submission)))
}

async fn offer_chain(
    State(state): State<AppState>,
    candidate: Result<Json<Vec<Block>>, JsonRejection>,
) -> Result<Json<Adoption>, ApiError> {
    let Json(candidate) = candidate.map_err(ApiError::bad_request)?;
    let chain = Arc::clone(&state.chain);
    let adoption = tokio::task::spawn_blocking(move || chain.adopt(candidate)).await?;
    Ok(Json(adoption))
}
