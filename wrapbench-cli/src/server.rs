use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde::Serialize;
use wrapbench_runtime::ConfigView;
use wrapbench_runtime::Orchestrator;
use wrapbench_runtime::QueryRequest;
use wrapbench_runtime::QueryResponse;
use wrapbench_runtime::RunError;
use wrapbench_runtime::WrapperList;
use wrapbench_runtime::wrapper_catalog;

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
}

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/query", post(query))
        .route("/wrappers", get(wrappers))
        .route("/config", get(config))
        .with_state(AppState { orchestrator })
}

/// Serve until ctrl-c.
pub async fn serve(addr: SocketAddr, orchestrator: Arc<Orchestrator>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(orchestrator))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn wrappers() -> Json<WrapperList> {
    Json(WrapperList {
        wrappers: wrapper_catalog(),
    })
}

async fn config(State(state): State<AppState>) -> Json<ConfigView> {
    Json(state.orchestrator.config_view())
}

/// Each run is spawned on its own task: a caller that disconnects mid-loop
/// does not cancel it, so the run still completes and is traced.
async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;
    let orchestrator = Arc::clone(&state.orchestrator);
    let response = tokio::spawn(async move { orchestrator.handle(request).await })
        .await
        .map_err(|e| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string()))??;
    Ok(Json(response))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
        }
    }
}

impl From<RunError> for ApiError {
    fn from(err: RunError) -> Self {
        let status = match &err {
            RunError::Validation(_) => StatusCode::BAD_REQUEST,
            RunError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            RunError::Trace(_) | RunError::Transition(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!(error = %err, "query failed");
        }
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), "validation_error", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
