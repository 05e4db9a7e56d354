//! 健康检查 API
//!
//! 包含 /status, /test 端点

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::env::constants::VERSION;
use crate::state::AppState;

/// 健康检查响应
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum StatusResponse {
    Healthy {
        status: &'static str,
        dependencies: &'static str,
        terraform_path: String,
        az_path: String,
        version: &'static str,
        deploying: bool,
        started_at: String,
    },
    Unhealthy {
        status: &'static str,
        error: String,
    },
}

/// 创建健康检查路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(status))
        .route("/test", get(test))
}

/// 检查外部工具是否可用
///
/// GET /status
async fn status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.tools.locate() {
        Ok(tools) => (
            StatusCode::OK,
            Json(StatusResponse::Healthy {
                status: "healthy",
                dependencies: "all_installed",
                terraform_path: tools.terraform.display().to_string(),
                az_path: tools.az.display().to_string(),
                version: VERSION,
                deploying: state.is_deploying(),
                started_at: state.started_at.to_rfc3339(),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Dependency check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusResponse::Unhealthy {
                    status: "unhealthy",
                    error: e.to_string(),
                }),
            )
        }
    }
}

/// 确认服务已启动
///
/// GET /test
async fn test() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "HostForge agent is running! Landing page is served at /"
    }))
}
