//! 部署 API
//!
//! POST /deploy（multipart 表单：location, environment, owner,
//! storage_account_name, zip_file）

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::domain::{Bundle, DeploymentForm, DeploymentResult, ValidationError};
use crate::error::{ApiError, ApiResult};
use crate::services;
use crate::services::deploy::DeployError;
use crate::state::AppState;

/// 创建部署路由
pub fn router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/deploy", post(deploy_site))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// 部署静态站点
///
/// POST /deploy
///
/// 同步执行完整部署流程，返回最终 URL
async fn deploy_site(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<DeploymentResult>> {
    let multipart = multipart.map_err(|rejection| {
        tracing::warn!(%rejection, "Deploy request is not a multipart form");
        ApiError::bad_request("validation", ValidationError::MissingFields.to_string())
    })?;

    let form = read_form(multipart).await?;
    tracing::info!(
        location = ?form.location,
        environment = ?form.environment,
        owner = ?form.owner,
        storage_account_name = ?form.storage_account_name,
        bundle = ?form.bundle,
        "Deploy request received"
    );

    // 客户端断开不会中断部署：流水线在独立任务中跑完
    let task_state = state.clone();
    let result = tokio::spawn(async move { services::deploy::execute(&task_state, form).await })
        .await
        .map_err(|e| DeployError::Unexpected(format!("deploy task failed: {}", e)))??;
    Ok(Json(result))
}

/// 读取 multipart 字段，未知字段忽略
async fn read_form(mut multipart: Multipart) -> ApiResult<DeploymentForm> {
    let mut form = DeploymentForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "location" => form.location = Some(field.text().await?),
            "environment" => form.environment = Some(field.text().await?),
            "owner" => form.owner = Some(field.text().await?),
            "storage_account_name" => form.storage_account_name = Some(field.text().await?),
            "zip_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.bundle = Some(Bundle::new(filename, bytes.to_vec()));
            }
            _ => {
                tracing::debug!(field = %name, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}
