//! 统一错误处理
//!
//! 提供 `ApiError` 枚举实现 `IntoResponse`，响应体统一为 `{ "error": ..., "kind": ... }`

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::deploy::DeployError;

/// API 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

impl ErrorResponse {
    pub fn new(kind: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind,
        }
    }
}

/// 统一 API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 400 - 请求无效
    BadRequest { kind: &'static str, message: String },
    /// 500 - 内部错误
    Internal { kind: &'static str, message: String },
}

impl ApiError {
    /// 创建请求无效错误
    pub fn bad_request(kind: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            kind,
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(kind: &'static str, message: impl Into<String>) -> Self {
        Self::Internal {
            kind,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DeployError> for ApiError {
    fn from(e: DeployError) -> Self {
        let kind = e.kind().as_str();
        if e.is_client_error() {
            ApiError::bad_request(kind, e.to_string())
        } else {
            ApiError::internal(kind, e.to_string())
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::bad_request("validation", format!("Invalid form data: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match self {
            ApiError::BadRequest { kind, message } | ApiError::Internal { kind, message } => {
                (kind, message)
            }
        };

        (status, Json(ErrorResponse::new(kind, message))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            ApiError::Internal { message, .. } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;
