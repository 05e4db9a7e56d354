//! 前端静态文件
//!
//! GET / 返回 landing.html，GET /<path> 直接映射到前端目录

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::no_cache;
use crate::state::AppState;

/// 落地页文件名
pub const LANDING_PAGE: &str = "landing.html";

/// 创建前端路由
pub fn router(frontend_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route_service("/", ServeFile::new(frontend_dir.join(LANDING_PAGE)))
        .route_service("/*path", ServeDir::new(frontend_dir))
        .layer(axum::middleware::from_fn(no_cache))
}
