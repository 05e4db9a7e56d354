//! HostForge - 静态站点部署代理
//!
//! 接收站点 ZIP 包，通过 Terraform 创建 Azure 存储账户并上传站点文件

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod services;
pub mod state;

use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::EnvConfig;
use crate::state::AppState;

/// 命令行覆盖项
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// --port
    pub port_override: Option<u16>,
    /// --host
    pub host_override: Option<String>,
}

/// 加载配置并启动 HTTP 服务，直到收到 Ctrl-C
pub async fn init_and_run(runtime: RuntimeConfig) -> anyhow::Result<()> {
    let mut config = EnvConfig::from_env();
    if let Some(port) = runtime.port_override {
        config.port = port;
    }
    if let Some(host) = runtime.host_override {
        config.host = host;
    }

    if !config.terraform_dir.is_dir() {
        tracing::warn!(
            terraform_dir = %config.terraform_dir.display(),
            "Terraform directory does not exist; deployments will fail until it is created"
        );
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(addr = %addr, version = config::env::constants::VERSION, "HostForge agent listening");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
        }
        signal_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
