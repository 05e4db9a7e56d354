//! 应用状态

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::env::EnvConfig;
use crate::infra::{CommandExecutor, CommandRunner, SystemToolLocator, ToolLocator};

/// 应用状态
pub struct AppState {
    /// 环境配置
    pub config: EnvConfig,
    /// 外部工具定位
    pub tools: Arc<dyn ToolLocator>,
    /// 外部命令执行器
    pub executor: Arc<dyn CommandExecutor>,
    /// 部署互斥锁（参数文件和 terraform 状态目录共享）
    pub deploy_lock: Mutex<()>,
    /// 服务启动时间
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// 使用真实的工具定位和命令执行器创建
    pub fn new(config: EnvConfig) -> Self {
        tracing::info!(
            port = config.port,
            terraform_dir = %config.terraform_dir.display(),
            frontend_dir = %config.frontend_dir.display(),
            uploads_dir = %config.uploads_dir.display(),
            max_upload_bytes = config.max_upload_bytes,
            "Loaded configuration"
        );

        let tools = SystemToolLocator::new(config.terraform_path.clone(), config.az_path.clone());
        Self::with_components(config, Arc::new(tools), Arc::new(CommandRunner))
    }

    /// 注入自定义组件创建（测试使用）
    pub fn with_components(
        config: EnvConfig,
        tools: Arc<dyn ToolLocator>,
        executor: Arc<dyn CommandExecutor>,
    ) -> Self {
        Self {
            config,
            tools,
            executor,
            deploy_lock: Mutex::new(()),
            started_at: Utc::now(),
        }
    }

    /// 是否有部署正在进行
    pub fn is_deploying(&self) -> bool {
        self.deploy_lock.try_lock().is_err()
    }
}
