//! 环境变量配置加载

use std::env;
use std::path::PathBuf;
use tracing::warn;

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 监听地址
    pub host: String,
    /// 服务监听端口
    pub port: u16,
    /// Terraform 工作目录（参数文件写在这里）
    pub terraform_dir: PathBuf,
    /// 前端静态文件目录
    pub frontend_dir: PathBuf,
    /// 每次部署的临时工作区父目录
    pub uploads_dir: PathBuf,
    /// 显式指定的 terraform 路径
    pub terraform_path: Option<PathBuf>,
    /// 显式指定的 az 路径
    pub az_path: Option<PathBuf>,
    /// 上传大小上限（字节）
    pub max_upload_bytes: usize,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = load_with_fallback("HOSTFORGE_PORT", "PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(constants::DEFAULT_PORT);

        let terraform_dir = path_var("TERRAFORM_DIR").unwrap_or_else(|| PathBuf::from("terraform"));
        let frontend_dir = path_var("FRONTEND_DIR").unwrap_or_else(|| PathBuf::from("frontend"));
        let uploads_dir = path_var("UPLOADS_DIR")
            .unwrap_or_else(|| env::temp_dir().join(constants::UPLOADS_DIR_NAME));

        let max_upload_mb = match env::var("MAX_UPLOAD_MB") {
            Ok(v) => v.parse().unwrap_or_else(|_| {
                warn!(value = %v, "Invalid MAX_UPLOAD_MB, using default");
                constants::DEFAULT_MAX_UPLOAD_MB
            }),
            Err(_) => constants::DEFAULT_MAX_UPLOAD_MB,
        };

        Self {
            host,
            port,
            terraform_dir,
            frontend_dir,
            uploads_dir,
            terraform_path: path_var("TERRAFORM_PATH"),
            az_path: path_var("AZ_PATH"),
            max_upload_bytes: upload_limit_bytes(max_upload_mb),
        }
    }

    /// 参数文件路径
    pub fn parameters_path(&self) -> PathBuf {
        self.terraform_dir.join(constants::PARAMETERS_FILE)
    }
}

/// MB 转字节，溢出时取上限
fn upload_limit_bytes(mb: usize) -> usize {
    mb.checked_mul(1024 * 1024).unwrap_or_else(|| {
        warn!(value = mb, "MAX_UPLOAD_MB too large, using maximum body size");
        usize::MAX
    })
}

/// 加载环境变量，支持 fallback
fn load_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary).ok().or_else(|| env::var(fallback).ok())
}

fn path_var(name: &str) -> Option<PathBuf> {
    env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// 常量
pub mod constants {
    /// 默认端口
    pub const DEFAULT_PORT: u16 = 5000;

    /// 默认上传大小上限（MB）
    pub const DEFAULT_MAX_UPLOAD_MB: usize = 100;

    /// 临时工作区父目录名
    pub const UPLOADS_DIR_NAME: &str = "hostforge_upload";

    /// Terraform 参数文件名
    pub const PARAMETERS_FILE: &str = "terraform.tfvars.json";

    /// az account show 超时（秒）
    pub const AUTH_PROBE_TIMEOUT_SECS: u64 = 30;

    /// terraform init 超时（秒）
    pub const TERRAFORM_INIT_TIMEOUT_SECS: u64 = 300;

    /// terraform apply 超时（秒）
    pub const TERRAFORM_APPLY_TIMEOUT_SECS: u64 = 600;

    /// terraform output 超时（秒）
    pub const TERRAFORM_OUTPUT_TIMEOUT_SECS: u64 = 60;

    /// 存储账户密钥查询超时（秒）
    pub const STORAGE_KEY_TIMEOUT_SECS: u64 = 60;

    /// 批量上传超时（秒）
    pub const UPLOAD_TIMEOUT_SECS: u64 = 300;

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
