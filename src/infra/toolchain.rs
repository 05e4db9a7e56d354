//! 外部工具定位
//!
//! 查找 terraform 与 az 可执行文件：显式配置 > PATH > 常见安装路径

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 已定位的外部工具
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub terraform: PathBuf,
    pub az: PathBuf,
}

/// 缺少外部工具
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The following tools are not installed or not in PATH: {}", .missing.join(", "))]
pub struct EnvironmentError {
    pub missing: Vec<&'static str>,
}

/// 工具定位接口
pub trait ToolLocator: Send + Sync {
    fn locate(&self) -> Result<ToolPaths, EnvironmentError>;
}

/// 固定路径（测试或已知部署环境）
pub struct FixedTools(pub ToolPaths);

impl ToolLocator for FixedTools {
    fn locate(&self) -> Result<ToolPaths, EnvironmentError> {
        Ok(self.0.clone())
    }
}

/// 基于文件系统的工具定位
#[derive(Debug, Clone, Default)]
pub struct SystemToolLocator {
    /// TERRAFORM_PATH
    pub terraform_override: Option<PathBuf>,
    /// AZ_PATH
    pub az_override: Option<PathBuf>,
}

impl SystemToolLocator {
    pub fn new(terraform_override: Option<PathBuf>, az_override: Option<PathBuf>) -> Self {
        Self {
            terraform_override,
            az_override,
        }
    }
}

impl ToolLocator for SystemToolLocator {
    fn locate(&self) -> Result<ToolPaths, EnvironmentError> {
        let search_path = env::var_os("PATH");

        let terraform = resolve(
            self.terraform_override.as_deref(),
            "terraform",
            search_path.as_deref(),
            &terraform_install_paths(),
        );
        let az = resolve(
            self.az_override.as_deref(),
            "az",
            search_path.as_deref(),
            &az_install_paths(),
        );

        match (terraform, az) {
            (Some(terraform), Some(az)) => Ok(ToolPaths { terraform, az }),
            (terraform, az) => {
                let mut missing = Vec::new();
                if terraform.is_none() {
                    missing.push("Terraform");
                }
                if az.is_none() {
                    missing.push("Azure CLI");
                }
                Err(EnvironmentError { missing })
            }
        }
    }
}

fn resolve(
    explicit: Option<&Path>,
    name: &str,
    search_path: Option<&OsStr>,
    install_paths: &[PathBuf],
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }
    find_on_path(name, search_path)
        .or_else(|| install_paths.iter().find(|p| p.is_file()).cloned())
}

/// 在 PATH 风格的目录列表中查找可执行文件（Windows 上按 PATHEXT 补全扩展名）
pub fn find_on_path(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match which::which_in(name, search_path, cwd) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!(tool = name, error = %e, "Not found on PATH");
            None
        }
    }
}

#[cfg(windows)]
fn terraform_install_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(r"C:\Program Files\Terraform\terraform.exe"),
        PathBuf::from(r"C:\terraform\terraform.exe"),
    ];
    if let Some(local) = env::var_os("LOCALAPPDATA") {
        paths.push(PathBuf::from(local).join(
            r"Microsoft\WinGet\Packages\HashiCorp.Terraform_Microsoft.Winget.Source_8wekyb3d8bbwe\terraform.exe",
        ));
    }
    paths
}

#[cfg(not(windows))]
fn terraform_install_paths() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(windows)]
fn az_install_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(r"C:\Program Files (x86)\Microsoft SDKs\Azure\CLI2\wbin\az.cmd"),
        PathBuf::from(r"C:\Program Files\Microsoft SDKs\Azure\CLI2\wbin\az.cmd"),
    ];
    if let Some(local) = env::var_os("LOCALAPPDATA") {
        paths.push(PathBuf::from(local).join(r"Programs\Microsoft Azure CLI\az.cmd"));
    }
    paths
}

#[cfg(not(windows))]
fn az_install_paths() -> Vec<PathBuf> {
    Vec::new()
}
