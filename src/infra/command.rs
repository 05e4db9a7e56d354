//! 命令执行器
//!
//! 提供统一的外部命令执行接口，支持：
//! - 超时控制
//! - stdout/stderr 捕获
//! - 通过 `CommandExecutor` trait 注入（测试中替换为脚本化实现）

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::error;

/// 一次外部命令调用
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// 可执行文件路径
    pub program: PathBuf,
    /// 命令行参数
    pub args: Vec<String>,
    /// 工作目录（None 表示继承当前目录）
    pub work_dir: Option<PathBuf>,
    /// 超时时间
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new<I, S>(program: &Path, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_path_buf(),
            args: args.into_iter().map(Into::into).collect(),
            work_dir: None,
            timeout,
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.work_dir = Some(dir.to_path_buf());
        self
    }

    /// 用于日志的命令行，`redact` 中的值替换为 `***`
    pub fn display_redacted(&self, redact: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            if redact.contains(&arg.as_str()) {
                line.push_str("***");
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// 命令执行结果
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// 退出码（被信号终止时为 None）
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// 成功输出（测试和脚本化执行器使用）
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// 失败输出
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// 诊断文本：优先 stderr，其次 stdout，最后退出码
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// 命令执行错误
#[derive(Debug)]
pub enum CommandError {
    /// 命令启动失败
    SpawnFailed(std::io::Error),
    /// 命令超时
    Timeout(Duration),
    /// 等待命令完成失败
    WaitFailed(std::io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::SpawnFailed(e) => write!(f, "Failed to spawn command: {}", e),
            CommandError::Timeout(t) => write!(f, "Command timed out after {}s", t.as_secs()),
            CommandError::WaitFailed(e) => write!(f, "Failed to wait for command: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(e) | CommandError::WaitFailed(e) => Some(e),
            CommandError::Timeout(_) => None,
        }
    }
}

/// 外部命令执行接口
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// 基于 tokio::process 的真实执行器
pub struct CommandRunner;

impl CommandRunner {
    /// 执行命令并捕获输出
    ///
    /// 超时后放弃等待，不再追踪子进程
    pub async fn run_captured(spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &spec.work_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(CommandError::SpawnFailed)?;

        tokio::select! {
            result = child.wait_with_output() => {
                let output = result.map_err(CommandError::WaitFailed)?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            _ = tokio::time::sleep(spec.timeout) => {
                error!(program = %spec.program.display(), "Command timed out after {:?}", spec.timeout);
                Err(CommandError::Timeout(spec.timeout))
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for CommandRunner {
    async fn execute(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        Self::run_captured(spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captured_success() {
        let spec = CommandSpec::new(Path::new("echo"), ["hello"], Duration::from_secs(5))
            .current_dir(&std::env::temp_dir());
        let output = CommandRunner::run_captured(&spec).await.unwrap();

        assert!(output.success());
        assert!(output.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captured_nonzero_exit() {
        let spec = CommandSpec::new(Path::new("sh"), ["-c", "echo boom >&2; exit 3"], Duration::from_secs(5));
        let output = CommandRunner::run_captured(&spec).await.unwrap();

        assert!(!output.success());
        assert_eq!(output.code, Some(3));
        assert_eq!(output.diagnostic(), "boom");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captured_timeout() {
        let spec = CommandSpec::new(Path::new("sleep"), ["5"], Duration::from_millis(100));
        let result = CommandRunner::run_captured(&spec).await;

        assert!(matches!(result, Err(CommandError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_captured_not_found() {
        let spec = CommandSpec::new(Path::new("nonexistent_command_12345"), Vec::<String>::new(), Duration::from_secs(5));
        let result = CommandRunner::run_captured(&spec).await;

        assert!(matches!(result, Err(CommandError::SpawnFailed(_))));
    }

    #[test]
    fn test_display_redacted() {
        let spec = CommandSpec::new(
            Path::new("az"),
            ["storage", "--account-key", "s3cr3t"],
            Duration::from_secs(1),
        );
        assert_eq!(spec.display_redacted(&["s3cr3t"]), "az storage --account-key ***");
    }

    #[test]
    fn test_diagnostic_fallbacks() {
        assert_eq!(CommandOutput::failed(1, "  bad thing\n").diagnostic(), "bad thing");
        let out = CommandOutput {
            code: Some(2),
            stdout: "only stdout".to_string(),
            stderr: String::new(),
        };
        assert_eq!(out.diagnostic(), "only stdout");
        assert_eq!(CommandOutput::failed(7, "").diagnostic(), "exit code 7");
    }
}
