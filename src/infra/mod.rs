//! 基础设施模块
//!
//! 封装外部依赖（命令执行、工具定位）

pub mod command;
pub mod toolchain;

pub use command::{CommandError, CommandExecutor, CommandOutput, CommandRunner, CommandSpec};
pub use toolchain::{EnvironmentError, FixedTools, SystemToolLocator, ToolLocator, ToolPaths};
