//! 领域模型模块
//!
//! 纯数据结构与纯函数，不依赖 axum/tokio

pub mod deploy;
pub mod naming;
pub mod validation;

// Re-exports for convenience
pub use deploy::{
    Bundle, DeployPhase, DeploymentForm, DeploymentRequest, DeploymentResult,
    ProvisioningParameters, StorageAccountName, UrlSourceKind,
};
pub use validation::{validate, ValidationError};
