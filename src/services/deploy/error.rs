//! Deployment failure taxonomy

use std::time::Duration;
use thiserror::Error;

use crate::domain::ValidationError;
use crate::infra::EnvironmentError;

use super::archive::ExtractError;

/// Which terraform phase failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    Init,
    Apply,
}

impl ProvisionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvisionStep::Init => "init",
            ProvisionStep::Apply => "apply",
        }
    }
}

/// Coarse error bucket reported to callers as `kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Validation,
    Extraction,
    Provisioning,
    Upload,
    Unexpected,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Precondition => "precondition",
            ErrorKind::Validation => "validation",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Provisioning => "provisioning",
            ErrorKind::Upload => "upload",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

/// Every way a deployment can fail
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    MissingTools(#[from] EnvironmentError),

    #[error("Please run 'az login' in your terminal first")]
    NotAuthenticated { detail: String },

    #[error("Azure CLI command timed out. Please check your Azure login status.")]
    AuthProbeTimedOut,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Deployment failed: terraform {} failed: {detail}", .step.as_str())]
    Provisioning { step: ProvisionStep, detail: String },

    #[error("Operation timed out: terraform {} did not finish within {}s", .step.as_str(), .timeout.as_secs())]
    ProvisioningTimedOut { step: ProvisionStep, timeout: Duration },

    #[error("Failed to retrieve storage account key: {0}")]
    Credential(String),

    #[error("File upload failed: {0}")]
    Upload(String),

    #[error("File upload timed out. Please try again.")]
    UploadTimedOut,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::MissingTools(_)
            | DeployError::NotAuthenticated { .. }
            | DeployError::AuthProbeTimedOut => ErrorKind::Precondition,
            DeployError::Validation(_) => ErrorKind::Validation,
            DeployError::Extraction(_) => ErrorKind::Extraction,
            DeployError::Provisioning { .. } | DeployError::ProvisioningTimedOut { .. } => {
                ErrorKind::Provisioning
            }
            DeployError::Credential(_) | DeployError::Upload(_) | DeployError::UploadTimedOut => {
                ErrorKind::Upload
            }
            DeployError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Whether the caller sent something we can never deploy
    pub fn is_client_error(&self) -> bool {
        match self {
            DeployError::Validation(_) => true,
            DeployError::Extraction(e) => e.is_client_error(),
            _ => false,
        }
    }
}

impl From<std::io::Error> for DeployError {
    fn from(e: std::io::Error) -> Self {
        DeployError::Unexpected(e.to_string())
    }
}
