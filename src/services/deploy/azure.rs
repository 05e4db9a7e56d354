//! Azure CLI driver
//!
//! Session probe, storage key lookup and batch upload into the static
//! website container.

use std::path::Path;
use std::time::Duration;

use crate::config::env::constants::{
    AUTH_PROBE_TIMEOUT_SECS, STORAGE_KEY_TIMEOUT_SECS, UPLOAD_TIMEOUT_SECS,
};
use crate::domain::StorageAccountName;
use crate::infra::{CommandError, CommandExecutor, CommandSpec};

use super::error::DeployError;

/// Container served by Azure static website hosting
pub const STATIC_WEBSITE_CONTAINER: &str = "$web";

pub struct AzureCli<'a> {
    executor: &'a dyn CommandExecutor,
    binary: &'a Path,
}

impl<'a> AzureCli<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, binary: &'a Path) -> Self {
        Self { executor, binary }
    }

    /// Check that `az` has a logged-in session
    pub async fn probe_session(&self) -> Result<(), DeployError> {
        let spec = CommandSpec::new(
            self.binary,
            ["account", "show", "--output", "none"],
            Duration::from_secs(AUTH_PROBE_TIMEOUT_SECS),
        );

        match self.executor.execute(&spec).await {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => {
                let detail = output.diagnostic();
                tracing::warn!(detail = %detail, "az account show failed");
                Err(DeployError::NotAuthenticated { detail })
            }
            Err(CommandError::Timeout(_)) => Err(DeployError::AuthProbeTimedOut),
            Err(e) => {
                tracing::warn!(error = %e, "az account show could not run");
                Err(DeployError::NotAuthenticated {
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Primary access key of the storage account
    pub async fn storage_key(&self, account: &StorageAccountName) -> Result<String, DeployError> {
        let spec = CommandSpec::new(
            self.binary,
            [
                "storage",
                "account",
                "keys",
                "list",
                "--account-name",
                account.as_str(),
                "--query",
                "[0].value",
                "--output",
                "tsv",
            ],
            Duration::from_secs(STORAGE_KEY_TIMEOUT_SECS),
        );

        let output = self
            .executor
            .execute(&spec)
            .await
            .map_err(|e| DeployError::Credential(e.to_string()))?;

        if !output.success() {
            return Err(DeployError::Credential(output.diagnostic()));
        }

        let key = output.stdout.trim();
        if key.is_empty() {
            return Err(DeployError::Credential(format!(
                "no key returned for storage account '{}'",
                account
            )));
        }
        Ok(key.to_string())
    }

    /// Upload every file under `source` into the `$web` container
    ///
    /// Relative paths are preserved. Existing blobs are overwritten; blobs
    /// missing from `source` are left in place.
    pub async fn upload_batch(
        &self,
        account: &StorageAccountName,
        key: &str,
        source: &Path,
    ) -> Result<String, DeployError> {
        let source_arg = source.display().to_string();
        let spec = CommandSpec::new(
            self.binary,
            [
                "storage",
                "blob",
                "upload-batch",
                "--account-name",
                account.as_str(),
                "--account-key",
                key,
                "--destination",
                STATIC_WEBSITE_CONTAINER,
                "--source",
                source_arg.as_str(),
                "--overwrite",
                "true",
            ],
            Duration::from_secs(UPLOAD_TIMEOUT_SECS),
        );

        tracing::info!(command = %spec.display_redacted(&[key]), "Uploading static files");

        match self.executor.execute(&spec).await {
            Ok(output) if output.success() => Ok(output.stdout),
            Ok(output) => {
                tracing::error!(stderr = %output.stderr, "Upload failed");
                Err(DeployError::Upload(output.diagnostic()))
            }
            Err(CommandError::Timeout(_)) => {
                tracing::error!("Upload timed out");
                Err(DeployError::UploadTimedOut)
            }
            Err(e) => Err(DeployError::Upload(e.to_string())),
        }
    }
}
