//! Terraform provisioning driver
//!
//! Runs `init` and `apply` in the provisioning working directory, and reads
//! back `output -json` once the site is uploaded.

use std::path::Path;
use std::time::Duration;

use crate::config::env::constants::{
    TERRAFORM_APPLY_TIMEOUT_SECS, TERRAFORM_INIT_TIMEOUT_SECS, TERRAFORM_OUTPUT_TIMEOUT_SECS,
};
use crate::infra::{CommandError, CommandExecutor, CommandOutput, CommandSpec};

use super::error::{DeployError, ProvisionStep};

pub struct Terraform<'a> {
    executor: &'a dyn CommandExecutor,
    binary: &'a Path,
    work_dir: &'a Path,
}

impl<'a> Terraform<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, binary: &'a Path, work_dir: &'a Path) -> Self {
        Self {
            executor,
            binary,
            work_dir,
        }
    }

    pub async fn init(&self) -> Result<(), DeployError> {
        self.run_step(
            ProvisionStep::Init,
            &["init", "-input=false"],
            Duration::from_secs(TERRAFORM_INIT_TIMEOUT_SECS),
        )
        .await
    }

    pub async fn apply(&self) -> Result<(), DeployError> {
        self.run_step(
            ProvisionStep::Apply,
            &["apply", "-auto-approve", "-input=false"],
            Duration::from_secs(TERRAFORM_APPLY_TIMEOUT_SECS),
        )
        .await
    }

    /// Raw `terraform output -json`
    ///
    /// Returns `None` when the query fails or times out; the caller falls
    /// back to a computed URL.
    pub async fn outputs(&self) -> Option<String> {
        let spec = self.spec(&["output", "-json"], Duration::from_secs(TERRAFORM_OUTPUT_TIMEOUT_SECS));

        match self.executor.execute(&spec).await {
            Ok(output) if output.success() => Some(output.stdout),
            Ok(output) => {
                tracing::warn!(diagnostic = %output.diagnostic(), "terraform output failed");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "terraform output did not complete");
                None
            }
        }
    }

    async fn run_step(
        &self,
        step: ProvisionStep,
        args: &[&str],
        timeout: Duration,
    ) -> Result<(), DeployError> {
        let spec = self.spec(args, timeout);
        let output = self
            .executor
            .execute(&spec)
            .await
            .map_err(|e| step_error(step, e))?;

        check_step(step, output)
    }

    fn spec(&self, args: &[&str], timeout: Duration) -> CommandSpec {
        CommandSpec::new(self.binary, args.iter().copied(), timeout).current_dir(self.work_dir)
    }
}

fn step_error(step: ProvisionStep, e: CommandError) -> DeployError {
    match e {
        CommandError::Timeout(timeout) => DeployError::ProvisioningTimedOut { step, timeout },
        other => DeployError::Unexpected(format!("terraform {}: {}", step.as_str(), other)),
    }
}

fn check_step(step: ProvisionStep, output: CommandOutput) -> Result<(), DeployError> {
    if output.success() {
        tracing::debug!(step = step.as_str(), "terraform step succeeded");
        Ok(())
    } else {
        Err(DeployError::Provisioning {
            step,
            detail: output.diagnostic(),
        })
    }
}
