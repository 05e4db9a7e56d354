//! Deployment context
//!
//! Tracks the current phase of one deployment and logs each transition with
//! the time spent in the previous phase.

use std::time::Instant;

use crate::domain::DeployPhase;

pub struct DeployContext {
    /// Resource group name once generated
    resource_group: Option<String>,
    phase: DeployPhase,
    phase_started: Instant,
    started: Instant,
}

impl DeployContext {
    pub fn new() -> Self {
        let now = Instant::now();
        tracing::debug!(phase = DeployPhase::Validating.as_str(), "Deployment started");
        Self {
            resource_group: None,
            phase: DeployPhase::Validating,
            phase_started: now,
            started: now,
        }
    }

    pub fn phase(&self) -> DeployPhase {
        self.phase
    }

    pub fn resource_group(&self) -> &str {
        self.resource_group.as_deref().unwrap_or("-")
    }

    pub fn set_resource_group(&mut self, name: &str) {
        self.resource_group = Some(name.to_string());
    }

    /// Move to the next phase
    pub fn enter(&mut self, phase: DeployPhase) {
        let elapsed_ms = self.phase_started.elapsed().as_millis() as u64;
        tracing::info!(
            resource_group = %self.resource_group(),
            from = self.phase.as_str(),
            phase = phase.as_str(),
            elapsed_ms,
            "Deployment phase"
        );
        self.phase = phase;
        self.phase_started = Instant::now();
    }

    /// Total time since the deployment started, in milliseconds
    pub fn total_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
