//! Per-run failure collection

use std::fmt::Display;

use crate::types::{ProvisioningResult, ProvisioningStep, Site, StepOutcome};

/// Ordered, append-only list of soft failures for one workflow run.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<String>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, description: impl Into<String>) {
        self.errors.push(description.into());
    }

    /// Record the outcome's description if the step failed.
    pub fn track(&mut self, outcome: &StepOutcome) {
        if let Some(description) = outcome.error_description.as_ref().filter(|_| !outcome.succeeded) {
            self.record(description.clone());
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// Step log of one run: every outcome in order, failures aggregated.
#[derive(Debug, Default)]
pub(crate) struct RunRecorder {
    steps: Vec<StepOutcome>,
    aggregator: ErrorAggregator,
}

impl RunRecorder {
    pub(crate) fn push(&mut self, outcome: StepOutcome) {
        if let Some(description) = &outcome.error_description {
            log::warn!("[{}] {description}", outcome.step);
        } else {
            log::debug!("[{}] ok", outcome.step);
        }
        self.aggregator.track(&outcome);
        self.steps.push(outcome);
    }

    /// Record a step's result.
    pub(crate) fn track<T, E: Display>(&mut self, step: ProvisioningStep, result: &Result<T, E>) {
        self.push(StepOutcome::from_result(step, result));
    }

    pub(crate) fn into_steps(self) -> Vec<StepOutcome> {
        self.steps
    }

    /// Completed result; warnings are whatever the aggregator collected.
    pub(crate) fn finish(self, site: Option<Site>) -> ProvisioningResult {
        ProvisioningResult::completed(site, self.aggregator.into_errors(), self.steps)
    }
}
