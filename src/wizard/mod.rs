//! Add-user wizard: step pointer, per-step values and the submission guard.
//!
//! The controller knows nothing about rendering. The host asks it what
//! [`advance`](WizardController::advance) means on the current step, runs the
//! step's own validation, and feeds the result back through
//! [`complete_step`](WizardController::complete_step).
pub mod form;
pub mod state;
pub mod steps;

use tracing::{debug, info};

use state::{FieldValues, Summary, WizardState};
use steps::{StepDescriptor, StepId};

/// What the host must do when the primary action is pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Ask the step to validate itself and report back with its values.
    SubmitStep(StepId),
    /// The last step is showing: hand the summary to the submission gateway.
    Finish,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("already on the first step")]
    AtFirstStep,
}

#[derive(Clone, Debug)]
pub struct WizardController {
    steps: &'static [StepDescriptor],
    index: usize,
    state: WizardState,
    in_flight: bool,
}

impl WizardController {
    pub fn new(steps: &'static [StepDescriptor]) -> Self {
        debug_assert!(!steps.is_empty());
        Self {
            steps,
            index: 0,
            state: WizardState::new(),
            in_flight: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        self.steps
    }

    pub fn current(&self) -> &StepDescriptor {
        &self.steps[self.index]
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    /// The "previous step" control is only offered past the first step.
    pub fn can_retreat(&self) -> bool {
        self.index > 0
    }

    pub fn advance(&self) -> Advance {
        if self.is_last_step() {
            Advance::Finish
        } else {
            Advance::SubmitStep(self.current().id)
        }
    }

    pub fn retreat(&mut self) -> Result<(), WizardError> {
        if !self.can_retreat() {
            return Err(WizardError::AtFirstStep);
        }
        self.index -= 1;
        debug!(index = self.index, "wizard moved back");
        Ok(())
    }

    /// Record a step's validated values, then move forward unless already on the last step.
    pub fn complete_step(&mut self, step: StepId, values: FieldValues) {
        self.state.record_step_values(step, values);
        if self.is_last_step() {
            return;
        }
        self.index += 1;
        info!(step = step.as_str(), index = self.index, "wizard step completed");
    }

    pub fn summary(&self) -> Option<Summary> {
        self.state.compute_summary()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Claim the single submission slot. `None` when one is already outstanding
    /// or there is nothing to submit.
    pub fn begin_submission(&mut self) -> Option<Summary> {
        if self.in_flight {
            debug!("submission already in flight, ignoring");
            return None;
        }
        let summary = self.summary()?;
        self.in_flight = true;
        Some(summary)
    }

    pub fn end_submission(&mut self) {
        self.in_flight = false;
    }
}
