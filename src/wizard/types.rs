//! Type definitions for the wizard controller

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Value bag contributed by a single step's consumer
pub type StepData = Map<String, Value>;

/// Wizard-wide data: step id to that step's bag, plus any cross-cutting
/// values written through `update_data`
pub type WizardData = Map<String, Value>;

/// One named stage of a linear wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Stable identity for the lifetime of the wizard
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Optional steps are always valid and never block advancement
    #[serde(default)]
    pub is_optional: bool,
    /// Maintained by the controller
    #[serde(default)]
    pub is_completed: bool,
    /// Maintained by the controller
    #[serde(default)]
    pub is_valid: bool,
}

impl Step {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            is_optional: false,
            is_completed: false,
            is_valid: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Clear the controller-maintained flags
    pub(crate) fn pristine(mut self) -> Self {
        self.is_completed = false;
        self.is_valid = false;
        self
    }
}

/// Everything the controller owns. Mutated only through controller actions.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_step: usize,
    pub steps: Vec<Step>,
    #[ts(type = "Record<string, unknown>")]
    pub data: WizardData,
    pub errors: BTreeMap<String, Vec<String>>,
    pub is_loading: bool,
}

impl WizardState {
    pub(crate) fn new(steps: Vec<Step>, initial_step: usize) -> Self {
        Self {
            current_step: initial_step,
            steps: steps.into_iter().map(Step::pristine).collect(),
            data: WizardData::new(),
            errors: BTreeMap::new(),
            is_loading: false,
        }
    }

    pub(crate) fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub(crate) fn step_mut(&mut self, step_id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|s| s.id == step_id)
    }
}

/// Construction options for a wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardOptions {
    pub initial_step: usize,
    /// When set, `can_go_next` is always true
    pub allow_skip_steps: bool,
    /// Validate the current step before `next_step` advances
    pub validate_on_next: bool,
    /// Upper bound on a single validator run. `None` waits forever.
    pub validator_timeout: Option<Duration>,
}

impl Default for WizardOptions {
    fn default() -> Self {
        Self {
            initial_step: 0,
            allow_skip_steps: false,
            validate_on_next: true,
            validator_timeout: None,
        }
    }
}

impl WizardOptions {
    pub fn with_initial_step(mut self, initial_step: usize) -> Self {
        self.initial_step = initial_step;
        self
    }

    pub fn allow_skip_steps(mut self, allow: bool) -> Self {
        self.allow_skip_steps = allow;
        self
    }

    pub fn validate_on_next(mut self, validate: bool) -> Self {
        self.validate_on_next = validate;
        self
    }

    pub fn with_validator_timeout(mut self, timeout: Duration) -> Self {
        self.validator_timeout = Some(timeout);
        self
    }
}

/// Derived navigation values, recomputed from state on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WizardProgress {
    pub current_step: usize,
    pub total_steps: usize,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub completed_steps_count: usize,
    pub progress_percentage: u32,
}
