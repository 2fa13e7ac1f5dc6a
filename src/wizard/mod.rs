//! Multi-step wizard controller.
//!
//! Owns a linear sequence of steps, the active step index, a per-step data
//! bag, per-step errors and completion flags. All navigation funnels through
//! [`WizardController::go_to_step`]. The controller knows nothing about what
//! a step renders; hosts push edits in through `update_step_data`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use crate::error::WizardError;

pub mod types;
pub mod validator;

pub use types::*;
pub use validator::*;


/// Invoked as `(new_index, previous_index)` after every successful move
pub type StepChangeCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Invoked with the accumulated data on completion or cancellation
pub type DataCallback = Box<dyn FnMut(&WizardData) + Send>;

/// State holder for one logical wizard
pub struct WizardController {
    options: WizardOptions,
    /// Snapshot taken at construction, restored by `reset`
    initial: WizardState,
    state: WizardState,
    validators: HashMap<String, Arc<dyn StepValidator>>,
    on_step_change: Option<StepChangeCallback>,
    on_complete: Option<DataCallback>,
    on_cancel: Option<DataCallback>,
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl WizardController {
    /// Create a controller over `steps`.
    ///
    /// Step ids must be unique and `options.initial_step` must index a step
    /// (or be 0 for an empty wizard). Completion and validity flags on the
    /// supplied steps are cleared.
    pub fn new(steps: Vec<Step>, options: WizardOptions) -> Result<Self, WizardError> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(WizardError::DuplicateStepId(step.id.clone()));
            }
        }

        let in_range = if steps.is_empty() {
            options.initial_step == 0
        } else {
            options.initial_step < steps.len()
        };
        if !in_range {
            return Err(WizardError::InitialStepOutOfRange {
                index: options.initial_step,
                len: steps.len(),
            });
        }

        let initial = WizardState::new(steps, options.initial_step);
        tracing::debug!(
            steps = initial.steps.len(),
            initial_step = options.initial_step,
            "wizard created"
        );

        Ok(Self {
            options,
            state: initial.clone(),
            initial,
            validators: HashMap::new(),
            on_step_change: None,
            on_complete: None,
            on_cancel: None,
        })
    }

    pub fn on_step_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize, usize) + Send + 'static,
    {
        self.on_step_change = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnMut(&WizardData) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_cancel<F>(mut self, f: F) -> Self
    where
        F: FnMut(&WizardData) + Send + 'static,
    {
        self.on_cancel = Some(Box::new(f));
        self
    }

    /// Builder form of [`register_validator`](Self::register_validator)
    pub fn with_validator<V>(mut self, step_id: &str, validator: V) -> Result<Self, WizardError>
    where
        V: StepValidator + 'static,
    {
        self.register_validator(step_id, validator)?;
        Ok(self)
    }

    /// Attach a validator to a step, replacing any previous one
    pub fn register_validator<V>(&mut self, step_id: &str, validator: V) -> Result<(), WizardError>
    where
        V: StepValidator + 'static,
    {
        if self.state.step(step_id).is_none() {
            return Err(WizardError::UnknownStep(step_id.to_string()));
        }
        self.validators
            .insert(step_id.to_string(), Arc::new(validator));
        Ok(())
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn steps(&self) -> &[Step] {
        &self.state.steps
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    /// The active step, `None` only for an empty wizard
    pub fn current(&self) -> Option<&Step> {
        self.state.steps.get(self.state.current_step)
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.state.step(step_id)
    }

    pub fn data(&self) -> &WizardData {
        &self.state.data
    }

    /// `data[step_id]` (or `{}` when absent); the whole map when no id is given
    pub fn get_data(&self, step_id: Option<&str>) -> Value {
        match step_id {
            Some(id) => self
                .state
                .data
                .get(id)
                .cloned()
                .unwrap_or_else(|| Value::Object(StepData::new())),
            None => Value::Object(self.state.data.clone()),
        }
    }

    /// Errors recorded for a step (empty when none)
    pub fn errors(&self, step_id: &str) -> &[String] {
        self.state
            .errors
            .get(step_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.state.is_loading = loading;
    }

    // ─── Navigation ─────────────────────────────────────────────────────────

    /// Move to step `index`. Out-of-range indices are ignored.
    pub fn go_to_step(&mut self, index: usize) {
        if index >= self.state.steps.len() {
            tracing::debug!(index, len = self.state.steps.len(), "ignoring out-of-range step");
            return;
        }

        let previous = self.state.current_step;
        self.state.current_step = index;
        tracing::debug!(from = previous, to = index, "wizard step changed");

        if let Some(callback) = self.on_step_change.as_mut() {
            callback(index, previous);
        }
    }

    /// Validate (when enabled), complete the current step and advance.
    ///
    /// Returns `Ok(false)` when validation blocks. On the last step the
    /// completion callback fires and the wizard stays where it is.
    pub async fn next_step(&mut self) -> Result<bool, WizardError> {
        let Some(step) = self.current() else {
            return Ok(false);
        };
        let step_id = step.id.clone();
        let is_optional = step.is_optional;

        if self.options.validate_on_next {
            let valid = self.validate_for_next(&step_id).await?;
            if !valid && !is_optional {
                tracing::debug!(step = %step_id, "next step blocked by validation");
                return Ok(false);
            }
        }

        self.mark_step_as_completed(&step_id);

        if self.is_last_step() {
            tracing::debug!(step = %step_id, "wizard complete");
            if let Some(callback) = self.on_complete.as_mut() {
                callback(&self.state.data);
            }
            return Ok(true);
        }

        self.go_to_step(self.state.current_step + 1);
        Ok(true)
    }

    /// Move back one step. No-op on the first step.
    pub fn previous_step(&mut self) {
        if self.state.current_step > 0 {
            self.go_to_step(self.state.current_step - 1);
        }
    }

    pub fn go_to_first_step(&mut self) {
        self.go_to_step(0);
    }

    pub fn go_to_last_step(&mut self) {
        if let Some(last) = self.state.steps.len().checked_sub(1) {
            self.go_to_step(last);
        }
    }

    // ─── Validation ─────────────────────────────────────────────────────────

    /// Structural validation of a step (the current one when `None`).
    ///
    /// Optional and completed steps are always valid. Otherwise the step is
    /// valid when its data bag exists and has at least one key. Updates the
    /// step's `is_valid` flag. Unknown ids are invalid.
    pub fn validate_step(&mut self, step_id: Option<&str>) -> bool {
        let Some(step_id) = self.resolve_step_id(step_id) else {
            return false;
        };
        let Some(step) = self.state.step(&step_id) else {
            return false;
        };

        let valid = step.is_optional || step.is_completed || self.has_step_data(&step_id);

        if let Some(step) = self.state.step_mut(&step_id) {
            step.is_valid = valid;
        }
        valid
    }

    /// Validate every step; no short-circuit since each run updates flags
    pub fn validate_all_steps(&mut self) -> bool {
        let ids: Vec<String> = self.state.steps.iter().map(|s| s.id.clone()).collect();
        ids.iter()
            .map(|id| self.validate_step(Some(id.as_str())))
            .fold(true, |all, valid| all && valid)
    }

    pub fn set_step_errors(&mut self, step_id: &str, errors: Vec<String>) {
        self.state.errors.insert(step_id.to_string(), errors);
    }

    pub fn clear_step_errors(&mut self, step_id: &str) {
        self.state.errors.remove(step_id);
    }

    // ─── Completion state ───────────────────────────────────────────────────

    /// Completion implies validity
    pub fn mark_step_as_completed(&mut self, step_id: &str) {
        if let Some(step) = self.state.step_mut(step_id) {
            step.is_completed = true;
            step.is_valid = true;
        }
    }

    pub fn mark_step_as_incomplete(&mut self, step_id: &str) {
        if let Some(step) = self.state.step_mut(step_id) {
            step.is_completed = false;
            step.is_valid = false;
        }
    }

    // ─── Data ───────────────────────────────────────────────────────────────

    /// Shallow-merge `partial` into `data[step_id]`, creating the bag if needed.
    /// Nested objects are replaced, not merged.
    pub fn update_step_data(&mut self, step_id: &str, partial: StepData) {
        let entry = self
            .state
            .data
            .entry(step_id.to_string())
            .or_insert_with(|| Value::Object(StepData::new()));

        match entry {
            Value::Object(bag) => bag.extend(partial),
            other => *other = Value::Object(partial),
        }
    }

    /// Shallow-merge `partial` into the top-level data map
    pub fn update_data(&mut self, partial: WizardData) {
        self.state.data.extend(partial);
    }

    // ─── Derived values ─────────────────────────────────────────────────────

    pub fn total_steps(&self) -> usize {
        self.state.steps.len()
    }

    pub fn is_first_step(&self) -> bool {
        self.state.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.state
            .steps
            .len()
            .checked_sub(1)
            .is_some_and(|last| self.state.current_step == last)
    }

    pub fn can_go_next(&self) -> bool {
        self.options.allow_skip_steps
            || self
                .current()
                .is_some_and(|step| step.is_valid || step.is_optional)
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.current_step > 0
    }

    pub fn completed_steps_count(&self) -> usize {
        self.state.steps.iter().filter(|s| s.is_completed).count()
    }

    /// Rounded percentage of completed steps; 0 for an empty wizard
    pub fn progress_percentage(&self) -> u32 {
        let total = self.total_steps();
        if total == 0 {
            return 0;
        }
        (self.completed_steps_count() as f64 / total as f64 * 100.0).round() as u32
    }

    pub fn progress(&self) -> WizardProgress {
        WizardProgress {
            current_step: self.state.current_step,
            total_steps: self.total_steps(),
            is_first_step: self.is_first_step(),
            is_last_step: self.is_last_step(),
            can_go_next: self.can_go_next(),
            can_go_previous: self.can_go_previous(),
            completed_steps_count: self.completed_steps_count(),
            progress_percentage: self.progress_percentage(),
        }
    }

    // ─── Lifecycle ──────────────────────────────────────────────────────────

    /// Restore the construction-time state. Callbacks and validators stay.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        tracing::debug!("wizard reset");
    }

    /// Hand the accumulated data to the cancel callback.
    /// The host is expected to drop the controller afterwards.
    pub fn cancel(&mut self) {
        tracing::debug!(step = self.state.current_step, "wizard cancelled");
        if let Some(callback) = self.on_cancel.as_mut() {
            callback(&self.state.data);
        }
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn resolve_step_id(&self, step_id: Option<&str>) -> Option<String> {
        match step_id {
            Some(id) => Some(id.to_string()),
            None => self.current().map(|s| s.id.clone()),
        }
    }

    fn has_step_data(&self, step_id: &str) -> bool {
        match self.state.data.get(step_id) {
            Some(Value::Object(bag)) => !bag.is_empty(),
            _ => false,
        }
    }

    /// Validation used by `next_step`: a registered validator takes over from
    /// the structural check, after the optional/completed shortcuts
    async fn validate_for_next(&mut self, step_id: &str) -> Result<bool, WizardError> {
        let Some(validator) = self.validators.get(step_id).cloned() else {
            return Ok(self.validate_step(Some(step_id)));
        };
        let Some(step) = self.state.step(step_id) else {
            return Ok(false);
        };
        if step.is_optional || step.is_completed {
            return Ok(self.validate_step(Some(step_id)));
        }

        let empty = StepData::new();
        let data = match self.state.data.get(step_id) {
            Some(Value::Object(bag)) => bag,
            _ => &empty,
        };
        let ctx = StepContext {
            step,
            data,
            all_data: &self.state.data,
        };

        let outcome = match self.options.validator_timeout {
            Some(timeout) => tokio::time::timeout(timeout, validator.validate(ctx))
                .await
                .map_err(|_| {
                    tracing::warn!(step = %step_id, ?timeout, "validator timed out");
                    WizardError::ValidatorTimedOut {
                        step_id: step_id.to_string(),
                        timeout,
                    }
                })?,
            None => validator.validate(ctx).await,
        }
        .map_err(|source| WizardError::Validator {
            step_id: step_id.to_string(),
            source,
        })?;

        let valid = outcome.is_valid();
        if let Validation::FieldErrors(_) = &outcome {
            self.set_step_errors(step_id, outcome.messages());
        }
        if let Some(step) = self.state.step_mut(step_id) {
            step.is_valid = valid;
        }
        Ok(valid)
    }
}
