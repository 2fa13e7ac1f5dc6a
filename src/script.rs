//! Scripted wizard sessions.
//!
//! A script is a list of actions replayed against a fresh controller, the
//! same calls a host screen would make in response to user input. The
//! resulting [`SessionReport`] captures the final state, the derived
//! progress values, every callback that fired and what each action returned.
//!
//! ```yaml
//! required_fields:
//!   student: [name]
//! actions:
//!   - action: update_step_data
//!     step: student
//!     data: { name: "Ana" }
//!   - action: next
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::definition::WizardDefinition;
use crate::wizard::{
    RequiredFields, StepData, WizardController, WizardData, WizardOptions, WizardProgress,
    WizardState,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Next,
    Previous,
    GoTo {
        step: usize,
    },
    First,
    Last,
    UpdateStepData {
        step: String,
        data: StepData,
    },
    UpdateData {
        data: WizardData,
    },
    Validate {
        #[serde(default)]
        step: Option<String>,
    },
    ValidateAll,
    SetErrors {
        step: String,
        errors: Vec<String>,
    },
    ClearErrors {
        step: String,
    },
    MarkCompleted {
        step: String,
    },
    MarkIncomplete {
        step: String,
    },
    SetLoading {
        loading: bool,
    },
    Reset,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Step id to fields that must be filled before `next` may leave it
    #[serde(default)]
    pub required_fields: BTreeMap<String, Vec<String>>,
    pub actions: Vec<ScriptAction>,
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&text).context("Failed to parse JSON script")
        } else {
            serde_yaml::from_str(&text).context("Failed to parse YAML script")
        }
    }
}

/// Callback activity observed while a script ran
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WizardEvent {
    StepChanged { to: usize, from: usize },
    Completed { data: WizardData },
    Cancelled { data: WizardData },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResult {
    pub index: usize,
    pub action: ScriptAction,
    /// Present for actions that answer with a boolean
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub state: WizardState,
    pub progress: WizardProgress,
    pub events: Vec<WizardEvent>,
    pub results: Vec<ActionResult>,
}

/// Build a controller for `definition`, wire its callbacks into an event
/// log and replay `script` against it
pub async fn run_session(
    definition: &WizardDefinition,
    script: &Script,
    base: &WizardOptions,
) -> Result<SessionReport> {
    let events = Arc::new(Mutex::new(Vec::new()));

    let on_change = Arc::clone(&events);
    let on_complete = Arc::clone(&events);
    let on_cancel = Arc::clone(&events);

    let mut wizard = definition
        .build(base)
        .context("Failed to build wizard from definition")?
        .on_step_change(move |to, from| {
            push_event(&on_change, WizardEvent::StepChanged { to, from });
        })
        .on_complete(move |data| {
            push_event(&on_complete, WizardEvent::Completed { data: data.clone() });
        })
        .on_cancel(move |data| {
            push_event(&on_cancel, WizardEvent::Cancelled { data: data.clone() });
        });

    for (step_id, fields) in &script.required_fields {
        wizard
            .register_validator(step_id, RequiredFields::new(fields.iter().cloned()))
            .with_context(|| format!("Cannot attach required fields to '{step_id}'"))?;
    }

    let mut results = Vec::with_capacity(script.actions.len());
    for (index, action) in script.actions.iter().enumerate() {
        tracing::debug!(index, ?action, "replaying action");
        let returned = apply(&mut wizard, action)
            .await
            .with_context(|| format!("Action {index} failed"))?;
        results.push(ActionResult {
            index,
            action: action.clone(),
            returned,
        });
    }

    let events = events
        .lock()
        .map(|log| log.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone());

    Ok(SessionReport {
        state: wizard.state().clone(),
        progress: wizard.progress(),
        events,
        results,
    })
}

fn push_event(log: &Mutex<Vec<WizardEvent>>, event: WizardEvent) {
    match log.lock() {
        Ok(mut log) => log.push(event),
        Err(poisoned) => poisoned.into_inner().push(event),
    }
}

async fn apply(wizard: &mut WizardController, action: &ScriptAction) -> Result<Option<bool>> {
    let returned = match action {
        ScriptAction::Next => Some(wizard.next_step().await?),
        ScriptAction::Previous => {
            wizard.previous_step();
            None
        }
        ScriptAction::GoTo { step } => {
            wizard.go_to_step(*step);
            None
        }
        ScriptAction::First => {
            wizard.go_to_first_step();
            None
        }
        ScriptAction::Last => {
            wizard.go_to_last_step();
            None
        }
        ScriptAction::UpdateStepData { step, data } => {
            wizard.update_step_data(step, data.clone());
            None
        }
        ScriptAction::UpdateData { data } => {
            wizard.update_data(data.clone());
            None
        }
        ScriptAction::Validate { step } => Some(wizard.validate_step(step.as_deref())),
        ScriptAction::ValidateAll => Some(wizard.validate_all_steps()),
        ScriptAction::SetErrors { step, errors } => {
            wizard.set_step_errors(step, errors.clone());
            None
        }
        ScriptAction::ClearErrors { step } => {
            wizard.clear_step_errors(step);
            None
        }
        ScriptAction::MarkCompleted { step } => {
            wizard.mark_step_as_completed(step);
            None
        }
        ScriptAction::MarkIncomplete { step } => {
            wizard.mark_step_as_incomplete(step);
            None
        }
        ScriptAction::SetLoading { loading } => {
            wizard.set_loading(*loading);
            None
        }
        ScriptAction::Reset => {
            wizard.reset();
            None
        }
        ScriptAction::Cancel => {
            wizard.cancel();
            None
        }
    };
    Ok(returned)
}
