//! Wizard definition files.
//!
//! A definition declares the step list and per-wizard option overrides.
//! TOML, YAML and JSON are accepted, picked by file extension:
//!
//! ```toml
//! name = "assign-routine"
//! initial_step = 0
//!
//! [[steps]]
//! id = "student"
//! title = "Pick a student"
//!
//! [[steps]]
//! id = "notes"
//! title = "Notes"
//! optional = true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, WizardError};
use crate::wizard::{Step, WizardController, WizardOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Toml,
    Yaml,
    Json,
}

impl DefinitionFormat {
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(DefinitionFormat::Toml),
            "yaml" | "yml" => Ok(DefinitionFormat::Yaml),
            "json" => Ok(DefinitionFormat::Json),
            other => Err(DefinitionError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// One step as written in a definition file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl From<&StepDefinition> for Step {
    fn from(def: &StepDefinition) -> Self {
        Step {
            id: def.id.clone(),
            title: def.title.clone(),
            description: def.description.clone(),
            is_optional: def.optional,
            is_completed: false,
            is_valid: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initial_step: usize,
    /// Overrides the configured default when present
    #[serde(default)]
    pub allow_skip_steps: Option<bool>,
    /// Overrides the configured default when present
    #[serde(default)]
    pub validate_on_next: Option<bool>,
    pub steps: Vec<StepDefinition>,
}

impl WizardDefinition {
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let format = DefinitionFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| DefinitionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format)
    }

    /// Parse and check a definition
    pub fn parse(text: &str, format: DefinitionFormat) -> Result<Self, DefinitionError> {
        let definition: WizardDefinition = match format {
            DefinitionFormat::Toml => {
                toml::from_str(text).map_err(|e| DefinitionError::Parse(e.to_string()))?
            }
            DefinitionFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| DefinitionError::Parse(e.to_string()))?
            }
            DefinitionFormat::Json => {
                serde_json::from_str(text).map_err(|e| DefinitionError::Parse(e.to_string()))?
            }
        };
        definition.check()?;
        Ok(definition)
    }

    /// Reject empty or duplicate ids and an out-of-range initial step
    pub fn check(&self) -> Result<(), DefinitionError> {
        let mut seen = HashSet::new();
        for (position, step) in self.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(DefinitionError::EmptyStepId(position));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(WizardError::DuplicateStepId(step.id.clone()).into());
            }
        }

        let len = self.steps.len();
        if (len == 0 && self.initial_step != 0) || (len > 0 && self.initial_step >= len) {
            return Err(WizardError::InitialStepOutOfRange {
                index: self.initial_step,
                len,
            }
            .into());
        }
        Ok(())
    }

    pub fn steps(&self) -> Vec<Step> {
        self.steps.iter().map(Step::from).collect()
    }

    /// Layer this definition's overrides on top of `base`
    pub fn options(&self, base: &WizardOptions) -> WizardOptions {
        WizardOptions {
            initial_step: self.initial_step,
            allow_skip_steps: self.allow_skip_steps.unwrap_or(base.allow_skip_steps),
            validate_on_next: self.validate_on_next.unwrap_or(base.validate_on_next),
            validator_timeout: base.validator_timeout,
        }
    }

    pub fn build(&self, base: &WizardOptions) -> Result<WizardController, DefinitionError> {
        Ok(WizardController::new(self.steps(), self.options(base))?)
    }
}
