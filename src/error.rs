//! Error types for the wizard and reorderable collection controllers.
//!
//! Navigation guard violations and capability mismatches on drop are not
//! errors: they are silent no-ops and never show up here.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Boxed error returned by step validators
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the wizard controller
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("initial step {index} is out of range for a wizard with {len} steps")]
    InitialStepOutOfRange { index: usize, len: usize },

    #[error("step id '{0}' is declared more than once")]
    DuplicateStepId(String),

    #[error("step '{0}' not found")]
    UnknownStep(String),

    #[error("validator for step '{step_id}' failed")]
    Validator {
        step_id: String,
        #[source]
        source: BoxError,
    },

    #[error("validator for step '{step_id}' did not finish within {timeout:?}")]
    ValidatorTimedOut { step_id: String, timeout: Duration },
}

/// Errors raised by the pure list transforms
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Errors raised while loading wizard definition files
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("failed to read definition {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported definition format '{0}' (expected toml, yaml, yml or json)")]
    UnsupportedFormat(String),

    #[error("failed to parse definition: {0}")]
    Parse(String),

    #[error("step at position {0} has an empty id")]
    EmptyStepId(usize),

    #[error(transparent)]
    Wizard(#[from] WizardError),
}
