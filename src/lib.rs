//! gymflow - headless controllers for multi-step wizards and reorderable lists
//!
//! [`wizard::WizardController`] drives a linear step sequence with per-step
//! data, validation and completion tracking. [`dnd`] holds the drag-and-drop
//! state machine and the [`dnd::SortableList`] built on top of it.

pub mod config;
pub mod definition;
pub mod dnd;
pub mod error;
pub mod logging;
pub mod script;
pub mod wizard;

pub use error::{DefinitionError, ListError, WizardError};
