//! Per-step validators.
//!
//! A validator is registered against a step id and consulted by
//! `WizardController::next_step` in place of the structural data check.
//! Validators may be asynchronous (e.g. a remote uniqueness check).

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::types::{Step, StepData, WizardData};
use crate::error::BoxError;

/// Outcome of a validator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// Invalid without field detail; `errors` are left untouched
    Invalid,
    /// Invalid with per-field messages, recorded into the step's errors
    FieldErrors(BTreeMap<String, String>),
}

impl Validation {
    /// Build a field-error outcome from `(field, message)` pairs.
    /// An empty set of pairs is treated as valid.
    pub fn field_errors<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let errors: BTreeMap<String, String> = errors
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if errors.is_empty() {
            Validation::Valid
        } else {
            Validation::FieldErrors(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Validation::Valid => true,
            Validation::Invalid => false,
            Validation::FieldErrors(errors) => errors.is_empty(),
        }
    }

    /// Error strings as stored in the wizard's `errors` map
    pub fn messages(&self) -> Vec<String> {
        match self {
            Validation::FieldErrors(errors) => errors
                .iter()
                .map(|(field, message)| format!("{field}: {message}"))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<bool> for Validation {
    fn from(valid: bool) -> Self {
        if valid {
            Validation::Valid
        } else {
            Validation::Invalid
        }
    }
}

/// What a validator gets to look at
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub step: &'a Step,
    /// The step's own bag (empty when nothing has been written yet)
    pub data: &'a StepData,
    pub all_data: &'a WizardData,
}

/// Validator for a single step.
///
/// Returning `Err` is a caller bug; the controller propagates it unmodified
/// and performs no navigation.
#[async_trait]
pub trait StepValidator: Send + Sync {
    async fn validate(&self, ctx: StepContext<'_>) -> Result<Validation, BoxError>;
}

/// Adapter turning a synchronous closure into a [`StepValidator`]
pub struct FnValidator<F>(F);

#[async_trait]
impl<F> StepValidator for FnValidator<F>
where
    F: Fn(StepContext<'_>) -> Validation + Send + Sync,
{
    async fn validate(&self, ctx: StepContext<'_>) -> Result<Validation, BoxError> {
        Ok((self.0)(ctx))
    }
}

/// Wrap a synchronous closure as a validator
pub fn validator_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(StepContext<'_>) -> Validation + Send + Sync,
{
    FnValidator(f)
}

/// Fails with a `required` field error for every listed field that is
/// missing, null or an empty string in the step's bag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn is_filled(value: Option<&serde_json::Value>) -> bool {
        match value {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }
}

#[async_trait]
impl StepValidator for RequiredFields {
    async fn validate(&self, ctx: StepContext<'_>) -> Result<Validation, BoxError> {
        Ok(Validation::field_errors(
            self.fields
                .iter()
                .filter(|field| !Self::is_filled(ctx.data.get(field.as_str())))
                .map(|field| (field.clone(), "required")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_required_fields() {
        let step = Step::new("student", "Student");
        let all = WizardData::new();
        let mut data = StepData::new();
        data.insert("name".to_string(), serde_json::json!("  "));
        data.insert("age".to_string(), serde_json::json!(31));

        let validator = RequiredFields::new(["name", "age", "email"]);
        let ctx = StepContext {
            step: &step,
            data: &data,
            all_data: &all,
        };
        let outcome = validator.validate(ctx).await.unwrap();
        assert_eq!(
            outcome.messages(),
            vec!["email: required".to_string(), "name: required".to_string()]
        );
    }

    #[test]
    fn test_field_errors_empty_is_valid() {
        let outcome = Validation::field_errors(Vec::<(String, String)>::new());
        assert_eq!(outcome, Validation::Valid);
    }

    #[test]
    fn test_field_error_messages_are_sorted_by_field() {
        let outcome = Validation::field_errors([("reps", "required"), ("name", "too short")]);
        assert!(!outcome.is_valid());
        assert_eq!(
            outcome.messages(),
            vec!["name: too short".to_string(), "reps: required".to_string()]
        );
    }

    #[test]
    fn test_from_bool() {
        assert!(Validation::from(true).is_valid());
        assert_eq!(Validation::from(false), Validation::Invalid);
        assert!(Validation::Invalid.messages().is_empty());
    }

    #[tokio::test]
    async fn test_fn_validator_reads_step_data() {
        let step = Step::new("exercise", "Exercise");
        let mut data = StepData::new();
        data.insert("name".to_string(), serde_json::json!("Squat"));
        let all = WizardData::new();

        let validator = validator_fn(|ctx| Validation::from(ctx.data.contains_key("name")));
        let ctx = StepContext {
            step: &step,
            data: &data,
            all_data: &all,
        };
        let outcome = validator.validate(ctx).await.unwrap();
        assert_eq!(outcome, Validation::Valid);
    }
}
