// Validation rules attached to form items.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_spec::{FormModel, is_falsy};

/// Host-supplied check. Returns the error message on failure.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value, model: &FormModel) -> Result<(), String>;
}

impl<F> Validator for F
where
    F: Fn(&Value, &FormModel) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, value: &Value, model: &FormModel) -> Result<(), String> {
        self(value, model)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Rule {
    Required {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Character count for strings, slot count for arrays.
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    #[serde(skip)]
    Custom(Arc<dyn Validator>),
}

impl Rule {
    pub fn required() -> Self {
        Self::Required { message: None }
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length {
            min,
            max,
            message: None,
        }
    }

    pub fn custom(validator: impl Validator + 'static) -> Self {
        Self::Custom(Arc::new(validator))
    }

    /// Check `value`, returning the message to show on failure.
    pub(crate) fn check(&self, name: &str, value: &Value, model: &FormModel) -> Option<String> {
        match self {
            Self::Required { message } => is_empty_value(value)
                .then(|| message.clone().unwrap_or_else(|| format!("{name} is required"))),
            Self::Length { min, max, message } => {
                if is_empty_value(value) {
                    return None;
                }
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    _ => return None,
                };
                let too_short = min.is_some_and(|min| len < min);
                let too_long = max.is_some_and(|max| len > max);
                (too_short || too_long).then(|| {
                    message
                        .clone()
                        .unwrap_or_else(|| length_message(name, *min, *max))
                })
            }
            Self::Custom(validator) => validator.validate(value, model).err(),
        }
    }
}

fn length_message(name: &str, min: Option<usize>, max: Option<usize>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{name} must be between {min} and {max} characters"),
        (Some(min), None) => format!("{name} must be at least {min} characters"),
        (None, Some(max)) => format!("{name} must be at most {max} characters"),
        (None, None) => format!("{name} has an invalid length"),
    }
}

/// Empty for validation: falsy, an empty array, or an array whose slots
/// are all empty (an untouched multi-key field).
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().all(is_empty_value),
        other => is_falsy(other),
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { message } => f.debug_struct("Required").field("message", message).finish(),
            Self::Length { min, max, message } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .field("message", message)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Required { message: a }, Self::Required { message: b }) => a == b,
            (
                Self::Length { min, max, message },
                Self::Length {
                    min: min2,
                    max: max2,
                    message: message2,
                },
            ) => min == min2 && max == max2 && message == message2,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
