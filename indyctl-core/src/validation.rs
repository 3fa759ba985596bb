//! Client-side checks for store create/update forms
//!
//! Every rule is checked so all problems can be shown at once.

use std::fmt;

use crate::store::{Store, StoreType};

/// Maximum length of a store name
pub const MAX_NAME_LEN: usize = 50;

/// Accepted range for `disable_timeout` (seconds, -1 = never)
pub const MIN_DISABLE_TIMEOUT: i64 = -1;
pub const MAX_DISABLE_TIMEOUT: i64 = 999_999_999;

/// Whether the form creates a store or edits an existing one.
///
/// Identity fields are fixed once a store exists, so name rules only apply
/// to new stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    New,
    Edit,
}

/// A single failed form rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Required { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Number outside the accepted range
    OutOfRange { field: &'static str, min: i64, max: i64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{} is required", field),
            Self::TooLong { field, max } => {
                write!(f, "{}'s length should be less than {}", field, max)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} is not a valid number ({}..={})", field, min, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Editable fields of a store form
#[derive(Debug, Clone, Default)]
pub struct StoreForm {
    pub package_type: Option<String>,
    pub store_type: Option<StoreType>,
    pub name: Option<String>,
    pub disable_timeout: Option<i64>,
}

impl StoreForm {
    pub fn from_store(store: &Store) -> Self {
        Self {
            package_type: Some(store.package_type.clone()),
            store_type: Some(store.store_type),
            name: Some(store.name.clone()),
            disable_timeout: store.disable_timeout,
        }
    }

    /// Check every rule for `mode` and return all violations.
    pub fn validate(&self, mode: FormMode) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.package_type.as_deref().map_or(true, |p| p.trim().is_empty()) {
            errors.push(ValidationError::Required {
                field: "packageType",
            });
        }

        if self.store_type.is_none() {
            errors.push(ValidationError::Required { field: "type" });
        }

        if mode == FormMode::New {
            match self.name.as_deref().map(str::trim) {
                None | Some("") => errors.push(ValidationError::Required { field: "name" }),
                Some(name) if name.chars().count() > MAX_NAME_LEN => {
                    errors.push(ValidationError::TooLong {
                        field: "name",
                        max: MAX_NAME_LEN,
                    })
                }
                Some(_) => {}
            }
        }

        if let Some(timeout) = self.disable_timeout {
            if !(MIN_DISABLE_TIMEOUT..=MAX_DISABLE_TIMEOUT).contains(&timeout) {
                errors.push(ValidationError::OutOfRange {
                    field: "disable_timeout",
                    min: MIN_DISABLE_TIMEOUT,
                    max: MAX_DISABLE_TIMEOUT,
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
