//! Input validation for store entities.
//!
//! Validation collects every problem instead of stopping at the first one,
//! so callers can tell the user exactly which fields need fixing.

use std::fmt;

/// Minimum length of a phone number used as a user key.
pub const MIN_PHONE_LENGTH: usize = 5;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path of the offending field (e.g. `foods.0.macros.protein`).
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

/// Validation error listing every violated field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// A validation error with a single issue.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    /// Paths of all violated fields, in the order they were found.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|issue| issue.path.as_str()).collect()
    }

    /// Whether a given path was reported.
    pub fn has_path(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", issue.path, issue.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates issues while walking an entity.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    pub fn non_blank(&mut self, path: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(path, "cannot be empty");
        }
    }

    pub fn positive(&mut self, path: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.push(path, "must be a positive number");
        }
    }

    pub fn non_negative(&mut self, path: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.push(path, "must be zero or greater");
        }
    }

    pub fn strings(&mut self, path: &str, values: &[String]) {
        for (i, value) in values.iter().enumerate() {
            self.non_blank(&format!("{}.{}", path, i), value);
        }
    }

    pub fn phone_number(&mut self, path: &str, value: &str) {
        if value.trim().chars().count() < MIN_PHONE_LENGTH {
            self.push(
                path,
                format!("must have at least {} characters", MIN_PHONE_LENGTH),
            );
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_issue() {
        let mut v = Validator::new();
        v.positive("height", -1.0);
        v.positive("weight", f64::NAN);
        v.non_blank("name", "  ");
        v.non_negative("macros.fats", 0.0);

        let err = v.finish().unwrap_err();
        assert_eq!(err.paths(), vec!["height", "weight", "name"]);
        assert!(err.has_path("name"));
    }

    #[test]
    fn test_display_lists_paths() {
        let mut v = Validator::new();
        v.phone_number("phoneNumber", "123");
        v.strings("diseases", &["diabetes".to_string(), "".to_string()]);

        let err = v.finish().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("phoneNumber: must have at least 5 characters"));
        assert!(text.contains("diseases.1: cannot be empty"));
    }

    #[test]
    fn test_ok_when_clean() {
        let mut v = Validator::new();
        v.positive("age", 30.0);
        v.non_blank("name", "Ana");
        assert!(v.finish().is_ok());
    }
}
