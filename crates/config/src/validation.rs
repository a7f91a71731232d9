//! Validation system for configuration values
//!
//! Each config section implements [`ConfigSection`], which includes validation.
//! [`Validator`] holds the field checks the sections share.

pub use crate::error::ValidationError;

/// Trait for configuration sections that can validate themselves
///
/// Each config section (AppConfig, SanitizerConfig) implements this trait
/// so the root config can validate and merge sections without knowing them.
pub trait ConfigSection: Default {
    /// Validates the configuration section
    ///
    /// Returns every validation error found. `Ok` means valid.
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another config section into this one
    ///
    /// Values from `other` take precedence. This is used for override chains.
    fn merge(&mut self, other: Self);

    /// Returns the section name for error reporting
    fn section_name(&self) -> &'static str;
}

/// Common validators for config values
pub struct Validator;

impl Validator {
    /// `min <= value <= max`
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if value < min || value > max {
            Err(ValidationError::with_value(
                field,
                format!("must be between {} and {}", min, max),
                value,
            ))
        } else {
            Ok(())
        }
    }

    /// Rejects blank strings
    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::new(field, "must not be empty"))
        } else {
            Ok(())
        }
    }

    /// Validates that a value is a bare host name
    ///
    /// Schemes, paths, ports and embedded whitespace are rejected.
    pub fn host_name(value: &str, field: &str) -> Result<(), ValidationError> {
        Self::not_empty(value, field)?;

        let host = value.trim();
        if host.contains("://") {
            return Err(ValidationError::with_value(
                field,
                "must be a host name without a scheme",
                value,
            ));
        }
        if host.contains(['/', ':', '?', '#', '@']) {
            return Err(ValidationError::with_value(
                field,
                "must be a host name without path, port or query",
                value,
            ));
        }
        if host.chars().any(char::is_whitespace) {
            return Err(ValidationError::with_value(
                field,
                "must not contain whitespace",
                value,
            ));
        }
        Ok(())
    }

    /// Folds individual checks into a section result, keeping every failure
    pub fn collect_errors(
        results: impl IntoIterator<Item = Result<(), ValidationError>>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
