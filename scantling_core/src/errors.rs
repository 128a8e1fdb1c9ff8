//! # Error Types
//!
//! Structured error types for scantling_core. Every error names the entity it
//! concerns (panel id, block name, input field) and, where a rule clause is
//! involved, the CSR citation, so that a report reader can trace it back to
//! the rule book.
//!
//! ## Severity
//!
//! - **Fatal**: `InputSchema`, `GeometryInvariant`, `RuleDomain`,
//!   `NumericDomain`, `InvalidAxis` and the IO kinds stop the run.
//! - **Non-fatal**: `RuleViolation` is collected per panel and reported.
//!
//! ## Example
//!
//! ```rust
//! use scantling_core::errors::{CsrError, CsrResult};
//!
//! fn validate_lbp(lbp: f64) -> CsrResult<()> {
//!     if !(90.0..=500.0).contains(&lbp) {
//!         return Err(CsrError::rule_domain(
//!             "LBP",
//!             lbp.to_string(),
//!             "Pt 1 Ch 1 Sec 1 [1.1.2]",
//!             "CSR applies to ships between 90 m and 500 m",
//!         ));
//!     }
//!     Ok(())
//! }
//! assert!(validate_lbp(60.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for scantling_core operations
pub type CsrResult<T> = Result<T, CsrError>;

/// Structured error type for section analysis.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CsrError {
    /// Input description is malformed (missing key, unknown material, duplicate id)
    #[error("Invalid input for '{entity}': {reason}")]
    InputSchema { entity: String, reason: String },

    /// Geometry cannot be built (bilge with unequal legs, open block, zero length)
    #[error("Geometry invariant violated by '{entity}': {reason}")]
    GeometryInvariant { entity: String, reason: String },

    /// Value lies outside the applicability of the rules
    #[error("'{field}' = {value} outside rule domain ({rule}): {reason}")]
    RuleDomain {
        field: String,
        value: String,
        rule: String,
        reason: String,
    },

    /// A rule requirement is not met (non-fatal, reported per panel)
    #[error("Rule violation ({rule}) at {location}: {reason}")]
    RuleViolation {
        panel_id: Option<u32>,
        location: String,
        rule: String,
        reason: String,
    },

    /// Numerical evaluation impossible (division by zero, empty panel)
    #[error("Numeric domain error in {context}: {reason}")]
    NumericDomain { context: String, reason: String },

    /// Axis specifier could not be understood
    #[error("Invalid axis specifier '{spec}'")]
    InvalidAxis { spec: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CsrError {
    /// Create an InputSchema error
    pub fn input_schema(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::InputSchema {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Create a GeometryInvariant error
    pub fn geometry(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::GeometryInvariant {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    /// Create a RuleDomain error
    pub fn rule_domain(
        field: impl Into<String>,
        value: impl Into<String>,
        rule: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CsrError::RuleDomain {
            field: field.into(),
            value: value.into(),
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a RuleViolation tied to a panel
    pub fn panel_violation(panel_id: u32, rule: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::RuleViolation {
            panel_id: Some(panel_id),
            location: format!("panel {}", panel_id),
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a RuleViolation on the hull girder as a whole
    pub fn section_violation(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::RuleViolation {
            panel_id: None,
            location: "midship section".to_string(),
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create a NumericDomain error
    pub fn numeric(context: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::NumericDomain {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CsrError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CsrError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Whether the run has to stop on this error.
    ///
    /// Only rule violations are reported and carried through to the end of the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, CsrError::RuleViolation { .. })
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CsrError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CsrError::InputSchema { .. } => "INPUT_SCHEMA",
            CsrError::GeometryInvariant { .. } => "GEOMETRY_INVARIANT",
            CsrError::RuleDomain { .. } => "RULE_DOMAIN",
            CsrError::RuleViolation { .. } => "RULE_VIOLATION",
            CsrError::NumericDomain { .. } => "NUMERIC_DOMAIN",
            CsrError::InvalidAxis { .. } => "INVALID_AXIS",
            CsrError::FileError { .. } => "FILE_ERROR",
            CsrError::FileLocked { .. } => "FILE_LOCKED",
            CsrError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CsrError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CsrError::panel_violation(12, "Pt 1 Ch 6 Sec 5 [1.2]", "Z below requirement");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CsrError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CsrError::input_schema("panel 3", "duplicate").error_code(), "INPUT_SCHEMA");
        assert_eq!(CsrError::InvalidAxis { spec: "z".into() }.error_code(), "INVALID_AXIS");
    }

    #[test]
    fn test_only_violations_are_non_fatal() {
        assert!(!CsrError::section_violation("Pt 1 Ch 5 Sec 1", "Z too small").is_fatal());
        assert!(CsrError::geometry("panel 2", "bilge legs differ").is_fatal());
        assert!(CsrError::numeric("plate", "zero length").is_fatal());
    }
}
