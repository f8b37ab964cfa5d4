//! Error types for schema registration and document validation
//!
//! Every error is returned to the immediate caller; nothing here is fatal to
//! the process, and one rejected candidate never affects later validations.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised by the registry and the validator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Lookup of a definition that was never registered
    #[error("schema '{0}' not found")]
    UnknownSchema(String),

    /// Attempt to register a second definition under an existing name
    #[error("schema '{0}' is already registered")]
    SchemaExists(String),

    /// The definition itself is malformed (rejected at registration)
    #[error("invalid schema '{schema}': {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// A required field is absent from the candidate
    #[error("schema '{schema}': required field '{field}' is missing")]
    MissingField { schema: String, field: String },

    /// A present field's value cannot be read as the declared type
    #[error("schema '{schema}': field '{field}' expected {expected}, got {actual}")]
    TypeMismatch {
        schema: String,
        field: String,
        expected: &'static str,
        actual: String,
    },

    /// A present, correctly-typed field violates one of its rules
    #[error("schema '{schema}': field '{field}' violates {constraint} (got {value})")]
    ConstraintViolation {
        schema: String,
        field: String,
        constraint: String,
        value: String,
    },
}

impl SchemaError {
    /// Returns the field this error refers to, for field-scoped errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::MissingField { field, .. }
            | SchemaError::TypeMismatch { field, .. }
            | SchemaError::ConstraintViolation { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = SchemaError::MissingField {
            schema: "User".into(),
            field: "email".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("User"));
        assert!(display.contains("email"));
        assert!(display.contains("missing"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = SchemaError::TypeMismatch {
            schema: "Product".into(),
            field: "price".into(),
            expected: "float",
            actual: "string".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("price"));
        assert!(display.contains("expected float"));
        assert!(display.contains("got string"));
    }

    #[test]
    fn test_field_accessor() {
        let err = SchemaError::ConstraintViolation {
            schema: "Booking".into(),
            field: "time".into(),
            constraint: "pattern".into(),
            value: "'25:00'".into(),
        };
        assert_eq!(err.field(), Some("time"));

        let err = SchemaError::UnknownSchema("Invoice".into());
        assert_eq!(err.field(), None);
    }
}
