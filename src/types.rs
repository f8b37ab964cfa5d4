//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point (integer input accepted)
//! - bool: Boolean
//! - date: calendar date, accepted as a "YYYY-MM-DD" string
//!
//! Constraints are declared as data (kind + parameters) on each field and
//! evaluated by a single generic routine, never re-implemented per field.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Calendar date, "YYYY-MM-DD"
    Date,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Date => "date",
        }
    }
}

/// A typed field value, produced by validation or declared as a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Date(_) => "date",
        }
    }

    /// Whether this value carries the given declared type.
    pub fn matches(&self, field_type: &FieldType) -> bool {
        matches!(
            (self, field_type),
            (FieldValue::Str(_), FieldType::String)
                | (FieldValue::Int(_), FieldType::Int)
                | (FieldValue::Float(_), FieldType::Float)
                | (FieldValue::Bool(_), FieldType::Bool)
                | (FieldValue::Date(_), FieldType::Date)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "'{}'", s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::Float(x) => Value::from(*x),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// A single declarative rule on a field's value, checked after the type check.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Inclusive integer bounds
    IntRange { min: Option<i64>, max: Option<i64> },
    /// Inclusive float lower bound
    FloatMin { min: f64 },
    /// Inclusive string length bounds, in characters
    Length { min: Option<usize>, max: Option<usize> },
    /// Full-string regular-expression match; compiled once at schema
    /// construction and shared across validation calls
    Pattern { regex: Regex },
    /// Enumeration membership for string fields
    OneOf { allowed: Vec<String> },
}

impl Constraint {
    /// Checks a typed value against this rule.
    ///
    /// Type applicability is enforced at registration by [`Schema::check`],
    /// so a value of an unrelated type passes here.
    pub fn is_satisfied(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Constraint::IntRange { min, max }, FieldValue::Int(n)) => {
                min.map_or(true, |lo| *n >= lo) && max.map_or(true, |hi| *n <= hi)
            }
            (Constraint::FloatMin { min }, FieldValue::Float(x)) => *x >= *min,
            (Constraint::Length { min, max }, FieldValue::Str(s)) => {
                let len = s.chars().count();
                min.map_or(true, |lo| len >= lo) && max.map_or(true, |hi| len <= hi)
            }
            (Constraint::Pattern { regex }, FieldValue::Str(s)) => regex.is_match(s),
            (Constraint::OneOf { allowed }, FieldValue::Str(s)) => {
                allowed.iter().any(|variant| variant == s)
            }
            _ => true,
        }
    }

    /// Whether this rule can apply to the given field type.
    pub fn applies_to(&self, field_type: &FieldType) -> bool {
        matches!(
            (self, field_type),
            (Constraint::IntRange { .. }, FieldType::Int)
                | (Constraint::FloatMin { .. }, FieldType::Float)
                | (Constraint::Length { .. }, FieldType::String)
                | (Constraint::Pattern { .. }, FieldType::String)
                | (Constraint::OneOf { .. }, FieldType::String)
        )
    }

    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Constraint::IntRange { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("range {}..={}", lo, hi),
                (Some(lo), None) => format!("minimum {}", lo),
                (None, Some(hi)) => format!("maximum {}", hi),
                (None, None) => "range".into(),
            },
            Constraint::FloatMin { min } => format!("minimum {}", min),
            Constraint::Length { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("length {}..={}", lo, hi),
                (Some(lo), None) => format!("minimum length {}", lo),
                (None, Some(hi)) => format!("maximum length {}", hi),
                (None, None) => "length".into(),
            },
            Constraint::Pattern { regex } => format!("pattern {}", regex.as_str()),
            Constraint::OneOf { allowed } => format!("one of [{}]", allowed.join(", ")),
        }
    }

    fn well_formed(&self) -> Result<(), String> {
        match self {
            Constraint::IntRange {
                min: Some(lo),
                max: Some(hi),
            } if lo > hi => Err(format!("inverted range {}..={}", lo, hi)),
            Constraint::Length {
                min: Some(lo),
                max: Some(hi),
            } if lo > hi => Err(format!("inverted length bounds {}..={}", lo, hi)),
            Constraint::OneOf { allowed } if allowed.is_empty() => {
                Err("enumeration must not be empty".into())
            }
            _ => Ok(()),
        }
    }
}

/// Field definition: declared type, presence rule, default, constraint list
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name as it appears in candidate input
    pub name: String,
    /// Declared data type
    pub field_type: FieldType,
    /// Whether the field must be present
    pub required: bool,
    /// Value substituted when an optional field is absent
    pub default: Option<FieldValue>,
    /// Rules checked in declaration order after the type check
    pub constraints: Vec<Constraint>,
}

impl FieldDef {
    /// Create a required field with no constraints
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Create an optional field with no constraints
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
            constraints: Vec::new(),
        }
    }

    /// Attach a default applied when the field is absent
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach a constraint; evaluation follows attachment order
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Complete record definition
///
/// Fields are kept in declaration order; validation and error reporting walk
/// them in that order, which makes the first reported violation deterministic.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Definition name (e.g. "User")
    pub name: String,
    /// Explicit collection override; when unset the lowercase rule applies
    pub collection: Option<String>,
    /// Field definitions in declaration order
    pub fields: Vec<FieldDef>,
}

impl Schema {
    /// Create a new definition
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            collection: None,
            fields,
        }
    }

    /// Override the derived collection name for this definition
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Returns the storage collection identifier for this definition.
    ///
    /// The explicit override is consulted first; otherwise the identifier is
    /// the lowercase form of the definition name. Pure, no I/O.
    pub fn collection_name(&self) -> String {
        match &self.collection {
            Some(collection) => collection.clone(),
            None => self.name.to_lowercase(),
        }
    }

    /// Looks up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Validates the definition structure itself (not a candidate).
    pub fn check(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("schema name must not be empty".into());
        }
        if self.fields.is_empty() {
            return Err("schema must declare at least one field".into());
        }

        let mut seen = HashSet::new();
        for def in &self.fields {
            if !seen.insert(def.name.as_str()) {
                return Err(format!("duplicate field '{}'", def.name));
            }
            if def.required && def.default.is_some() {
                return Err(format!(
                    "required field '{}' must not declare a default",
                    def.name
                ));
            }

            for constraint in &def.constraints {
                constraint
                    .well_formed()
                    .map_err(|reason| format!("field '{}': {}", def.name, reason))?;
                if !constraint.applies_to(&def.field_type) {
                    return Err(format!(
                        "constraint '{}' does not apply to {} field '{}'",
                        constraint.describe(),
                        def.field_type.type_name(),
                        def.name
                    ));
                }
            }

            if let Some(default) = &def.default {
                if !default.matches(&def.field_type) {
                    return Err(format!(
                        "default for field '{}' is {}, expected {}",
                        def.name,
                        default.type_name(),
                        def.field_type.type_name()
                    ));
                }
                for constraint in &def.constraints {
                    if !constraint.is_satisfied(default) {
                        return Err(format!(
                            "default for field '{}' violates {}",
                            def.name,
                            constraint.describe()
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
