//! Candidate validation against registered definitions
//!
//! Validation semantics, per declared field in declaration order:
//! - Absent required field rejects with `MissingField`
//! - Present values must carry the declared type, with two documented
//!   exceptions: float fields accept integer input, and date fields accept a
//!   "YYYY-MM-DD" string
//! - Constraints are checked in declaration order; the first failing rule
//!   rejects with `ConstraintViolation`
//! - Absent optional fields take their declared default, or stay unset
//!
//! JSON null is treated as absent. Undeclared candidate fields are ignored.
//! The validator never mutates the candidate; validation is deterministic.

use serde_json::Value;

use chrono::NaiveDate;

use crate::errors::{SchemaError, SchemaResult};
use crate::registry::SchemaRegistry;
use crate::types::{FieldDef, FieldType, FieldValue, Schema};

/// How a record field got its value
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Value supplied by the candidate
    Provided(FieldValue),
    /// Declared default, substituted for an absent optional field
    Defaulted(FieldValue),
}

impl Resolved {
    /// The underlying value, however it was resolved.
    pub fn value(&self) -> &FieldValue {
        match self {
            Resolved::Provided(value) | Resolved::Defaulted(value) => value,
        }
    }

    /// Whether the value came from a declared default.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Resolved::Defaulted(_))
    }
}

/// A fully-typed, validated record, ready for the persistence collaborator
///
/// Fields appear in schema declaration order. Optional fields that were
/// absent and carry no default are left unset and do not appear at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema_name: String,
    collection: String,
    fields: Vec<(String, Resolved)>,
}

impl Record {
    /// Name of the definition this record was validated against.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Storage collection identifier for this record.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Looks up a field value by name. Unset fields return `None`.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, resolved)| resolved.value())
    }

    /// Whether a field's value came from a declared default.
    pub fn is_defaulted(&self, field: &str) -> bool {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map_or(false, |(_, resolved)| resolved.is_defaulted())
    }

    /// Iterates fields in schema declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Resolved)> {
        self.fields
            .iter()
            .map(|(name, resolved)| (name.as_str(), resolved))
    }

    /// Number of set fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Re-serializes the record as a JSON object for storage.
    ///
    /// Dates serialize back to "YYYY-MM-DD"; defaulted fields are included.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::with_capacity(self.fields.len());
        for (name, resolved) in &self.fields {
            map.insert(name.clone(), Value::from(resolved.value()));
        }
        Value::Object(map)
    }
}

/// Validator over a shared, read-only registry
pub struct SchemaValidator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a candidate against a named definition.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` on the first violation: `UnknownSchema` for an
    /// unregistered name, `TypeMismatch` on a non-object candidate, then the
    /// field-scoped errors described in the module docs.
    pub fn validate(&self, schema_name: &str, candidate: &Value) -> SchemaResult<Record> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| SchemaError::UnknownSchema(schema_name.to_string()))?;

        let obj = candidate
            .as_object()
            .ok_or_else(|| SchemaError::TypeMismatch {
                schema: schema.name.clone(),
                field: "$root".into(),
                expected: "object",
                actual: json_type_name(candidate).into(),
            })?;

        let mut fields = Vec::with_capacity(schema.fields.len());
        for def in &schema.fields {
            // Null carries no value, same as an omitted key
            match obj.get(&def.name).filter(|raw| !raw.is_null()) {
                Some(raw) => {
                    let value = coerce(schema, def, raw)?;
                    check_constraints(schema, def, &value)?;
                    fields.push((def.name.clone(), Resolved::Provided(value)));
                }
                None => {
                    if def.required {
                        return Err(SchemaError::MissingField {
                            schema: schema.name.clone(),
                            field: def.name.clone(),
                        });
                    }
                    if let Some(default) = &def.default {
                        fields.push((def.name.clone(), Resolved::Defaulted(default.clone())));
                    }
                }
            }
        }

        Ok(Record {
            schema_name: schema.name.clone(),
            collection: schema.collection_name(),
            fields,
        })
    }
}

/// Reads a raw JSON value as the field's declared type.
fn coerce(schema: &Schema, def: &FieldDef, raw: &Value) -> SchemaResult<FieldValue> {
    let mismatch = |actual: String| SchemaError::TypeMismatch {
        schema: schema.name.clone(),
        field: def.name.clone(),
        expected: def.field_type.type_name(),
        actual,
    };

    match def.field_type {
        FieldType::String => raw
            .as_str()
            .map(|s| FieldValue::Str(s.to_string()))
            .ok_or_else(|| mismatch(json_type_name(raw).into())),
        FieldType::Int => raw
            .as_i64()
            .map(FieldValue::Int)
            .ok_or_else(|| mismatch(json_type_name(raw).into())),
        FieldType::Float => raw
            .as_f64()
            .map(FieldValue::Float)
            .ok_or_else(|| mismatch(json_type_name(raw).into())),
        FieldType::Bool => raw
            .as_bool()
            .map(FieldValue::Bool)
            .ok_or_else(|| mismatch(json_type_name(raw).into())),
        FieldType::Date => {
            let text = raw
                .as_str()
                .ok_or_else(|| mismatch(json_type_name(raw).into()))?;
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(FieldValue::Date)
                .map_err(|_| mismatch(format!("'{}'", text)))
        }
    }
}

/// Checks a typed value against the field's rules, in declaration order.
fn check_constraints(schema: &Schema, def: &FieldDef, value: &FieldValue) -> SchemaResult<()> {
    for constraint in &def.constraints {
        if !constraint.is_satisfied(value) {
            return Err(SchemaError::ConstraintViolation {
                schema: schema.name.clone(),
                field: def.name.clone(),
                constraint: constraint.describe(),
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builtin()
    }

    #[test]
    fn test_valid_user_passes() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "address": "1 Main St",
            "is_active": true
        });

        let record = validator.validate("User", &candidate).unwrap();
        assert_eq!(record.schema_name(), "User");
        assert_eq!(record.collection(), "user");
        assert_eq!(record.get("name"), Some(&FieldValue::Str("Jo Lee".into())));
        // age omitted, no default: unset
        assert_eq!(record.get("age"), None);
        // is_active was provided, not defaulted
        assert_eq!(record.get("is_active"), Some(&FieldValue::Bool(true)));
        assert!(!record.is_defaulted("is_active"));
    }

    #[test]
    fn test_default_substitution() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "address": "1 Main St"
        });

        let record = validator.validate("User", &candidate).unwrap();
        assert_eq!(record.get("is_active"), Some(&FieldValue::Bool(true)));
        assert!(record.is_defaulted("is_active"));
    }

    #[test]
    fn test_missing_required_field() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "address": "1 Main St"
        });

        let result = validator.validate("User", &candidate);
        assert_eq!(
            result,
            Err(SchemaError::MissingField {
                schema: "User".into(),
                field: "email".into(),
            })
        );
    }

    #[test]
    fn test_null_required_field_is_missing() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": null,
            "address": "1 Main St"
        });

        let result = validator.validate("User", &candidate);
        assert_eq!(result.unwrap_err().field(), Some("email"));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": 42,
            "email": "jo@example.com",
            "address": "1 Main St"
        });

        let result = validator.validate("User", &candidate);
        assert_eq!(
            result,
            Err(SchemaError::TypeMismatch {
                schema: "User".into(),
                field: "name".into(),
                expected: "string",
                actual: "int".into(),
            })
        );
    }

    #[test]
    fn test_age_boundaries() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let with_age = |age: i64| {
            json!({
                "name": "Jo Lee",
                "email": "jo@example.com",
                "address": "1 Main St",
                "age": age
            })
        };

        assert!(validator.validate("User", &with_age(0)).is_ok());
        assert!(validator.validate("User", &with_age(120)).is_ok());
        assert!(validator.validate("User", &with_age(-1)).is_err());
        assert!(validator.validate("User", &with_age(121)).is_err());
    }

    #[test]
    fn test_int_field_rejects_float() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "address": "1 Main St",
            "age": 30.5
        });

        let result = validator.validate("User", &candidate);
        assert_eq!(
            result,
            Err(SchemaError::TypeMismatch {
                schema: "User".into(),
                field: "age".into(),
                expected: "int",
                actual: "float".into(),
            })
        );
    }

    #[test]
    fn test_float_field_accepts_integer() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "title": "Cable",
            "price": 15,
            "category": "accessories"
        });

        let record = validator.validate("Product", &candidate).unwrap();
        assert_eq!(record.get("price"), Some(&FieldValue::Float(15.0)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "title": "Cable",
            "price": -1.0,
            "category": "accessories"
        });

        let result = validator.validate("Product", &candidate);
        assert!(matches!(
            result,
            Err(SchemaError::ConstraintViolation { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_valid_booking_with_defaults() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "service": "Mixing",
            "booking_date": "2024-01-10",
            "time": "10:00"
        });

        let record = validator.validate("Booking", &candidate).unwrap();
        assert_eq!(record.collection(), "booking");
        assert_eq!(record.get("duration_hours"), Some(&FieldValue::Int(2)));
        assert!(record.is_defaulted("duration_hours"));
        assert_eq!(
            record.get("status"),
            Some(&FieldValue::Str("requested".into()))
        );
        assert!(record.is_defaulted("status"));
        // phone and notes stay unset
        assert_eq!(record.get("phone"), None);
        assert_eq!(record.get("notes"), None);

        let date = record.get("booking_date").unwrap().as_date().unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-01-10");
    }

    #[test]
    fn test_duration_boundaries() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let with_duration = |hours: i64| {
            json!({
                "name": "Jo Lee",
                "email": "jo@example.com",
                "service": "Recording",
                "booking_date": "2024-01-10",
                "time": "10:00",
                "duration_hours": hours
            })
        };

        assert!(validator.validate("Booking", &with_duration(1)).is_ok());
        assert!(validator.validate("Booking", &with_duration(12)).is_ok());
        assert!(validator.validate("Booking", &with_duration(0)).is_err());
        assert!(validator.validate("Booking", &with_duration(13)).is_err());
    }

    #[test]
    fn test_time_pattern_enforced() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let with_time = |time: &str| {
            json!({
                "name": "Jo Lee",
                "email": "jo@example.com",
                "service": "Recording",
                "booking_date": "2024-01-10",
                "time": time
            })
        };

        assert!(validator.validate("Booking", &with_time("23:59")).is_ok());
        assert!(validator.validate("Booking", &with_time("24:00")).is_err());
        assert!(validator.validate("Booking", &with_time("9:60")).is_err());
    }

    #[test]
    fn test_service_enumeration() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let with_service = |service: &str| {
            json!({
                "name": "Jo Lee",
                "email": "jo@example.com",
                "service": service,
                "booking_date": "2024-01-10",
                "time": "10:00"
            })
        };

        assert!(validator.validate("Booking", &with_service("Mixing")).is_ok());

        let result = validator.validate("Booking", &with_service("Editing"));
        assert!(matches!(
            result,
            Err(SchemaError::ConstraintViolation { ref field, .. }) if field == "service"
        ));
    }

    #[test]
    fn test_malformed_date_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "service": "Recording",
            "booking_date": "2024-13-40",
            "time": "10:00"
        });

        let result = validator.validate("Booking", &candidate);
        assert!(matches!(
            result,
            Err(SchemaError::TypeMismatch { ref field, expected: "date", .. })
                if field == "booking_date"
        ));
    }

    #[test]
    fn test_undeclared_fields_ignored() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "address": "1 Main St",
            "nickname": "jojo"
        });

        let record = validator.validate("User", &candidate).unwrap();
        assert_eq!(record.get("nickname"), None);
    }

    #[test]
    fn test_non_object_candidate_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let result = validator.validate("User", &json!(["not", "an", "object"]));
        assert!(matches!(
            result,
            Err(SchemaError::TypeMismatch { ref field, .. }) if field == "$root"
        ));
    }

    #[test]
    fn test_unknown_schema_rejected() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let result = validator.validate("Invoice", &json!({}));
        assert_eq!(result, Err(SchemaError::UnknownSchema("Invoice".into())));
    }

    #[test]
    fn test_record_to_value_includes_defaults() {
        let registry = registry();
        let validator = SchemaValidator::new(&registry);

        let candidate = json!({
            "name": "Jo Lee",
            "email": "jo@example.com",
            "service": "Mastering",
            "booking_date": "2024-01-10",
            "time": "9:30"
        });

        let record = validator.validate("Booking", &candidate).unwrap();
        let value = record.to_value();

        assert_eq!(value["name"], json!("Jo Lee"));
        assert_eq!(value["booking_date"], json!("2024-01-10"));
        assert_eq!(value["duration_hours"], json!(2));
        assert_eq!(value["status"], json!("requested"));
        assert!(value.get("phone").is_none());
    }
}
