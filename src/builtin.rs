//! Builtin record definitions for the application
//!
//! Each definition maps to one collection in the document store, named after
//! the lowercase form of the definition name:
//! - User -> "user"
//! - Product -> "product"
//! - Booking -> "booking"

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Constraint, FieldDef, FieldType, FieldValue, Schema};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
// 24-hour HH:MM start time; a single-digit hour is accepted
const TIME_PATTERN: &str = r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$";

fn email_pattern() -> Constraint {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));
    Constraint::Pattern {
        regex: regex.clone(),
    }
}

fn time_pattern() -> Constraint {
    static RE: OnceLock<Regex> = OnceLock::new();
    let regex = RE.get_or_init(|| Regex::new(TIME_PATTERN).expect("time pattern compiles"));
    Constraint::Pattern {
        regex: regex.clone(),
    }
}

/// Users collection schema
pub fn user() -> Schema {
    Schema::new(
        "User",
        vec![
            FieldDef::required("name", FieldType::String),
            FieldDef::required("email", FieldType::String).with_constraint(email_pattern()),
            FieldDef::required("address", FieldType::String),
            FieldDef::optional("age", FieldType::Int).with_constraint(Constraint::IntRange {
                min: Some(0),
                max: Some(120),
            }),
            FieldDef::optional("is_active", FieldType::Bool).with_default(FieldValue::Bool(true)),
        ],
    )
}

/// Products collection schema
pub fn product() -> Schema {
    Schema::new(
        "Product",
        vec![
            FieldDef::required("title", FieldType::String),
            FieldDef::optional("description", FieldType::String),
            FieldDef::required("price", FieldType::Float)
                .with_constraint(Constraint::FloatMin { min: 0.0 }),
            FieldDef::required("category", FieldType::String),
            FieldDef::optional("in_stock", FieldType::Bool).with_default(FieldValue::Bool(true)),
        ],
    )
}

/// Bookings for studio sessions
pub fn booking() -> Schema {
    Schema::new(
        "Booking",
        vec![
            FieldDef::required("name", FieldType::String).with_constraint(Constraint::Length {
                min: Some(2),
                max: Some(100),
            }),
            FieldDef::required("email", FieldType::String).with_constraint(email_pattern()),
            FieldDef::optional("phone", FieldType::String),
            FieldDef::required("service", FieldType::String).with_constraint(Constraint::OneOf {
                allowed: vec![
                    "Recording".into(),
                    "Mixing".into(),
                    "Production".into(),
                    "Mastering".into(),
                ],
            }),
            FieldDef::required("booking_date", FieldType::Date),
            FieldDef::required("time", FieldType::String).with_constraint(time_pattern()),
            FieldDef::optional("duration_hours", FieldType::Int)
                .with_default(FieldValue::Int(2))
                .with_constraint(Constraint::IntRange {
                    min: Some(1),
                    max: Some(12),
                }),
            FieldDef::optional("notes", FieldType::String).with_constraint(Constraint::Length {
                min: None,
                max: Some(1000),
            }),
            FieldDef::optional("status", FieldType::String)
                .with_default(FieldValue::Str("requested".into()))
                .with_constraint(Constraint::OneOf {
                    allowed: vec!["requested".into(), "confirmed".into(), "declined".into()],
                }),
        ],
    )
}

/// All builtin definitions, in registration order.
pub(crate) fn all() -> Vec<Schema> {
    vec![user(), product(), booking()]
}
