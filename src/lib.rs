//! studio-schemas - schema registry and document validation
//!
//! Declares the application's record definitions (User, Product, Booking),
//! validates untrusted candidate input against them, and derives the storage
//! collection name for each definition. The database driver and any transport
//! layer are external collaborators: they hand candidates in and receive
//! either a fully-typed record or a structured rejection.
//!
//! # Design Principles
//!
//! - Definitions are registered once at startup and immutable afterwards
//! - Validation is pure, synchronous and deterministic
//! - Fields are walked in declaration order; the first violation is reported
//! - Rejections are returned to the caller, never silently corrected
//! - Constraints are data (kind + parameters), evaluated by one generic
//!   routine; patterns compile once at definition time

mod builtin;
mod errors;
mod registry;
mod types;
mod validator;

pub use builtin::{booking, product, user};
pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{Constraint, FieldDef, FieldType, FieldValue, Schema};
pub use validator::{Record, Resolved, SchemaValidator};
