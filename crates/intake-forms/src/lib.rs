//! Intake Forms
//!
//! Shared model for the site's intake form: field schema, client-side
//! validation rules, the live character counter, and the JSON shapes that
//! travel between the browser-side form and the intake endpoint.
//!
//! ## Flow
//!
//! ```text
//!   input/blur ──► FieldValidator (per field) ──► error flag
//!   submit     ──► FieldValidator (all fields) ──► IntakeSubmission ──► POST /api/intake
//!                                                                  │
//!                                         IntakeRecord { .., date } ◄┘
//! ```

#![warn(missing_docs)]

pub mod counter;
pub mod field;
pub mod validation;
pub mod wire;

use thiserror::Error;

pub use counter::{CharCounter, CounterState, CounterReading};
pub use field::{FieldConstraints, FieldKind, FieldSpec, FormField, FormSchema};
pub use validation::{FailureReason, FieldValidator, ValidationFailure, ValidationResult};
pub use wire::{ErrorBody, IntakeAck, IntakeRecord, IntakeSubmission, RECORD_DATE_KEY};

// =============================================================================
// Error Types
// =============================================================================

/// Form model errors
#[derive(Error, Debug)]
pub enum FormsError {
    /// Two fields in one schema share a name
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field with an empty name
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// Schema document could not be parsed
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormsError>;
