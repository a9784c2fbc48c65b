//! # Error Types
//!
//! Domain-specific error types for washgo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  washgo-core errors (this file)                                         │
//! │  ├── CoreError        - Domain rule failures (numbering, lookups)       │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  washgo-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                     │
//! │  └── ConfigError      - Configuration loading failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Never Errors
//! Totals and override normalization are total functions. Bad numbers coming
//! from a form are clamped, not rejected, so nothing in `totals` or
//! `overrides` returns a `Result`.

use thiserror::Error;

use crate::numbering::{DocumentKind, MonthToken};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The month already used all 9999 sequence numbers for this kind.
    ///
    /// ## When This Occurs
    /// ```text
    /// FAC-202501-9999 issued
    ///      │
    ///      ▼
    /// next_document_number(Invoice, …, 2025-01-xx)
    ///      │
    ///      ▼
    /// SequenceExhausted { kind: Invoice, month: 202501 }
    /// ```
    /// The format is fixed at four digits; the number is never wrapped or
    /// widened.
    #[error("No {kind} number left for {month}: sequence exhausted at 9999")]
    SequenceExhausted { kind: DocumentKind, month: MonthToken },

    #[error("Engagement not found: {0}")]
    EngagementNotFound(String),

    /// Document numbers carry a four-digit year and a 1-based month.
    #[error("No document month for {year}-{month:02}: year must be 0000-9999")]
    MonthOutOfRange { year: i32, month: u32 },

    #[error("Invalid document number '{0}'")]
    InvalidDocumentNumber(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the checks in [`crate::validation`] before anything is written.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Amount or duration below zero.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., malformed document number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value inside one record (e.g., two options with the same id).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
