//! # washgo-core: Pure Pricing Logic for Wash&Go
//!
//! Engagement totals, option override sanitizing and document numbering for
//! the Wash&Go cleaning-service back office. Zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wash&Go Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Front-end (React)                            │   │
//! │  │   Service form ──► Option overrides ──► Quote / Invoice view    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON (types exported by ts-rs)         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ washgo-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │ overrides │  │  totals   │  │ numbering │  │  reports  │   │   │
//! │  │   │ sanitize  │  │ price/VAT │  │ FAC / DEV │  │ averages  │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO GLOBAL STATE                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  washgo-db (Database Layer)                     │   │
//! │  │        SQLite, migrations, repositories, locked minting         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Service, Engagement, Company, ids)
//! - [`money`] - Money type with integer arithmetic
//! - [`overrides`] - Per-engagement option overrides and their sanitizer
//! - [`totals`] - Engagement and document totals
//! - [`numbering`] - `FAC-YYYYMM-NNNN` / `DEV-YYYYMM-NNNN` numbers
//! - [`reports`] - Catalog statistics and invoice export rows
//! - [`validation`] - Boundary checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use washgo_core::{compute_document_totals, compute_engagement_totals, Money, VatRate};
//! use washgo_core::types::{ClientId, Engagement, EngagementId, ServiceId};
//!
//! let mut engagement = Engagement::new(
//!     EngagementId::new("e1"),
//!     ClientId::new("c1"),
//!     ServiceId::new("s1"),
//!     chrono::Utc::now(),
//! );
//! engagement.set_additional_charge(Money::from_cents(500));
//!
//! let totals = compute_engagement_totals(&engagement, &[]);
//! let doc = compute_document_totals(&totals, true, VatRate::from_bps(2000));
//! assert_eq!(doc.total_ttc.cents(), 600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod numbering;
pub mod overrides;
pub mod reports;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{ExactMoney, Money};
pub use numbering::{
    assign_document_number, display_document_number, legacy_document_number,
    next_document_number, DocumentKind, DocumentNumber, MonthToken, NumberingLedger,
};
pub use overrides::{
    resolve_option_override, sanitize_override_inputs, sanitize_overrides, OptionOverride,
    OptionOverrideInput, ResolvedOption,
};
pub use totals::{
    compute_document_totals, compute_engagement_totals, price_engagement, DocumentTotals,
    EngagementTotals,
};
pub use types::*;
