//! # Repository Module
//!
//! One repository per aggregate, all sharing the pool held by
//! [`Database`](crate::Database).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.catalog().list_services(true)       → &[Service]                    │
//! │  db.companies().list()                  → &[Company]                    │
//! │  db.engagements().list()                → &[Engagement]                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  washgo_core::price_engagement / invoice_rows   (pure, no I/O)          │
//! │                                                                         │
//! │  db.numbering().mint(id, kind, date)    → "FAC-202503-0001"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Services and their options
//! - [`CompanyRepository`] - Billing entities and their VAT policy
//! - [`EngagementRepository`] - Engagements, option selection, status
//! - [`NumberingRepository`] - FAC/DEV document numbers

pub mod catalog;
pub mod company;
pub mod engagement;
pub mod numbering;

pub use catalog::CatalogRepository;
pub use company::CompanyRepository;
pub use engagement::EngagementRepository;
pub use numbering::NumberingRepository;
