//! # washgo-db: Persistence for Wash&Go
//!
//! SQLite storage for the catalog, companies and engagements, plus the
//! transactional document numbering. Uses sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wash&Go Data Flow                                │
//! │                                                                         │
//! │  AppConfig::load()  (washgo.toml + WASHGO_* env)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     washgo-db (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │    │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │   │    │
//! │  │   │               │    │ Catalog        │    │              │   │    │
//! │  │   │ SqlitePool    │◄───│ Company        │    │ 001_initial  │   │    │
//! │  │   │ WAL, FKs      │    │ Engagement     │    │ _schema.sql  │   │    │
//! │  │   │ busy timeout  │    │ Numbering      │    │              │   │    │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  washgo-core  (totals, overrides, numbering rules)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - `washgo.toml` loading and environment overrides
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and configuration error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use washgo_db::{AppConfig, Database, DbConfig};
//!
//! let config = AppConfig::load_or_default(None);
//! let db = Database::new(DbConfig::from_settings(&config.database)).await?;
//!
//! let number = db.numbering().mint(&id, DocumentKind::Invoice, today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AppConfig, BillingConfig, DatabaseSettings};
pub use error::{ConfigError, DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::{
    CatalogRepository, CompanyRepository, EngagementRepository, NumberingRepository,
};
