//! # gota-db: Database Layer for Gota Loyalty
//!
//! This crate provides database access for the Gota loyalty program.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Gota Loyalty Data Flow                            │
//! │                                                                         │
//! │  Sale-processing job / Admin API                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      gota-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ Customer      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Influencer    │    │ 001_init.sql │  │   │
//! │  │   │ WAL + FKs     │    │ Sale, Store   │    │ ...          │  │   │
//! │  │   │               │    │ Payout,Config │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (gota.db)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gota_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/gota.db")).await?;
//!
//! // Load snapshots, run the engine, persist the outcome
//! let customer = db.customers().get_by_id(&sale.customer_id).await?;
//! let outcome = engine.process_sale(&sale, &customer, influencer.as_ref())?;
//! db.customers().apply_sale_outcome(&outcome).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::influencer::InfluencerRepository;
pub use repository::payout::PayoutRepository;
pub use repository::sale::SaleRepository;
pub use repository::settings::SettingsRepository;
pub use repository::store::StoreRepository;
