//! # Repository Module
//!
//! Database repository implementations for Gota Loyalty.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  Sale-processing job                                                   │
//! │       │                                                                 │
//! │       │  1. load snapshots                                             │
//! │       │     db.customers().get_by_id(..), db.influencers().get_by_id() │
//! │       │  2. outcome = engine.process_sale(sale, customer, influencer)  │
//! │       │  3. persist what the outcome reports                           │
//! │       │     db.customers().apply_sale_outcome(&outcome)                │
//! │       │     db.influencers().apply_sale_outcome(..)                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The engine (gota-core) never appears below this line: repositories    │
//! │  own SQL, the engine owns math, the job glues them.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`customer::CustomerRepository`] - Customer CRUD and tier progress
//! - [`influencer::InfluencerRepository`] - Influencer balances and network
//! - [`sale::SaleRepository`] - Sale events and verification transitions
//! - [`store::StoreRepository`] - Store listings for the proximity lookup
//! - [`payout::PayoutRepository`] - Payout request lifecycle
//! - [`settings::SettingsRepository`] - Single-row commission settings

pub mod customer;
pub mod influencer;
pub mod payout;
pub mod sale;
pub mod settings;
pub mod store;
