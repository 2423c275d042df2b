//! # League Points
//!
//! Group standings for an esports league: match entry, manual edits, ranked
//! tables and CSV import/export.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, groups, ranked rows, session IDs)
//! - **calculate**: Derived metrics (PD, PDT, Total) and ranking
//! - **store**: Groups, seed data and the pending-delete confirmation
//! - **results**: Applying match batches to a group
//! - **storage**: CSV import/export and file helpers
//! - **api**: REST API endpoints with per-session stores
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod error;
pub mod models;
pub mod results;
pub mod storage;
pub mod store;

pub use error::LeagueError;
pub use models::*;
