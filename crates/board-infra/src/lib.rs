//! # Board Infrastructure
//!
//! Concrete implementations of the ports defined in `board-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external dependencies, in-memory store only

pub mod database;
pub mod memory;
mod stores;

pub use memory::InMemoryBoardStore;
pub use stores::BoardStores;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, connect};
