//! # Board Core
//!
//! The domain layer of the board backend: posts, votes and the
//! recommended-post ledger, the ports infrastructure must implement, and the
//! services that drive them.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
