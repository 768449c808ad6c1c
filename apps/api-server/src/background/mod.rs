//! Background jobs.

pub mod recommendation;
pub mod scheduler;
