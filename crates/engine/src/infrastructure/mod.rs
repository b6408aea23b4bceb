//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod outbox_worker;
pub mod ports;
pub mod sqlite;
