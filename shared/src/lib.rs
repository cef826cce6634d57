//! Shared types and models for the Aura Grow platform
//!
//! This crate contains the wire types exchanged between the backend and the
//! dashboard, plus the pure environmental computations (snapshot resolution
//! and pollution scoring) that have no I/O of their own.

pub mod models;
pub mod pollution;
pub mod snapshot;
pub mod types;

pub use models::*;
pub use pollution::*;
pub use snapshot::*;
pub use types::*;
