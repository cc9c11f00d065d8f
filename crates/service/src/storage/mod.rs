//! Storage abstractions for service layer
//!
//! File-backed persistence for the in-memory user store, for runs where the
//! users should outlive the process.

pub mod json_snapshot;
