//! Projector element coordination for rostra.
//!
//! Decides which elements belong on which projector given a
//! show/hide/navigate intent and persists the resulting element lists
//! with exactly one REST call per intent. The server stays the system of
//! record; every local mutation is advisory until the next sync.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod plan;

pub use client::{ProjectRequest, ProjectorApi};
pub use coordinator::ProjectorCoordinator;
pub use error::{ProjectionError, Result};
