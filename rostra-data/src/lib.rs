//! Shared data layer for rostra projector control
//!
//! This crate provides the projector domain models, the observable
//! datastore owned by the application root, and the slide registry
//! used to map projector elements back to domain records.

pub mod projector;
pub mod slides;
pub mod store;
pub mod target;

pub use projector::{ProjectionDefault, Projector, ProjectorElement};
pub use slides::SlideRegistry;
pub use store::{Datastore, StoreEvent, UnknownProjector};
pub use target::{ProjectionTarget, SlideDescriptor};
