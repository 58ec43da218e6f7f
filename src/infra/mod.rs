//! Infrastructure adapters: in-memory world storage and progress reporters.

pub mod reporter;
pub mod world;

pub use reporter::{InMemoryProgressReporter, TracingProgressReporter};
pub use world::InMemoryWorld;
