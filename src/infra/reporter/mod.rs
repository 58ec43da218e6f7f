//! Progress reporter adapters.

#[cfg(not(target_arch = "wasm32"))]
pub mod channel;
pub mod logging;
pub mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use channel::{ChannelProgressReporter, ReporterEvent};
pub use logging::TracingProgressReporter;
pub use memory::InMemoryProgressReporter;
