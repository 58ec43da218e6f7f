//! Tick drivers and the control-surface API.

pub mod api;
#[cfg(not(target_arch = "wasm32"))]
pub mod thread_driver;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_driver;

pub use api::{fetch_status, handle_json, handle_request, ControlRequest, ControlResponse, StartRequest};
#[cfg(not(target_arch = "wasm32"))]
pub use thread_driver::ThreadTickDriver;
#[cfg(feature = "tokio-runtime")]
pub use tokio_driver::TokioTickDriver;
