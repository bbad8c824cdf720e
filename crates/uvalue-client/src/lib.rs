//! uvalue client - HTTP transport, retry and readiness for the calculation backend
//!
//! This crate provides the reqwest-backed adapter for the `EnvelopeService`
//! port along with the readiness prober used while the backend cold-starts.

pub mod api;
pub mod readiness;
pub mod retry;
pub mod transport;

// Re-export main types
pub use api::{ApiClient, ClientSettings};
pub use readiness::{LivenessProbe, ProbeTarget, Readiness, ReadinessProber};
pub use retry::{RetryOn, RetryPolicy};
pub use transport::Transport;
