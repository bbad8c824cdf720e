//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod draft;
pub mod service;

pub use draft::DraftStore;
pub use service::EnvelopeService;
