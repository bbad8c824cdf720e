//! uvalue core - Domain models, assembly state and configuration
//!
//! This crate contains the design model, its pure derivations and the port
//! definitions the client and session crates plug into.

pub mod assembly;
pub mod assets;
pub mod cancel;
pub mod config;
pub mod draft;
pub mod error;
pub mod geometry;
pub mod models;
pub mod ports;

pub use assembly::{AssemblyDesign, ValidationIssue};
pub use cancel::CancelFlag;
pub use error::{Result, UvalueError};
