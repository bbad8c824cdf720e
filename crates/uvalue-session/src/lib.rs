//! uvalue session - Calculation lifecycle for a single design session
//!
//! This crate owns the working design for a session and drives it through
//! validation, submission, autosave and shared-link hydration.

pub mod context;
pub mod lifecycle;
pub mod share;

// Re-export main types
pub use context::{SessionContext, WarmState};
pub use lifecycle::{
    CalcState, CalculationReport, Completion, DesignController, FilmsQuery, HydrationOutcome,
    PendingCalculation, PendingSave, SaveOutcome,
};
pub use share::{parse_share_param, share_locator, SHARE_PARAM};
