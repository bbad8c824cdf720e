//! Per-session state that outlives individual calculations

use serde::Serialize;
use std::time::{Duration, Instant};
use uvalue_core::models::SavedDesignRef;

/// What is known about the backend's warm-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmState {
    /// No readiness check has finished yet
    Cold,
    Ready,
    /// The readiness wait ran out; requests still go through and report their own errors
    Unresponsive,
}

/// Session-scoped flags, created once on first load
#[derive(Debug, Clone)]
pub struct SessionContext {
    warm: WarmState,
    started: Instant,
    computed_this_session: bool,
    last_saved: Option<SavedDesignRef>,
    hydrated_from: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            warm: WarmState::Cold,
            started: Instant::now(),
            computed_this_session: false,
            last_saved: None,
            hydrated_from: None,
        }
    }

    pub fn warm_state(&self) -> WarmState {
        self.warm
    }

    /// True until a readiness check has succeeded
    pub fn needs_warmup(&self) -> bool {
        self.warm != WarmState::Ready
    }

    pub fn record_ready(&mut self) {
        self.warm = WarmState::Ready;
    }

    pub fn record_unresponsive(&mut self) {
        if self.warm != WarmState::Ready {
            self.warm = WarmState::Unresponsive;
        }
    }

    /// Time since the session started, warm-up included
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether a calculation succeeded at any point in this session
    pub fn computed_this_session(&self) -> bool {
        self.computed_this_session
    }

    pub fn last_saved(&self) -> Option<&SavedDesignRef> {
        self.last_saved.as_ref()
    }

    /// Public id of the shared design this session was hydrated from
    pub fn hydrated_from(&self) -> Option<&str> {
        self.hydrated_from.as_deref()
    }

    pub(crate) fn mark_computed(&mut self) {
        self.computed_this_session = true;
    }

    pub(crate) fn set_last_saved(&mut self, saved: SavedDesignRef) {
        self.last_saved = Some(saved);
    }

    pub(crate) fn set_hydrated_from(&mut self, public_id: &str) {
        self.hydrated_from = Some(public_id.to_string());
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context() {
        let context = SessionContext::new();
        assert_eq!(context.warm_state(), WarmState::Cold);
        assert!(context.needs_warmup());
        assert!(!context.computed_this_session());
        assert!(context.last_saved().is_none());
        assert!(context.hydrated_from().is_none());
    }

    #[test]
    fn test_ready_is_sticky() {
        let mut context = SessionContext::new();
        context.record_unresponsive();
        assert_eq!(context.warm_state(), WarmState::Unresponsive);
        assert!(context.needs_warmup());

        context.record_ready();
        context.record_unresponsive();
        assert_eq!(context.warm_state(), WarmState::Ready);
        assert!(!context.needs_warmup());
    }

    #[test]
    fn test_uptime_advances() {
        let context = SessionContext::new();
        let before = context.uptime();
        std::thread::sleep(Duration::from_millis(5));
        assert!(context.uptime() >= before + Duration::from_millis(5));
    }
}
