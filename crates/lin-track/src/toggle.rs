//! Per-type tracking switch with scoped suspension.
//!
//! Each type carries its own enabled flag (enabled unless set otherwise).
//! State lives behind a mutex so any dispatch thread can read and write it.
//! Suspension captures the prior state and restores it on every exit path,
//! including unwinding, so nested suspensions compose. Suspensions of the
//! same type from concurrent call stacks are not isolated from each other:
//! nest them only within a single logical call stack.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct TrackingToggle {
    states: Mutex<HashMap<String, bool>>,
}

impl TrackingToggle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_enabled(&self, type_name: &str) -> bool {
        self.lock().get(type_name).copied().unwrap_or(true)
    }

    pub fn enable(&self, type_name: &str) {
        self.set(type_name, true);
    }

    pub fn disable(&self, type_name: &str) {
        self.set(type_name, false);
    }

    /// Set the flag, returning the previous value.
    pub fn set(&self, type_name: &str, enabled: bool) -> bool {
        self.lock()
            .insert(type_name.to_string(), enabled)
            .unwrap_or(true)
    }

    /// Disable tracking for `type_name` until the guard drops, then restore
    /// whatever state was in effect before.
    #[must_use = "tracking is restored as soon as the guard is dropped"]
    pub fn suspend(&self, type_name: &str) -> SuspendGuard<'_> {
        let was_enabled = self.set(type_name, false);
        tracing::debug!(type_name, was_enabled, "tracking suspended");
        SuspendGuard {
            toggle: self,
            type_name: type_name.to_string(),
            was_enabled,
        }
    }

    /// Run `action` with tracking for `type_name` suspended.
    ///
    /// The prior state is restored whether `action` returns normally, returns
    /// an error, or panics.
    pub fn with_tracking_suspended<T>(&self, type_name: &str, action: impl FnOnce() -> T) -> T {
        let _guard = self.suspend(type_name);
        action()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, bool>> {
        self.states.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores a type's tracking state when dropped.
#[derive(Debug)]
pub struct SuspendGuard<'a> {
    toggle: &'a TrackingToggle,
    type_name: String,
    was_enabled: bool,
}

impl Drop for SuspendGuard<'_> {
    fn drop(&mut self) {
        self.toggle.set(&self.type_name, self.was_enabled);
        tracing::debug!(
            type_name = %self.type_name,
            enabled = self.was_enabled,
            "tracking restored"
        );
    }
}
