//! Polling Monitor
//!
//! Watches the server's version marker and asks for a content refresh when it
//! moves forward. Errors never leave this module; they are logged and the next
//! tick tries again.

use std::cell::{Cell, RefCell};
use std::future::Future;

use crate::api::{BoardApi, Transport};

/// Last version marker the client has acted on. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionTracker {
    last_seen: Option<i64>,
}

impl VersionTracker {
    #[cfg(test)]
    pub fn last_seen(&self) -> Option<i64> {
        self.last_seen
    }

    /// Seed from the startup fetch so the first tick does not refresh a page
    /// that was just rendered
    pub fn prime(&mut self, marker: i64) {
        self.last_seen = Some(self.last_seen.map_or(marker, |seen| seen.max(marker)));
    }

    /// Record `marker`; true iff it is newer than anything seen so far.
    /// Without a primed value the first marker only primes.
    pub fn observe(&mut self, marker: i64) -> bool {
        match self.last_seen {
            Some(seen) if marker > seen => {
                self.last_seen = Some(marker);
                true
            }
            Some(_) => false,
            None => {
                self.last_seen = Some(marker);
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A refresh was already running
    Skipped,
    Unchanged,
    Refreshed,
    /// Version endpoint unreachable; marker untouched
    Failed,
}

#[derive(Debug, Default)]
pub struct PollMonitor {
    tracker: RefCell<VersionTracker>,
    ticks: Cell<u64>,
}

impl PollMonitor {
    #[cfg(test)]
    pub fn tracker(&self) -> VersionTracker {
        *self.tracker.borrow()
    }

    /// Startup fetch of the marker
    pub async fn prime<T: Transport>(&self, api: &BoardApi<T>) {
        match api.version().await {
            Ok(marker) => self.tracker.borrow_mut().prime(marker.timestamp),
            Err(e) => log::warn!(target: "poll", "initial version check failed: {}", e),
        }
    }

    /// One polling round. `busy` reports whether a refresh is in flight; it is
    /// asked before and after the version request so ticks never overlap a
    /// running refresh.
    pub async fn tick<T, B, F, Fut>(&self, api: &BoardApi<T>, busy: B, refresh: F) -> TickOutcome
    where
        T: Transport,
        B: Fn() -> bool,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        self.ticks.set(self.ticks.get() + 1);
        if busy() {
            log::debug!(target: "poll", "tick {} skipped, refresh in flight", self.ticks.get());
            return TickOutcome::Skipped;
        }

        let marker = match api.version().await {
            Ok(marker) => marker.timestamp,
            Err(e) => {
                log::warn!(target: "poll", "version check failed: {}", e);
                return TickOutcome::Failed;
            }
        };

        // leave the marker unobserved so the next tick retries
        if busy() {
            return TickOutcome::Skipped;
        }

        let changed = self.tracker.borrow_mut().observe(marker);
        if !changed {
            return TickOutcome::Unchanged;
        }
        log::info!(target: "poll", "server data changed (version {}), refreshing", marker);
        refresh().await;
        TickOutcome::Refreshed
    }
}

/// Sleep between polling rounds
pub async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}
