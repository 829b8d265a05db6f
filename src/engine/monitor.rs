use std::time::{Duration, Instant};

use tracing::debug;

use crate::page::Page;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);
const SNAPSHOT_LIMIT: usize = 1000;

/// Watches an active page for changes the sentence layer did not make
/// itself, through two independent channels:
///
/// * a content-drift poll that compares a bounded snapshot of the rendered
///   text on a fixed interval, and
/// * a structural watch that reacts to any settled tree mutation after
///   which no unit elements remain.
///
/// The monitor never rebuilds on its own. [`DriftMonitor::check`] reports
/// whether a rebuild is due and the caller runs it, so both channels
/// converge on one rebuild path.
pub struct DriftMonitor {
    poll_interval: Duration,
    snapshot: String,
    last_epoch: u64,
    next_poll: Option<Instant>,
    running: bool,
}

impl DriftMonitor {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            snapshot: String::new(),
            last_epoch: 0,
            next_poll: None,
            running: false,
        }
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Starts watching, baselined on the page as it is right now.
    pub fn start(&mut self, page: &Page, now: Instant) {
        self.running = true;
        self.next_poll = Some(now + self.poll_interval);
        self.resync(page);
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.next_poll = None;
    }

    /// Re-baselines the snapshot and mutation epoch so the sentence
    /// layer's own rewrites are not reported as drift.
    pub fn resync(&mut self, page: &Page) {
        self.snapshot = page.snapshot(SNAPSHOT_LIMIT);
        self.last_epoch = page.epoch();
    }

    /// Returns true when the sentence layer must be rebuilt. Both channels
    /// are evaluated; a simultaneous hit still means one rebuild.
    pub fn check(&mut self, page: &Page, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        let mut rebuild = false;

        let epoch = page.epoch();
        if epoch != self.last_epoch {
            self.last_epoch = epoch;
            if !page.any_units() {
                debug!("sentence units vanished, rebuild due");
                rebuild = true;
            }
        }

        if let Some(due) = self.next_poll {
            if now >= due {
                self.next_poll = Some(now + self.poll_interval);
                let snapshot = page.snapshot(SNAPSHOT_LIMIT);
                if snapshot != self.snapshot {
                    self.snapshot = snapshot;
                    debug!("rendered text drifted, rebuild due");
                    rebuild = true;
                }
            }
        }

        rebuild
    }
}

impl Default for DriftMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod monitor_tests;
