//! Performance metrics collection for the simulation.
//!
//! Provides structured logging and metrics tracking for monitoring
//! simulation performance and health.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Metrics collector owned by one simulation instance.
pub struct Metrics {
    tick_count: AtomicU64,
    agent_count: AtomicU64,
    index_rebuilds: AtomicU64,
    retargets: AtomicU64,
    rig_failures: AtomicU64,
    wiggle_disabled: AtomicU64,
    log_interval: u64,
    pub counters: Mutex<HashMap<String, AtomicU64>>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(600)
    }
}

impl Metrics {
    /// Creates a new metrics collector that logs every `log_interval` ticks.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            agent_count: AtomicU64::new(0),
            index_rebuilds: AtomicU64::new(0),
            retargets: AtomicU64::new(0),
            rig_failures: AtomicU64::new(0),
            wiggle_disabled: AtomicU64::new(0),
            log_interval: log_interval.max(1),
            counters: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, agents: usize, retargets: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.agent_count.store(agents as u64, Ordering::Relaxed);
        self.retargets
            .fetch_add(retargets as u64, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                agents = agents,
                retargets = self.retargets.load(Ordering::Relaxed),
                rebuilds = self.index_rebuilds.load(Ordering::Relaxed),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_rebuild(&self) {
        self.index_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rig_failure(&self) {
        self.rig_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_wiggle_disabled(&self, count: usize) {
        self.wiggle_disabled
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Increments a named counter.
    pub fn increment_counter(&self, name: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .entry(name.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Reads a named counter; zero if it was never incremented.
    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters
            .get(name)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn agent_count(&self) -> u64 {
        self.agent_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn index_rebuilds(&self) -> u64 {
        self.index_rebuilds.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn retargets(&self) -> u64 {
        self.retargets.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rig_failures(&self) -> u64 {
        self.rig_failures.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn wiggle_disabled(&self) -> u64 {
        self.wiggle_disabled.load(Ordering::Relaxed)
    }

    /// Gets elapsed wall time since metrics creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
