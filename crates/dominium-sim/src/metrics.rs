//! Per-tick and cumulative metrics, ported from `client_shell.h`'s
//! `dom_shell_metrics_window` ring buffer (spec §4.10 step 6).

use std::collections::VecDeque;

/// One tick's counters, snapshotted into the metrics window at tick close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsWindow {
    /// The tick this snapshot covers.
    pub tick: u64,
    /// `PROCESS` verb invocations attempted this tick.
    pub process_attempts: u32,
    /// `PROCESS` verb invocations that failed this tick.
    pub process_failures: u32,
    /// `PROCESS` verb invocations refused outright this tick.
    pub process_refusals: u32,
    /// Commands the agent pipeline emitted and the executor attempted.
    pub command_attempts: u32,
    /// Commands the executor failed to complete.
    pub command_failures: u32,
    /// Networks that newly failed a node or edge this tick.
    pub network_failures: u32,
}

/// Cumulative counters plus a bounded ring of recent per-tick snapshots.
#[derive(Debug, Clone)]
pub struct MetricsState {
    /// Total ticks `simulate` has advanced.
    pub simulate_ticks: u64,
    /// Ticks in which neither a command nor a process attempt occurred.
    pub idle_ticks: u64,
    /// Scenario field injections applied across the world's lifetime.
    pub scenario_injections: u64,
    /// Cumulative `process_attempts`.
    pub process_attempts: u64,
    /// Cumulative `process_failures`.
    pub process_failures: u64,
    /// Cumulative `process_refusals`.
    pub process_refusals: u64,
    /// Cumulative `command_attempts`.
    pub command_attempts: u64,
    /// Cumulative `command_failures`.
    pub command_failures: u64,
    /// Cumulative `network_failures`.
    pub network_failures: u64,
    window_capacity: usize,
    window: VecDeque<MetricsWindow>,
    current: MetricsWindow,
}

impl MetricsState {
    /// Creates an empty metrics state with the given window capacity (`0`
    /// means unbounded, though a world config should always give a finite
    /// capacity in practice).
    #[must_use]
    pub fn new(window_capacity: usize) -> Self {
        Self {
            simulate_ticks: 0,
            idle_ticks: 0,
            scenario_injections: 0,
            process_attempts: 0,
            process_failures: 0,
            process_refusals: 0,
            command_attempts: 0,
            command_failures: 0,
            network_failures: 0,
            window_capacity,
            window: VecDeque::new(),
            current: MetricsWindow::default(),
        }
    }

    /// Zeroes the current tick's accumulators, ready for a new tick.
    pub fn reset_tick(&mut self) {
        self.current = MetricsWindow::default();
    }

    /// Records one `PROCESS` verb attempt.
    pub fn record_process_attempt(&mut self) {
        self.current.process_attempts += 1;
    }

    /// Records one `PROCESS` verb failure.
    pub fn record_process_failure(&mut self) {
        self.current.process_failures += 1;
    }

    /// Records one `PROCESS` verb outright refusal.
    pub fn record_process_refusal(&mut self) {
        self.current.process_refusals += 1;
    }

    /// Records one command execution attempt.
    pub fn record_command_attempt(&mut self) {
        self.current.command_attempts += 1;
    }

    /// Records one command execution failure.
    pub fn record_command_failure(&mut self) {
        self.current.command_failures += 1;
    }

    /// Records one network node/edge newly failing this tick.
    pub fn record_network_failure(&mut self) {
        self.current.network_failures += 1;
    }

    /// Closes the current tick: rolls its counters into the cumulative
    /// totals, pushes a snapshot into the window (evicting the oldest entry
    /// past capacity), and marks the tick idle if neither a process nor a
    /// command attempt occurred.
    pub fn close_tick(&mut self, tick: u64) {
        self.current.tick = tick;
        self.simulate_ticks += 1;
        if self.current.process_attempts == 0 && self.current.command_attempts == 0 {
            self.idle_ticks += 1;
        }
        self.process_attempts += u64::from(self.current.process_attempts);
        self.process_failures += u64::from(self.current.process_failures);
        self.process_refusals += u64::from(self.current.process_refusals);
        self.command_attempts += u64::from(self.current.command_attempts);
        self.command_failures += u64::from(self.current.command_failures);
        self.network_failures += u64::from(self.current.network_failures);

        if self.window_capacity > 0 && self.window.len() >= self.window_capacity {
            self.window.pop_front();
        }
        self.window.push_back(self.current);
    }

    /// The bounded window of recent per-tick snapshots, oldest first.
    pub fn window(&self) -> impl Iterator<Item = &MetricsWindow> {
        self.window.iter()
    }

    /// The in-progress tick's counters, not yet rolled into the cumulative
    /// totals or pushed into the window. Verbs dispatched outside a
    /// `simulate` tick (e.g. `process`) only ever show up here.
    #[must_use]
    pub const fn current(&self) -> &MetricsWindow {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::MetricsState;

    #[test]
    fn empty_tick_is_idle_and_all_zero() {
        let mut metrics = MetricsState::new(4);
        metrics.reset_tick();
        metrics.close_tick(1);
        assert_eq!(metrics.idle_ticks, 1);
        let entry = metrics.window().next().unwrap();
        assert_eq!(entry.tick, 1);
        assert_eq!(entry.command_attempts, 0);
    }

    #[test]
    fn command_attempt_keeps_tick_non_idle() {
        let mut metrics = MetricsState::new(4);
        metrics.reset_tick();
        metrics.record_command_attempt();
        metrics.close_tick(1);
        assert_eq!(metrics.idle_ticks, 0);
        assert_eq!(metrics.command_attempts, 1);
    }

    #[test]
    fn window_evicts_oldest_past_capacity() {
        let mut metrics = MetricsState::new(2);
        for tick in 1..=3u64 {
            metrics.reset_tick();
            metrics.close_tick(tick);
        }
        let ticks: Vec<u64> = metrics.window().map(|w| w.tick).collect();
        assert_eq!(ticks, vec![2, 3]);
    }
}
