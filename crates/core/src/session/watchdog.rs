//! Idle/auth-expiry state machine
//!
//! Pure bookkeeping: callers feed it the current time and server answers,
//! it tells them what to do next. No I/O happens here.

use crate::config::WatchdogConfig;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    Active,
    /// Waiting for the server's last-active record
    CheckingServer,
    /// Title is blinking, confirmation not yet shown
    ExpiringWarn,
    /// Confirmation dialog is up, timer suspended
    BlockedConfirm,
}

/// What a timer tick asks the caller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Recently active: refresh the server session, fire and forget
    KeepAlive,
    /// Idle past the timeout: ask the server for its last-active time
    CheckServer,
    /// Between the thresholds: nothing to do this round
    Wait,
    /// Watchdog is stopped or not in a state that ticks
    Ignore,
}

/// Result of feeding the server's last-active time back in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The server saw recent activity; local time adopted
    Resynced,
    /// The server agrees the session is idle; confirmation required
    Expired,
    /// No check was pending or the watchdog was stopped meanwhile
    Ignored,
}

/// Snapshot of the activity bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityState {
    pub last_active: DateTime<Utc>,
    pub check_interval: Duration,
    pub auth_timeout: Duration,
    pub is_blinking: bool,
    pub is_confirming: bool,
}

#[derive(Debug, Clone)]
pub struct Watchdog {
    config: WatchdogConfig,
    check_interval: TimeDelta,
    auth_timeout: TimeDelta,
    state: WatchdogState,
    last_active: DateTime<Utc>,
    running: bool,
}

impl Watchdog {
    pub fn new(config: WatchdogConfig, now: DateTime<Utc>) -> Self {
        Self {
            check_interval: to_delta(config.check_interval()),
            auth_timeout: to_delta(config.auth_timeout()),
            config,
            state: WatchdogState::Active,
            last_active: now,
            running: false,
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn state(&self) -> WatchdogState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn idle(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_active
    }

    pub fn activity(&self) -> ActivityState {
        ActivityState {
            last_active: self.last_active,
            check_interval: self.config.check_interval(),
            auth_timeout: self.config.auth_timeout(),
            is_blinking: matches!(
                self.state,
                WatchdogState::ExpiringWarn | WatchdogState::BlockedConfirm
            ),
            is_confirming: self.state == WatchdogState::BlockedConfirm,
        }
    }

    /// Begin a watch period; starting from stopped discards earlier activity
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_active = now;
        self.transition(WatchdogState::Active);
    }

    /// Stop ticking; a pending expiry is dropped with the view that owned it
    pub fn stop(&mut self) {
        self.running = false;
        if matches!(
            self.state,
            WatchdogState::ExpiringWarn | WatchdogState::BlockedConfirm
        ) {
            self.transition(WatchdogState::Active);
        }
    }

    /// User input seen; never moves the timestamp backwards
    pub fn record_activity(&mut self, now: DateTime<Utc>) {
        if now > self.last_active {
            self.last_active = now;
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> TickAction {
        if !self.running || self.state != WatchdogState::Active {
            return TickAction::Ignore;
        }
        let idle = self.idle(now);
        if idle < self.check_interval {
            TickAction::KeepAlive
        } else if idle > self.auth_timeout {
            self.transition(WatchdogState::CheckingServer);
            TickAction::CheckServer
        } else {
            TickAction::Wait
        }
    }

    /// Apply the server's own last-active record
    pub fn reconcile(&mut self, now: DateTime<Utc>, server_last_active: DateTime<Utc>) -> Reconciled {
        if self.state != WatchdogState::CheckingServer {
            return Reconciled::Ignored;
        }
        if !self.running {
            self.transition(WatchdogState::Active);
            return Reconciled::Ignored;
        }
        let server_idle = now - server_last_active;
        if server_idle > self.auth_timeout {
            self.transition(WatchdogState::ExpiringWarn);
            Reconciled::Expired
        } else {
            self.record_activity(server_last_active);
            self.transition(WatchdogState::Active);
            Reconciled::Resynced
        }
    }

    /// The server could not be asked; carry on as if nothing happened
    pub fn check_failed(&mut self) {
        if self.state == WatchdogState::CheckingServer {
            self.transition(WatchdogState::Active);
        }
    }

    /// The confirmation dialog is on screen
    pub fn block(&mut self) {
        if self.state == WatchdogState::ExpiringWarn {
            self.transition(WatchdogState::BlockedConfirm);
        }
    }

    /// User confirmed presence; returns false when nothing was pending
    pub fn confirm(&mut self, now: DateTime<Utc>) -> bool {
        if !matches!(
            self.state,
            WatchdogState::ExpiringWarn | WatchdogState::BlockedConfirm
        ) {
            return false;
        }
        self.last_active = now;
        self.transition(WatchdogState::Active);
        true
    }

    /// Delay before the next tick, `None` while suspended or stopped
    pub fn next_delay(&self) -> Option<Duration> {
        (self.running && self.state == WatchdogState::Active).then(|| self.config.check_interval())
    }

    fn transition(&mut self, to: WatchdogState) {
        if self.state != to {
            tracing::debug!(from = ?self.state, to = ?to, "watchdog transition");
            self.state = to;
        }
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn running() -> Watchdog {
        let mut watchdog = Watchdog::new(WatchdogConfig::default(), start());
        watchdog.start(start());
        watchdog
    }

    fn at(secs: i64) -> DateTime<Utc> {
        start() + TimeDelta::seconds(secs)
    }

    #[test]
    fn recent_activity_keeps_session_alive() {
        let mut watchdog = running();
        assert_eq!(watchdog.tick(at(299)), TickAction::KeepAlive);
        assert_eq!(watchdog.state(), WatchdogState::Active);
        assert_eq!(watchdog.next_delay(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn band_between_thresholds_does_nothing() {
        let mut watchdog = running();
        for secs in [300, 1200, 2500] {
            assert_eq!(watchdog.tick(at(secs)), TickAction::Wait);
            assert_eq!(watchdog.state(), WatchdogState::Active);
        }
    }

    #[test]
    fn long_idle_asks_the_server() {
        let mut watchdog = running();
        assert_eq!(watchdog.tick(at(2501)), TickAction::CheckServer);
        assert_eq!(watchdog.state(), WatchdogState::CheckingServer);
        assert_eq!(watchdog.next_delay(), None);
        assert_eq!(watchdog.tick(at(2900)), TickAction::Ignore);
    }

    #[test]
    fn server_seeing_recent_activity_resyncs() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        assert_eq!(watchdog.reconcile(at(3000), at(2800)), Reconciled::Resynced);
        assert_eq!(watchdog.last_active(), at(2800));
        assert_eq!(watchdog.state(), WatchdogState::Active);
    }

    #[test]
    fn server_confirming_idle_expires() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        assert_eq!(watchdog.reconcile(at(3000), at(0)), Reconciled::Expired);
        assert_eq!(watchdog.state(), WatchdogState::ExpiringWarn);
        assert!(watchdog.activity().is_blinking);
        assert!(!watchdog.activity().is_confirming);

        watchdog.block();
        assert_eq!(watchdog.state(), WatchdogState::BlockedConfirm);
        assert!(watchdog.activity().is_confirming);
        assert_eq!(watchdog.next_delay(), None);
    }

    #[test]
    fn activity_during_check_does_not_cancel_it() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        watchdog.record_activity(at(3001));
        assert_eq!(watchdog.state(), WatchdogState::CheckingServer);
        assert_eq!(watchdog.reconcile(at(3002), at(0)), Reconciled::Expired);
    }

    #[test]
    fn resync_never_moves_last_active_backwards() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        watchdog.record_activity(at(2990));
        watchdog.reconcile(at(3000), at(2900));
        assert_eq!(watchdog.last_active(), at(2990));
    }

    #[test]
    fn stale_activity_is_ignored() {
        let mut watchdog = running();
        watchdog.record_activity(at(100));
        watchdog.record_activity(at(50));
        assert_eq!(watchdog.last_active(), at(100));
    }

    #[test]
    fn confirm_resets_idle_and_resumes() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        watchdog.reconcile(at(3000), at(0));
        watchdog.block();
        assert!(watchdog.confirm(at(3100)));
        assert_eq!(watchdog.idle(at(3100)), TimeDelta::zero());
        assert_eq!(watchdog.state(), WatchdogState::Active);
        assert_eq!(watchdog.tick(at(3101)), TickAction::KeepAlive);
    }

    #[test]
    fn confirm_without_pending_expiry_is_a_no_op() {
        let mut watchdog = running();
        assert!(!watchdog.confirm(at(10)));
        assert_eq!(watchdog.last_active(), start());
    }

    #[test]
    fn stopping_mid_check_discards_the_answer() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        watchdog.stop();
        assert_eq!(watchdog.reconcile(at(3000), at(0)), Reconciled::Ignored);
        assert_eq!(watchdog.state(), WatchdogState::Active);
        assert_eq!(watchdog.next_delay(), None);
    }

    #[test]
    fn failed_check_returns_to_active() {
        let mut watchdog = running();
        watchdog.tick(at(3000));
        watchdog.check_failed();
        assert_eq!(watchdog.state(), WatchdogState::Active);
        assert_eq!(watchdog.next_delay(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn restart_after_long_stop_begins_a_fresh_period() {
        let mut watchdog = running();
        watchdog.record_activity(at(100));
        watchdog.stop();
        watchdog.start(at(4000));
        assert_eq!(watchdog.last_active(), at(4000));
        assert_eq!(watchdog.state(), WatchdogState::Active);
        assert_eq!(watchdog.tick(at(4005)), TickAction::KeepAlive);
    }

    #[test]
    fn start_while_running_keeps_activity() {
        let mut watchdog = running();
        watchdog.record_activity(at(100));
        watchdog.start(at(200));
        assert_eq!(watchdog.last_active(), at(100));
    }

    #[test]
    fn stopped_watchdog_ignores_ticks() {
        let mut watchdog = Watchdog::new(WatchdogConfig::default(), start());
        assert_eq!(watchdog.tick(at(10)), TickAction::Ignore);
        assert_eq!(watchdog.next_delay(), None);
    }
}
