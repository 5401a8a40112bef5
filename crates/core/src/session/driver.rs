//! Session watchdog driver
//!
//! Owns the [`Watchdog`] state machine and runs its side effects through the
//! injected [`SessionApi`], [`Clock`] and [`WatchdogSurface`]. Timers stay
//! with the caller: every entry point returns a [`Schedule`] saying when the
//! next tick is due.

use super::blink::TitleBlinker;
use super::watchdog::{ActivityState, Reconciled, TickAction, Watchdog, WatchdogState};
use crate::api::{AuthStatus, SessionApi};
use crate::clock::Clock;
use crate::config::WatchdogConfig;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Page elements the watchdog drives
pub trait WatchdogSurface {
    fn title(&self) -> String;
    fn set_title(&self, title: &str);
    fn show_confirm(&self);
    fn hide_confirm(&self);
}

/// When the caller should fire the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    After(Duration),
    /// Waiting on the server or on the user
    Suspended,
    Stopped,
}

struct Inner {
    machine: Watchdog,
    blinker: Option<TitleBlinker>,
}

/// Cloneable handle; all clones share one watchdog
#[derive(Clone)]
pub struct SessionWatchdog {
    inner: Rc<RefCell<Inner>>,
    api: Rc<dyn SessionApi>,
    clock: Rc<dyn Clock>,
    surface: Rc<dyn WatchdogSurface>,
}

impl SessionWatchdog {
    pub fn new(
        config: WatchdogConfig,
        api: Rc<dyn SessionApi>,
        clock: Rc<dyn Clock>,
        surface: Rc<dyn WatchdogSurface>,
    ) -> Self {
        let machine = Watchdog::new(config, clock.now());
        Self {
            inner: Rc::new(RefCell::new(Inner {
                machine,
                blinker: None,
            })),
            api,
            clock,
            surface,
        }
    }

    pub fn config(&self) -> WatchdogConfig {
        self.inner.borrow().machine.config().clone()
    }

    pub fn blink_interval(&self) -> Duration {
        self.inner.borrow().machine.config().blink_interval()
    }

    pub fn state(&self) -> WatchdogState {
        self.inner.borrow().machine.state()
    }

    pub fn activity(&self) -> ActivityState {
        self.inner.borrow().machine.activity()
    }

    pub fn is_blinking(&self) -> bool {
        self.inner.borrow().blinker.is_some()
    }

    /// Start watching; idle time is measured from now
    pub fn start(&self) -> Schedule {
        let now = self.clock.now();
        self.inner.borrow_mut().machine.start(now);
        tracing::debug!("session watchdog started");
        self.schedule()
    }

    /// Stop ticking and tear down any pending confirmation
    pub fn stop(&self) {
        let blinker = {
            let mut inner = self.inner.borrow_mut();
            inner.machine.stop();
            inner.blinker.take()
        };
        if let Some(blinker) = blinker {
            self.surface.set_title(blinker.original());
            self.surface.hide_confirm();
        }
        tracing::debug!("session watchdog stopped");
    }

    pub fn record_activity(&self) {
        let now = self.clock.now();
        self.inner.borrow_mut().machine.record_activity(now);
    }

    /// Advance the state machine for a timer tick without doing any I/O
    pub fn tick(&self) -> TickAction {
        let now = self.clock.now();
        self.inner.borrow_mut().machine.tick(now)
    }

    /// Refresh the server session; failures are only logged
    pub async fn keep_alive(&self) {
        match self.api.check_auth().await {
            Ok(AuthStatus::Authenticated) => tracing::debug!("session refreshed"),
            Ok(AuthStatus::Unauthenticated) => {
                tracing::debug!("keep-alive reported no session");
            }
            Err(err) => tracing::debug!(error = %err, "keep-alive failed"),
        }
    }

    /// Ask the server for its last-active record and act on the answer
    pub async fn check_server(&self) -> Schedule {
        let answer = self.api.last_active().await;
        let now = self.clock.now();
        match answer {
            Ok(server_last_active) => {
                let outcome = self
                    .inner
                    .borrow_mut()
                    .machine
                    .reconcile(now, server_last_active);
                match outcome {
                    Reconciled::Expired => self.begin_expiry(),
                    Reconciled::Resynced => {
                        tracing::info!(last_active = %server_last_active, "resynced last activity from server");
                    }
                    Reconciled::Ignored => {}
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not fetch last activity from server");
                self.inner.borrow_mut().machine.check_failed();
            }
        }
        self.schedule()
    }

    /// One full timer tick, awaiting whatever call it triggers
    pub async fn run_tick(&self) -> Schedule {
        match self.tick() {
            TickAction::KeepAlive => {
                self.keep_alive().await;
                self.schedule()
            }
            TickAction::CheckServer => self.check_server().await,
            TickAction::Wait | TickAction::Ignore => self.schedule(),
        }
    }

    /// Swap the title for the next blink; false once blinking has stopped
    pub fn blink(&self) -> bool {
        let title = self
            .inner
            .borrow_mut()
            .blinker
            .as_mut()
            .map(|blinker| blinker.next_title().to_string());
        match title {
            Some(title) => {
                self.surface.set_title(&title);
                true
            }
            None => false,
        }
    }

    /// User confirmed presence. The caller re-issues [`Self::keep_alive`]
    pub fn confirm(&self) -> Schedule {
        let now = self.clock.now();
        let blinker = {
            let mut inner = self.inner.borrow_mut();
            if !inner.machine.confirm(now) {
                return Schedule::from_watchdog(&inner.machine);
            }
            inner.blinker.take()
        };
        if let Some(blinker) = blinker {
            self.surface.set_title(blinker.original());
        }
        self.surface.hide_confirm();
        tracing::info!("session activity confirmed");
        self.schedule()
    }

    pub fn schedule(&self) -> Schedule {
        Schedule::from_watchdog(&self.inner.borrow().machine)
    }

    fn begin_expiry(&self) {
        let original = self.surface.title();
        let alert = self.inner.borrow().machine.config().alert_title.clone();
        self.inner.borrow_mut().blinker = Some(TitleBlinker::new(original, alert));
        self.surface.show_confirm();
        self.inner.borrow_mut().machine.block();
        tracing::info!("session idle on server, waiting for confirmation");
    }
}

impl Schedule {
    fn from_watchdog(machine: &Watchdog) -> Self {
        if !machine.is_running() {
            return Self::Stopped;
        }
        machine.next_delay().map_or(Self::Suspended, Self::After)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSessionApi;
    use crate::clock::ManualClock;
    use crate::error::Error;
    use chrono::{DateTime, TimeDelta, Utc};
    use std::cell::Cell;

    #[derive(Default)]
    struct RecordingSurface {
        title: RefCell<String>,
        titles: RefCell<Vec<String>>,
        modal_open: Cell<bool>,
    }

    impl WatchdogSurface for RecordingSurface {
        fn title(&self) -> String {
            self.title.borrow().clone()
        }

        fn set_title(&self, title: &str) {
            *self.title.borrow_mut() = title.to_string();
            self.titles.borrow_mut().push(title.to_string());
        }

        fn show_confirm(&self) {
            self.modal_open.set(true);
        }

        fn hide_confirm(&self) {
            self.modal_open.set(false);
        }
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn setup(
        api: MockSessionApi,
    ) -> (SessionWatchdog, Rc<ManualClock>, Rc<RecordingSurface>) {
        let clock = Rc::new(ManualClock::new(epoch()));
        let surface = Rc::new(RecordingSurface::default());
        *surface.title.borrow_mut() = "Panel".to_string();
        let watchdog = SessionWatchdog::new(
            WatchdogConfig {
                alert_title: "Still there?".into(),
                ..WatchdogConfig::default()
            },
            Rc::new(api),
            clock.clone(),
            surface.clone(),
        );
        (watchdog, clock, surface)
    }

    #[tokio::test]
    async fn recent_activity_refreshes_without_modal() {
        let mut api = MockSessionApi::new();
        api.expect_check_auth()
            .times(1)
            .returning(|| Ok(AuthStatus::Authenticated));
        api.expect_last_active().never();
        let (watchdog, clock, surface) = setup(api);

        assert_eq!(watchdog.start(), Schedule::After(Duration::from_secs(300)));
        clock.advance(TimeDelta::seconds(120));
        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
        assert!(!surface.modal_open.get());
    }

    #[tokio::test]
    async fn keep_alive_failure_is_swallowed() {
        let mut api = MockSessionApi::new();
        api.expect_check_auth()
            .returning(|| Err(Error::transient("offline")));
        let (watchdog, _clock, _surface) = setup(api);
        watchdog.start();
        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
        assert_eq!(watchdog.state(), WatchdogState::Active);
    }

    #[tokio::test]
    async fn idle_band_issues_no_calls() {
        let mut api = MockSessionApi::new();
        api.expect_check_auth().never();
        api.expect_last_active().never();
        let (watchdog, clock, _surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(1800));
        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
    }

    #[tokio::test]
    async fn server_confirmed_idle_opens_modal_and_blinks() {
        let mut api = MockSessionApi::new();
        api.expect_last_active()
            .times(1)
            .returning(move || Ok(epoch()));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(2600));

        assert_eq!(watchdog.run_tick().await, Schedule::Suspended);
        assert!(surface.modal_open.get());
        assert_eq!(watchdog.state(), WatchdogState::BlockedConfirm);
        assert_eq!(watchdog.blink_interval(), Duration::from_secs(1));

        for _ in 0..4 {
            assert!(watchdog.blink());
        }
        assert_eq!(
            *surface.titles.borrow(),
            ["Still there?", "Panel", "Still there?", "Panel"]
        );
        assert_eq!(watchdog.tick(), TickAction::Ignore);
    }

    #[tokio::test]
    async fn server_seeing_activity_resyncs_silently() {
        let mut api = MockSessionApi::new();
        let server_last = epoch() + TimeDelta::seconds(2400);
        api.expect_last_active()
            .times(1)
            .returning(move || Ok(server_last));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(2600));

        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
        assert!(!surface.modal_open.get());
        assert!(!watchdog.is_blinking());
        assert_eq!(watchdog.activity().last_active, server_last);
    }

    #[tokio::test]
    async fn failed_server_check_reschedules() {
        let mut api = MockSessionApi::new();
        api.expect_last_active()
            .returning(|| Err(Error::from_status(500, "boom")));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(3000));
        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
        assert!(!surface.modal_open.get());
    }

    #[tokio::test]
    async fn confirm_restores_title_and_resumes() {
        let mut api = MockSessionApi::new();
        api.expect_last_active().returning(move || Ok(epoch()));
        api.expect_check_auth()
            .times(2)
            .returning(|| Ok(AuthStatus::Authenticated));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(2600));
        watchdog.run_tick().await;
        watchdog.blink();
        assert_eq!(surface.title(), "Still there?");

        assert_eq!(watchdog.confirm(), Schedule::After(Duration::from_secs(300)));
        watchdog.keep_alive().await;
        assert_eq!(surface.title(), "Panel");
        assert!(!surface.modal_open.get());
        assert!(!watchdog.blink());
        assert_eq!(watchdog.activity().last_active, clock.now());

        clock.advance(TimeDelta::seconds(10));
        assert_eq!(watchdog.tick(), TickAction::KeepAlive);
        watchdog.keep_alive().await;
    }

    #[tokio::test]
    async fn stop_during_check_suppresses_rescheduling() {
        let mut api = MockSessionApi::new();
        api.expect_last_active().returning(move || Ok(epoch()));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(2600));
        assert_eq!(watchdog.tick(), TickAction::CheckServer);
        watchdog.stop();
        assert_eq!(watchdog.check_server().await, Schedule::Stopped);
        assert!(!surface.modal_open.get());
    }

    #[tokio::test]
    async fn restart_after_logout_does_not_reuse_old_idle_time() {
        let mut api = MockSessionApi::new();
        api.expect_last_active().never();
        api.expect_check_auth()
            .times(1)
            .returning(|| Ok(AuthStatus::Authenticated));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        watchdog.stop();

        clock.advance(TimeDelta::seconds(3000));
        watchdog.start();
        clock.advance(TimeDelta::seconds(5));
        assert_eq!(
            watchdog.run_tick().await,
            Schedule::After(Duration::from_secs(300))
        );
        assert!(!surface.modal_open.get());
        assert_eq!(watchdog.state(), WatchdogState::Active);
    }

    #[tokio::test]
    async fn stop_while_blocked_tears_down_dialog() {
        let mut api = MockSessionApi::new();
        api.expect_last_active().returning(move || Ok(epoch()));
        let (watchdog, clock, surface) = setup(api);
        watchdog.start();
        clock.advance(TimeDelta::seconds(2600));
        watchdog.run_tick().await;
        watchdog.blink();

        watchdog.stop();
        assert!(!surface.modal_open.get());
        assert_eq!(surface.title(), "Panel");
        assert_eq!(watchdog.schedule(), Schedule::Stopped);
    }
}
