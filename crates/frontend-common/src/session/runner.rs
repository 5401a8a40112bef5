//! Timers and input listeners around a [`SessionWatchdog`]
//!
//! Exactly one tick timer exists per runner: arming a new one drops (and so
//! cancels) the previous handle.

use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use panel_core::session::TickAction;
use panel_core::{Schedule, SessionWatchdog};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;

struct RunnerInner {
    watchdog: SessionWatchdog,
    timer: RefCell<Option<Timeout>>,
    blink: RefCell<Option<Interval>>,
    listeners: RefCell<Vec<EventListener>>,
}

#[derive(Clone)]
pub struct WatchdogRunner {
    inner: Rc<RunnerInner>,
}

impl PartialEq for WatchdogRunner {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl WatchdogRunner {
    pub fn new(watchdog: SessionWatchdog) -> Self {
        Self {
            inner: Rc::new(RunnerInner {
                watchdog,
                timer: RefCell::new(None),
                blink: RefCell::new(None),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn watchdog(&self) -> &SessionWatchdog {
        &self.inner.watchdog
    }

    /// Begin watching input and ticking
    pub fn start(&self) {
        self.listen_for_activity();
        let schedule = self.inner.watchdog.start();
        self.apply(schedule);
    }

    /// Cancel timers and listeners; an in-flight server check will not re-arm
    pub fn stop(&self) {
        self.inner.watchdog.stop();
        self.inner.timer.borrow_mut().take();
        self.inner.blink.borrow_mut().take();
        self.inner.listeners.borrow_mut().clear();
    }

    /// The user answered the confirmation dialog
    pub fn confirm(&self) {
        self.inner.blink.borrow_mut().take();
        let schedule = self.inner.watchdog.confirm();
        self.apply(schedule);
        let watchdog = self.inner.watchdog.clone();
        spawn_local(async move { watchdog.keep_alive().await });
    }

    fn listen_for_activity(&self) {
        let mut listeners = self.inner.listeners.borrow_mut();
        if !listeners.is_empty() {
            return;
        }
        let document = gloo::utils::document();
        for event in ["mousemove", "keydown"] {
            let watchdog = self.inner.watchdog.clone();
            listeners.push(EventListener::new(&document, event, move |_| {
                watchdog.record_activity();
            }));
        }
    }

    fn apply(&self, schedule: Schedule) {
        match schedule {
            Schedule::After(delay) => self.arm(delay),
            Schedule::Suspended => {
                self.inner.timer.borrow_mut().take();
                if self.inner.watchdog.is_blinking() {
                    self.start_blinking();
                }
            }
            Schedule::Stopped => {
                self.inner.timer.borrow_mut().take();
            }
        }
    }

    fn arm(&self, delay: Duration) {
        let runner = self.clone();
        // the tick runs as a task so the firing timeout is never dropped from
        // inside its own callback
        let timeout = Timeout::new(millis(delay), move || {
            spawn_local(async move { runner.fire().await });
        });
        self.inner.timer.replace(Some(timeout));
    }

    async fn fire(&self) {
        let watchdog = &self.inner.watchdog;
        match watchdog.tick() {
            TickAction::KeepAlive => {
                self.apply(watchdog.schedule());
                watchdog.keep_alive().await;
            }
            TickAction::CheckServer => {
                self.apply(watchdog.schedule());
                let schedule = watchdog.check_server().await;
                self.apply(schedule);
            }
            TickAction::Wait | TickAction::Ignore => self.apply(watchdog.schedule()),
        }
    }

    fn start_blinking(&self) {
        if self.inner.blink.borrow().is_some() {
            return;
        }
        let watchdog = self.inner.watchdog.clone();
        let interval = Interval::new(millis(watchdog.blink_interval()), move || {
            watchdog.blink();
        });
        self.inner.blink.replace(Some(interval));
    }
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
