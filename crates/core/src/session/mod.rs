//! Idle/auth-expiry watchdog

pub mod blink;
pub mod driver;
pub mod watchdog;

pub use blink::TitleBlinker;
pub use driver::{Schedule, SessionWatchdog, WatchdogSurface};
pub use watchdog::{ActivityState, Reconciled, TickAction, Watchdog, WatchdogState};
