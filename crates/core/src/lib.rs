//! Panel console core: route table, auth gate, cookies and the session watchdog

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod cookie;
pub mod error;
pub mod routes;
pub mod session;

pub use api::{AuthStatus, SessionApi};
pub use auth::{GateOutcome, Notice, NoticeLevel};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConsoleConfig, CookieConfig, RouteConfig, WatchdogConfig};
pub use cookie::{CookieJar, Cookies, MemoryJar};
pub use error::{Error, Result};
pub use routes::{Navigation, RouteEntry, RouteMatch, RouteTable};
pub use session::{Schedule, SessionWatchdog, WatchdogState, WatchdogSurface};
