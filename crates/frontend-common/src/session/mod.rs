//! Browser side of the session watchdog

pub mod context;
pub mod runner;
pub mod surface;

pub use context::{use_session, use_session_watchdog, SessionContext, SessionProvider};
pub use runner::WatchdogRunner;
pub use surface::DocumentSurface;
