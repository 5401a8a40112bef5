pub mod auth;
pub mod client;
pub mod components;
pub mod config;
pub mod context;
pub mod cookies;
pub mod logging;
pub mod notice;
pub mod session;

pub use auth::AuthGate;
pub use client::PanelClient;
pub use components::{ConfirmModal, Spinner};
pub use config::FrontendConfig;
pub use context::{use_console, ConsoleContext, ConsoleProvider};
pub use notice::{use_notices, NoticeAction, NoticeBar, NoticeProvider};
pub use session::{use_session, use_session_watchdog, SessionContext, SessionProvider};
