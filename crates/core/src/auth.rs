//! Per-navigation auth gate

use crate::api::{AuthStatus, SessionApi};
use crate::config::RouteConfig;
use crate::routes::RouteEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message shown to the user above the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    /// Whether the user may close it; persistent notices stay until replaced
    pub dismissible: bool,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            dismissible: true,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
            dismissible: true,
        }
    }

    pub fn persistent_error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            dismissible: false,
        }
    }
}

/// Result of running the gate for one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Proceed,
    RedirectToLogin { target: String, notice: Notice },
    /// Could not tell; stay on the blocked view
    Blocked { notice: Notice },
}

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in first.";

/// Ask the server whether the current session may enter a protected view
pub async fn auth(api: &dyn SessionApi, routes: &RouteConfig) -> GateOutcome {
    match api.check_auth().await {
        Ok(AuthStatus::Authenticated) => GateOutcome::Proceed,
        Ok(AuthStatus::Unauthenticated) => redirect(routes),
        Err(err) if err.is_unauthorized() => redirect(routes),
        Err(err) => {
            tracing::warn!(error = %err, "authorization check failed");
            GateOutcome::Blocked {
                notice: Notice::persistent_error(format!(
                    "Could not verify your session: {err}"
                )),
            }
        }
    }
}

/// Run the gate only when `entry` needs it
pub async fn guard(api: &dyn SessionApi, entry: &RouteEntry, routes: &RouteConfig) -> GateOutcome {
    if entry.requires_auth {
        auth(api, routes).await
    } else {
        GateOutcome::Proceed
    }
}

fn redirect(routes: &RouteConfig) -> GateOutcome {
    tracing::info!(login = %routes.login_path, "session not authorized, redirecting");
    GateOutcome::RedirectToLogin {
        target: routes.login_path.clone(),
        notice: Notice::warning(LOGIN_REQUIRED_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockSessionApi;
    use crate::error::Error;

    fn api_returning(result: crate::error::Result<AuthStatus>) -> MockSessionApi {
        let mut api = MockSessionApi::new();
        api.expect_check_auth()
            .times(1)
            .returning(move || result.clone());
        api
    }

    #[tokio::test]
    async fn authenticated_session_proceeds() {
        let api = api_returning(Ok(AuthStatus::Authenticated));
        assert_eq!(auth(&api, &RouteConfig::default()).await, GateOutcome::Proceed);
    }

    #[tokio::test]
    async fn forbidden_redirects_with_dismissible_notice() {
        let api = api_returning(Err(Error::from_status(403, "Please Login First")));
        match auth(&api, &RouteConfig::default()).await {
            GateOutcome::RedirectToLogin { target, notice } => {
                assert_eq!(target, "/login");
                assert!(notice.dismissible);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_not_authed_redirects() {
        let api = api_returning(Ok(AuthStatus::Unauthenticated));
        assert!(matches!(
            auth(&api, &RouteConfig::default()).await,
            GateOutcome::RedirectToLogin { .. }
        ));
    }

    #[tokio::test]
    async fn network_failure_blocks_with_persistent_error() {
        let api = api_returning(Err(Error::transient("connection reset")));
        match auth(&api, &RouteConfig::default()).await {
            GateOutcome::Blocked { notice } => {
                assert_eq!(notice.level, NoticeLevel::Error);
                assert!(!notice.dismissible);
                assert!(notice.text.contains("connection reset"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn public_routes_skip_the_server() {
        let mut api = MockSessionApi::new();
        api.expect_check_auth().never();
        let entry = RouteEntry::public("/login", "partials/login.html", "LoginCtrl");
        assert_eq!(
            guard(&api, &entry, &RouteConfig::default()).await,
            GateOutcome::Proceed
        );
    }
}
