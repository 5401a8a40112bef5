//! Console configuration
//!
//! Every field has a default matching the behaviour of the stock console, so
//! a deployment only needs to override what it changes. Overrides are read
//! from a TOML document through the `config` crate.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level console configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub watchdog: WatchdogConfig,
    pub cookies: CookieConfig,
    pub routes: RouteConfig,
}

/// Idle/auth-expiry watchdog timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Period of the watchdog timer, also the "recently active" threshold
    pub check_interval_secs: u64,
    /// Idle time after which the server is asked whether the session lapsed
    pub auth_timeout_secs: u64,
    /// Period of the title blink while waiting for confirmation
    pub blink_interval_ms: u64,
    /// Title shown on alternate blink ticks
    pub alert_title: String,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 300,
            auth_timeout_secs: 2500,
            blink_interval_ms: 1000,
            alert_title: "[!] Session expiring - please confirm".to_string(),
        }
    }
}

impl WatchdogConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }
}

/// Longest cookie lifetime accepted from configuration, ten years
pub const MAX_COOKIE_EXPIRY_DAYS: i64 = 3650;

/// Client-side cookie defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub expiry_days: i64,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            expiry_days: 30,
            path: "/".to_string(),
        }
    }
}

/// Well-known navigation targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    pub home_path: String,
    pub login_path: String,
    pub fallback_path: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            home_path: "/main".to_string(),
            login_path: "/login".to_string(),
            fallback_path: "/sorry".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Load overrides from a TOML document on top of the defaults
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let watchdog = &self.watchdog;
        if watchdog.check_interval_secs == 0 {
            return Err(Error::config("watchdog.check_interval_secs must be positive"));
        }
        if watchdog.blink_interval_ms == 0 {
            return Err(Error::config("watchdog.blink_interval_ms must be positive"));
        }
        if watchdog.auth_timeout_secs <= watchdog.check_interval_secs {
            return Err(Error::config(format!(
                "watchdog.auth_timeout_secs ({}) must exceed check_interval_secs ({})",
                watchdog.auth_timeout_secs, watchdog.check_interval_secs
            )));
        }
        if watchdog.alert_title.trim().is_empty() {
            return Err(Error::config("watchdog.alert_title must not be empty"));
        }
        if !(1..=MAX_COOKIE_EXPIRY_DAYS).contains(&self.cookies.expiry_days) {
            return Err(Error::config(format!(
                "cookies.expiry_days must be between 1 and {MAX_COOKIE_EXPIRY_DAYS}"
            )));
        }
        for path in [
            &self.routes.home_path,
            &self.routes.login_path,
            &self.routes.fallback_path,
        ] {
            if !path.starts_with('/') {
                return Err(Error::config(format!("route {path:?} must start with '/'")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_console() {
        let config = ConsoleConfig::default();
        assert_eq!(config.watchdog.check_interval(), Duration::from_secs(300));
        assert_eq!(config.watchdog.auth_timeout(), Duration::from_secs(2500));
        assert_eq!(config.watchdog.blink_interval(), Duration::from_secs(1));
        assert_eq!(config.cookies.expiry_days, 30);
        assert_eq!(config.routes.login_path, "/login");
        assert_eq!(config.routes.fallback_path, "/sorry");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = ConsoleConfig::from_toml(
            r#"
            [watchdog]
            check_interval_secs = 60
            alert_title = "Wake up"
            "#,
        )
        .unwrap();
        assert_eq!(config.watchdog.check_interval_secs, 60);
        assert_eq!(config.watchdog.auth_timeout_secs, 2500);
        assert_eq!(config.watchdog.alert_title, "Wake up");
        assert_eq!(config.routes, RouteConfig::default());
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ConsoleConfig::from_toml("").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn timeout_must_exceed_interval() {
        let err = ConsoleConfig::from_toml(
            r#"
            [watchdog]
            check_interval_secs = 600
            auth_timeout_secs = 300
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn cookie_expiry_is_bounded() {
        let err = ConsoleConfig::from_toml(
            r#"
            [cookies]
            expiry_days = 1000000000
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let mut config = ConsoleConfig::default();
        config.cookies.expiry_days = MAX_COOKIE_EXPIRY_DAYS;
        assert!(config.validate().is_ok());
        config.cookies.expiry_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_route_is_rejected() {
        let mut config = ConsoleConfig::default();
        config.routes.login_path = "login".into();
        assert!(config.validate().is_err());
    }
}
