//! Panel server endpoints used by the console shell
//!
//! The request layer itself lives in the frontend; this module holds the
//! wire shapes and the [`SessionApi`] seam the gate and watchdog talk to.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const XSRF_PATH: &str = "/api/xsrf";
pub const AUTH_STATUS_PATH: &str = "/api/authstatus";
pub const LOGIN_PATH: &str = "/api/login";
pub const LOGOUT_PATH: &str = "/api/logout";
pub const QUERY_PATH: &str = "/api/query";

pub const XSRF_COOKIE: &str = "XSRF-TOKEN";
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Session validity as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
}

/// Calls the session machinery needs from the server
#[cfg_attr(test, mockall::automock)]
#[async_trait(?Send)]
pub trait SessionApi {
    /// Validate (and thereby refresh) the server-side session
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// The server's record of the last authenticated activity
    async fn last_active(&self) -> Result<DateTime<Utc>>;
}

/// `POST /api/authstatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub authed: String,
}

impl AuthStatusResponse {
    pub fn status(&self) -> AuthStatus {
        if self.authed == "yes" {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }
}

/// `GET /api/authstatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastActiveResponse {
    /// Unix seconds, 0 when the server holds no session
    pub lastactive: i64,
}

impl LastActiveResponse {
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.lastactive.max(0), 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// `POST /api/login` form body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /api/login` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub code: i32,
    #[serde(default)]
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn { message: String },
    /// Logged in, but the server wants the password strengthened
    LoggedInWeakPassword { message: String },
    Rejected { message: String },
}

impl From<LoginResponse> for LoginOutcome {
    fn from(response: LoginResponse) -> Self {
        match response.code {
            0 => Self::LoggedIn {
                message: response.msg,
            },
            1 => Self::LoggedInWeakPassword {
                message: response.msg,
            },
            _ => Self::Rejected {
                message: response.msg,
            },
        }
    }
}

/// `GET /api/query/server.virt`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtQueryResponse {
    #[serde(rename = "server.virt", default)]
    pub virt: Option<String>,
}

pub fn query_path(items: &[&str]) -> String {
    format!("{QUERY_PATH}/{}", items.join(","))
}
