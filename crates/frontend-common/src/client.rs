//! HTTP client for the panel server

use crate::cookies::BrowserCookies;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gloo_net::http::{Request, Response};
use panel_core::api::{
    self, AuthStatusResponse, LastActiveResponse, LoginOutcome, LoginRequest, LoginResponse,
    VirtQueryResponse,
};
use panel_core::{AuthStatus, Error, Result, SessionApi};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use web_sys::window;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Client for the panel's session and query endpoints
#[derive(Clone)]
pub struct PanelClient {
    base_url: String,
    cookies: Rc<BrowserCookies>,
}

impl PanelClient {
    pub fn new(base_url: impl Into<String>, cookies: Rc<BrowserCookies>) -> Self {
        Self {
            base_url: base_url.into(),
            cookies,
        }
    }

    /// Client for the origin the console was served from
    pub fn same_origin(cookies: Rc<BrowserCookies>) -> Self {
        Self::new(get_base_url(), cookies)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Token the server expects echoed back on every POST
    async fn xsrf_token(&self) -> Result<String> {
        if let Some(token) = self.cookies.get(api::XSRF_COOKIE) {
            return Ok(token);
        }
        let response = Request::get(&self.url(api::XSRF_PATH))
            .send()
            .await
            .map_err(transport)?;
        check(response)?;
        self.cookies
            .get(api::XSRF_COOKIE)
            .ok_or_else(|| Error::transient("server did not issue an XSRF token"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = Request::get(&self.url(path))
            .send()
            .await
            .map_err(transport)?;
        check(response)?.json::<T>().await.map_err(transport)
    }

    async fn post_form(&self, path: &str, body: String) -> Result<Response> {
        let token = self.xsrf_token().await?;
        let response = Request::post(&self.url(path))
            .header(api::XSRF_HEADER, &token)
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(body)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        check(response)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome> {
        let body = format!(
            "username={}&password={}",
            urlencoding::encode(&request.username),
            urlencoding::encode(&request.password)
        );
        let response = self.post_form(api::LOGIN_PATH, body).await?;
        let reply: LoginResponse = response.json().await.map_err(transport)?;
        Ok(reply.into())
    }

    pub async fn logout(&self) -> Result<()> {
        self.post_form(api::LOGOUT_PATH, String::new()).await?;
        Ok(())
    }

    /// Virtualisation technology the server runs under, if it could tell
    pub async fn server_virt(&self) -> Result<Option<String>> {
        let reply: VirtQueryResponse = self.get_json(&api::query_path(&["server.virt"])).await?;
        Ok(reply.virt)
    }
}

#[async_trait(?Send)]
impl SessionApi for PanelClient {
    async fn check_auth(&self) -> Result<AuthStatus> {
        let response = self.post_form(api::AUTH_STATUS_PATH, String::new()).await?;
        let reply: AuthStatusResponse = response.json().await.map_err(transport)?;
        Ok(reply.status())
    }

    async fn last_active(&self) -> Result<DateTime<Utc>> {
        let reply: LastActiveResponse = self.get_json(api::AUTH_STATUS_PATH).await?;
        Ok(reply.timestamp())
    }
}

/// Get the base URL for API calls
fn get_base_url() -> String {
    window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_default()
}

fn check(response: Response) -> Result<Response> {
    if response.ok() {
        Ok(response)
    } else {
        Err(Error::from_status(response.status(), response.status_text()))
    }
}

fn transport(err: gloo_net::Error) -> Error {
    match err {
        gloo_net::Error::SerdeError(err) => Error::decode(err.to_string()),
        other => Error::transient(other.to_string()),
    }
}
