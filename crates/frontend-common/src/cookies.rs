//! `document.cookie` backed jar

use panel_core::{CookieConfig, CookieJar, Cookies};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieJar;

impl CookieJar for DocumentCookieJar {
    fn read(&self) -> String {
        html_document()
            .and_then(|document| document.cookie().ok())
            .unwrap_or_default()
    }

    fn write(&self, assignment: &str) {
        let Some(document) = html_document() else {
            return;
        };
        if let Err(err) = document.set_cookie(assignment) {
            tracing::warn!(error = ?err, "failed to write cookie");
        }
    }
}

/// Cookie helpers bound to the current page
pub type BrowserCookies = Cookies<DocumentCookieJar>;

pub fn browser_cookies(config: CookieConfig) -> BrowserCookies {
    Cookies::new(DocumentCookieJar, config)
}

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}
