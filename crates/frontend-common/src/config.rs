//! Frontend configuration

use panel_core::ConsoleConfig;

/// Fixed identifiers shared with the host page
pub struct FrontendConfig;

impl FrontendConfig {
    /// DOM id of the session confirmation dialog
    pub const CONFIRM_DIALOG_ID: &'static str = "session-confirm-dialog";

    /// `<script type="text/toml">` element carrying console overrides
    pub const CONFIG_ELEMENT_ID: &'static str = "console-config";

    /// Cookie remembering the last login name
    pub const USERNAME_COOKIE: &'static str = "username";
}

/// Read overrides embedded in the page, falling back to the defaults
pub fn load_console_config() -> ConsoleConfig {
    let source = gloo::utils::document()
        .get_element_by_id(FrontendConfig::CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content());

    let Some(source) = source else {
        return ConsoleConfig::default();
    };

    match ConsoleConfig::from_toml(&source) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring invalid console configuration");
            ConsoleConfig::default()
        }
    }
}
