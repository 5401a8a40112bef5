//! Document title and confirmation dialog as seen by the watchdog

use panel_core::WatchdogSurface;
use yew::Callback;

/// Drives `document.title` directly and the dialog through a Yew callback
pub struct DocumentSurface {
    set_dialog_open: Callback<bool>,
}

impl DocumentSurface {
    pub fn new(set_dialog_open: Callback<bool>) -> Self {
        Self { set_dialog_open }
    }
}

impl WatchdogSurface for DocumentSurface {
    fn title(&self) -> String {
        gloo::utils::document().title()
    }

    fn set_title(&self, title: &str) {
        gloo::utils::document().set_title(title);
    }

    fn show_confirm(&self) {
        self.set_dialog_open.emit(true);
    }

    fn hide_confirm(&self) {
        self.set_dialog_open.emit(false);
    }
}
