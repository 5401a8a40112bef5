/// Alternates the document title between its normal text and an alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBlinker {
    original: String,
    alert: String,
    showing_alert: bool,
}

impl TitleBlinker {
    pub fn new(original: impl Into<String>, alert: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            alert: alert.into(),
            showing_alert: false,
        }
    }

    /// Title to show on the next blink tick
    pub fn next_title(&mut self) -> &str {
        self.showing_alert = !self.showing_alert;
        self.current()
    }

    pub fn current(&self) -> &str {
        if self.showing_alert {
            &self.alert
        } else {
            &self.original
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}
