use std::time::Duration;

use serde_json::Value;

/// One network response observed by the driver's listener.
///
/// Ephemeral: produced while a listener is active, consumed by the next
/// extraction step, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    /// Request URL, used to filter by endpoint substring.
    pub url: String,
    /// Decoded JSON payload.
    pub body: Value,
}

/// Re-locatable reference to a page element.
///
/// The handle carries the selector that found the element, so a driver can
/// locate it again for follow-up actions. Selectors beginning with `//` are
/// XPath, everything else is CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    selector: String,
}

impl ElementHandle {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The browser session itself is unusable (crash, disconnect, bad launch).
    #[error("browser session failed: {0}")]
    Session(String),
    #[error("navigation to `{url}` failed: {message}")]
    Navigation { url: String, message: String },
    /// A strict wait did not observe the requested number of responses.
    #[error("no matching network response arrived within {timeout:?}")]
    CaptureTimeout { timeout: Duration },
    /// `wait_for_responses` was called before `start_network_listener`.
    #[error("network listener is not active")]
    ListenerInactive,
}

/// Capability interface over the browser-automation binding.
///
/// One handle corresponds to one browser session; the listener and the
/// navigation state are single-subscriber, so concurrent calls against the
/// same handle must be serialized by the caller.
#[async_trait::async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and suspend until the initial load signal.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// The page's current (possibly redirected) URL.
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Look for an element, polling up to `timeout`. `Ok(None)` means the
    /// element is not on the page; it is not an error.
    async fn find_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError>;

    /// Bring an element into the viewport, triggering any lazy-load tied
    /// to its visibility.
    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DriverError>;

    /// Begin capturing responses whose request URL contains `url_pattern`.
    /// Must be called before the navigation whose responses are wanted;
    /// calling again replaces the active listener.
    async fn start_network_listener(&self, url_pattern: &str) -> Result<(), DriverError>;

    /// Collect captured responses until `max_count` arrive or `timeout`
    /// elapses. With `strict_count` unset, returns whatever has arrived;
    /// with it set, fewer than `max_count` responses is a
    /// [`DriverError::CaptureTimeout`].
    async fn wait_for_responses(
        &self,
        max_count: usize,
        timeout: Duration,
        strict_count: bool,
    ) -> Result<Vec<CapturedResponse>, DriverError>;

    /// Release all browser resources. Idempotent, safe after prior failure.
    async fn close(&self) -> Result<(), DriverError>;
}
