use std::path::Path;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, GetResponseBodyParams, RequestId,
};
use chromiumoxide::Page;
use futures::StreamExt;
use scrape_logging::{scrape_debug, scrape_warn};
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::driver::{CapturedResponse, DriverError, ElementHandle, PageDriver};
use crate::settings::BrowserSettings;

const FIND_POLL_INTERVAL: Duration = Duration::from_millis(250);
const BODY_FETCH_ATTEMPTS: usize = 5;
const BODY_FETCH_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Find a usable Chromium-family browser executable.
///
/// Resolution order: the `CHROME_EXECUTABLE` env var, a PATH scan, then
/// OS-specific well-known install locations.
pub fn find_chrome_executable() -> Option<String> {
    if let Ok(path) = std::env::var("CHROME_EXECUTABLE") {
        if Path::new(&path).exists() {
            return Some(path);
        }
    }

    if let Ok(path_var) = std::env::var("PATH") {
        let candidates = ["google-chrome", "chromium", "chromium-browser", "chrome"];
        for dir in std::env::split_paths(&path_var) {
            for exe in candidates {
                let full = dir.join(exe);
                if full.exists() {
                    return Some(full.to_string_lossy().to_string());
                }
            }
        }
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ]
    } else {
        &[
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome",
            "/usr/local/bin/chromium",
        ]
    };
    candidates
        .iter()
        .find(|c| Path::new(c).exists())
        .map(ToString::to_string)
}

struct CaptureState {
    rx: mpsc::UnboundedReceiver<CapturedResponse>,
    task: JoinHandle<()>,
}

/// [`PageDriver`] backed by a chromiumoxide-controlled Chromium session.
///
/// One driver owns one browser process and one page; network capture runs
/// as a background task reading CDP `Network.responseReceived` events and
/// fetching bodies for URLs matching the active pattern.
pub struct ChromiumDriver {
    browser: Mutex<Option<Browser>>,
    handler_task: JoinHandle<()>,
    page: Page,
    capture: Mutex<Option<CaptureState>>,
}

impl ChromiumDriver {
    /// Launch a browser session with the given options.
    pub async fn launch(settings: &BrowserSettings) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder();
        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = settings
            .executable
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .or_else(find_chrome_executable)
        {
            builder = builder.chrome_executable(executable);
        }
        if let Some(dir) = &settings.user_data_dir {
            builder = builder.user_data_dir(dir);
        }
        builder = builder.args(settings.extra_args.clone());
        let config = builder.build().map_err(DriverError::Session)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| DriverError::Session(err.to_string()))?;

        // The handler loop must run for the lifetime of the session; it
        // multiplexes every CDP message for this browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|err| DriverError::Session(err.to_string()))?;

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler_task,
            page,
            capture: Mutex::new(None),
        })
    }
}

#[async_trait::async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let failed = |err: chromiumoxide::error::CdpError| DriverError::Navigation {
            url: url.to_string(),
            message: err.to_string(),
        };
        self.page.goto(url).await.map_err(failed)?;
        self.page.wait_for_navigation().await.map_err(failed)?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        self.page
            .url()
            .await
            .map_err(|err| DriverError::Session(err.to_string()))?
            .ok_or_else(|| DriverError::Session("page reports no url".to_string()))
    }

    async fn find_element(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            let found = if selector.starts_with("//") {
                self.page.find_xpath(selector).await.is_ok()
            } else {
                self.page.find_element(selector).await.is_ok()
            };
            if found {
                return Ok(Some(ElementHandle::new(selector)));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(FIND_POLL_INTERVAL).await;
        }
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let session = |err: chromiumoxide::error::CdpError| DriverError::Session(err.to_string());
        let selector = element.selector();
        let located = if selector.starts_with("//") {
            self.page.find_xpath(selector).await.map_err(session)?
        } else {
            self.page.find_element(selector).await.map_err(session)?
        };
        located.scroll_into_view().await.map_err(session)?;
        Ok(())
    }

    async fn start_network_listener(&self, url_pattern: &str) -> Result<(), DriverError> {
        let session = |err: chromiumoxide::error::CdpError| DriverError::Session(err.to_string());
        self.page
            .execute(EnableParams::default())
            .await
            .map_err(session)?;
        let mut events = self
            .page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(session)?;

        let page = self.page.clone();
        let pattern = url_pattern.to_string();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                let url = event.response.url.clone();
                if !url.contains(&pattern) {
                    continue;
                }
                let request_id = event.request_id.clone();
                let page = page.clone();
                let tx = tx.clone();
                // Body fetch must not stall the event stream.
                tokio::spawn(async move {
                    if let Some(body) = fetch_json_body(&page, request_id, &url).await {
                        let _ = tx.send(CapturedResponse { url, body });
                    }
                });
            }
        });

        if let Some(previous) = self.capture.lock().await.replace(CaptureState { rx, task }) {
            previous.task.abort();
        }
        Ok(())
    }

    async fn wait_for_responses(
        &self,
        max_count: usize,
        timeout: Duration,
        strict_count: bool,
    ) -> Result<Vec<CapturedResponse>, DriverError> {
        let mut guard = self.capture.lock().await;
        let state = guard.as_mut().ok_or(DriverError::ListenerInactive)?;

        let deadline = Instant::now() + timeout;
        let mut collected = Vec::new();
        while collected.len() < max_count {
            match tokio::time::timeout_at(deadline, state.rx.recv()).await {
                Ok(Some(response)) => collected.push(response),
                // Channel closed or window elapsed: hand over what arrived.
                Ok(None) => break,
                Err(_) => break,
            }
        }

        if strict_count && collected.len() < max_count {
            return Err(DriverError::CaptureTimeout { timeout });
        }
        Ok(collected)
    }

    async fn close(&self) -> Result<(), DriverError> {
        if let Some(state) = self.capture.lock().await.take() {
            state.task.abort();
        }
        let mut guard = self.browser.lock().await;
        if let Some(mut browser) = guard.take() {
            let result = browser.close().await;
            let _ = browser.wait().await;
            self.handler_task.abort();
            result.map_err(|err| DriverError::Session(err.to_string()))?;
        }
        Ok(())
    }
}

/// Fetch and decode a response body, retrying while the body is still
/// streaming. Returns `None` when the body never becomes available or is
/// not JSON; the capture is dropped rather than surfaced as an error.
async fn fetch_json_body(page: &Page, request_id: RequestId, url: &str) -> Option<Value> {
    for attempt in 1..=BODY_FETCH_ATTEMPTS {
        match page
            .execute(GetResponseBodyParams::new(request_id.clone()))
            .await
        {
            Ok(reply) => {
                if reply.base64_encoded {
                    scrape_warn!("dropping non-text response body from {url}");
                    return None;
                }
                return match serde_json::from_str(&reply.body) {
                    Ok(value) => Some(value),
                    Err(err) => {
                        scrape_warn!("dropping undecodable response body from {url}: {err}");
                        None
                    }
                };
            }
            Err(err) => {
                scrape_debug!("response body for {url} not ready (attempt {attempt}): {err}");
                tokio::time::sleep(BODY_FETCH_RETRY_DELAY).await;
            }
        }
    }
    None
}
