#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use clip_engine::{CapturedResponse, DriverError, ElementHandle, PageDriver};

/// Every driver call a test may want to assert on, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    CurrentUrl,
    Listener(String),
    Wait { max_count: usize, strict: bool },
    Find(String),
    Scroll(String),
    Close,
}

#[derive(Default)]
struct Inner {
    current_url: String,
    redirects: HashMap<String, String>,
    waits: VecDeque<Result<Vec<CapturedResponse>, DriverError>>,
    finds: HashMap<String, VecDeque<bool>>,
    listener: Option<String>,
    calls: Vec<Call>,
    close_count: usize,
}

/// In-memory [`PageDriver`] playing back a scripted session.
///
/// Navigations follow the scripted redirect map, each `wait_for_responses`
/// call pops the next scripted round (empty once the script runs out), and
/// element lookups pop per-selector hit sequences.
#[derive(Default)]
pub struct ScriptedDriver {
    inner: Mutex<Inner>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn redirect(&self, from: &str, to: &str) {
        self.inner
            .lock()
            .unwrap()
            .redirects
            .insert(from.to_string(), to.to_string());
    }

    /// Queue the responses one `wait_for_responses` call will observe.
    pub fn push_round(&self, responses: Vec<CapturedResponse>) {
        self.inner.lock().unwrap().waits.push_back(Ok(responses));
    }

    pub fn push_wait_failure(&self, err: DriverError) {
        self.inner.lock().unwrap().waits.push_back(Err(err));
    }

    /// Script the hit sequence for one selector; lookups past the end of
    /// the sequence miss.
    pub fn script_find(&self, selector: &str, hits: &[bool]) {
        self.inner
            .lock()
            .unwrap()
            .finds
            .insert(selector.to_string(), hits.iter().copied().collect());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn close_count(&self) -> usize {
        self.inner.lock().unwrap().close_count
    }
}

#[async_trait::async_trait]
impl PageDriver for ScriptedDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Navigate(url.to_string()));
        inner.current_url = inner
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CurrentUrl);
        Ok(inner.current_url.clone())
    }

    async fn find_element(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Option<ElementHandle>, DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Find(selector.to_string()));
        let hit = inner
            .finds
            .get_mut(selector)
            .and_then(VecDeque::pop_front)
            .unwrap_or(false);
        Ok(hit.then(|| ElementHandle::new(selector)))
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(Call::Scroll(element.selector().to_string()));
        Ok(())
    }

    async fn start_network_listener(&self, url_pattern: &str) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Listener(url_pattern.to_string()));
        inner.listener = Some(url_pattern.to_string());
        Ok(())
    }

    async fn wait_for_responses(
        &self,
        max_count: usize,
        timeout: Duration,
        strict_count: bool,
    ) -> Result<Vec<CapturedResponse>, DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Wait {
            max_count,
            strict: strict_count,
        });
        if inner.listener.is_none() {
            return Err(DriverError::ListenerInactive);
        }
        let responses = inner
            .waits
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))?;
        if strict_count && responses.len() < max_count {
            return Err(DriverError::CaptureTimeout { timeout });
        }
        Ok(responses)
    }

    async fn close(&self) -> Result<(), DriverError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Close);
        inner.close_count += 1;
        Ok(())
    }
}

/// A feed item the extractor accepts, with `playwm` CDN candidates.
pub fn feed_item(id: &str) -> Value {
    json!({
        "aweme_id": id,
        "desc": format!("clip {id}"),
        "create_time": 1700000000,
        "duration": 15000,
        "statistics": {
            "digg_count": 1,
            "comment_count": 2,
            "collect_count": 3,
            "share_count": 4
        },
        "video": {
            "play_addr": {
                "url_list": [
                    format!("https://cdn.example.com/playwm/{id}-lo"),
                    format!("https://cdn.example.com/playwm/{id}-mid"),
                    format!("https://cdn.example.com/playwm/{id}-hi")
                ]
            }
        }
    })
}

/// A captured feed-endpoint response carrying the given items.
pub fn feed_response(items: Vec<Value>) -> CapturedResponse {
    CapturedResponse {
        url: "https://www.douyin.com/aweme/v1/web/aweme/post/?cursor=0".to_string(),
        body: json!({ "aweme_list": items }),
    }
}

/// A captured detail-endpoint response with the given playback candidates.
pub fn detail_response(url_list: &[&str]) -> CapturedResponse {
    CapturedResponse {
        url: "https://www.douyin.com/aweme/v1/web/aweme/detail/?aweme_id=1".to_string(),
        body: json!({
            "aweme_detail": {"video": {"play_addr": {"url_list": url_list}}}
        }),
    }
}
