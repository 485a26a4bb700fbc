use std::path::PathBuf;
use std::time::Duration;

use clip_core::{DetailPageTemplate, TierPolicy};

/// Site-specific contracts and timing knobs for both engine components.
///
/// The endpoint patterns and page selectors mirror what the upstream site
/// currently serves; they are configuration because the site can change
/// them without notice.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Substring identifying the single-video detail API.
    pub detail_endpoint_pattern: String,
    /// Substring identifying the paginated profile feed API.
    pub feed_endpoint_pattern: String,
    /// Canonical detail-page URL template.
    pub detail_page: DetailPageTemplate,
    /// CDN candidate-URL tier preference.
    pub tiers: TierPolicy,
    /// XPath locating the literal end-of-list marker text.
    pub end_marker_selector: String,
    /// XPath locating the fixed structural element near the page footer
    /// whose visibility triggers the site's lazy-load.
    pub scroll_anchor_selector: String,
    /// Non-blocking end-of-feed probe timeout.
    pub marker_probe_timeout: Duration,
    /// Scroll-anchor lookup timeout.
    pub anchor_probe_timeout: Duration,
    /// Per-round capture window for the feed harvester.
    pub capture_timeout: Duration,
    /// Generous per-round response ceiling; the wait is non-strict.
    pub capture_count_ceiling: usize,
    /// Single-shot wait for the detail response during link resolution.
    pub detail_wait_timeout: Duration,
    /// Browser launch options for [`crate::ChromiumDriver`].
    pub browser: BrowserSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            detail_endpoint_pattern: "/aweme/v1/web/aweme/detail/".to_string(),
            feed_endpoint_pattern: "aweme/v1/web/aweme/post/".to_string(),
            detail_page: DetailPageTemplate::default(),
            tiers: TierPolicy::default(),
            end_marker_selector: "//*[text()=\"暂时没有更多了\"]".to_string(),
            scroll_anchor_selector: "//footer[@class=\"user-page-footer\"]/div[1]".to_string(),
            marker_probe_timeout: Duration::from_secs(1),
            anchor_probe_timeout: Duration::from_secs(10),
            capture_timeout: Duration::from_secs(10),
            capture_count_ceiling: 9999,
            detail_wait_timeout: Duration::from_secs(30),
            browser: BrowserSettings::default(),
        }
    }
}

/// Launch options for the Chromium session.
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    /// Explicit browser executable; discovered when unset.
    pub executable: Option<PathBuf>,
    /// Persistent user-data directory, so a manually established login
    /// survives across sessions. Unset means a throwaway profile.
    pub user_data_dir: Option<PathBuf>,
    pub headless: bool,
    /// Extra Chromium arguments appended at launch.
    pub extra_args: Vec<String>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            executable: None,
            user_data_dir: None,
            headless: true,
            extra_args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
            ],
        }
    }
}
