use clip_core::{detail_play_urls, extract_video_id, strip_watermark, RecordError};
use scrape_logging::scrape_info;

use crate::driver::{DriverError, PageDriver};
use crate::settings::EngineSettings;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("input url is empty")]
    EmptyInput,
    /// The redirected URL carries no extractable video identifier.
    #[error("no video identifier in redirected url `{redirected_url}`")]
    IdentifierNotFound { redirected_url: String },
    /// The detail payload lacks a usable playback URL list.
    #[error("detail payload has no playback url: {0}")]
    NoPlaybackUrl(#[from] RecordError),
    #[error("resolved url is empty after watermark rewrite")]
    EmptyResolvedUrl,
    /// The single-shot detail wait observed no matching response. There is
    /// no next round to fall back on, so resolution aborts.
    #[error("no detail response captured: {0}")]
    CaptureExhausted(DriverError),
    #[error(transparent)]
    Driver(DriverError),
}

/// Maps one share/short link to one direct, playable media URL.
pub struct LinkResolver {
    settings: EngineSettings,
}

impl LinkResolver {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Resolve a share link by following its redirect in the browser,
    /// capturing the detail API response, and selecting the best CDN
    /// candidate. The caller owns the driver's lifecycle; this method
    /// never closes it.
    pub async fn resolve(
        &self,
        driver: &dyn PageDriver,
        input_url: &str,
    ) -> Result<String, ResolveError> {
        let input = input_url.trim();
        if input.is_empty() {
            return Err(ResolveError::EmptyInput);
        }

        driver.navigate(input).await.map_err(ResolveError::Driver)?;
        let redirected = driver
            .current_url()
            .await
            .map_err(ResolveError::Driver)?;
        scrape_info!("share link landed on {redirected}");

        let video_id = extract_video_id(&redirected).ok_or(ResolveError::IdentifierNotFound {
            redirected_url: redirected,
        })?;
        let detail_url = self.settings.detail_page.url_for(&video_id);
        scrape_info!("video {video_id}: loading detail page {detail_url}");

        // Listener first: the response fires during the navigation.
        driver
            .start_network_listener(&self.settings.detail_endpoint_pattern)
            .await
            .map_err(ResolveError::Driver)?;
        driver
            .navigate(&detail_url)
            .await
            .map_err(ResolveError::Driver)?;

        let timeout = self.settings.detail_wait_timeout;
        let mut responses = driver
            .wait_for_responses(1, timeout, true)
            .await
            .map_err(ResolveError::CaptureExhausted)?;
        let response = responses
            .pop()
            .ok_or(ResolveError::CaptureExhausted(DriverError::CaptureTimeout {
                timeout,
            }))?;

        let candidates = detail_play_urls(&response.body)?;
        let chosen = self
            .settings
            .tiers
            .select(&candidates)
            .ok_or(ResolveError::EmptyResolvedUrl)?;
        let resolved = strip_watermark(chosen);
        if resolved.is_empty() {
            return Err(ResolveError::EmptyResolvedUrl);
        }

        scrape_info!("video {video_id}: resolved media url");
        Ok(resolved)
    }
}
