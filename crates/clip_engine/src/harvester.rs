use clip_core::{
    extract_record, feed_items, HarvestSession, RoundDecision, StopReason, VideoRecord,
};
use scrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::driver::{CapturedResponse, DriverError, PageDriver};
use crate::settings::EngineSettings;

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// The browser session became unusable before or during the harvest.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Harvests the full, paginated set of a profile's videos by repeatedly
/// provoking the page's infinite-scroll lazy-load and capturing the feed
/// API responses each round triggers.
pub struct FeedHarvester {
    settings: EngineSettings,
}

impl FeedHarvester {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    /// Collect every video the profile page serves, deduplicated by id in
    /// discovery order. Reaching the end of the feed is the success path,
    /// not an error; only a dead browser session aborts the call. The
    /// caller owns the driver's lifecycle.
    pub async fn harvest(
        &self,
        driver: &dyn PageDriver,
        profile_url: &str,
    ) -> Result<Vec<VideoRecord>, HarvestError> {
        driver
            .start_network_listener(&self.settings.feed_endpoint_pattern)
            .await?;
        driver.navigate(profile_url).await?;
        scrape_info!("visiting profile page {profile_url}");

        let mut session = HarvestSession::new();
        loop {
            let round = session.begin_round();
            scrape_logging::set_round(round);
            scrape_info!("collecting page {round}");

            self.probe_end_marker(driver, &mut session).await;
            let responses = self.capture_round(driver).await;
            for response in &responses {
                if !response.url.contains(&self.settings.feed_endpoint_pattern) {
                    continue;
                }
                session.note_response();
                self.extract_response(&response.url, &response.body, &mut session);
            }

            match session.finish_round() {
                RoundDecision::Stop(reason) => {
                    log_stop(reason, &session);
                    break;
                }
                RoundDecision::Continue => {}
            }

            // Bringing the anchor into view triggers the next lazy-load.
            match driver
                .find_element(
                    &self.settings.scroll_anchor_selector,
                    self.settings.anchor_probe_timeout,
                )
                .await?
            {
                Some(anchor) => driver.scroll_into_view(&anchor).await?,
                None => {
                    log_stop(StopReason::AnchorMissing, &session);
                    break;
                }
            }
        }
        scrape_logging::set_round(0);

        Ok(session.into_records())
    }

    /// Non-blocking end-of-feed probe. Seeing the marker raises the stop
    /// flag but never skips the in-flight round: the marker can appear
    /// before the final batch of already-loaded items has been captured.
    async fn probe_end_marker(&self, driver: &dyn PageDriver, session: &mut HarvestSession) {
        match driver
            .find_element(
                &self.settings.end_marker_selector,
                self.settings.marker_probe_timeout,
            )
            .await
        {
            Ok(Some(_)) => {
                scrape_info!("end-of-list marker seen; finishing the in-flight round");
                session.mark_end_of_feed();
            }
            Ok(None) => {}
            // Best effort: a failed probe is covered by the zero-yield check.
            Err(err) => scrape_warn!("end-of-list probe failed: {err}"),
        }
    }

    /// Collect every response the last scroll triggered. A timeout or a
    /// wait failure yields an empty round, which the session treats as
    /// capture exhaustion rather than a fault to retry.
    async fn capture_round(&self, driver: &dyn PageDriver) -> Vec<CapturedResponse> {
        match driver
            .wait_for_responses(
                self.settings.capture_count_ceiling,
                self.settings.capture_timeout,
                false,
            )
            .await
        {
            Ok(responses) => responses,
            Err(err) => {
                scrape_warn!("capture wait failed: {err}; treating as end of feed");
                Vec::new()
            }
        }
    }

    fn extract_response(
        &self,
        url: &str,
        body: &serde_json::Value,
        session: &mut HarvestSession,
    ) {
        let Some(items) = feed_items(body) else {
            scrape_warn!("response from {url} has no video list");
            return;
        };
        if items.is_empty() {
            scrape_debug!("response from {url} has an empty video list");
            return;
        }
        for item in items {
            match extract_record(item, &self.settings.detail_page, &self.settings.tiers) {
                Ok(record) => {
                    let title = record.title.clone();
                    if session.ingest(record) {
                        scrape_debug!("extracted video: {title}");
                    }
                }
                Err(err) => scrape_warn!("skipping malformed feed item: {err}"),
            }
        }
    }
}

fn log_stop(reason: StopReason, session: &HarvestSession) {
    let records = session.record_count();
    match reason {
        StopReason::EndMarker => scrape_info!("end of feed reached; {records} videos collected"),
        StopReason::CaptureExhausted => {
            scrape_info!("no new responses this round; {records} videos collected")
        }
        StopReason::NoNewRecords => {
            scrape_info!("round yielded no new videos; {records} videos collected")
        }
        StopReason::AnchorMissing => {
            scrape_info!("scroll anchor gone; {records} videos collected")
        }
    }
}
