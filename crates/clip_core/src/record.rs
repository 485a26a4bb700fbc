use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::DetailPageTemplate;
use crate::tier::{strip_watermark, TierPolicy};

/// One harvested video, as extracted from a single feed payload entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub canonical_url: String,
    pub title: String,
    pub created_at: i64,
    /// Duration as provided by the source, unit passed through unmodified.
    pub duration: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub collect_count: u64,
    pub share_count: u64,
    pub download_url: String,
}

/// A single item lacked a required field. Scoped to that item: the caller
/// skips it and keeps processing the rest of the payload.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("required field `{path}` is missing or empty")]
    MissingField { path: &'static str },
}

fn missing(path: &'static str) -> RecordError {
    RecordError::MissingField { path }
}

/// The item list of a feed payload, or `None` when the field is absent.
pub fn feed_items(body: &Value) -> Option<&[Value]> {
    body.get("aweme_list").and_then(Value::as_array).map(Vec::as_slice)
}

/// Candidate playback URLs of a single-video detail payload.
///
/// Requires `aweme_detail.video.play_addr.url_list` to be present and
/// non-empty; the same required-nested-path taxonomy as feed items.
pub fn detail_play_urls(body: &Value) -> Result<Vec<String>, RecordError> {
    let detail = body.get("aweme_detail").ok_or(missing("aweme_detail"))?;
    play_url_list(detail, "aweme_detail.video.play_addr.url_list")
}

/// Map one raw feed item to a [`VideoRecord`].
///
/// `aweme_id`, the `statistics` block, and the play-address list are hard
/// requirements; `desc` may be absent (empty title).
pub fn extract_record(
    item: &Value,
    template: &DetailPageTemplate,
    tiers: &TierPolicy,
) -> Result<VideoRecord, RecordError> {
    let video_id = item
        .get("aweme_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(missing("aweme_id"))?
        .to_string();

    let title = item
        .get("desc")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let created_at = item
        .get("create_time")
        .and_then(Value::as_i64)
        .ok_or(missing("create_time"))?;
    let duration = item
        .get("duration")
        .and_then(Value::as_u64)
        .ok_or(missing("duration"))?;

    let stats = item.get("statistics").ok_or(missing("statistics"))?;
    let like_count = stat_count(stats, "digg_count", "statistics.digg_count")?;
    let comment_count = stat_count(stats, "comment_count", "statistics.comment_count")?;
    let collect_count = stat_count(stats, "collect_count", "statistics.collect_count")?;
    let share_count = stat_count(stats, "share_count", "statistics.share_count")?;

    let play_urls = play_url_list(item, "video.play_addr.url_list")?;
    // Non-empty list, so selection cannot come back empty-handed.
    let chosen = tiers
        .select(&play_urls)
        .ok_or(missing("video.play_addr.url_list"))?;
    let download_url = strip_watermark(chosen);

    Ok(VideoRecord {
        canonical_url: template.url_for(&video_id),
        video_id,
        title,
        created_at,
        duration,
        like_count,
        comment_count,
        collect_count,
        share_count,
        download_url,
    })
}

fn stat_count(stats: &Value, key: &str, path: &'static str) -> Result<u64, RecordError> {
    stats.get(key).and_then(Value::as_u64).ok_or(missing(path))
}

/// Walk `<root>.video.play_addr.url_list` and collect its string entries.
fn play_url_list(root: &Value, path: &'static str) -> Result<Vec<String>, RecordError> {
    let urls: Vec<String> = root
        .get("video")
        .and_then(|video| video.get("play_addr"))
        .and_then(|addr| addr.get("url_list"))
        .and_then(Value::as_array)
        .ok_or(missing(path))?
        .iter()
        .filter_map(Value::as_str)
        .map(ToOwned::to_owned)
        .collect();

    if urls.is_empty() {
        return Err(missing(path));
    }
    Ok(urls)
}
