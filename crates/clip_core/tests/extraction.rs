use std::sync::Once;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use clip_core::{
    detail_play_urls, extract_record, feed_items, strip_watermark, DetailPageTemplate,
    RecordError, TierPolicy, VideoRecord,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scrape_logging::initialize_for_tests);
}

fn feed_item() -> Value {
    json!({
        "aweme_id": "7300000000000000001",
        "desc": "a short clip",
        "create_time": 1700000000,
        "duration": 15000,
        "statistics": {
            "digg_count": 12,
            "comment_count": 3,
            "collect_count": 4,
            "share_count": 5
        },
        "video": {
            "play_addr": {
                "url_list": [
                    "https://cdn.example.com/playwm/a",
                    "https://cdn.example.com/playwm/b",
                    "https://cdn.example.com/playwm/c"
                ]
            }
        }
    })
}

fn extract(item: &Value) -> Result<VideoRecord, RecordError> {
    extract_record(item, &DetailPageTemplate::default(), &TierPolicy::default())
}

#[test]
fn maps_all_fields_from_a_feed_item() {
    init_logging();
    let record = extract(&feed_item()).expect("valid item");

    assert_eq!(
        record,
        VideoRecord {
            video_id: "7300000000000000001".to_string(),
            canonical_url: "https://www.douyin.com/video/7300000000000000001".to_string(),
            title: "a short clip".to_string(),
            created_at: 1700000000,
            duration: 15000,
            like_count: 12,
            comment_count: 3,
            collect_count: 4,
            share_count: 5,
            download_url: "https://cdn.example.com/play/c".to_string(),
        }
    );
}

#[test]
fn missing_statistics_block_is_a_hard_item_failure() {
    let mut item = feed_item();
    item.as_object_mut().unwrap().remove("statistics");

    let err = extract(&item).unwrap_err();
    assert_eq!(
        err,
        RecordError::MissingField {
            path: "statistics"
        }
    );
}

#[test]
fn missing_or_empty_video_id_is_rejected() {
    let mut item = feed_item();
    item.as_object_mut().unwrap().remove("aweme_id");
    assert!(extract(&item).is_err());

    let mut item = feed_item();
    item["aweme_id"] = json!("");
    assert_eq!(
        extract(&item).unwrap_err(),
        RecordError::MissingField { path: "aweme_id" }
    );
}

#[test]
fn missing_or_empty_play_address_list_is_rejected() {
    let mut item = feed_item();
    item["video"]["play_addr"]["url_list"] = json!([]);
    assert_eq!(
        extract(&item).unwrap_err(),
        RecordError::MissingField {
            path: "video.play_addr.url_list"
        }
    );

    let mut item = feed_item();
    item.as_object_mut().unwrap().remove("video");
    assert!(extract(&item).is_err());
}

#[test]
fn absent_title_becomes_empty_string() {
    let mut item = feed_item();
    item.as_object_mut().unwrap().remove("desc");

    let record = extract(&item).expect("title is optional");
    assert_eq!(record.title, "");
}

#[test]
fn short_play_list_falls_back_to_first_entry() {
    let mut item = feed_item();
    item["video"]["play_addr"]["url_list"] = json!(["https://cdn.example.com/playwm/a"]);

    let record = extract(&item).expect("single-entry list is valid");
    assert_eq!(record.download_url, "https://cdn.example.com/play/a");
}

#[test]
fn feed_items_reports_absent_list_as_none() {
    assert!(feed_items(&json!({"status_code": 0})).is_none());

    let body = json!({"aweme_list": []});
    assert_eq!(feed_items(&body), Some(&[] as &[Value]));

    let body = json!({"aweme_list": [feed_item()]});
    assert_eq!(feed_items(&body).map(<[Value]>::len), Some(1));
}

#[test]
fn detail_payload_with_three_candidates_resolves_third_without_watermark() {
    let body = json!({
        "aweme_detail": {"video": {"play_addr": {"url_list": ["a/playwm/x", "b/playwm/y", "c/playwm/z"]}}}
    });

    let urls = detail_play_urls(&body).expect("playable detail");
    let chosen = TierPolicy::default().select(&urls).unwrap();
    assert_eq!(strip_watermark(chosen), "c/play/z");
}

#[test]
fn detail_payload_with_one_candidate_resolves_it() {
    let body = json!({
        "aweme_detail": {"video": {"play_addr": {"url_list": ["a/playwm/x"]}}}
    });

    let urls = detail_play_urls(&body).expect("playable detail");
    let chosen = TierPolicy::default().select(&urls).unwrap();
    assert_eq!(strip_watermark(chosen), "a/play/x");
}

#[test]
fn detail_payload_without_playback_urls_is_rejected() {
    let missing_detail = json!({"status_code": 0});
    assert!(detail_play_urls(&missing_detail).is_err());

    let empty_list = json!({
        "aweme_detail": {"video": {"play_addr": {"url_list": []}}}
    });
    assert_eq!(
        detail_play_urls(&empty_list).unwrap_err(),
        RecordError::MissingField {
            path: "aweme_detail.video.play_addr.url_list"
        }
    );
}
