//! Clipharvest core: pure extraction, identity, and harvest-session logic.
mod identity;
mod record;
mod session;
mod tier;

pub use identity::{extract_video_id, DetailPageTemplate};
pub use record::{detail_play_urls, extract_record, feed_items, RecordError, VideoRecord};
pub use session::{HarvestSession, RoundDecision, StopReason};
pub use tier::{strip_watermark, TierPolicy};
