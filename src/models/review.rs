use chrono::prelude::*;
use serde::{Deserialize, Serialize};

/// Column headers of the review sheet, in write order.
pub const REVIEW_COLUMNS: [&str; 9] = [
	"reviewId",
	"userName",
	"content",
	"score",
	"thumbsUpCount",
	"reviewCreatedVersion",
	"at",
	"repliedAt",
	"scrape_timestamp",
];

/// One review as it arrives from the feed, before the scrape timestamp is known.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RawReview {
	pub review_id: String,
	pub user_name: String,
	pub content: String,
	pub score: u8,
	pub thumbs_up_count: u64,
	pub review_created_version: Option<String>,
	pub at: DateTime<Utc>,
	pub replied_at: Option<DateTime<Utc>>,
}

/// One row of the review sheet.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReviewRecord {
	#[serde(rename = "reviewId")]
	pub review_id: String,
	#[serde(rename = "userName")]
	pub user_name: String,
	pub content: String,
	pub score: u8,
	#[serde(rename = "thumbsUpCount")]
	pub thumbs_up_count: u64,
	#[serde(rename = "reviewCreatedVersion")]
	pub review_created_version: Option<String>,
	pub at: DateTime<Utc>,
	#[serde(rename = "repliedAt")]
	pub replied_at: Option<DateTime<Utc>>,
	pub scrape_timestamp: DateTime<Utc>,
}

impl ReviewRecord {
	pub fn from_raw(raw: RawReview, scrape_timestamp: DateTime<Utc>) -> Self {
		Self {
			review_id: raw.review_id,
			user_name: raw.user_name,
			content: raw.content,
			score: raw.score,
			thumbs_up_count: raw.thumbs_up_count,
			review_created_version: raw.review_created_version,
			at: raw.at,
			replied_at: raw.replied_at,
			scrape_timestamp,
		}
	}
}
