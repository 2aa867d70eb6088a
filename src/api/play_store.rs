use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::debug;
use reqwest::{
	header::{self, HeaderMap, HeaderValue},
	Client,
};
use serde_json::{json, Value};

use crate::models::RawReview;
use crate::services::{FeedError, PageRequest, ReviewFeed, ReviewPage};

const BATCH_EXECUTE_URL: &str = "https://play.google.com/_/PlayStoreUi/data/batchexecute";
const REVIEWS_RPC_ID: &str = "UsvDTd";
const RESPONSE_PREFIX: &str = ")]}'";
const SORT_NEWEST: u8 = 2;

/// Google Play review feed backed by the public `batchexecute` endpoint.
pub struct PlayStoreFeed {
	client: Client,
	base_url: String,
}

impl PlayStoreFeed {
	pub fn new(client: Client) -> Self {
		Self {
			client,
			base_url: BATCH_EXECUTE_URL.to_string(),
		}
	}
}

/// Form body for one page: the RPC arguments are a JSON document nested as a string.
pub fn build_request_body(request: &PageRequest) -> Result<String, FeedError> {
	let args = json!([
		null,
		null,
		[
			2,
			SORT_NEWEST,
			[request.page_size, null, request.continuation_token],
			null,
			[]
		],
		[request.app_id, 7]
	]);
	let envelope = json!([[[REVIEWS_RPC_ID, args.to_string(), null, "generic"]]]);

	serde_urlencoded::to_string([("f.req", envelope.to_string())])
		.map_err(|e| FeedError::Parse(format!("could not encode request: {}", e)))
}

fn at<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
	path.iter().try_fold(value, |v, i| v.get(*i))
}

fn at_str(value: &Value, path: &[usize]) -> Option<String> {
	at(value, path).and_then(Value::as_str).map(str::to_string)
}

fn at_timestamp(value: &Value, path: &[usize]) -> Option<DateTime<Utc>> {
	at(value, path)
		.and_then(Value::as_i64)
		.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

/// Projects one raw review array onto `RawReview`, dropping every field we do not keep.
pub fn parse_review(item: &Value) -> Result<RawReview, FeedError> {
	let review_id =
		at_str(item, &[0]).ok_or_else(|| FeedError::Parse("review without id".to_string()))?;
	let score = at(item, &[2])
		.and_then(Value::as_u64)
		.filter(|s| (1..=5).contains(s))
		.ok_or_else(|| FeedError::Parse(format!("review {} has no valid score", review_id)))?;
	let created_at = at_timestamp(item, &[5, 0])
		.ok_or_else(|| FeedError::Parse(format!("review {} has no timestamp", review_id)))?;

	Ok(RawReview {
		user_name: at_str(item, &[1, 0]).unwrap_or_default(),
		content: at_str(item, &[4]).unwrap_or_default(),
		score: score as u8,
		thumbs_up_count: at(item, &[6]).and_then(Value::as_u64).unwrap_or(0),
		review_created_version: at_str(item, &[10]),
		at: created_at,
		replied_at: at_timestamp(item, &[7, 2, 0]),
		review_id,
	})
}

/// Parses a `batchexecute` response into a page of reviews and the next token.
pub fn parse_response(body: &str) -> Result<ReviewPage, FeedError> {
	let payload = body
		.trim_start()
		.strip_prefix(RESPONSE_PREFIX)
		.ok_or_else(|| FeedError::Parse("unexpected response prefix".to_string()))?;

	let envelope: Value = serde_json::from_str(payload.trim())
		.map_err(|e| FeedError::Parse(format!("invalid envelope: {}", e)))?;

	let inner = match at(&envelope, &[0, 2]) {
		Some(Value::String(s)) => s,
		Some(Value::Null) | None => return Ok(ReviewPage::default()),
		Some(other) => return Err(FeedError::Parse(format!("unexpected payload {}", other))),
	};

	let data: Value = serde_json::from_str(inner)
		.map_err(|e| FeedError::Parse(format!("invalid payload: {}", e)))?;

	let reviews = match data.get(0) {
		Some(Value::Array(items)) => items
			.iter()
			.map(parse_review)
			.collect::<Result<Vec<_>, _>>()?,
		Some(Value::Null) | None => Vec::new(),
		Some(other) => return Err(FeedError::Parse(format!("unexpected review list {}", other))),
	};

	let next_token = data
		.as_array()
		.filter(|a| a.len() >= 2)
		.and_then(|a| a[a.len() - 2].as_array())
		.and_then(|a| a.last())
		.and_then(Value::as_str)
		.map(str::to_string);

	Ok(ReviewPage {
		reviews,
		next_token,
	})
}

#[async_trait]
impl ReviewFeed for PlayStoreFeed {
	async fn fetch_page(&self, request: &PageRequest) -> Result<ReviewPage, FeedError> {
		let headers: HeaderMap<HeaderValue> = HeaderMap::from_iter(vec![(
			header::CONTENT_TYPE,
			HeaderValue::from_static("application/x-www-form-urlencoded;charset=UTF-8"),
		)]);

		let response = self
			.client
			.post(&self.base_url)
			.query(&[("hl", request.lang.as_str()), ("gl", request.country.as_str())])
			.headers(headers)
			.body(build_request_body(request)?)
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(FeedError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let page = parse_response(&body)?;
		debug!(
			"{}: {} reviews, next token: {}",
			&request.app_id,
			page.reviews.len(),
			page.next_token.is_some()
		);
		Ok(page)
	}
}
