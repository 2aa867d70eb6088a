use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};

use crate::models::{RawReview, ReviewRecord};
use crate::services::FeedError;

pub const PAGE_SIZE: usize = 100;

/// One page request against the review feed. Pages are always newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
	pub app_id: String,
	pub lang: String,
	pub country: String,
	pub page_size: usize,
	pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
	pub reviews: Vec<RawReview>,
	pub next_token: Option<String>,
}

#[async_trait]
pub trait ReviewFeed {
	async fn fetch_page(&self, request: &PageRequest) -> Result<ReviewPage, FeedError>;
}

/// Forward-only cursor over the feed pages of one app.
/// Yields `None` once the feed returns an empty page or stops handing out tokens.
pub struct ReviewPager<'a, F: ReviewFeed + ?Sized> {
	feed: &'a F,
	request: PageRequest,
	exhausted: bool,
	pages_fetched: usize,
}

impl<'a, F: ReviewFeed + ?Sized> ReviewPager<'a, F> {
	pub fn new(feed: &'a F, request: PageRequest) -> Self {
		Self {
			feed,
			request,
			exhausted: false,
			pages_fetched: 0,
		}
	}

	pub fn pages_fetched(&self) -> usize {
		self.pages_fetched
	}

	pub fn is_exhausted(&self) -> bool {
		self.exhausted
	}

	pub async fn next_page(&mut self) -> Result<Option<Vec<RawReview>>, FeedError> {
		if self.exhausted {
			return Ok(None);
		}

		let page = self.feed.fetch_page(&self.request).await?;
		self.pages_fetched += 1;

		if page.reviews.is_empty() {
			self.exhausted = true;
			return Ok(None);
		}

		match page.next_token {
			Some(token) => self.request.continuation_token = Some(token),
			None => self.exhausted = true,
		}

		Ok(Some(page.reviews))
	}
}

pub struct ReviewFetcher<F: ReviewFeed> {
	feed: F,
	lang: String,
	country: String,
	max_pages: Option<usize>,
}

impl<F: ReviewFeed> ReviewFetcher<F> {
	pub fn new(feed: F, lang: String, country: String) -> Self {
		Self {
			feed,
			lang,
			country,
			max_pages: None,
		}
	}

	pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
		self.max_pages = max_pages.filter(|n| *n > 0);
		self
	}

	pub fn pager(&self, app_id: &str) -> ReviewPager<'_, F> {
		ReviewPager::new(
			&self.feed,
			PageRequest {
				app_id: app_id.to_string(),
				lang: self.lang.clone(),
				country: self.country.clone(),
				page_size: PAGE_SIZE,
				continuation_token: None,
			},
		)
	}

	/// Pulls every page for `app_id`, newest first. `limit` of `None` or `Some(0)` means no limit.
	pub async fn fetch_all(
		&self,
		app_id: &str,
		limit: Option<usize>,
	) -> Result<Vec<ReviewRecord>, FeedError> {
		let limit = limit.filter(|n| *n > 0);
		info!("Fetching reviews for {} (limit: {:?})", app_id, limit);

		let mut pager = self.pager(app_id);
		let mut reviews: Vec<RawReview> = Vec::new();

		while let Some(page) = pager.next_page().await? {
			debug!("Page {}: {} reviews", pager.pages_fetched(), page.len());
			reviews.extend(page);

			if let Some(limit) = limit {
				if reviews.len() >= limit {
					reviews.truncate(limit);
					break;
				}
			}

			if let Some(max_pages) = self.max_pages {
				if !pager.is_exhausted() && pager.pages_fetched() >= max_pages {
					warn!("Review feed for {} exceeded {} pages", app_id, max_pages);
					return Err(FeedError::PageCapExceeded(max_pages));
				}
			}
		}

		if reviews.is_empty() {
			warn!("No reviews found for package: {}", app_id);
		}

		let scraped_at = Utc::now();
		let records: Vec<ReviewRecord> = reviews
			.into_iter()
			.map(|raw| ReviewRecord::from_raw(raw, scraped_at))
			.collect();

		info!(
			"Successfully fetched {} reviews in {} pages",
			records.len(),
			pager.pages_fetched()
		);

		Ok(records)
	}
}
