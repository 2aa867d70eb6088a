use log::info;
use std::error::Error;

use crate::config::Config;
use crate::models::ReviewRecord;
use crate::processing::{http_client, review_fetcher};
use crate::services::format_datetime;

pub const PREVIEW_COUNT: usize = 5;

fn preview_line(record: &ReviewRecord) -> String {
	let content: String = record.content.chars().take(80).collect();
	format!(
		"[{}] {} ({}*) {}: {}",
		format_datetime(&record.at),
		&record.review_id,
		record.score,
		&record.user_name,
		content.replace('\n', " ")
	)
}

/// Logs the newest reviews without touching the spreadsheet.
pub async fn preview_processing(config: &Config) -> Result<Vec<ReviewRecord>, Box<dyn Error>> {
	let fetcher = review_fetcher(config, http_client(config)?);
	let records = fetcher
		.fetch_all(&config.package_name, Some(PREVIEW_COUNT))
		.await?;

	if records.is_empty() {
		info!("No reviews available");
	}
	for record in &records {
		info!("{}", preview_line(record));
	}

	Ok(records)
}
