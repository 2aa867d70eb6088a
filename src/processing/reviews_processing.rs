use log::info;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;

use crate::api::{GoogleSheetsClient, PlayStoreFeed, TokenProvider};
use crate::config::{Config, SheetConfig};
use crate::models::JobStatus;
use crate::services::{ReviewFetcher, ReviewJob, SheetWriter, SheetsError};

pub fn http_client(config: &Config) -> Result<Client, reqwest::Error> {
	Client::builder()
		.timeout(Duration::from_secs(config.http_timeout_secs))
		.build()
}

pub fn review_fetcher(config: &Config, client: Client) -> ReviewFetcher<PlayStoreFeed> {
	ReviewFetcher::new(
		PlayStoreFeed::new(client),
		config.lang.clone(),
		config.country.clone(),
	)
	.with_max_pages(config.max_pages)
}

pub fn build_review_job(
	config: &Config,
	sheet: &SheetConfig,
) -> Result<ReviewJob<PlayStoreFeed, GoogleSheetsClient>, SheetsError> {
	let client = http_client(config)?;
	let tokens = TokenProvider::new(client.clone(), sheet.service_account.clone())?;
	let sheets = GoogleSheetsClient::new(client.clone(), tokens, sheet.spreadsheet_id.clone());

	Ok(ReviewJob::new(
		config.package_name.clone(),
		review_fetcher(config, client),
		SheetWriter::new(sheets, sheet.sheet_range.clone()),
	))
}

/// Runs the review job once.
pub async fn reviews_processing(config: &Config) -> Result<JobStatus, Box<dyn Error>> {
	let job = build_review_job(config, config.sheet()?)?;
	let mut status = JobStatus::default();

	job.run(&mut status).await?;
	info!("{}", status.summary());

	Ok(status)
}
