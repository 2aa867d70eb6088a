use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde_json::{json, Value};

use crate::models::{ReviewRecord, REVIEW_COLUMNS};
use crate::services::SheetsError;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[async_trait]
pub trait SpreadsheetApi {
	/// Cheap metadata read, fails with `PermissionDenied` / `NotFound` before anything is destroyed.
	async fn probe(&self) -> Result<(), SheetsError>;
	async fn clear_range(&self, range: &str) -> Result<(), SheetsError>;
	/// Returns the number of updated cells.
	async fn update_values(&self, range: &str, values: Vec<Vec<Value>>) -> Result<u64, SheetsError>;
}

pub fn format_datetime(value: &DateTime<Utc>) -> String {
	value.format(DATETIME_FORMAT).to_string()
}

fn optional_datetime(value: &Option<DateTime<Utc>>) -> Value {
	json!(value.as_ref().map(format_datetime).unwrap_or_default())
}

/// Header row followed by one normalized row per record.
pub fn to_rows(records: &[ReviewRecord]) -> Vec<Vec<Value>> {
	let mut rows = Vec::with_capacity(records.len() + 1);
	rows.push(REVIEW_COLUMNS.iter().map(|c| json!(c)).collect());

	for record in records {
		rows.push(vec![
			json!(record.review_id),
			json!(record.user_name),
			json!(record.content),
			json!(record.score),
			json!(record.thumbs_up_count),
			json!(record.review_created_version.clone().unwrap_or_default()),
			json!(format_datetime(&record.at)),
			optional_datetime(&record.replied_at),
			json!(format_datetime(&record.scrape_timestamp)),
		]);
	}

	rows
}

pub struct SheetWriter<S: SpreadsheetApi> {
	api: S,
	range: String,
}

impl<S: SpreadsheetApi> SheetWriter<S> {
	pub fn new(api: S, range: String) -> Self {
		Self { api, range }
	}

	#[cfg(test)]
	pub fn api(&self) -> &S {
		&self.api
	}

	/// Destructive replace of the whole range. There is no rollback: if the
	/// update fails after the clear, the range is left empty.
	pub async fn replace(&self, records: &[ReviewRecord]) -> Result<u64, SheetsError> {
		self.api.probe().await?;

		let rows = to_rows(records);
		self.api.clear_range(&self.range).await?;
		let updated_cells = self.api.update_values(&self.range, rows).await?;

		info!("Updated {} cells in {}", updated_cells, &self.range);
		Ok(updated_cells)
	}
}
