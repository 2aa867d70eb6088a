use log::{error, info};

use crate::models::JobStatus;
use crate::services::{JobError, ReviewFeed, ReviewFetcher, SheetWriter, SpreadsheetApi};

/// Fetch every review of one app and replace the sheet with them.
pub struct ReviewJob<F: ReviewFeed, S: SpreadsheetApi> {
	app_id: String,
	fetcher: ReviewFetcher<F>,
	writer: SheetWriter<S>,
}

impl<F: ReviewFeed, S: SpreadsheetApi> ReviewJob<F, S> {
	pub fn new(app_id: String, fetcher: ReviewFetcher<F>, writer: SheetWriter<S>) -> Self {
		Self {
			app_id,
			fetcher,
			writer,
		}
	}

	pub async fn execute(&self) -> Result<usize, JobError> {
		let records = self.fetcher.fetch_all(&self.app_id, None).await?;
		self.writer.replace(&records).await?;
		Ok(records.len())
	}

	/// Runs the job and records the outcome on `status`. The error is returned as well.
	pub async fn run(&self, status: &mut JobStatus) -> Result<usize, JobError> {
		let run_id = status.start();
		info!("Starting review job {} for {}", run_id, &self.app_id);

		match self.execute().await {
			Ok(rows) => {
				status.succeed(rows);
				info!("Job {} completed successfully, {} reviews written", run_id, rows);
				Ok(rows)
			}
			Err(e) => {
				status.fail(e.to_string());
				error!("Job {} failed: {}", run_id, e);
				Err(e)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::Status;
	use crate::services::review_fetcher::tests::FakeFeed;
	use crate::services::sheet_writer::tests::{Call, FakeSheet};
	use crate::services::SheetsError;

	fn job(feed: FakeFeed, sheet: FakeSheet) -> ReviewJob<FakeFeed, FakeSheet> {
		ReviewJob::new(
			"com.example.app".to_string(),
			ReviewFetcher::new(feed, "en".to_string(), "us".to_string()),
			SheetWriter::new(sheet, "Sheet1".to_string()),
		)
	}

	#[tokio::test]
	async fn success_writes_all_reviews_and_marks_status() {
		let job = job(FakeFeed::new(120, 100), FakeSheet::default());
		let mut status = JobStatus::default();

		let rows = job.run(&mut status).await.unwrap();
		assert_eq!(rows, 120);
		assert_eq!(status.last_status, Some(Status::Success));
		assert!(status.last_run.is_some());
		assert!(status.error_message.is_none());

		match job.writer_calls().last() {
			Some(Call::Update(_, values)) => assert_eq!(values.len(), 121),
			other => panic!("unexpected call {:?}", other),
		}
	}

	#[tokio::test]
	async fn feed_failure_skips_sheet_and_marks_failed() {
		let job = job(FakeFeed::new(300, 100).failing_on(1), FakeSheet::default());
		let mut status = JobStatus::default();

		let err = job.run(&mut status).await.unwrap_err();
		assert!(matches!(err, JobError::Feed(_)));
		assert_eq!(status.last_status, Some(Status::Failed));
		assert!(status.error_message.unwrap().contains("HTTP 500"));
		assert!(job.writer_calls().is_empty());
	}

	#[tokio::test]
	async fn sheet_failure_message_reaches_status() {
		let sheet = FakeSheet {
			probe_error: Some(|| SheetsError::PermissionDenied {
				identity: "sync@proj.iam.gserviceaccount.com".to_string(),
				spreadsheet_id: "abc".to_string(),
			}),
			..Default::default()
		};
		let job = job(FakeFeed::new(3, 100), sheet);
		let mut status = JobStatus::default();

		job.run(&mut status).await.unwrap_err();
		assert_eq!(status.last_status, Some(Status::Failed));
		assert!(status
			.error_message
			.unwrap()
			.contains("sync@proj.iam.gserviceaccount.com"));
	}

	impl ReviewJob<FakeFeed, FakeSheet> {
		fn writer_calls(&self) -> Vec<Call> {
			self.writer.api().calls()
		}
	}
}
