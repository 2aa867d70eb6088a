use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Running,
	Success,
	Failed,
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Status::Running => "Running",
			Status::Success => "Success",
			Status::Failed => "Failed",
		};
		f.write_str(s)
	}
}

/// Observable state of the last review job run. Owned by the trigger layer.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct JobStatus {
	pub run_id: Option<Uuid>,
	pub last_run: Option<DateTime<Utc>>,
	pub last_status: Option<Status>,
	pub error_message: Option<String>,
	pub rows_written: Option<usize>,
}

impl JobStatus {
	pub fn start(&mut self) -> Uuid {
		let run_id = Uuid::new_v4();
		self.run_id = Some(run_id);
		self.last_status = Some(Status::Running);
		run_id
	}

	pub fn succeed(&mut self, rows_written: usize) {
		self.last_run = Some(Utc::now());
		self.last_status = Some(Status::Success);
		self.error_message = None;
		self.rows_written = Some(rows_written);
	}

	pub fn fail(&mut self, message: String) {
		self.last_run = Some(Utc::now());
		self.last_status = Some(Status::Failed);
		self.error_message = Some(message);
		self.rows_written = None;
	}

	/// One-line summary in the shape the dashboard used to show.
	pub fn summary(&self) -> String {
		let last_run = self
			.last_run
			.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
			.unwrap_or("Never".to_string());
		let status = self
			.last_status
			.map(|s| s.to_string())
			.unwrap_or("Not Run".to_string());

		match &self.error_message {
			Some(err) => format!("Last Run: {} | Status: {} | Last Error: {}", last_run, status, err),
			None => format!("Last Run: {} | Status: {}", last_run, status),
		}
	}
}
