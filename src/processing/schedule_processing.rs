use chrono::Local;
use log::{info, warn};
use std::error::Error;
use tokio::time::sleep;

use crate::config::Config;
use crate::models::JobStatus;
use crate::processing::build_review_job;
use crate::utils::next_run_after;

/// Runs the review job every day at `SCHEDULE_TIME` local time. Runs never overlap.
pub async fn schedule_processing(config: &Config) -> Result<(), Box<dyn Error>> {
	let job = build_review_job(config, config.sheet()?)?;
	let mut status = JobStatus::default();

	if config.run_on_start {
		if job.run(&mut status).await.is_err() {
			warn!("Start-up run failed, next attempt at the scheduled slot");
		}
		info!("{}", status.summary());
	}

	loop {
		let now = Local::now();
		let next = next_run_after(&now, config.schedule_time);
		info!("Next review job at {}", next.format("%Y-%m-%d %H:%M:%S"));

		let wait = (next - now).to_std().unwrap_or_default();
		sleep(wait).await;

		if job.run(&mut status).await.is_err() {
			warn!("Scheduled run failed, retrying at the next slot");
		}
		info!("{}", status.summary());
	}
}
