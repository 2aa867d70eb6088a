mod api;
mod config;
mod models;
mod processing;
mod services;
mod utils;

use config::{Config, ProcessingType};
use dotenv::dotenv;
use log::{error, info};
use processing::{preview_processing, reviews_processing, schedule_processing};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv().ok();

	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "info");
	}
	env_logger::init();

	let config = match Config::init() {
		Ok(config) => config,
		Err(err) => {
			error!("🔥 Invalid configuration: {}", err);
			std::process::exit(1);
		}
	};

	info!(
		"PROCESSING_TYPE: {:?}, package: {}, sheet: {}",
		config.processing_type,
		&config.package_name,
		config
			.sheet
			.as_ref()
			.map(|s| s.spreadsheet_id.as_str())
			.unwrap_or("-")
	);

	match config.processing_type {
		ProcessingType::Reviews => {
			reviews_processing(&config).await?;
		}
		ProcessingType::Schedule => schedule_processing(&config).await?,
		ProcessingType::Preview => {
			preview_processing(&config).await?;
		}
	}

	Ok(())
}
