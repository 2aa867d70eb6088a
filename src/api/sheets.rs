use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use urlencoding::encode;

use crate::api::TokenProvider;
use crate::services::{SheetsError, SpreadsheetApi};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

lazy_static! {
	static ref EMAIL_RE: Regex = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateValuesResponse {
	updated_cells: Option<u64>,
}

/// Google Sheets v4 client for one spreadsheet, authenticated as a service account.
pub struct GoogleSheetsClient {
	client: Client,
	tokens: TokenProvider,
	spreadsheet_id: String,
	base_url: String,
}

/// First email address in an API error body.
fn extract_identity(detail: &str) -> Option<String> {
	EMAIL_RE
		.find(detail)
		.map(|m| m.as_str().trim_end_matches('.').to_string())
}

/// Body of a failed response, or why it could not be read.
pub fn error_body(body: Result<String, reqwest::Error>) -> String {
	body.unwrap_or_else(|e| format!("<could not read error body: {}>", e))
}

/// Maps a failed Sheets response onto an actionable error.
pub fn classify_failure(
	status: StatusCode,
	detail: String,
	spreadsheet_id: &str,
	fallback_identity: &str,
) -> SheetsError {
	match status {
		StatusCode::FORBIDDEN => SheetsError::PermissionDenied {
			identity: extract_identity(&detail).unwrap_or(fallback_identity.to_string()),
			spreadsheet_id: spreadsheet_id.to_string(),
		},
		StatusCode::NOT_FOUND => SheetsError::NotFound {
			spreadsheet_id: spreadsheet_id.to_string(),
		},
		_ => SheetsError::Api {
			status: status.as_u16(),
			body: detail,
		},
	}
}

impl GoogleSheetsClient {
	pub fn new(client: Client, tokens: TokenProvider, spreadsheet_id: String) -> Self {
		Self {
			client,
			tokens,
			spreadsheet_id,
			base_url: SHEETS_API_BASE.to_string(),
		}
	}

	fn values_url(&self, range: &str, suffix: &str) -> String {
		format!(
			"{}/{}/values/{}{}",
			&self.base_url,
			&self.spreadsheet_id,
			encode(range),
			suffix
		)
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, SheetsError> {
		let token = self.tokens.access_token().await?;
		let response = request.bearer_auth(token).send().await?;

		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let detail = error_body(response.text().await);
		warn!("Sheets API error {}: {}", status, &detail);
		Err(classify_failure(
			status,
			detail,
			&self.spreadsheet_id,
			self.tokens.identity(),
		))
	}
}

#[async_trait]
impl SpreadsheetApi for GoogleSheetsClient {
	async fn probe(&self) -> Result<(), SheetsError> {
		let url = format!("{}/{}", &self.base_url, &self.spreadsheet_id);
		let request = self
			.client
			.get(url)
			.query(&[("fields", "spreadsheetId,properties.title")]);

		let metadata: Value = self.send(request).await?.json().await?;
		debug!(
			"Spreadsheet {} is reachable: {}",
			&self.spreadsheet_id,
			metadata["properties"]["title"].as_str().unwrap_or("")
		);
		Ok(())
	}

	async fn clear_range(&self, range: &str) -> Result<(), SheetsError> {
		let request = self
			.client
			.post(self.values_url(range, ":clear"))
			.json(&json!({}));
		self.send(request).await?;
		Ok(())
	}

	async fn update_values(&self, range: &str, values: Vec<Vec<Value>>) -> Result<u64, SheetsError> {
		let body = json!({
			"range": range,
			"majorDimension": "ROWS",
			"values": values,
		});
		let request = self
			.client
			.put(self.values_url(range, ""))
			.query(&[("valueInputOption", "RAW")])
			.json(&body);

		let result: UpdateValuesResponse = self.send(request).await?.json().await?;
		Ok(result.updated_cells.unwrap_or(0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SHEET_ID: &str = "1AbCdEfGhIjK";
	const IDENTITY: &str = "sync@proj.iam.gserviceaccount.com";

	#[test]
	fn forbidden_names_identity_from_detail() {
		let detail = r#"{"error":{"code":403,"message":"The caller does not have permission. Share with other@proj.iam.gserviceaccount.com.","status":"PERMISSION_DENIED"}}"#;
		let err = classify_failure(StatusCode::FORBIDDEN, detail.to_string(), SHEET_ID, IDENTITY);
		assert!(matches!(err, SheetsError::PermissionDenied { .. }));
		let message = err.to_string();
		assert!(message.contains("other@proj.iam.gserviceaccount.com"), "{}", message);
		assert!(!message.contains("gserviceaccount.com."), "{}", message);
	}

	#[test]
	fn forbidden_without_email_falls_back_to_own_identity() {
		let detail = r#"{"error":{"code":403,"message":"The caller does not have permission"}}"#;
		let err = classify_failure(StatusCode::FORBIDDEN, detail.to_string(), SHEET_ID, IDENTITY);
		assert!(err.to_string().contains(IDENTITY));
	}

	#[test]
	fn not_found_names_spreadsheet_id() {
		let err = classify_failure(
			StatusCode::NOT_FOUND,
			"Requested entity was not found.".to_string(),
			SHEET_ID,
			IDENTITY,
		);
		assert!(matches!(err, SheetsError::NotFound { .. }));
		assert!(err.to_string().contains(SHEET_ID));
	}

	#[test]
	fn other_statuses_surface_as_is() {
		let err = classify_failure(StatusCode::BAD_REQUEST, "bad range".to_string(), SHEET_ID, IDENTITY);
		assert!(matches!(err, SheetsError::Api { status: 400, ref body } if body == "bad range"));
	}

	#[test]
	fn identity_extraction_strips_brackets_and_mailto() {
		assert_eq!(
			extract_identity("Share the sheet with <sync@proj.iam.gserviceaccount.com> first"),
			Some("sync@proj.iam.gserviceaccount.com".to_string())
		);
		assert_eq!(
			extract_identity("contact mailto:sync@proj.iam.gserviceaccount.com"),
			Some("sync@proj.iam.gserviceaccount.com".to_string())
		);
	}

	#[test]
	fn forbidden_with_bracketed_email_names_bare_identity() {
		let detail = "Share the sheet with <other@proj.iam.gserviceaccount.com> first";
		let err = classify_failure(StatusCode::FORBIDDEN, detail.to_string(), SHEET_ID, IDENTITY);
		let message = err.to_string();
		assert!(message.contains("with other@proj.iam.gserviceaccount.com as"), "{}", message);
		assert!(!message.contains('<'), "{}", message);
	}

	#[test]
	fn unreadable_error_body_keeps_the_read_error() {
		assert_eq!(error_body(Ok("quota exceeded".to_string())), "quota exceeded");

		let read_error = Client::new().get("not a url").build().unwrap_err();
		let body = error_body(Err(read_error));
		assert!(body.starts_with("<could not read error body: "), "{}", body);
		assert!(body.len() > "<could not read error body: >".len());
	}

	#[test]
	fn identity_extraction_ignores_non_emails() {
		assert_eq!(extract_identity("no email here @ all"), None);
		assert_eq!(
			extract_identity("grant access to 'a.b@c.iam.gserviceaccount.com'"),
			Some("a.b@c.iam.gserviceaccount.com".to_string())
		);
	}
}
