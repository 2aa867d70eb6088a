use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
	#[error("review feed request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("review feed returned HTTP {status}: {body}")]
	Status { status: u16, body: String },
	#[error("could not parse review feed response: {0}")]
	Parse(String),
	#[error("review feed still had more pages after {0} requests")]
	PageCapExceeded(usize),
}

#[derive(Debug, Error)]
pub enum CredentialError {
	#[error("could not read service account file: {0}")]
	Io(#[from] std::io::Error),
	#[error("service account credential is not valid JSON: {0}")]
	Json(#[from] serde_json::Error),
	#[error("service account credential must be a JSON object")]
	NotAnObject,
	#[error("service account credential is missing required field `{0}`")]
	MissingField(&'static str),
	#[error("expected a service_account credential, got `{0}`")]
	WrongKind(String),
	#[error("service account private_key is not a PEM encoded key")]
	MalformedKey,
}

#[derive(Debug, Error)]
pub enum SheetsError {
	#[error(transparent)]
	Credential(#[from] CredentialError),
	#[error("could not sign access token request: {0}")]
	Signing(#[from] jsonwebtoken::errors::Error),
	#[error("token endpoint returned HTTP {status}: {body}")]
	Token { status: u16, body: String },
	#[error(
		"permission denied on spreadsheet {spreadsheet_id}: share it with {identity} as an Editor"
	)]
	PermissionDenied {
		identity: String,
		spreadsheet_id: String,
	},
	#[error("spreadsheet {spreadsheet_id} was not found, check GOOGLE_SHEETS_ID")]
	NotFound { spreadsheet_id: String },
	#[error("sheets API returned HTTP {status}: {body}")]
	Api { status: u16, body: String },
	#[error("sheets API request failed: {0}")]
	Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum JobError {
	#[error("fetching reviews failed: {0}")]
	Feed(#[from] FeedError),
	#[error("updating spreadsheet failed: {0}")]
	Sheets(#[from] SheetsError),
}
