use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::error_body;
use crate::models::ServiceAccountKey;
use crate::services::SheetsError;

pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	iss: String,
	scope: String,
	aud: String,
	iat: i64,
	exp: i64,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
	access_token: String,
	expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
	value: String,
	expires_at: DateTime<Utc>,
}

/// Exchanges a signed service-account assertion for OAuth access tokens.
pub struct TokenProvider {
	client: Client,
	key: ServiceAccountKey,
	encoding_key: EncodingKey,
	cached: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenProvider {
	/// Fails on an unusable RSA key, so a bad credential never reaches the network.
	pub fn new(client: Client, key: ServiceAccountKey) -> Result<Self, SheetsError> {
		let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
		Ok(Self {
			client,
			key,
			encoding_key,
			cached: Arc::new(Mutex::new(None)),
		})
	}

	pub fn identity(&self) -> &str {
		&self.key.client_email
	}

	fn assertion(&self, now: DateTime<Utc>) -> Result<String, SheetsError> {
		let claims = Claims {
			iss: self.key.client_email.clone(),
			scope: SHEETS_SCOPE.to_string(),
			aud: self.key.token_uri.clone(),
			iat: now.timestamp(),
			exp: now.timestamp() + TOKEN_LIFETIME_SECS,
		};
		let mut header = Header::new(Algorithm::RS256);
		header.kid = self.key.private_key_id.clone();

		Ok(encode(&header, &claims, &self.encoding_key)?)
	}

	pub async fn access_token(&self) -> Result<String, SheetsError> {
		let mut guard = self.cached.lock().await;
		let now = Utc::now();

		if let Some(token) = guard.as_ref() {
			if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
				return Ok(token.value.clone());
			}
		}

		debug!("Requesting access token for {}", self.identity());
		let form = [
			("grant_type", JWT_BEARER_GRANT.to_string()),
			("assertion", self.assertion(now)?),
		];
		let response = self
			.client
			.post(&self.key.token_uri)
			.form(&form)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			return Err(SheetsError::Token {
				status: status.as_u16(),
				body: error_body(response.text().await),
			});
		}

		let token: AccessToken = response.json().await?;
		let expires_at = now + Duration::seconds(token.expires_in.unwrap_or(TOKEN_LIFETIME_SECS));
		*guard = Some(CachedToken {
			value: token.access_token.clone(),
			expires_at,
		});

		Ok(token.access_token)
	}
}
