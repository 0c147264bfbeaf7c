//! `appsettings`-style JSON loader for the `ZohoCliq` and `TokenCache` sections.
//!
//! Unknown keys (API keys, logging sections, and so on) are ignored so the gateway can keep a
//! single configuration document for every collaborator.

// std
use std::{fs, path::Path};
// self
use crate::{
	_prelude::*,
	config::{CacheSettings, Credentials, DEFAULT_ACCOUNTS_URL},
	error::ConfigError,
};

/// Root of the configuration document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CliqConfig {
	/// OAuth client section (`"ZohoCliq"`).
	pub zoho_cliq: CliqSection,
	/// Optional cache tuning section (`"TokenCache"`).
	#[serde(default)]
	pub token_cache: TokenCacheSection,
}
impl CliqConfig {
	/// Parses a configuration document from a JSON string.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(de).map_err(|source| ConfigError::Parse { source })
	}

	/// Reads and parses a configuration document from disk.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let raw = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

		Self::from_json_str(&raw)
	}

	/// Validates the document and splits it into credentials and cache settings.
	pub fn into_parts(self) -> Result<(Credentials, CacheSettings), ConfigError> {
		let section = self.zoho_cliq;
		let mut builder = Credentials::builder(section.client_id, section.client_secret)
			.accounts_url(section.accounts_url);

		if let Some(refresh_token) = section.refresh_token {
			builder = builder.refresh_token(refresh_token);
		}
		if let Some(redirect_uri) = section.redirect_uri {
			builder = builder.redirect_uri(redirect_uri);
		}
		if let Some(scope) = section.scope {
			builder = builder.scope(scope);
		}

		let credentials = builder.build()?;
		let settings = self.token_cache.into_settings()?;

		Ok((credentials, settings))
	}
}

/// `"ZohoCliq"` section carrying the OAuth client registration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CliqSection {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: String,
	/// Long-lived refresh token.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Redirect URI registered with the provider.
	#[serde(default)]
	pub redirect_uri: Option<String>,
	/// Scope string requested on the consent screen.
	#[serde(default)]
	pub scope: Option<String>,
	/// Accounts server base URL (token endpoint base).
	#[serde(default = "default_accounts_url")]
	pub accounts_url: String,
}
impl Debug for CliqSection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CliqSection")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.field("accounts_url", &self.accounts_url)
			.finish()
	}
}

/// `"TokenCache"` section; every field falls back to [`CacheSettings::default`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TokenCacheSection {
	/// Expiry skew in seconds.
	pub skew_seconds: Option<i64>,
	/// Fallback lifetime in seconds when `expires_in` is absent.
	pub default_expires_in_seconds: Option<i64>,
	/// Per-request timeout in seconds.
	pub request_timeout_seconds: Option<u64>,
}
impl TokenCacheSection {
	fn into_settings(self) -> Result<CacheSettings, ConfigError> {
		let mut settings = CacheSettings::default();

		if let Some(secs) = self.skew_seconds {
			settings = settings.with_skew(Duration::seconds(secs));
		}
		if let Some(secs) = self.default_expires_in_seconds {
			settings = settings.with_default_expires_in(Duration::seconds(secs));
		}
		if let Some(secs) = self.request_timeout_seconds {
			settings = settings.with_request_timeout(StdDuration::from_secs(secs));
		}

		settings.validate()?;

		Ok(settings)
	}
}

fn default_accounts_url() -> String {
	DEFAULT_ACCOUNTS_URL.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const DOCUMENT: &str = r#"{
		"secretKey": "gateway-api-key",
		"ZohoCliq": {
			"ClientId": "1000.ABC",
			"ClientSecret": "shh",
			"RefreshToken": "1000.refresh",
			"RedirectUri": "https://gateway.example.com/api/Auth/callback",
			"Scope": "ZohoCliq.Webhooks.CREATE,ZohoCliq.Messages.ALL"
		},
		"TokenCache": { "SkewSeconds": 120, "RequestTimeoutSeconds": 5 }
	}"#;

	#[test]
	fn parses_appsettings_layout() {
		let (credentials, settings) = CliqConfig::from_json_str(DOCUMENT)
			.expect("Configuration fixture should parse.")
			.into_parts()
			.expect("Configuration fixture should validate.");

		assert_eq!(credentials.client_id, "1000.ABC");
		assert_eq!(credentials.token_endpoint.as_str(), "https://accounts.zoho.in/oauth/v2/token");
		assert_eq!(
			credentials.scope.as_deref(),
			Some("ZohoCliq.Webhooks.CREATE,ZohoCliq.Messages.ALL")
		);
		assert_eq!(settings.skew, Duration::seconds(120));
		assert_eq!(settings.default_expires_in, CacheSettings::DEFAULT_EXPIRES_IN);
		assert_eq!(settings.request_timeout, StdDuration::from_secs(5));
	}

	#[test]
	fn missing_token_cache_section_uses_defaults() {
		let raw = r#"{ "ZohoCliq": { "ClientId": "id", "ClientSecret": "secret" } }"#;
		let (credentials, settings) = CliqConfig::from_json_str(raw)
			.expect("Minimal configuration should parse.")
			.into_parts()
			.expect("Minimal configuration should validate.");

		assert!(credentials.refresh_token.is_none());
		assert!(credentials.redirect_uri.is_none());
		assert_eq!(settings, CacheSettings::default());
	}

	#[test]
	fn parse_errors_report_the_failing_path() {
		let raw = r#"{ "ZohoCliq": { "ClientId": 42, "ClientSecret": "secret" } }"#;
		let err = CliqConfig::from_json_str(raw).expect_err("Numeric client id should fail.");

		match err {
			ConfigError::Parse { source } => assert_eq!(source.path().to_string(), "ZohoCliq.ClientId"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn reading_a_missing_file_fails_with_path() {
		let err = CliqConfig::from_path("/definitely/not/here/appsettings.json")
			.expect_err("Missing file should fail.");

		assert!(matches!(err, ConfigError::Read { .. }));
	}
}
