//! Immutable credentials and cache settings supplied once at process start.
//!
//! [`Credentials`] carries everything the token endpoint needs (client id/secret, the
//! long-lived refresh token, redirect URI, endpoints) and is validated by
//! [`CredentialsBuilder`]. [`CacheSettings`] holds the tunable timing knobs. Both can be
//! assembled by hand or loaded from an `appsettings`-style JSON document through
//! [`CliqConfig`].

pub mod file;
pub mod settings;

pub use file::*;
pub use settings::*;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Accounts server used when no base URL is configured.
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.zoho.in";
/// Token endpoint path relative to the accounts base URL.
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth/v2/token";
/// Consent (authorization) endpoint path relative to the accounts base URL.
pub const AUTHORIZATION_ENDPOINT_PATH: &str = "/oauth/v2/auth";

/// Errors raised while assembling [`Credentials`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// Client identifier is absent or blank.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Client secret is absent or blank.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// A configured URL cannot be parsed.
	#[error("The {field} URL is invalid: {source}.")]
	InvalidUrl {
		/// Which URL failed validation.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A configured URL uses a scheme other than HTTP(S).
	#[error("The {field} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which URL failed validation.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
}

/// Immutable OAuth client credentials and endpoints.
///
/// Secrets are wrapped in [`TokenSecret`] so formatting a `Credentials` value never leaks them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: TokenSecret,
	/// Long-lived refresh token; `None` when the deployment has not been consented yet.
	pub refresh_token: Option<TokenSecret>,
	/// Redirect URI registered with the provider (required for code exchange).
	pub redirect_uri: Option<Url>,
	/// Scope string requested on the consent screen.
	pub scope: Option<String>,
	/// Endpoint receiving `refresh_token` and `authorization_code` grants.
	pub token_endpoint: Url,
	/// Consent endpoint that issues authorization codes.
	pub authorization_endpoint: Url,
}
impl Credentials {
	/// Creates a builder for the provided client id/secret pair.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> CredentialsBuilder {
		CredentialsBuilder::new(client_id, client_secret)
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.field("refresh_token_set", &self.refresh_token.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("scope", &self.scope)
			.field("token_endpoint", &self.token_endpoint)
			.field("authorization_endpoint", &self.authorization_endpoint)
			.finish()
	}
}

/// Builder for [`Credentials`].
#[derive(Debug)]
pub struct CredentialsBuilder {
	client_id: String,
	client_secret: TokenSecret,
	refresh_token: Option<TokenSecret>,
	redirect_uri: Option<String>,
	scope: Option<String>,
	accounts_url: String,
}
impl CredentialsBuilder {
	fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			refresh_token: None,
			redirect_uri: None,
			scope: None,
			accounts_url: DEFAULT_ACCOUNTS_URL.into(),
		}
	}

	/// Sets the long-lived refresh token. Blank values are treated as absent.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = non_blank(token.into()).map(TokenSecret::new);

		self
	}

	/// Sets the redirect URI registered with the provider.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = non_blank(uri.into());

		self
	}

	/// Sets the scope string requested on the consent screen.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = non_blank(scope.into());

		self
	}

	/// Overrides the accounts server base URL (`token_endpoint_base_url`).
	pub fn accounts_url(mut self, base: impl Into<String>) -> Self {
		self.accounts_url = base.into();

		self
	}

	/// Consumes the builder and validates the resulting credentials.
	pub fn build(self) -> Result<Credentials, CredentialsError> {
		if self.client_id.trim().is_empty() {
			return Err(CredentialsError::MissingClientId);
		}
		if self.client_secret.expose().trim().is_empty() {
			return Err(CredentialsError::MissingClientSecret);
		}

		let base = parse_url("accounts", self.accounts_url.trim())?;
		let token_endpoint = join_endpoint(&base, TOKEN_ENDPOINT_PATH, "token")?;
		let authorization_endpoint =
			join_endpoint(&base, AUTHORIZATION_ENDPOINT_PATH, "authorization")?;
		let redirect_uri =
			self.redirect_uri.as_deref().map(|raw| parse_url("redirect", raw)).transpose()?;

		Ok(Credentials {
			client_id: self.client_id,
			client_secret: self.client_secret,
			refresh_token: self.refresh_token,
			redirect_uri,
			scope: self.scope,
			token_endpoint,
			authorization_endpoint,
		})
	}
}

fn non_blank(value: String) -> Option<String> {
	if value.trim().is_empty() { None } else { Some(value) }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, CredentialsError> {
	let url = Url::parse(raw).map_err(|source| CredentialsError::InvalidUrl { field, source })?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(CredentialsError::UnsupportedScheme { field, url: url.to_string() }),
	}
}

// Appends `path` to whatever path the base already carries, so reverse-proxied
// accounts servers (`https://proxy/zoho`) keep their prefix.
fn join_endpoint(
	base: &Url,
	path: &str,
	field: &'static str,
) -> Result<Url, CredentialsError> {
	let joined = format!("{}{path}", base.as_str().trim_end_matches('/'));

	parse_url(field, &joined)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_derives_endpoints_from_accounts_url() {
		let credentials = Credentials::builder("client", "secret")
			.accounts_url("https://accounts.example.com/")
			.refresh_token("rt")
			.redirect_uri("https://gateway.example.com/api/auth/callback")
			.build()
			.expect("Credentials fixture should build.");

		assert_eq!(credentials.token_endpoint.as_str(), "https://accounts.example.com/oauth/v2/token");
		assert_eq!(
			credentials.authorization_endpoint.as_str(),
			"https://accounts.example.com/oauth/v2/auth"
		);
		assert_eq!(credentials.refresh_token.as_ref().map(TokenSecret::expose), Some("rt"));
	}

	#[test]
	fn builder_keeps_proxy_prefix() {
		let credentials = Credentials::builder("client", "secret")
			.accounts_url("http://127.0.0.1:8080/zoho")
			.build()
			.expect("Credentials fixture should build.");

		assert_eq!(credentials.token_endpoint.as_str(), "http://127.0.0.1:8080/zoho/oauth/v2/token");
	}

	#[test]
	fn blank_refresh_token_is_treated_as_absent() {
		let credentials = Credentials::builder("client", "secret")
			.refresh_token("   ")
			.build()
			.expect("Credentials fixture should build.");

		assert!(credentials.refresh_token.is_none());
		assert_eq!(credentials.token_endpoint.as_str(), "https://accounts.zoho.in/oauth/v2/token");
	}

	#[test]
	fn builder_rejects_missing_secrets_and_bad_urls() {
		assert_eq!(
			Credentials::builder("", "secret").build().expect_err("Blank id should fail."),
			CredentialsError::MissingClientId
		);
		assert_eq!(
			Credentials::builder("client", " ").build().expect_err("Blank secret should fail."),
			CredentialsError::MissingClientSecret
		);

		let err = Credentials::builder("client", "secret")
			.accounts_url("ftp://accounts.example.com")
			.build()
			.expect_err("Non-HTTP schemes should fail.");

		assert!(matches!(err, CredentialsError::UnsupportedScheme { field: "accounts", .. }));

		let err = Credentials::builder("client", "secret")
			.redirect_uri("not a url")
			.build()
			.expect_err("Unparseable redirect should fail.");

		assert!(matches!(err, CredentialsError::InvalidUrl { field: "redirect", .. }));
	}

	#[test]
	fn debug_output_redacts_secrets() {
		let credentials = Credentials::builder("client", "very-secret")
			.refresh_token("long-lived")
			.build()
			.expect("Credentials fixture should build.");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("very-secret"));
		assert!(!rendered.contains("long-lived"));
		assert!(rendered.contains("refresh_token_set: true"));
	}
}
