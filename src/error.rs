//! Token-cache error taxonomy shared by configuration, transport, and flows.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, config::CredentialsError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by [`TokenCache`](crate::cache::TokenCache) operations.
///
/// Expected failure modes are always returned, never panicked. Use [`Error::is_retryable`] to
/// decide whether a bounded retry makes sense.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Network failure reaching the token endpoint.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with a success status but an unusable payload.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponse),

	/// A credential required by the operation is absent from configuration.
	#[error("Required credential `{field}` is not configured.")]
	NotConfigured {
		/// Configuration field that is missing.
		field: &'static str,
	},
	/// Token endpoint answered with a non-success HTTP status.
	#[error("Token endpoint rejected the request with HTTP {status}: {body}")]
	UpstreamRejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Truncated response body kept for diagnostics.
		body: String,
	},
	/// Authorization code exchange was called without a code.
	#[error("Authorization code is missing.")]
	MissingAuthorizationCode,
	/// The `state` returned to the consent callback does not match the issued one.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}
impl Error {
	/// Returns `true` when a later attempt may succeed without human intervention.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transport(_) | Self::UpstreamRejected { .. })
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] CredentialsError),
	/// Configuration document could not be read.
	#[error("Unable to read configuration file `{}`.", .path.display())]
	Read {
		/// Path that failed to load.
		path: PathBuf,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration document is not valid JSON for the expected layout.
	#[error("Configuration document is invalid at `{}`.", .source.path())]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A cache setting is outside its supported range.
	#[error("Setting `{field}` is invalid: {reason}.")]
	InvalidSetting {
		/// Setting name.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Payload problems detected after the token endpoint answered successfully.
#[derive(Debug, ThisError)]
pub enum MalformedResponse {
	/// Body is not JSON or does not match the token response layout.
	#[error("Token endpoint returned malformed JSON.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// `access_token` is absent or empty.
	#[error("Token endpoint returned no access token{}.", upstream_hint(.upstream_error))]
	MissingAccessToken {
		/// OAuth `error` field, when the provider sent one alongside a success status.
		upstream_error: Option<String>,
	},
	/// `refresh_token` is absent or empty in an authorization-code response.
	#[error("Token endpoint returned no refresh token{}.", upstream_hint(.upstream_error))]
	MissingRefreshToken {
		/// OAuth `error` field, when the provider sent one alongside a success status.
		upstream_error: Option<String>,
	},
	/// `expires_in` is zero or negative.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// `expires_in` cannot be represented as an expiry instant.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Transport-level failures (network, IO, timeouts).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the configured timeout.
	#[error("Request timed out while calling the token endpoint.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport failed in a way it could only describe as text.
	#[error("HTTP client error occurred while calling the token endpoint: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}

fn upstream_hint(upstream_error: &Option<String>) -> String {
	match upstream_error {
		Some(code) => format!(" (provider error: {code})"),
		None => String::new(),
	}
}
