//! Transport primitives for token-endpoint calls.
//!
//! [`TokenHttpClient`] is the cache's only dependency on an HTTP stack. Requests and responses
//! use the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] aliases (plain `http` types), so a
//! custom transport never needs to know about reqwest. Failures are reported as
//! [`HttpClientError`] and turned into [`Error`] values by a
//! [`TransportErrorMapper`](crate::oauth::TransportErrorMapper).

// crates.io
pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};

// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`TokenHttpClient::execute`].
pub type HttpFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports able to POST token requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// clone of a cache. The returned future must resolve once the full response body has been
/// read; the cache inspects status and body itself. Non-success statuses are responses, not
/// errors.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` and returns the buffered response.
	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly, so redirects are never followed. Every request is bounded
/// by the timeout passed to [`ReqwestHttpClient::with_timeout`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`]. The caller owns its timeout/redirect policy.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that gives up after `timeout` and never follows redirects.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = reqwest::Request::try_from(request)
				.map_err(|e| HttpClientError::Reqwest(Box::new(e)))?;
			let response =
				client.execute(request).await.map_err(|e| HttpClientError::Reqwest(Box::new(e)))?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body =
				response.bytes().await.map_err(|e| HttpClientError::Reqwest(Box::new(e)))?;
			let mut buffered = HttpResponse::new(body.to_vec());

			*buffered.status_mut() = status;
			*buffered.headers_mut() = headers;

			Ok(buffered)
		})
	}
}
