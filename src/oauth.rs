//! Token-endpoint wire format: form bodies, typed responses, and error classification.
//!
//! Upstream payloads are parsed into a permissive payload record through `serde_path_to_error`
//! and then validated into grant-specific records, so a missing or empty field becomes a
//! [`MalformedResponse`] at the boundary instead of a null value further in.

pub use oauth2;

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::Credentials,
	error::{ConfigError, MalformedResponse, TransportError},
	http::{HttpClientError, HttpRequest, HttpResponse},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const BODY_PREVIEW_LIMIT: usize = 256;

/// OAuth 2.0 grants issued against the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// One-time consent code exchange.
	AuthorizationCode,
	/// Refresh-token driven access-token renewal.
	RefreshToken,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Grant-specific parameters appended to the client credentials.
#[derive(Clone, Copy, Debug)]
pub(crate) enum TokenGrant<'a> {
	RefreshToken { refresh_token: &'a TokenSecret },
	AuthorizationCode { code: &'a str, redirect_uri: &'a Url },
}
impl TokenGrant<'_> {
	pub(crate) fn grant_type(&self) -> GrantType {
		match self {
			Self::RefreshToken { .. } => GrantType::RefreshToken,
			Self::AuthorizationCode { .. } => GrantType::AuthorizationCode,
		}
	}
}

/// Maps HTTP transport failures into crate [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a crate error.
	fn map_transport_error(&self, grant: GrantType, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, grant: GrantType, err: HttpClientError<ReqwestError>) -> Error {
		// Grant is reserved for provider-specific mappers.
		let _ = grant;

		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
		}
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_timeout() {
		return TransportError::timeout(err).into();
	}

	TransportError::network(err).into()
}

/// Raw token-endpoint JSON; every field optional so validation can name what is missing.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct TokenEndpointPayload {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	refresh_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(default)]
	error: Option<String>,
}

/// Validated `refresh_token` grant response.
#[derive(Debug)]
pub(crate) struct RefreshGrant {
	pub(crate) access_token: TokenSecret,
	pub(crate) expires_in: Duration,
}

/// Validated `authorization_code` grant response.
#[derive(Debug)]
pub(crate) struct CodeGrant {
	pub(crate) access_token: TokenSecret,
	pub(crate) refresh_token: TokenSecret,
}

/// Builds the form-encoded POST for `grant`.
pub(crate) fn build_token_request(
	credentials: &Credentials,
	grant: TokenGrant<'_>,
) -> Result<HttpRequest> {
	let mut form = form_urlencoded::Serializer::new(String::new());

	form.append_pair("grant_type", grant.grant_type().as_str());
	form.append_pair("client_id", &credentials.client_id);
	form.append_pair("client_secret", credentials.client_secret.expose());

	match grant {
		TokenGrant::RefreshToken { refresh_token } => {
			form.append_pair("refresh_token", refresh_token.expose());
		},
		TokenGrant::AuthorizationCode { code, redirect_uri } => {
			form.append_pair("redirect_uri", redirect_uri.as_str());
			form.append_pair("code", code);
		},
	}

	let request = Request::builder()
		.method(Method::POST)
		.uri(credentials.token_endpoint.as_str())
		.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
		.header(ACCEPT, "application/json")
		.body(form.finish().into_bytes())
		.map_err(ConfigError::from)?;

	Ok(request)
}

/// Validates a `refresh_token` grant response, defaulting a missing `expires_in`.
pub(crate) fn parse_refresh_response(
	response: &HttpResponse,
	default_expires_in: Duration,
) -> Result<RefreshGrant> {
	let payload = decode_success(response)?;
	let access_token = required_secret(payload.access_token, || {
		MalformedResponse::MissingAccessToken { upstream_error: payload.error.clone() }
	})?;
	let expires_in = payload.expires_in.map_or(default_expires_in, Duration::seconds);

	if !expires_in.is_positive() {
		return Err(MalformedResponse::NonPositiveExpiresIn.into());
	}

	Ok(RefreshGrant { access_token, expires_in })
}

/// Validates an `authorization_code` grant response; both tokens are required.
pub(crate) fn parse_code_response(response: &HttpResponse) -> Result<CodeGrant> {
	let payload = decode_success(response)?;
	let access_token = required_secret(payload.access_token, || {
		MalformedResponse::MissingAccessToken { upstream_error: payload.error.clone() }
	})?;
	let refresh_token = required_secret(payload.refresh_token, || {
		MalformedResponse::MissingRefreshToken { upstream_error: payload.error.clone() }
	})?;

	Ok(CodeGrant { access_token, refresh_token })
}

fn decode_success(response: &HttpResponse) -> Result<TokenEndpointPayload> {
	let status = response.status();

	if !status.is_success() {
		return Err(Error::UpstreamRejected {
			status: status.as_u16(),
			body: body_preview(response.body()),
		});
	}

	let de = &mut serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(de)
		.map_err(|source| MalformedResponse::Json { source }.into())
}

fn required_secret(
	value: Option<String>,
	missing: impl FnOnce() -> MalformedResponse,
) -> Result<TokenSecret> {
	match value.map(TokenSecret::new) {
		Some(secret) if !secret.is_blank() => Ok(secret),
		_ => Err(missing().into()),
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut buf = text.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
