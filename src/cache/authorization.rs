//! One-time consent setup: the consent URL and the `authorization_code` exchange.
//!
//! The exchanged pair is kept apart from the cached access token. Operators read the refresh
//! token through [`TokenCache::issued_tokens`] and copy it into configuration.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationRequest, IssuedTokens, authorization},
	cache::TokenCache,
	http::TokenHttpClient,
	oauth::{self, GrantType, TokenGrant, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const KIND: FlowKind = FlowKind::AuthorizationCode;

impl<C, M> TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the consent URL (with a fresh `state`) for the configured redirect URI.
	pub fn authorization_request(&self) -> Result<AuthorizationRequest> {
		let redirect_uri = self
			.credentials
			.redirect_uri
			.as_ref()
			.ok_or(Error::NotConfigured { field: "redirect_uri" })?;

		Ok(authorization::build_authorization_request(&self.credentials, redirect_uri))
	}

	/// Exchanges a consent `code` for an access/refresh token pair.
	///
	/// An empty `code` fails before any network call. The cached access token is left alone; the
	/// pair is only retained for [`TokenCache::issued_tokens`].
	pub async fn exchange_authorization_code(&self, code: &str) -> Result<IssuedTokens> {
		let span = FlowSpan::new(KIND, "exchange_authorization_code");

		span.instrument(async move {
			obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

			match self.request_code_exchange(code).await {
				Ok(tokens) => {
					*self.issued.write() = Some(tokens.clone());
					obs::record_flow_outcome(KIND, FlowOutcome::Success);

					Ok(tokens)
				},
				Err(err) => {
					obs::flow_failed(KIND, &err);
					obs::record_flow_outcome(KIND, FlowOutcome::Failure);

					Err(err)
				},
			}
		})
		.await
	}

	async fn request_code_exchange(&self, code: &str) -> Result<IssuedTokens> {
		if code.trim().is_empty() {
			return Err(Error::MissingAuthorizationCode);
		}

		let redirect_uri = self
			.credentials
			.redirect_uri
			.as_ref()
			.ok_or(Error::NotConfigured { field: "redirect_uri" })?;
		let request = oauth::build_token_request(
			&self.credentials,
			TokenGrant::AuthorizationCode { code, redirect_uri },
		)?;
		let response = self.dispatch(KIND, GrantType::AuthorizationCode, request).await?;
		let grant = oauth::parse_code_response(&response)?;

		Ok(IssuedTokens {
			access_token: grant.access_token,
			refresh_token: grant.refresh_token,
			issued_at: self.clock.now(),
		})
	}
}
