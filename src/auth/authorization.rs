//! Consent-screen URL construction for the one-time `authorization_code` setup.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, config::Credentials};

const STATE_LEN: usize = 32;

/// Consent URL plus the opaque `state` that must round-trip through the callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Fully-formed consent URL operators open in a browser.
	pub url: Url,
	/// Opaque CSRF value embedded in `url`.
	pub state: String,
}
impl AuthorizationRequest {
	/// Validates the `state` parameter returned to the redirect handler.
	pub fn validate_state(&self, returned_state: &str) -> Result<()> {
		if returned_state == self.state { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

/// Builds an offline-access consent URL for `credentials`, using `redirect_uri` as the callback.
pub(crate) fn build_authorization_request(
	credentials: &Credentials,
	redirect_uri: &Url,
) -> AuthorizationRequest {
	let state = random_state(STATE_LEN);
	let mut url = credentials.authorization_endpoint.clone();
	let mut pairs = url.query_pairs_mut();

	if let Some(scope) = credentials.scope.as_deref() {
		pairs.append_pair("scope", scope);
	}

	pairs.append_pair("client_id", &credentials.client_id);
	pairs.append_pair("response_type", "code");
	pairs.append_pair("access_type", "offline");
	pairs.append_pair("redirect_uri", redirect_uri.as_str());
	pairs.append_pair("state", &state);

	drop(pairs);

	AuthorizationRequest { url, state }
}

fn random_state(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}
