//! Cached access-token state and the token pair issued by a consent exchange.

// self
use crate::{_prelude::*, auth::TokenSecret, error::MalformedResponse};

/// Lifecycle of the cache as observed at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// No refresh has succeeded yet.
	Empty,
	/// Cached token outlives `now + skew`.
	Valid,
	/// Cached token is inside the skew window or past its expiry.
	Expired,
}

/// Access token paired with the instant it stops being usable.
///
/// Both fields are always present; the cache swaps whole `TokenState` values so a token and
/// its expiry are never observed from different refreshes.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
	/// Bearer token for outbound platform calls.
	pub access_token: TokenSecret,
	/// Instant the refresh completed.
	pub issued_at: OffsetDateTime,
	/// Instant the provider considers the token expired.
	pub expires_at: OffsetDateTime,
}
impl TokenState {
	/// Builds a state that expires `expires_in` after `issued_at`.
	pub fn issue(
		access_token: TokenSecret,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Result<Self, MalformedResponse> {
		if !expires_in.is_positive() {
			return Err(MalformedResponse::NonPositiveExpiresIn);
		}

		let expires_at =
			issued_at.checked_add(expires_in).ok_or(MalformedResponse::ExpiresInOutOfRange)?;

		Ok(Self { access_token, issued_at, expires_at })
	}

	/// Returns `true` when `now + skew` is still strictly before the expiry.
	pub fn is_fresh_at(&self, now: OffsetDateTime, skew: Duration) -> bool {
		match now.checked_add(skew) {
			Some(deadline) => deadline < self.expires_at,
			None => false,
		}
	}

	/// Computes the lifecycle status at the provided instant.
	pub fn status_at(&self, now: OffsetDateTime, skew: Duration) -> TokenStatus {
		if self.is_fresh_at(now, skew) { TokenStatus::Valid } else { TokenStatus::Expired }
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("access_token", &self.access_token)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Token pair returned by the `authorization_code` grant.
///
/// The refresh token is what operators copy into configuration after the one-time consent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IssuedTokens {
	/// Short-lived access token minted alongside the refresh token.
	pub access_token: TokenSecret,
	/// Long-lived refresh token.
	pub refresh_token: TokenSecret,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn freshness_honors_skew() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let state = TokenState::issue(TokenSecret::new("tok"), issued, Duration::seconds(3600))
			.expect("State fixture should build.");
		let skew = Duration::seconds(60);

		assert_eq!(state.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(state.status_at(macros::datetime!(2025-01-01 00:58 UTC), skew), TokenStatus::Valid);
		// Exactly one skew before expiry is already stale.
		assert_eq!(
			state.status_at(macros::datetime!(2025-01-01 00:59 UTC), skew),
			TokenStatus::Expired
		);
		assert_eq!(
			state.status_at(macros::datetime!(2025-01-01 02:00 UTC), Duration::ZERO),
			TokenStatus::Expired
		);
	}

	#[test]
	fn short_lived_tokens_are_stale_immediately() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let state = TokenState::issue(TokenSecret::new("tok"), issued, Duration::seconds(5))
			.expect("State fixture should build.");

		assert!(!state.is_fresh_at(issued, Duration::seconds(60)));
		assert!(state.is_fresh_at(issued, Duration::ZERO));
	}

	#[test]
	fn issue_rejects_unusable_lifetimes() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);

		assert!(matches!(
			TokenState::issue(TokenSecret::new("tok"), issued, Duration::ZERO),
			Err(MalformedResponse::NonPositiveExpiresIn)
		));
		assert!(matches!(
			TokenState::issue(TokenSecret::new("tok"), issued, Duration::MAX),
			Err(MalformedResponse::ExpiresInOutOfRange)
		));
	}
}
