//! Timing knobs: expiry skew, fallback token lifetime, and the per-request timeout.

// self
use crate::{_prelude::*, error::ConfigError};

/// Tunable timing knobs for [`TokenCache`](crate::cache::TokenCache).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSettings {
	/// Safety margin subtracted from a token's expiry before it is considered stale.
	pub skew: Duration,
	/// Lifetime assumed when the token endpoint omits `expires_in`.
	pub default_expires_in: Duration,
	/// Upper bound for a single token-endpoint round trip.
	pub request_timeout: StdDuration,
}
impl CacheSettings {
	/// Default expiry skew (60 seconds).
	pub const DEFAULT_SKEW: Duration = Duration::seconds(60);
	/// Default lifetime used when `expires_in` is absent (3600 seconds).
	pub const DEFAULT_EXPIRES_IN: Duration = Duration::seconds(3600);
	/// Default request timeout (30 seconds).
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Overrides the expiry skew. Negative values clamp to zero.
	pub fn with_skew(mut self, skew: Duration) -> Self {
		self.skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Overrides the fallback lifetime used when `expires_in` is absent.
	pub fn with_default_expires_in(mut self, lifetime: Duration) -> Self {
		self.default_expires_in = lifetime;

		self
	}

	/// Overrides the per-request timeout.
	pub fn with_request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Checks that every knob is usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.default_expires_in.is_positive() {
			return Err(ConfigError::InvalidSetting {
				field: "default_expires_in",
				reason: "must be positive",
			});
		}
		if self.request_timeout.is_zero() {
			return Err(ConfigError::InvalidSetting {
				field: "request_timeout",
				reason: "must be non-zero",
			});
		}

		Ok(())
	}
}
impl Default for CacheSettings {
	fn default() -> Self {
		Self {
			skew: Self::DEFAULT_SKEW,
			default_expires_in: Self::DEFAULT_EXPIRES_IN,
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
		}
	}
}
