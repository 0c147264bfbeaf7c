//! Optional observability helpers for token-cache flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `cliq_token_cache.flow` with the `flow`
//!   (grant) and `stage` (call site) fields, plus debug/warn events for upstream calls and
//!   failures.
//! - Enable `metrics` to increment the `cliq_token_cache_flow_total` counter for every
//!   attempt/cache hit/success/failure, labeled by `flow` + `outcome`, and to record each
//!   token-endpoint round trip in the `cliq_token_cache_upstream_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Token-cache flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Access-token lookups and refresh-token grants.
	Refresh,
	/// One-time authorization code exchange.
	AuthorizationCode,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Refresh => "refresh",
			FlowKind::AuthorizationCode => "authorization_code",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Upstream call about to be made.
	Attempt,
	/// Request served from the cached token without an upstream call.
	CacheHit,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::CacheHit => "cache_hit",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
