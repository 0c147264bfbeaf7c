// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Counter incremented once per flow outcome, labeled by `flow` + `outcome`.
pub const FLOW_TOTAL: &str = "cliq_token_cache_flow_total";
/// Histogram of token-endpoint round trips in seconds, labeled by `flow`.
pub const UPSTREAM_SECONDS: &str = "cliq_token_cache_upstream_seconds";

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(FLOW_TOTAL, "flow" => kind.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how long a token-endpoint call took, whether or not it succeeded.
pub fn record_upstream_latency(kind: FlowKind, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(UPSTREAM_SECONDS, "flow" => kind.as_str())
			.record(elapsed.as_secs_f64());
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, elapsed);
	}
}
