// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by token-cache flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("cliq_token_cache.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event right before a token-endpoint request is dispatched.
pub fn upstream_call(kind: FlowKind, endpoint: &Url) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), endpoint = %endpoint, "calling token endpoint");

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, endpoint);
}

/// Emits a debug event once a new access token has been stored.
pub fn token_stored(kind: FlowKind, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	tracing::debug!(flow = kind.as_str(), %expires_at, "access token stored");

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, expires_at);
}

/// Emits a warning describing a failed flow; secrets never reach the message.
pub fn flow_failed(kind: FlowKind, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		flow = kind.as_str(),
		retryable = error.is_retryable(),
		error = %error,
		"token flow failed"
	);

	#[cfg(not(feature = "tracing"))]
	let _ = (kind, error);
}
