//! Access-token lookups and `refresh_token` grants.
//!
//! [`TokenCache::access_token`] serves the cached token while `now + skew` is still before its
//! expiry. A miss takes the cache-wide refresh guard, re-reads the state (a concurrent caller may
//! already have refreshed it), and only then calls the token endpoint. A failed refresh never
//! touches the previously stored token.

// std
use std::time::Instant;
// self
use crate::{
	_prelude::*,
	auth::{TokenSecret, TokenState},
	cache::TokenCache,
	http::{HttpRequest, HttpResponse, TokenHttpClient},
	oauth::{self, GrantType, TokenGrant, TransportErrorMapper},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const KIND: FlowKind = FlowKind::Refresh;

impl<C, M> TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a usable access token, refreshing it first when the cached one is stale.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.fresh_token() {
			self.record_cache_hit();

			return Ok(token);
		}

		let span = FlowSpan::new(KIND, "access_token");

		span.instrument(async move {
			let _singleflight = self.refresh_guard.lock().await;

			if let Some(token) = self.fresh_token() {
				self.record_cache_hit();

				return Ok(token);
			}

			self.refresh_locked().await
		})
		.await
	}

	/// Forces a `refresh_token` grant even when the cached token is still valid.
	///
	/// Concurrent manual refreshes are serialized behind the same guard as
	/// [`TokenCache::access_token`], so each one reaches the token endpoint in turn.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		let span = FlowSpan::new(KIND, "refresh_access_token");

		span.instrument(async move {
			let _singleflight = self.refresh_guard.lock().await;

			self.refresh_locked().await
		})
		.await
	}

	/// Sends `request` through the transport, counting the call and mapping transport failures.
	pub(super) async fn dispatch(
		&self,
		kind: FlowKind,
		grant: GrantType,
		request: HttpRequest,
	) -> Result<HttpResponse> {
		obs::upstream_call(kind, &self.credentials.token_endpoint);
		self.metrics.record_upstream_call();

		let started = Instant::now();
		let result = self.http_client.execute(request).await;

		obs::record_upstream_latency(kind, started.elapsed());

		result.map_err(|err| self.transport_mapper.map_transport_error(grant, err))
	}

	fn fresh_token(&self) -> Option<TokenSecret> {
		let state = self.current_state()?;

		state
			.is_fresh_at(self.clock.now(), self.settings.skew)
			.then(|| state.access_token.clone())
	}

	fn record_cache_hit(&self) {
		self.metrics.record_cache_hit();
		obs::record_flow_outcome(KIND, FlowOutcome::CacheHit);
	}

	// Caller must hold `refresh_guard`.
	async fn refresh_locked(&self) -> Result<TokenSecret> {
		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_attempt();

		match self.request_refresh().await {
			Ok(state) => {
				let token = state.access_token.clone();

				obs::token_stored(KIND, state.expires_at);
				self.store_state(state);
				self.metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);

				Ok(token)
			},
			Err(err) => {
				self.metrics.record_failure();
				obs::flow_failed(KIND, &err);
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				Err(err)
			},
		}
	}

	async fn request_refresh(&self) -> Result<TokenState> {
		let refresh_token = self
			.credentials
			.refresh_token
			.as_ref()
			.filter(|secret| !secret.is_blank())
			.ok_or(Error::NotConfigured { field: "refresh_token" })?;
		let request =
			oauth::build_token_request(&self.credentials, TokenGrant::RefreshToken { refresh_token })?;
		let response = self.dispatch(KIND, GrantType::RefreshToken, request).await?;
		let grant = oauth::parse_refresh_response(&response, self.settings.default_expires_in)?;
		let state = TokenState::issue(grant.access_token, self.clock.now(), grant.expires_in)?;

		Ok(state)
	}
}
