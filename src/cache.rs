//! The process-wide access-token cache.
//!
//! [`TokenCache`] owns the immutable [`Credentials`], the HTTP transport, and the single mutable
//! [`TokenState`]. Clones share all of them, so one cache can be handed to every request handler.
//! Lookups read the state under a short lock; misses funnel through one async guard so concurrent
//! callers coalesce into a single upstream refresh.

mod authorization;
mod metrics;
mod refresh;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{IssuedTokens, TokenState, TokenStatus},
	clock::{Clock, SystemClock},
	config::{CacheSettings, Credentials},
	http::TokenHttpClient,
	oauth::TransportErrorMapper,
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

/// Cache specialized for the crate's default reqwest transport stack.
#[cfg(feature = "reqwest")]
pub type ReqwestTokenCache = TokenCache<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Holds the current access token and refreshes it on demand.
pub struct TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	credentials: Arc<Credentials>,
	settings: CacheSettings,
	http_client: Arc<C>,
	transport_mapper: Arc<M>,
	clock: Arc<dyn Clock>,
	state: Arc<RwLock<Option<Arc<TokenState>>>>,
	issued: Arc<RwLock<Option<IssuedTokens>>>,
	refresh_guard: Arc<AsyncMutex<()>>,
	metrics: Arc<RefreshMetrics>,
}
impl<C, M> TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an empty cache that reuses the caller-provided transport + mapper pair.
	///
	/// `settings` are validated here so a bad local value never surfaces later as an upstream
	/// payload error.
	pub fn with_http_client(
		credentials: Credentials,
		settings: CacheSettings,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		settings.validate()?;

		Ok(Self {
			credentials: Arc::new(credentials),
			settings,
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			clock: Arc::new(SystemClock),
			state: Default::default(),
			issued: Default::default(),
			refresh_guard: Default::default(),
			metrics: Default::default(),
		})
	}

	/// Replaces the time source used for expiry checks and `issued_at` stamps.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Credentials the cache was built with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Timing knobs the cache was built with.
	pub fn settings(&self) -> &CacheSettings {
		&self.settings
	}

	/// Expiry of the cached token, or `None` before the first successful refresh.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.state.read().as_ref().map(|state| state.expires_at)
	}

	/// Lifecycle status of the cached token at the clock's current instant.
	pub fn status(&self) -> TokenStatus {
		match self.current_state() {
			Some(state) => state.status_at(self.clock.now(), self.settings.skew),
			None => TokenStatus::Empty,
		}
	}

	/// Pair returned by the most recent successful authorization-code exchange.
	pub fn issued_tokens(&self) -> Option<IssuedTokens> {
		self.issued.read().clone()
	}

	/// Counters shared by every clone of this cache.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	fn current_state(&self) -> Option<Arc<TokenState>> {
		self.state.read().clone()
	}

	fn store_state(&self, state: TokenState) {
		*self.state.write() = Some(Arc::new(state));
	}
}
#[cfg(feature = "reqwest")]
impl TokenCache<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a cache backed by a reqwest client bounded by `settings.request_timeout`.
	pub fn new(credentials: Credentials, settings: CacheSettings) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(settings.request_timeout)?;

		Self::with_http_client(
			credentials,
			settings,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			credentials: self.credentials.clone(),
			settings: self.settings,
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			clock: self.clock.clone(),
			state: self.state.clone(),
			issued: self.issued.clone(),
			refresh_guard: self.refresh_guard.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<C, M> Debug for TokenCache<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("credentials", &self.credentials)
			.field("settings", &self.settings)
			.field("expires_at", &self.expires_at())
			.field("issued_tokens_set", &self.issued.read().is_some())
			.finish()
	}
}
