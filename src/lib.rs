//! Single-flight OAuth 2.0 access-token cache for gateways that call the Zoho Cliq platform on
//! behalf of one account: lazy expiry with skew, typed upstream failures, and a one-time
//! authorization-code setup flow.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use time::macros;
	// self
	use crate::{
		cache::{ReqwestTokenCache, TokenCache},
		clock::ManualClock,
		config::{CacheSettings, Credentials},
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Client identifier used by test fixtures.
	pub const CLIENT_ID: &str = "1000.cliq-client";
	/// Client secret used by test fixtures.
	pub const CLIENT_SECRET: &str = "cliq-secret";
	/// Redirect URI used by test fixtures.
	pub const REDIRECT_URI: &str = "https://gateway.example.com/api/Auth/callback";

	/// Builds credentials pointing at `base_url` (typically an `httpmock` server).
	pub fn test_credentials(base_url: &str, refresh_token: &str) -> Credentials {
		Credentials::builder(CLIENT_ID, CLIENT_SECRET)
			.refresh_token(refresh_token)
			.redirect_uri(REDIRECT_URI)
			.scope("ZohoCliq.Webhooks.CREATE,ZohoCliq.Messages.ALL")
			.accounts_url(base_url)
			.build()
			.expect("Test credentials should build.")
	}

	/// Builds a reqwest-backed cache whose clock only moves when the returned handle says so.
	pub fn build_reqwest_test_cache(credentials: Credentials) -> (ReqwestTokenCache, ManualClock) {
		let settings = CacheSettings::default().with_request_timeout(StdDuration::from_secs(5));
		let http_client = ReqwestHttpClient::with_timeout(settings.request_timeout)
			.expect("Test HTTP client should build.");
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));
		let cache = TokenCache::with_http_client(
			credentials,
			settings,
			http_client,
			Arc::new(ReqwestTransportErrorMapper),
		)
		.expect("Test cache should build.")
		.with_clock(Arc::new(clock.clone()));

		(cache, clock)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
