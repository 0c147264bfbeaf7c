#![cfg(all(feature = "reqwest", feature = "test"))]

// std
use std::{fs, process};
// crates.io
use httpmock::prelude::*;
// self
use cliq_token_cache::{
	_preludet::*,
	cache::TokenCache,
	config::{CliqConfig, TOKEN_ENDPOINT_PATH},
};

#[tokio::test]
async fn cache_built_from_config_file_refreshes() {
	let server = MockServer::start_async().await;
	let document = format!(
		"{{\
			\"Logging\":{{\"LogLevel\":{{\"Default\":\"Information\"}}}},\
			\"ZohoCliq\":{{\
				\"ClientId\":\"{CLIENT_ID}\",\
				\"ClientSecret\":\"{CLIENT_SECRET}\",\
				\"RefreshToken\":\"1000.file-refresh\",\
				\"RedirectUri\":\"{REDIRECT_URI}\",\
				\"AccountsUrl\":\"{}\"\
			}},\
			\"TokenCache\":{{\"SkewSeconds\":30,\"RequestTimeoutSeconds\":5}}\
		}}",
		server.base_url()
	);
	let path = std::env::temp_dir().join(format!("cliq-token-cache-{}.json", process::id()));

	fs::write(&path, document).expect("Config fixture should be written.");

	let config = CliqConfig::from_path(&path).expect("Config file should parse.");
	let _ = fs::remove_file(&path);
	let (credentials, settings) = config.into_parts().expect("Config should validate.");

	assert_eq!(settings.skew, Duration::seconds(30));
	assert_eq!(settings.request_timeout, StdDuration::from_secs(5));

	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_ENDPOINT_PATH)
				.form_urlencoded_tuple("refresh_token", "1000.file-refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"file-access\",\"expires_in\":3600}");
		})
		.await;
	let cache = TokenCache::new(credentials, settings).expect("Cache should build from config.");
	let token = cache.access_token().await.expect("Refresh should succeed.");

	assert_eq!(token.expose(), "file-access");

	mock.assert_async().await;
}
