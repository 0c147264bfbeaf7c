//! Demonstrates the token cache against a mock accounts server: one refresh, a cache hit, and
//! the consent URL used for the one-time authorization-code setup.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use cliq_token_cache::{
	cache::ReqwestTokenCache,
	config::{CacheSettings, Credentials, TOKEN_ENDPOINT_PATH},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_ENDPOINT_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"expires_in\":3600}");
		})
		.await;
	let credentials = Credentials::builder("1000.demo-client", "demo-secret")
		.refresh_token("1000.demo-refresh")
		.redirect_uri("http://localhost:5000/api/Auth/callback")
		.scope("ZohoCliq.Webhooks.CREATE,ZohoCliq.Messages.ALL")
		.accounts_url(server.base_url())
		.build()?;
	let cache = ReqwestTokenCache::new(credentials, CacheSettings::default())?;
	let token = cache.access_token().await?;

	// `TokenSecret` redacts itself when formatted.
	println!("Fetched access token: {token}.");

	let again = cache.access_token().await?;

	println!("Cache hit returned the same token: {}.", again == token);
	println!("Token expires at {:?}.", cache.expires_at());
	println!("Consent URL: {}.", cache.authorization_request()?.url);

	token_mock.assert_async().await;

	Ok(())
}
