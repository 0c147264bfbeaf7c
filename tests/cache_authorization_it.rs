#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use cliq_token_cache::{
	_preludet::*,
	clock::Clock,
	config::{AUTHORIZATION_ENDPOINT_PATH, Credentials, TOKEN_ENDPOINT_PATH},
	error::MalformedResponse,
};

#[tokio::test]
async fn empty_code_fails_without_network() {
	let server = MockServer::start_async().await;
	let (cache, _) = build_reqwest_test_cache(test_credentials(&server.base_url(), ""));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_ENDPOINT_PATH);
			then.status(200).body("{\"access_token\":\"a\",\"refresh_token\":\"r\"}");
		})
		.await;
	let err = cache
		.exchange_authorization_code("")
		.await
		.expect_err("Empty code should be rejected locally.");

	assert!(matches!(err, Error::MissingAuthorizationCode));
	assert!(cache.issued_tokens().is_none());

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn code_exchange_returns_and_retains_token_pair() {
	let server = MockServer::start_async().await;
	let (cache, clock) = build_reqwest_test_cache(test_credentials(&server.base_url(), ""));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_ENDPOINT_PATH)
				.form_urlencoded_tuple("grant_type", "authorization_code")
				.form_urlencoded_tuple("code", "abc")
				.form_urlencoded_tuple("redirect_uri", REDIRECT_URI)
				.form_urlencoded_tuple("client_id", CLIENT_ID)
				.form_urlencoded_tuple("client_secret", CLIENT_SECRET);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"a\",\"refresh_token\":\"r\",\"expires_in\":3600}");
		})
		.await;
	let issued = cache.exchange_authorization_code("abc").await.expect("Exchange should succeed.");

	assert_eq!(issued.access_token.expose(), "a");
	assert_eq!(issued.refresh_token.expose(), "r");
	assert_eq!(issued.issued_at, clock.now());
	assert_eq!(cache.issued_tokens(), Some(issued));
	// The exchanged pair never feeds the refresh cache.
	assert!(cache.expires_at().is_none());
	assert_eq!(cache.metrics().upstream_calls(), 1);

	mock.assert_async().await;
}

#[tokio::test]
async fn code_exchange_requires_refresh_token_in_response() {
	let server = MockServer::start_async().await;
	let (cache, _) = build_reqwest_test_cache(test_credentials(&server.base_url(), ""));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_ENDPOINT_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"a\",\"refresh_token\":\"\"}");
		})
		.await;
	let err = cache
		.exchange_authorization_code("abc")
		.await
		.expect_err("Blank refresh token should be rejected.");

	assert!(matches!(
		err,
		Error::MalformedResponse(MalformedResponse::MissingRefreshToken { .. })
	));
	assert!(cache.issued_tokens().is_none());

	mock.assert_async().await;
}

#[tokio::test]
async fn rejected_code_surfaces_upstream_status() {
	let server = MockServer::start_async().await;
	let (cache, _) = build_reqwest_test_cache(test_credentials(&server.base_url(), ""));
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_ENDPOINT_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_code\"}");
		})
		.await;
	let err = cache
		.exchange_authorization_code("stale-code")
		.await
		.expect_err("Rejected code should fail.");

	match err {
		Error::UpstreamRejected { status, body } => {
			assert_eq!(status, 400);
			assert!(body.contains("invalid_code"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn code_exchange_without_redirect_uri_is_not_configured() {
	let server = MockServer::start_async().await;
	let credentials = Credentials::builder(CLIENT_ID, CLIENT_SECRET)
		.accounts_url(server.base_url())
		.build()
		.expect("Credentials fixture should build.");
	let (cache, _) = build_reqwest_test_cache(credentials);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_ENDPOINT_PATH);
			then.status(200).body("{\"access_token\":\"a\",\"refresh_token\":\"r\"}");
		})
		.await;
	let err = cache
		.exchange_authorization_code("abc")
		.await
		.expect_err("Missing redirect URI should fail.");

	assert!(matches!(err, Error::NotConfigured { field: "redirect_uri" }));
	assert!(matches!(
		cache.authorization_request(),
		Err(Error::NotConfigured { field: "redirect_uri" })
	));

	mock.assert_calls_async(0).await;
}

#[test]
fn authorization_request_targets_consent_endpoint() {
	let (cache, _) = build_reqwest_test_cache(test_credentials("https://accounts.example.com", ""));
	let first = cache.authorization_request().expect("Consent URL should build.");
	let second = cache.authorization_request().expect("Consent URL should build.");
	let pairs: HashMap<_, _> = first.url.query_pairs().into_owned().collect();

	assert_eq!(first.url.host_str(), Some("accounts.example.com"));
	assert_eq!(first.url.path(), AUTHORIZATION_ENDPOINT_PATH);
	assert_eq!(pairs.get("client_id").map(String::as_str), Some(CLIENT_ID));
	assert_eq!(pairs.get("redirect_uri").map(String::as_str), Some(REDIRECT_URI));
	assert_eq!(pairs.get("access_type").map(String::as_str), Some("offline"));
	assert_eq!(pairs.get("response_type").map(String::as_str), Some("code"));
	assert!(pairs.contains_key("scope"));
	assert_ne!(first.state, second.state);
	assert!(first.validate_state(&first.state).is_ok());
	assert!(matches!(first.validate_state(&second.state), Err(Error::StateMismatch)));
}
