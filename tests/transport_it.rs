mod common;

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use oauth2::http::StatusCode;
use parking_lot::Mutex;
use time::Duration;
// self
use common::*;
use tiered_token::{
	error::{Error, TransportError},
	http::{HttpClientError, HttpRequest, HttpResponse, TokenHttpClient, TransportFuture},
	manager::{TokenManager, TokenState},
	obs::ExchangeKind,
};

#[derive(Debug)]
enum FakeTransportError {
	Refused,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Refused => write!(f, "Connection refused."),
		}
	}
}
impl StdError for FakeTransportError {}

/// Answers both token endpoints and records every request path in arrival order.
struct ScriptedHttpClient {
	calls: Mutex<Vec<String>>,
	short_ttl: Duration,
	refuse: bool,
}
impl ScriptedHttpClient {
	fn new(short_ttl: Duration) -> Self {
		Self { calls: Default::default(), short_ttl, refuse: false }
	}

	fn refusing() -> Self {
		Self { refuse: true, ..Self::new(Duration::hours(1)) }
	}

	fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}

	fn respond(&self, request: &HttpRequest) -> HttpResponse {
		let (status, body) = match request.uri().path() {
			LONG_PATH => (201, long_body("L1", "t1")),
			SHORT_PATH => {
				let authorized = request
					.headers()
					.get("authorization")
					.is_some_and(|value| value == "Bearer L1");

				if authorized {
					(200, short_body("S1", self.short_ttl))
				} else {
					(401, serde_json::json!({ "error": "unauthorized" }))
				}
			},
			_ => (404, serde_json::Value::Null),
		};
		let mut response = HttpResponse::new(body.to_string().into_bytes());

		*response.status_mut() =
			StatusCode::from_u16(status).expect("Status fixture should be valid.");

		response
	}
}
impl TokenHttpClient for ScriptedHttpClient {
	type TransportError = FakeTransportError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		Box::pin(async move {
			// Give concurrent callers a chance to interleave.
			tokio::task::yield_now().await;

			self.calls.lock().push(request.uri().path().to_owned());

			if self.refuse {
				return Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Refused)));
			}

			Ok(self.respond(&request))
		})
	}
}

fn build_manager_with(client: Arc<ScriptedHttpClient>) -> TokenManager<ScriptedHttpClient> {
	TokenManager::with_http_client(credentials(), descriptor_for("https://auth.test/"), client)
}

#[tokio::test]
async fn fresh_manager_requests_long_then_short() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::hours(1)));
	let manager = build_manager_with(client.clone());
	let token = manager.ensure_valid_token().await.expect("Acquisition should succeed.");

	assert_eq!(token.value.expose(), "S1");
	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH]);

	manager.ensure_valid_token().await.expect("Cached token should be returned.");

	assert_eq!(client.calls().len(), 2);
	assert_eq!(manager.metrics.cache_hits(), 1);
}

#[tokio::test]
async fn explicit_short_acquisition_always_exchanges() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::hours(1)));
	let manager = build_manager_with(client.clone());

	manager.acquire_short_lived_token().await.expect("First exchange should succeed.");
	manager.acquire_short_lived_token().await.expect("Second exchange should succeed.");

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH, SHORT_PATH]);
}

#[tokio::test]
async fn expiring_tokens_cost_one_round_trip_each() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::seconds(45)));
	let manager = build_manager_with(client.clone());

	manager.ensure_valid_token().await.expect("Acquisition should succeed.");

	assert_eq!(manager.state(), TokenState::ShortTokenExpiring);

	manager.ensure_valid_token().await.expect("Refresh should succeed.");

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH, SHORT_PATH]);
}

#[tokio::test]
async fn transport_failures_map_to_network_errors() {
	let client = Arc::new(ScriptedHttpClient::refusing());
	let manager = build_manager_with(client.clone());
	let err = manager.ensure_valid_token().await.expect_err("Refused connections must surface.");

	match &err {
		Error::Network(TransportError::Network { exchange, source }) => {
			assert_eq!(*exchange, ExchangeKind::LongLived);
			assert_eq!(source.to_string(), "Connection refused.");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(client.calls(), [LONG_PATH]);
	assert_eq!(manager.state(), TokenState::NoToken);
}

#[tokio::test]
async fn concurrent_callers_are_single_flighted() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::hours(1)));
	let manager = build_manager_with(client.clone());
	let (a, b, c, d) = tokio::join!(
		manager.ensure_valid_token(),
		manager.ensure_valid_token(),
		manager.ensure_valid_token(),
		manager.ensure_valid_token(),
	);

	for result in [a, b, c, d] {
		assert_eq!(result.expect("Every caller should succeed.").value.expose(), "S1");
	}

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH]);
}

#[tokio::test]
async fn shared_manager_works_across_spawned_tasks() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::hours(1)));
	let manager = build_manager_with(client.clone());
	let handles = (0..8)
		.map(|_| {
			let manager = manager.clone();

			tokio::spawn(async move { manager.ensure_valid_token().await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle.await.expect("Task should not panic.").expect("Acquisition should succeed.");
	}

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH]);
}

#[tokio::test]
async fn refresh_tokens_keeps_the_long_lived_token() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::hours(1)));
	let manager = build_manager_with(client.clone());

	manager.ensure_valid_token().await.expect("Acquisition should succeed.");
	manager.refresh_tokens().await.expect("Forced refresh should succeed.");

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH, SHORT_PATH]);
}

#[tokio::test]
async fn short_lifetime_token_is_returned_once_then_replaced() {
	let client = Arc::new(ScriptedHttpClient::new(Duration::seconds(45)));
	let manager = build_manager_with(client.clone());
	let token = manager.ensure_valid_token().await.expect("Acquisition should succeed.");

	assert_eq!(token.value.expose(), "S1");
	assert_eq!(manager.state(), TokenState::ShortTokenExpiring);
	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH]);

	manager.ensure_valid_token().await.expect("Reacquisition should succeed.");

	assert_eq!(client.calls(), [LONG_PATH, SHORT_PATH, SHORT_PATH]);
}
