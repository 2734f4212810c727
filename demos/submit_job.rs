//! Demonstrates submitting a job to a downstream API with a managed short-lived token.
//!
//! A mock server plays both the authorization service and the jobs API. The manager acquires
//! the long-lived token, exchanges it, and the resulting carrier signs a reqwest request.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
// self
use tiered_token::{
	auth::Credentials,
	context::{ApiEndpoint, BearerSigner, RequestSignerExt},
	descriptor::AuthDescriptor,
	manager::ReqwestTokenManager,
	reqwest::Client,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let now = OffsetDateTime::now_utc();
	let long_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/tokens/long");
			then.status(201).json_body(serde_json::json!({
				"access_token": "demo-long",
				"token_id": "tok-long",
				"expires_at": (now + Duration::days(30)).format(&Rfc3339).unwrap_or_default(),
			}));
		})
		.await;
	let short_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/tokens/short").header("authorization", "Bearer demo-long");
			then.status(200).json_body(serde_json::json!({
				"access_token": "demo-short",
				"token_id": "tok-short",
				"expires_at": (now + Duration::hours(1)).format(&Rfc3339).unwrap_or_default(),
			}));
		})
		.await;
	let jobs_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/jobs").header("authorization", "Bearer demo-short");
			then.status(202).json_body(serde_json::json!({ "job_id": "job-42" }));
		})
		.await;
	let descriptor = AuthDescriptor::builder(Url::parse(&server.url("/"))?).build()?;
	let credentials = Credentials::new("demo-client", "demo-secret")?;
	let manager = ReqwestTokenManager::new(credentials, descriptor)?;
	let api = ApiEndpoint::new("http", &server.address().to_string())?;

	for template in ["render", "transcode"] {
		let context = manager.build_authenticated_context().await?;
		let request = Client::new()
			.post(api.url("/jobs")?)
			.header("content-type", "application/json")
			.body(serde_json::to_vec(&serde_json::json!({ "template": template }))?);
		let response = BearerSigner.sign(request, &context)?.send().await?;

		println!("Submitted {template} job: HTTP {}.", response.status());
	}

	println!("Manager state: {:?}.", manager.state());

	long_mock.assert_async().await;
	short_mock.assert_async().await;
	jobs_mock.assert_calls_async(2).await;

	Ok(())
}
