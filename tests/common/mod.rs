#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};
// self
use tiered_token::{
	auth::Credentials, descriptor::AuthDescriptor, manager::ReqwestTokenManager, url::Url,
};

pub const CLIENT_ID: &str = "id1";
pub const CLIENT_SECRET: &str = "secret1";
pub const LONG_PATH: &str = "/auth/tokens/long";
pub const SHORT_PATH: &str = "/auth/tokens/short";

pub fn credentials() -> Credentials {
	Credentials::new(CLIENT_ID, CLIENT_SECRET).expect("Credential fixture should be valid.")
}

pub fn descriptor_for(base: &str) -> AuthDescriptor {
	AuthDescriptor::builder(Url::parse(base).expect("Base URL fixture should parse."))
		.build()
		.expect("Descriptor fixture should build.")
}

pub fn descriptor(server: &MockServer) -> AuthDescriptor {
	descriptor_for(&server.url("/"))
}

pub fn build_manager(server: &MockServer) -> ReqwestTokenManager {
	ReqwestTokenManager::new(credentials(), descriptor(server))
		.expect("Reqwest-backed manager should build.")
}

/// RFC 3339 timestamp `offset` from now.
pub fn rfc3339_in(offset: Duration) -> String {
	(OffsetDateTime::now_utc() + offset).format(&Rfc3339).expect("Timestamp should format.")
}

pub fn long_body(access_token: &str, token_id: &str) -> serde_json::Value {
	serde_json::json!({
		"access_token": access_token,
		"token_id": token_id,
		"expires_at": rfc3339_in(Duration::days(30)),
	})
}

pub fn short_body(access_token: &str, expires_in: Duration) -> serde_json::Value {
	serde_json::json!({
		"access_token": access_token,
		"expires_at": rfc3339_in(expires_in),
	})
}
