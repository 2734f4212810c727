// self
use crate::_prelude::*;

/// Knobs that shape token lifetimes, refresh timing, and transport behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
	/// Short-lived tokens are refreshed once `now >= expires_at - safety_margin`.
	pub safety_margin: Duration,
	/// TTL requested for the long-lived token (`ttl_seconds`).
	pub long_lived_ttl: Duration,
	/// Overall timeout applied to each request by the default transport.
	pub request_timeout: Duration,
	/// Sends `X-Client-Id` alongside the long-lived token request.
	pub send_client_id_header: bool,
}
impl RefreshPolicy {
	/// Default safety margin (1 minute).
	pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::minutes(1);
	/// Default long-lived TTL (30 days).
	pub const DEFAULT_LONG_LIVED_TTL: Duration = Duration::days(30);
	/// Default per-request timeout (30 seconds).
	pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::seconds(30);

	/// Returns `ttl_seconds` for the long-lived token request.
	pub fn long_lived_ttl_seconds(&self) -> i64 {
		self.long_lived_ttl.whole_seconds()
	}

	/// Returns the request timeout as a std duration for transport builders.
	pub fn request_timeout_std(&self) -> std::time::Duration {
		std::time::Duration::try_from(self.request_timeout)
			.unwrap_or(std::time::Duration::from_secs(30))
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			safety_margin: Self::DEFAULT_SAFETY_MARGIN,
			long_lived_ttl: Self::DEFAULT_LONG_LIVED_TTL,
			request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
			send_client_id_header: false,
		}
	}
}
