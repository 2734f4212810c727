//! Authorization service descriptor: endpoints, scope sets, and refresh policy.
//!
//! A descriptor is validated once by [`AuthDescriptorBuilder::build`] and then shared
//! read-only by the manager. Defaults reproduce the service contract: scopes
//! `jobs:submit jobs:read templates:read` for the long-lived token, `jobs:submit` for the
//! short-lived one, a 30 day long-lived TTL, a 1 minute safety margin, and a 30 second
//! per-request timeout.

/// Builder API for assembling descriptors.
pub mod builder;
/// Refresh and transport policy knobs.
pub mod policy;

pub use builder::*;
pub use policy::*;

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenId},
	error::ConfigError,
};

/// Scopes requested for the long-lived token unless overridden.
pub const DEFAULT_LONG_LIVED_SCOPES: [&str; 3] = ["jobs:submit", "jobs:read", "templates:read"];
/// Scopes requested for the short-lived token unless overridden.
pub const DEFAULT_SHORT_LIVED_SCOPES: [&str; 1] = ["jobs:submit"];

/// Endpoints derived from the authorization base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoints {
	/// `POST` target for the client-credentials → long-lived exchange.
	pub long_lived: Url,
	/// `POST` target for the long-lived → short-lived exchange.
	pub short_lived: Url,
	/// Collection URL under which `{token_id}/revoke` is resolved.
	pub tokens: Url,
}

/// Immutable descriptor consumed by [`TokenManager`](crate::manager::TokenManager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthDescriptor {
	/// Base URL of the authorization service, always ending in `/`.
	pub base_url: Url,
	/// Derived endpoint set.
	pub endpoints: AuthEndpoints,
	/// Scopes requested for the long-lived token.
	pub long_lived_scope: ScopeSet,
	/// Scopes requested for the short-lived token.
	pub short_lived_scope: ScopeSet,
	/// Refresh and transport policy.
	pub policy: RefreshPolicy,
}
impl AuthDescriptor {
	/// Creates a new builder rooted at the provided base URL.
	pub fn builder(base_url: Url) -> AuthDescriptorBuilder {
		AuthDescriptorBuilder::new(base_url)
	}

	/// Resolves the revocation endpoint for a specific token.
	pub fn revocation_endpoint(&self, token_id: &TokenId) -> Result<Url, ConfigError> {
		let mut endpoint = self.endpoints.tokens.clone();

		endpoint
			.path_segments_mut()
			.map_err(|_| ConfigError::InvalidEndpoint {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			})?
			.pop_if_empty()
			.extend([token_id.as_str(), "revoke"]);

		Ok(endpoint)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor(base: &str) -> AuthDescriptor {
		AuthDescriptor::builder(Url::parse(base).expect("Base URL fixture should parse."))
			.build()
			.expect("Default descriptor should build.")
	}

	#[test]
	fn endpoints_keep_base_path() {
		let descriptor = descriptor("https://api.example.com/v2");

		assert_eq!(descriptor.base_url.as_str(), "https://api.example.com/v2/");
		assert_eq!(
			descriptor.endpoints.long_lived.as_str(),
			"https://api.example.com/v2/auth/tokens/long"
		);
		assert_eq!(
			descriptor.endpoints.short_lived.as_str(),
			"https://api.example.com/v2/auth/tokens/short"
		);
	}

	#[test]
	fn revocation_endpoint_embeds_token_id() {
		let descriptor = descriptor("http://localhost:4010");
		let token_id = TokenId::new("tok_9").expect("Token id fixture should be valid.");
		let url = descriptor
			.revocation_endpoint(&token_id)
			.expect("Revocation endpoint should resolve.");

		assert_eq!(url.as_str(), "http://localhost:4010/auth/tokens/tok_9/revoke");
	}

	#[test]
	fn defaults_match_service_contract() {
		let descriptor = descriptor("https://api.example.com");

		assert_eq!(
			descriptor.long_lived_scope,
			ScopeSet::new(DEFAULT_LONG_LIVED_SCOPES).expect("Default scopes should be valid.")
		);
		assert_eq!(descriptor.short_lived_scope.as_slice(), ["jobs:submit".to_string()]);
		assert_eq!(descriptor.policy, RefreshPolicy::default());
	}
}
