// crates.io
use time::Duration;
// self
use tiered_token::{
	auth::ScopeValidationError,
	descriptor::{AuthDescriptor, DescriptorError, RefreshPolicy},
	url::Url,
};

fn builder(base: &str) -> tiered_token::descriptor::AuthDescriptorBuilder {
	AuthDescriptor::builder(Url::parse(base).expect("Base URL fixture should parse."))
}

#[test]
fn rejects_unsupported_bases() {
	assert!(matches!(
		builder("ftp://auth.example.com").build(),
		Err(DescriptorError::UnsupportedScheme { .. })
	));
	assert!(matches!(
		builder("https://auth.example.com/?tenant=a").build(),
		Err(DescriptorError::QueryOrFragment { .. })
	));
	assert!(matches!(
		builder("https://auth.example.com/#frag").build(),
		Err(DescriptorError::QueryOrFragment { .. })
	));
}

#[test]
fn rejects_invalid_scope_overrides() {
	assert_eq!(
		builder("https://auth.example.com").short_lived_scopes(Vec::<String>::new()).build(),
		Err(DescriptorError::EmptyScope { tier: "short_lived" })
	);
	assert_eq!(
		builder("https://auth.example.com").long_lived_scopes(["jobs read"]).build(),
		Err(DescriptorError::InvalidScope {
			tier: "long_lived",
			source: ScopeValidationError::ContainsWhitespace { scope: "jobs read".into() },
		})
	);
}

#[test]
fn rejects_invalid_policy() {
	assert_eq!(
		builder("https://auth.example.com").long_lived_ttl(Duration::ZERO).build(),
		Err(DescriptorError::NonPositiveTtl)
	);
	assert_eq!(
		builder("https://auth.example.com").safety_margin(Duration::seconds(-1)).build(),
		Err(DescriptorError::NegativeSafetyMargin)
	);
	assert_eq!(
		builder("https://auth.example.com").request_timeout(Duration::ZERO).build(),
		Err(DescriptorError::NonPositiveTimeout)
	);
}

#[test]
fn applies_overrides() {
	let descriptor = builder("http://localhost:4010/auth-service")
		.long_lived_scopes(["jobs:read"])
		.short_lived_scopes(["jobs:read", "jobs:read"])
		.long_lived_ttl(Duration::days(7))
		.safety_margin(Duration::ZERO)
		.send_client_id_header(true)
		.build()
		.expect("Overridden descriptor should build.");

	assert_eq!(
		descriptor.endpoints.long_lived.as_str(),
		"http://localhost:4010/auth-service/auth/tokens/long"
	);
	assert_eq!(descriptor.long_lived_scope.to_string(), "jobs:read");
	assert_eq!(descriptor.short_lived_scope.len(), 1);
	assert_eq!(descriptor.policy.long_lived_ttl_seconds(), 604_800);
	assert!(descriptor.policy.safety_margin.is_zero());
	assert!(descriptor.policy.send_client_id_header);
	assert_eq!(descriptor.policy.request_timeout, RefreshPolicy::DEFAULT_REQUEST_TIMEOUT);
}
