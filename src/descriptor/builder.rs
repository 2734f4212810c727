// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, ScopeValidationError},
	descriptor::{
		AuthDescriptor, AuthEndpoints, DEFAULT_LONG_LIVED_SCOPES, DEFAULT_SHORT_LIVED_SCOPES,
		RefreshPolicy,
	},
};

const LONG_LIVED_PATH: &str = "auth/tokens/long";
const SHORT_LIVED_PATH: &str = "auth/tokens/short";
const TOKENS_PATH: &str = "auth/tokens";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
	/// Only `http` and `https` are accepted.
	#[error("The base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// The URL cannot carry path segments (for example `mailto:`).
	#[error("The base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Query strings and fragments would leak into every endpoint.
	#[error("The base URL must not carry a query or fragment: {url}.")]
	QueryOrFragment {
		/// Base URL that failed validation.
		url: String,
	},
	/// An endpoint could not be joined onto the base URL.
	#[error("Endpoint `{path}` cannot be joined onto the base URL.")]
	InvalidEndpoint {
		/// Relative path that failed to join.
		path: &'static str,
		/// Underlying parsing failure.
		source: url::ParseError,
	},
	/// A token tier was configured without scopes.
	#[error("The {tier} scope set cannot be empty.")]
	EmptyScope {
		/// Tier label (`long_lived` or `short_lived`).
		tier: &'static str,
	},
	/// A scope override failed validation.
	#[error("The {tier} scope set is invalid.")]
	InvalidScope {
		/// Tier label (`long_lived` or `short_lived`).
		tier: &'static str,
		/// Underlying validation failure.
		source: ScopeValidationError,
	},
	/// The long-lived TTL must be at least one second.
	#[error("The long-lived TTL must be at least one second.")]
	NonPositiveTtl,
	/// The safety margin cannot be negative.
	#[error("The safety margin cannot be negative.")]
	NegativeSafetyMargin,
	/// The request timeout must be positive.
	#[error("The request timeout must be positive.")]
	NonPositiveTimeout,
}

/// Builder for [`AuthDescriptor`] values.
#[derive(Debug)]
pub struct AuthDescriptorBuilder {
	/// Base URL of the authorization service.
	pub base_url: Url,
	/// Long-lived scope override.
	pub long_lived_scope: Option<Vec<String>>,
	/// Short-lived scope override.
	pub short_lived_scope: Option<Vec<String>>,
	/// Policy applied to the manager.
	pub policy: RefreshPolicy,
}
impl AuthDescriptorBuilder {
	/// Creates a new builder seeded with the provided base URL and default policy.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			long_lived_scope: None,
			short_lived_scope: None,
			policy: RefreshPolicy::default(),
		}
	}

	/// Overrides the scopes requested for the long-lived token.
	pub fn long_lived_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.long_lived_scope = Some(scopes.into_iter().map(Into::into).collect());

		self
	}

	/// Overrides the scopes requested for the short-lived token.
	pub fn short_lived_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.short_lived_scope = Some(scopes.into_iter().map(Into::into).collect());

		self
	}

	/// Overrides the TTL requested for the long-lived token.
	pub fn long_lived_ttl(mut self, ttl: Duration) -> Self {
		self.policy.long_lived_ttl = ttl;

		self
	}

	/// Overrides the refresh safety margin.
	pub fn safety_margin(mut self, margin: Duration) -> Self {
		self.policy.safety_margin = margin;

		self
	}

	/// Overrides the per-request timeout used by the default transport.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.policy.request_timeout = timeout;

		self
	}

	/// Toggles the `X-Client-Id` header on long-lived token requests.
	pub fn send_client_id_header(mut self, enabled: bool) -> Self {
		self.policy.send_client_id_header = enabled;

		self
	}

	/// Overrides the whole policy.
	pub fn policy(mut self, policy: RefreshPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<AuthDescriptor, DescriptorError> {
		let base_url = normalize_base(self.base_url)?;
		let endpoints = AuthEndpoints {
			long_lived: join(&base_url, LONG_LIVED_PATH)?,
			short_lived: join(&base_url, SHORT_LIVED_PATH)?,
			tokens: join(&base_url, TOKENS_PATH)?,
		};
		let long_lived_scope =
			scope_or_default("long_lived", self.long_lived_scope, &DEFAULT_LONG_LIVED_SCOPES)?;
		let short_lived_scope =
			scope_or_default("short_lived", self.short_lived_scope, &DEFAULT_SHORT_LIVED_SCOPES)?;

		validate_policy(&self.policy)?;

		Ok(AuthDescriptor {
			base_url,
			endpoints,
			long_lived_scope,
			short_lived_scope,
			policy: self.policy,
		})
	}
}

fn normalize_base(mut url: Url) -> Result<Url, DescriptorError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(DescriptorError::UnsupportedScheme { url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(DescriptorError::CannotBeABase { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(DescriptorError::QueryOrFragment { url: url.to_string() });
	}
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	Ok(url)
}

fn join(base: &Url, path: &'static str) -> Result<Url, DescriptorError> {
	base.join(path).map_err(|source| DescriptorError::InvalidEndpoint { path, source })
}

fn scope_or_default(
	tier: &'static str,
	configured: Option<Vec<String>>,
	default: &[&str],
) -> Result<ScopeSet, DescriptorError> {
	let scope = match configured {
		Some(values) => ScopeSet::new(values),
		None => ScopeSet::new(default.iter().copied()),
	}
	.map_err(|source| DescriptorError::InvalidScope { tier, source })?;

	if scope.is_empty() {
		return Err(DescriptorError::EmptyScope { tier });
	}

	Ok(scope)
}

fn validate_policy(policy: &RefreshPolicy) -> Result<(), DescriptorError> {
	if policy.long_lived_ttl.whole_seconds() < 1 {
		return Err(DescriptorError::NonPositiveTtl);
	}
	if policy.safety_margin.is_negative() {
		return Err(DescriptorError::NegativeSafetyMargin);
	}
	if !policy.request_timeout.is_positive() {
		return Err(DescriptorError::NonPositiveTimeout);
	}

	Ok(())
}
