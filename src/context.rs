//! Carrier handed to downstream API clients, plus the contract for attaching it to requests.

// std
#[cfg(feature = "reqwest")] use std::convert::Infallible;
// crates.io
use oauth2::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::{ShortLivedToken, TokenId, TokenSecret},
	error::ConfigError,
	http::HttpRequest,
};

/// Authentication carrier holding the current short-lived token.
///
/// Produced by [`TokenManager`](crate::manager::TokenManager)'s `build_authenticated_context`.
/// The carrier is a snapshot that never refreshes itself, so callers should build a new one
/// per batch of requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
	access_token: TokenSecret,
	token_id: Option<TokenId>,
	expires_at: OffsetDateTime,
}
impl AuthContext {
	/// Bearer value to present to the downstream API.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Identifier of the short-lived token, if the service reported one.
	pub fn token_id(&self) -> Option<&TokenId> {
		self.token_id.as_ref()
	}

	/// Expiry of the short-lived token.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Renders the `Authorization: Bearer …` value, marked sensitive.
	pub fn bearer_header(&self) -> Result<HeaderValue, ConfigError> {
		let mut value = HeaderValue::from_str(&self.access_token.bearer())?;

		value.set_sensitive(true);

		Ok(value)
	}

	/// Inserts the `Authorization` header, replacing any existing one.
	pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<(), ConfigError> {
		headers.insert(AUTHORIZATION, self.bearer_header()?);

		Ok(())
	}
}
impl From<&ShortLivedToken> for AuthContext {
	fn from(token: &ShortLivedToken) -> Self {
		Self {
			access_token: token.value.clone(),
			token_id: token.token_id.clone(),
			expires_at: token.expires_at,
		}
	}
}
impl Debug for AuthContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthContext")
			.field("access_token", &"<redacted>")
			.field("token_id", &self.token_id)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Describes how to attach an [`AuthContext`] to an outbound request without constraining
/// the HTTP client type.
pub trait RequestSignerExt<Request, Error>
where
	Self: Send + Sync,
{
	/// Consumes the request and injects the bearer credential carried by `context`.
	fn sign(&self, request: Request, context: &AuthContext) -> Result<Request, Error>;
}

/// Signer that sets `Authorization: Bearer {short-lived token}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BearerSigner;
impl RequestSignerExt<HttpRequest, ConfigError> for BearerSigner {
	fn sign(
		&self,
		mut request: HttpRequest,
		context: &AuthContext,
	) -> Result<HttpRequest, ConfigError> {
		context.apply_to_headers(request.headers_mut())?;

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl RequestSignerExt<reqwest::RequestBuilder, Infallible> for BearerSigner {
	fn sign(
		&self,
		request: reqwest::RequestBuilder,
		context: &AuthContext,
	) -> Result<reqwest::RequestBuilder, Infallible> {
		Ok(request.bearer_auth(context.access_token().expose()))
	}
}

/// Host and scheme of the downstream API that consumes [`AuthContext`] carriers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiEndpoint {
	base_url: Url,
}
impl ApiEndpoint {
	/// Validates `scheme://host` as a base URL.
	pub fn new(scheme: &str, host: &str) -> Result<Self, ConfigError> {
		let base_url = Url::parse(&format!("{scheme}://{host}/"))
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidEndpoint {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		Ok(Self { base_url })
	}

	/// URL scheme (`http` or `https`).
	pub fn scheme(&self) -> &str {
		self.base_url.scheme()
	}

	/// Host name, without the port.
	pub fn host(&self) -> &str {
		self.base_url.host_str().unwrap_or_default()
	}

	/// Root URL of the API.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Resolves an API path such as `/jobs` against the base URL.
	pub fn url(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidEndpoint { source })
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::http;
	use time::macros;
	// self
	use super::*;
	use crate::auth::ScopeSet;

	fn context() -> AuthContext {
		let token = ShortLivedToken::new(
			"S1",
			ScopeSet::default(),
			macros::datetime!(2025-01-01 01:00 UTC),
		)
		.expect("Short-lived token fixture should be valid.")
		.with_token_id(Some(TokenId::new("s-1").expect("Token id fixture should be valid.")));

		AuthContext::from(&token)
	}

	#[test]
	fn carrier_renders_bearer_header() {
		let context = context();
		let header = context.bearer_header().expect("Bearer header should render.");

		assert_eq!(header, "Bearer S1");
		assert!(header.is_sensitive());
		assert_eq!(context.token_id().map(TokenId::as_str), Some("s-1"));
		assert!(!format!("{context:?}").contains("S1"));
	}

	#[test]
	fn bearer_signer_replaces_authorization() {
		let request = http::Request::builder()
			.uri("https://api.example.com/jobs")
			.header(AUTHORIZATION, "Bearer stale")
			.body(Vec::new())
			.expect("Request fixture should build.");
		let signed = BearerSigner.sign(request, &context()).expect("Signing should succeed.");

		assert_eq!(signed.headers().get_all(AUTHORIZATION).iter().count(), 1);
		assert_eq!(signed.headers()[AUTHORIZATION], "Bearer S1");
	}

	#[test]
	fn api_endpoint_joins_paths() {
		let endpoint = ApiEndpoint::new("https", "api.example.com:8443")
			.expect("Endpoint fixture should be valid.");

		assert_eq!(endpoint.scheme(), "https");
		assert_eq!(endpoint.host(), "api.example.com");
		assert_eq!(
			endpoint.url("/jobs").expect("Path should join.").as_str(),
			"https://api.example.com:8443/jobs"
		);
		assert!(ApiEndpoint::new("https", "").is_err());
	}
}
