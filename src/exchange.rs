//! Wire codec for the authorization service.
//!
//! Builds the JSON requests for the long-lived, short-lived, and revocation exchanges,
//! dispatches them through a [`TokenHttpClient`], and turns responses into token models or
//! classified [`Error`] values:
//!
//! - the transport failed → [`Error::Network`]
//! - the status was not 2xx → [`Error::Auth`] (404 on revocation excepted)
//! - the body did not decode → [`Error::Decode`]

// crates.io
use oauth2::http::{
	self, HeaderValue, Method, StatusCode,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, LongLivedToken, ShortLivedToken, TokenId, TokenSecret},
	descriptor::AuthDescriptor,
	error::{AuthError, ConfigError, DecodeError, TransportError},
	http::{HttpClientError, HttpRequest, HttpResponse, TokenHttpClient},
	obs::{self, ExchangeKind},
};

const CLIENT_CREDENTIALS: &str = "client_credentials";
const JSON: &str = "application/json";
const CLIENT_ID_HEADER: &str = "x-client-id";

/// Result of a revocation request that the service accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevocationOutcome {
	/// The service revoked the token (200/204).
	Revoked,
	/// The service no longer knows the token (404); revocation is idempotent.
	AlreadyRevoked,
}

#[derive(Debug, Serialize)]
struct LongLivedRequest<'a> {
	grant_type: &'static str,
	client_id: &'a str,
	client_secret: &'a str,
	scopes: &'a crate::auth::ScopeSet,
	ttl_seconds: i64,
}

#[derive(Debug, Serialize)]
struct ShortLivedRequest<'a> {
	scopes: &'a crate::auth::ScopeSet,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: String,
	#[serde(default)]
	token_id: Option<String>,
	#[serde(default)]
	expires_at: Option<String>,
}

/// Performs exchanges for one descriptor over one transport.
pub(crate) struct TokenExchange<'a, C>
where
	C: ?Sized + TokenHttpClient,
{
	descriptor: &'a AuthDescriptor,
	http_client: &'a C,
}
impl<'a, C> TokenExchange<'a, C>
where
	C: ?Sized + TokenHttpClient,
{
	pub(crate) fn new(descriptor: &'a AuthDescriptor, http_client: &'a C) -> Self {
		Self { descriptor, http_client }
	}

	/// `POST auth/tokens/long` with the client credentials.
	pub(crate) async fn request_long_lived(
		&self,
		credentials: &Credentials,
	) -> Result<LongLivedToken> {
		const KIND: ExchangeKind = ExchangeKind::LongLived;

		let request = long_lived_request(self.descriptor, credentials)?;
		let response = self.dispatch(KIND, request).await?;
		let response = ensure_success(KIND, response)?;

		decode_long_lived(self.descriptor, &response)
	}

	/// `POST auth/tokens/short` authenticated by the long-lived token.
	pub(crate) async fn request_short_lived(
		&self,
		long_lived: &LongLivedToken,
	) -> Result<ShortLivedToken> {
		const KIND: ExchangeKind = ExchangeKind::ShortLived;

		let request = short_lived_request(self.descriptor, long_lived)?;
		let response = self.dispatch(KIND, request).await?;
		let response = ensure_success(KIND, response)?;

		decode_short_lived(self.descriptor, &response)
	}

	/// `POST auth/tokens/{token_id}/revoke` authenticated by the token itself.
	pub(crate) async fn revoke(
		&self,
		token_id: &TokenId,
		bearer: &TokenSecret,
	) -> Result<RevocationOutcome> {
		const KIND: ExchangeKind = ExchangeKind::Revocation;

		let url = self.descriptor.revocation_endpoint(token_id)?;
		let request = json_request(&url, Some(bearer), None, Vec::new())?;
		let response = self.dispatch(KIND, request).await?;

		match response.status() {
			status if status.is_success() => Ok(RevocationOutcome::Revoked),
			StatusCode::NOT_FOUND => Ok(RevocationOutcome::AlreadyRevoked),
			status => Err(AuthError::new(KIND, status.as_u16(), response.body()).into()),
		}
	}

	async fn dispatch(&self, kind: ExchangeKind, request: HttpRequest) -> Result<HttpResponse> {
		self.http_client.execute(request).await.map_err(|err| map_transport_error(kind, err))
	}
}

fn long_lived_request(
	descriptor: &AuthDescriptor,
	credentials: &Credentials,
) -> Result<HttpRequest> {
	let body = serde_json::to_vec(&LongLivedRequest {
		grant_type: CLIENT_CREDENTIALS,
		client_id: credentials.client_id().as_str(),
		client_secret: credentials.client_secret().expose(),
		scopes: &descriptor.long_lived_scope,
		ttl_seconds: descriptor.policy.long_lived_ttl_seconds(),
	})
	.map_err(ConfigError::from)?;
	let client_id = descriptor.policy.send_client_id_header.then(|| credentials.client_id().as_str());

	json_request(&descriptor.endpoints.long_lived, None, client_id, body)
}

fn short_lived_request(
	descriptor: &AuthDescriptor,
	long_lived: &LongLivedToken,
) -> Result<HttpRequest> {
	let body = serde_json::to_vec(&ShortLivedRequest { scopes: &descriptor.short_lived_scope })
		.map_err(ConfigError::from)?;

	json_request(&descriptor.endpoints.short_lived, Some(&long_lived.value), None, body)
}

fn json_request(
	url: &Url,
	bearer: Option<&TokenSecret>,
	client_id: Option<&str>,
	body: Vec<u8>,
) -> Result<HttpRequest> {
	let mut builder = http::Request::builder()
		.method(Method::POST)
		.uri(url.as_str())
		.header(ACCEPT, JSON)
		.header(CONTENT_TYPE, JSON);

	if let Some(secret) = bearer {
		let mut value = HeaderValue::from_str(&secret.bearer()).map_err(ConfigError::from)?;

		value.set_sensitive(true);

		builder = builder.header(AUTHORIZATION, value);
	}
	if let Some(client_id) = client_id {
		builder = builder.header(CLIENT_ID_HEADER, client_id);
	}

	Ok(builder.body(body).map_err(ConfigError::from)?)
}

fn ensure_success(kind: ExchangeKind, response: HttpResponse) -> Result<HttpResponse> {
	let status = response.status();

	if status.is_success() {
		Ok(response)
	} else {
		Err(AuthError::new(kind, status.as_u16(), response.body()).into())
	}
}

fn decode_body(kind: ExchangeKind, response: &HttpResponse) -> Result<TokenResponse, DecodeError> {
	let status = response.status().as_u16();
	let de = &mut serde_json::Deserializer::from_slice(response.body());
	let body: TokenResponse = serde_path_to_error::deserialize(de)
		.map_err(|source| DecodeError::Body { exchange: kind, status, source })?;

	if body.access_token.is_empty() {
		return Err(DecodeError::EmptyAccessToken { exchange: kind, status });
	}

	Ok(body)
}

fn parse_expiry(
	kind: ExchangeKind,
	status: u16,
	raw: String,
) -> Result<OffsetDateTime, DecodeError> {
	OffsetDateTime::parse(&raw, &Rfc3339)
		.map_err(|source| DecodeError::InvalidExpiry { exchange: kind, status, value: raw, source })
}

fn decode_long_lived(
	descriptor: &AuthDescriptor,
	response: &HttpResponse,
) -> Result<LongLivedToken> {
	const KIND: ExchangeKind = ExchangeKind::LongLived;

	let status = response.status().as_u16();
	let body = decode_body(KIND, response)?;
	let expires_at = body.expires_at.map(|raw| parse_expiry(KIND, status, raw)).transpose()?;
	let token = LongLivedToken::new(body.access_token, descriptor.long_lived_scope.clone())
		.map_err(|_| DecodeError::EmptyAccessToken { exchange: KIND, status })?;

	Ok(token.with_token_id(parse_token_id(KIND, body.token_id)).with_expires_at(expires_at))
}

fn decode_short_lived(
	descriptor: &AuthDescriptor,
	response: &HttpResponse,
) -> Result<ShortLivedToken> {
	const KIND: ExchangeKind = ExchangeKind::ShortLived;

	let status = response.status().as_u16();
	let body = decode_body(KIND, response)?;
	let raw = body
		.expires_at
		.ok_or(DecodeError::MissingField { exchange: KIND, status, field: "expires_at" })?;
	let expires_at = parse_expiry(KIND, status, raw)?;
	let token =
		ShortLivedToken::new(body.access_token, descriptor.short_lived_scope.clone(), expires_at)
			.map_err(|_| DecodeError::EmptyAccessToken { exchange: KIND, status })?;

	Ok(token.with_token_id(parse_token_id(KIND, body.token_id)))
}

// Identifiers only feed observability, so an unusable one is dropped instead of failing.
fn parse_token_id(kind: ExchangeKind, raw: Option<String>) -> Option<TokenId> {
	let raw = raw?;

	match TokenId::new(&raw) {
		Ok(token_id) => Some(token_id),
		Err(err) => {
			obs::record_unusable_token_id(kind, &raw, &err);

			None
		},
	}
}

fn map_transport_error<E>(kind: ExchangeKind, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(kind, *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io { exchange: kind, source: inner }.into(),
		HttpClientError::Other(message) => TransportError::Other { exchange: kind, message }.into(),
		other => TransportError::Other { exchange: kind, message: other.to_string() }.into(),
	}
}
