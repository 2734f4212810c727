//! Crate-level error types shared by the manager, codec, and transports.

// self
use crate::{_prelude::*, obs::ExchangeKind};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Exchange failures come in three kinds: [`Error::Network`] when the transport fails,
/// [`Error::Decode`] when a response body is malformed, and [`Error::Auth`] when the
/// authorization service answers with a non-success status. None of them are retried.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Network(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Authorization service rejected the request.
	#[error(transparent)]
	Auth(#[from] AuthError),
}
impl Error {
	/// Exchange that produced the failure, when the error came from the network path.
	pub fn exchange(&self) -> Option<ExchangeKind> {
		match self {
			Self::Config(_) => None,
			Self::Network(err) => Some(err.exchange()),
			Self::Decode(err) => Some(err.exchange()),
			Self::Auth(err) => Some(err.exchange),
		}
	}

	/// HTTP status returned by the authorization service, when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Config(_) | Self::Network(_) => None,
			Self::Decode(err) => Some(err.status()),
			Self::Auth(err) => Some(err.status),
		}
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A bearer value cannot be carried in an HTTP header.
	#[error("Token value cannot be encoded as an HTTP header.")]
	InvalidHeader(#[from] oauth2::http::header::InvalidHeaderValue),
	/// An endpoint URL could not be derived.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Descriptor validation failed.
	#[error(transparent)]
	Descriptor(#[from] crate::descriptor::DescriptorError),
	/// Client credentials failed validation.
	#[error("Client credentials are invalid.")]
	Credentials(#[from] crate::auth::CredentialsError),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Serialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {exchange} endpoint.")]
	Network {
		/// Exchange in flight when the failure occurred.
		exchange: ExchangeKind,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the {exchange} endpoint.")]
	Io {
		/// Exchange in flight when the failure occurred.
		exchange: ExchangeKind,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// The transport failed without a structured error.
	#[error("HTTP client error occurred while calling the {exchange} endpoint: {message}.")]
	Other {
		/// Exchange in flight when the failure occurred.
		exchange: ExchangeKind,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		exchange: ExchangeKind,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { exchange, source: Box::new(src) }
	}

	/// Exchange in flight when the failure occurred.
	pub fn exchange(&self) -> ExchangeKind {
		match self {
			Self::Network { exchange, .. }
			| Self::Io { exchange, .. }
			| Self::Other { exchange, .. } => *exchange,
		}
	}
}

/// Malformed responses from the authorization service.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not the expected JSON document.
	#[error("The {exchange} endpoint returned malformed JSON.")]
	Body {
		/// Exchange that returned the body.
		exchange: ExchangeKind,
		/// HTTP status of the response.
		status: u16,
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Response carried an empty `access_token`.
	#[error("The {exchange} endpoint returned an empty access token.")]
	EmptyAccessToken {
		/// Exchange that returned the body.
		exchange: ExchangeKind,
		/// HTTP status of the response.
		status: u16,
	},
	/// A field required for this exchange was absent.
	#[error("The {exchange} endpoint response is missing `{field}`.")]
	MissingField {
		/// Exchange that returned the body.
		exchange: ExchangeKind,
		/// HTTP status of the response.
		status: u16,
		/// Missing field name.
		field: &'static str,
	},
	/// `expires_at` was not an RFC 3339 timestamp.
	#[error("The {exchange} endpoint returned an invalid expires_at value: {value}.")]
	InvalidExpiry {
		/// Exchange that returned the body.
		exchange: ExchangeKind,
		/// HTTP status of the response.
		status: u16,
		/// Raw value received.
		value: String,
		/// Underlying timestamp parsing failure.
		#[source]
		source: time::error::Parse,
	},
}
impl DecodeError {
	/// Exchange that returned the malformed body.
	pub fn exchange(&self) -> ExchangeKind {
		match self {
			Self::Body { exchange, .. }
			| Self::EmptyAccessToken { exchange, .. }
			| Self::MissingField { exchange, .. }
			| Self::InvalidExpiry { exchange, .. } => *exchange,
		}
	}

	/// HTTP status of the malformed response.
	pub fn status(&self) -> u16 {
		match self {
			Self::Body { status, .. }
			| Self::EmptyAccessToken { status, .. }
			| Self::MissingField { status, .. }
			| Self::InvalidExpiry { status, .. } => *status,
		}
	}
}

/// Non-success status returned by the authorization service.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("The {exchange} endpoint rejected the request with HTTP {status}.")]
pub struct AuthError {
	/// Exchange that was rejected.
	pub exchange: ExchangeKind,
	/// HTTP status code.
	pub status: u16,
	/// Leading portion of the response body, for diagnostics.
	pub body_preview: Option<String>,
}
impl AuthError {
	const PREVIEW_LIMIT: usize = 256;

	/// Builds the error, keeping at most a short preview of the body.
	pub fn new(exchange: ExchangeKind, status: u16, body: &[u8]) -> Self {
		let text = String::from_utf8_lossy(body);
		let trimmed = text.trim();
		let body_preview = if trimmed.is_empty() {
			None
		} else {
			Some(trimmed.chars().take(Self::PREVIEW_LIMIT).collect())
		};

		Self { exchange, status, body_preview }
	}

	/// Returns true for 401/403 responses.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self.status, 401 | 403)
	}
}
