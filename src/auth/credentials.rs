//! Client credentials held by a token manager for its whole lifetime.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, IdentifierError, TokenSecret},
};

/// Errors raised while validating client credentials.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// The client identifier failed validation.
	#[error(transparent)]
	ClientId(#[from] IdentifierError),
	/// The client secret was empty.
	#[error("Client secret cannot be empty.")]
	EmptySecret,
}

/// Immutable `client_id`/`client_secret` pair issued out-of-band by the service provider.
#[derive(Clone)]
pub struct Credentials {
	client_id: ClientId,
	client_secret: TokenSecret,
}
impl Credentials {
	/// Validates and wraps a credential pair.
	pub fn new(
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self, CredentialsError> {
		let client_id = ClientId::new(client_id)?;
		let client_secret = TokenSecret::new(client_secret);

		if client_secret.is_empty() {
			return Err(CredentialsError::EmptySecret);
		}

		Ok(Self { client_id, client_secret })
	}

	/// Client identifier sent with the long-lived token request.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Client secret; callers must avoid logging the exposed value.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.finish()
	}
}
