//! Long-lived token that authorizes short-lived token exchanges.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenError, TokenId, TokenSecret},
};

/// Bearer credential minted via the client-credentials grant.
///
/// The manager acquires it once and reuses it for every short-lived exchange. The
/// server-reported expiry is kept for inspection only; it never drives refresh decisions.
#[derive(Clone)]
pub struct LongLivedToken {
	/// Bearer value; never empty.
	pub value: TokenSecret,
	/// Identifier reported by the authorization service, if it was usable.
	pub token_id: Option<TokenId>,
	/// Scopes requested when the token was issued.
	pub scope: ScopeSet,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Expiry reported by the authorization service, if any.
	pub expires_at: Option<OffsetDateTime>,
}
impl LongLivedToken {
	/// Creates a token issued now, rejecting empty bearer values.
	pub fn new(value: impl Into<String>, scope: ScopeSet) -> Result<Self, TokenError> {
		let value = TokenSecret::new(value);

		if value.is_empty() {
			return Err(TokenError::EmptyValue);
		}

		Ok(Self {
			value,
			token_id: None,
			scope,
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		})
	}

	/// Attaches the server-assigned identifier.
	pub fn with_token_id(mut self, token_id: Option<TokenId>) -> Self {
		self.token_id = token_id;

		self
	}

	/// Records the server-reported expiry.
	pub fn with_expires_at(mut self, expires_at: Option<OffsetDateTime>) -> Self {
		self.expires_at = expires_at;

		self
	}
}
impl Debug for LongLivedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LongLivedToken")
			.field("value", &"<redacted>")
			.field("token_id", &self.token_id)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
