//! Short-lived token used for domain API calls, plus its validity window.

// self
use crate::{
	_prelude::*,
	auth::{ScopeSet, TokenError, TokenId, TokenSecret},
};

/// Lifecycle status of a short-lived token relative to an instant and a safety margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// More than the safety margin remains before expiry.
	Valid,
	/// Not yet expired, but inside the safety margin; treated as needing refresh.
	Expiring,
	/// The expiry instant has passed.
	Expired,
}

/// Bearer credential obtained by exchanging a [`LongLivedToken`](crate::auth::LongLivedToken).
#[derive(Clone)]
pub struct ShortLivedToken {
	/// Bearer value; never empty.
	pub value: TokenSecret,
	/// Identifier reported by the authorization service, if any.
	pub token_id: Option<TokenId>,
	/// Scopes requested for the exchange.
	pub scope: ScopeSet,
	/// Instant the token was received.
	pub issued_at: OffsetDateTime,
	/// Absolute expiry reported by the authorization service.
	pub expires_at: OffsetDateTime,
}
impl ShortLivedToken {
	/// Creates a token issued now, rejecting empty bearer values.
	pub fn new(
		value: impl Into<String>,
		scope: ScopeSet,
		expires_at: OffsetDateTime,
	) -> Result<Self, TokenError> {
		let value = TokenSecret::new(value);

		if value.is_empty() {
			return Err(TokenError::EmptyValue);
		}

		Ok(Self {
			value,
			token_id: None,
			scope,
			issued_at: OffsetDateTime::now_utc(),
			expires_at,
		})
	}

	/// Attaches the server-assigned identifier.
	pub fn with_token_id(mut self, token_id: Option<TokenId>) -> Self {
		self.token_id = token_id;

		self
	}

	/// Instant after which the token must be refreshed (`expires_at - margin`).
	pub fn refresh_deadline(&self, margin: Duration) -> OffsetDateTime {
		self.expires_at.checked_sub(margin).unwrap_or(self.expires_at)
	}

	/// Computes the status at `instant` for the provided safety margin.
	pub fn status_at(&self, instant: OffsetDateTime, margin: Duration) -> TokenStatus {
		if instant >= self.expires_at {
			TokenStatus::Expired
		} else if instant >= self.refresh_deadline(margin) {
			TokenStatus::Expiring
		} else {
			TokenStatus::Valid
		}
	}

	/// Returns true while `instant < expires_at - margin`.
	pub fn is_valid_at(&self, instant: OffsetDateTime, margin: Duration) -> bool {
		matches!(self.status_at(instant, margin), TokenStatus::Valid)
	}

	/// Time left before expiry at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for ShortLivedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ShortLivedToken")
			.field("value", &"<redacted>")
			.field("token_id", &self.token_id)
			.field("scope", &self.scope)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
