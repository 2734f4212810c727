// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, TokenId},
	obs::ExchangeKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedExchange<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedExchange<F> = F;

/// Span wrapper used around every exchange with the authorization service.
#[derive(Clone, Debug)]
pub struct ExchangeSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ExchangeSpan {
	/// Creates a new span tagged with the provided exchange kind + stage.
	pub fn new(kind: ExchangeKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tiered_token.exchange", exchange = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedExchange<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits the issuance event for a freshly minted token. Only the identifier is recorded.
pub fn record_token_issued(
	kind: ExchangeKind,
	token_id: Option<&TokenId>,
	expires_at: Option<OffsetDateTime>,
) {
	#[cfg(feature = "tracing")]
	{
		let token_id = token_id.map(TokenId::as_str).unwrap_or("<none>");

		match expires_at {
			Some(expires_at) => tracing::info!(
				exchange = kind.as_str(),
				token_id,
				%expires_at,
				"Token issued."
			),
			None => tracing::info!(exchange = kind.as_str(), token_id, "Token issued."),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, token_id, expires_at);
	}
}

/// Emits a debug event when a cached short-lived token satisfies the caller.
pub fn record_token_reused(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%expires_at, "Reusing cached short-lived token.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}

/// Emits a warning when an exchange fails. The status is present for rejected requests.
pub fn record_exchange_failed(kind: ExchangeKind, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(exchange = kind.as_str(), status = error.status(), "{error}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}

/// Emits a warning when the service reports a token identifier that fails validation.
pub fn record_unusable_token_id(kind: ExchangeKind, raw: &str, error: &IdentifierError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(exchange = kind.as_str(), token_id = raw, "Ignoring token id: {error}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, raw, error);
	}
}

/// Emits the revocation event for a short-lived token.
pub fn record_token_revoked(token_id: &TokenId, already_revoked: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(token_id = token_id.as_str(), already_revoked, "Token revoked.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (token_id, already_revoked);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = ExchangeSpan::new(ExchangeKind::ShortLived, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn event_helpers_accept_missing_identifiers() {
		record_token_issued(ExchangeKind::ShortLived, None, None);
		record_token_reused(OffsetDateTime::now_utc());
		record_unusable_token_id(
			ExchangeKind::LongLived,
			"tok 1",
			&IdentifierError::ContainsWhitespace { kind: "Token" },
		);
	}
}
