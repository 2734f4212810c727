//! Optional observability helpers for token exchanges.
//!
//! # Feature Flags
//!
//! - `tracing` (default) emits spans named `tiered_token.exchange` with the `exchange` (tier) and
//!   `stage` (call site) fields, plus `info` events carrying the issued token identifier. Token
//!   values are never recorded.
//! - `metrics` increments the `tiered_token_exchange_total` counter for every
//!   attempt/success/failure, labeled by `exchange` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Network exchanges performed against the authorization service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
	/// Client credentials → long-lived token.
	LongLived,
	/// Long-lived token → short-lived token.
	ShortLived,
	/// Short-lived token revocation.
	Revocation,
}
impl ExchangeKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeKind::LongLived => "long_lived",
			ExchangeKind::ShortLived => "short_lived",
			ExchangeKind::Revocation => "revocation",
		}
	}
}
impl Display for ExchangeKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExchangeOutcome {
	/// Entry to a manager operation that contacts the service.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl ExchangeOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ExchangeOutcome::Attempt => "attempt",
			ExchangeOutcome::Success => "success",
			ExchangeOutcome::Failure => "failure",
		}
	}
}
impl Display for ExchangeOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
