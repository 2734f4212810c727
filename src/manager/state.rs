//! Token slots plus the pure decisions derived from them.

// self
use crate::{
	_prelude::*,
	auth::{LongLivedToken, ShortLivedToken, TokenStatus},
};

/// Observable lifecycle state of a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// Neither token has been acquired.
	NoToken,
	/// A long-lived token is held but no short-lived token is cached.
	HasLongToken,
	/// The cached short-lived token is valid beyond the safety margin.
	HasValidShortToken,
	/// The cached short-lived token is inside the safety margin or already expired.
	ShortTokenExpiring,
}

/// Work required to produce a valid short-lived token.
#[derive(Clone, Debug)]
pub enum RefreshPlan {
	/// The cached short-lived token can be returned without a network call.
	UseCached(ShortLivedToken),
	/// A long-lived token is held; one short-lived exchange is needed.
	ExchangeShort(LongLivedToken),
	/// No long-lived token is held; both exchanges are needed, long first.
	AcquireLongThenShort,
}
impl RefreshPlan {
	/// Number of round-trips the plan performs.
	pub fn round_trips(&self) -> usize {
		match self {
			Self::UseCached(_) => 0,
			Self::ExchangeShort(_) => 1,
			Self::AcquireLongThenShort => 2,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TokenSlots {
	pub(crate) long: Option<LongLivedToken>,
	pub(crate) short: Option<ShortLivedToken>,
}
impl TokenSlots {
	/// Plans an unconditional short-lived exchange.
	pub(crate) fn exchange_plan(&self) -> RefreshPlan {
		match &self.long {
			Some(long) => RefreshPlan::ExchangeShort(long.clone()),
			None => RefreshPlan::AcquireLongThenShort,
		}
	}

	/// Plans the cheapest way to a short-lived token valid at `now`.
	pub(crate) fn plan_at(&self, now: OffsetDateTime, margin: Duration) -> RefreshPlan {
		match &self.short {
			Some(short) if short.is_valid_at(now, margin) => RefreshPlan::UseCached(short.clone()),
			_ => self.exchange_plan(),
		}
	}

	pub(crate) fn state_at(&self, now: OffsetDateTime, margin: Duration) -> TokenState {
		match (&self.long, &self.short) {
			(_, Some(short)) => match short.status_at(now, margin) {
				TokenStatus::Valid => TokenState::HasValidShortToken,
				TokenStatus::Expiring | TokenStatus::Expired => TokenState::ShortTokenExpiring,
			},
			(Some(_), None) => TokenState::HasLongToken,
			(None, None) => TokenState::NoToken,
		}
	}
}
