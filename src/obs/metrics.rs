// self
use crate::obs::{ExchangeKind, ExchangeOutcome};

/// Records an exchange outcome via the global metrics recorder (when enabled).
pub fn record_exchange_outcome(kind: ExchangeKind, outcome: ExchangeOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"tiered_token_exchange_total",
			"exchange" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a cache hit that avoided a short-lived exchange (when enabled).
pub fn record_cache_hit() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("tiered_token_cache_hit_total").increment(1);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_exchange_outcome(ExchangeKind::LongLived, ExchangeOutcome::Failure);
		record_cache_hit();
	}
}
