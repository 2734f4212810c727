//! Token lifecycle orchestration with caching and singleflight guards.
//!
//! [`TokenManager`] holds the client credentials and two token slots. The long-lived token is
//! acquired lazily the first time a short-lived token is needed and reused afterwards. The
//! short-lived token is cached until `now >= expires_at - safety_margin`, at which point the
//! next [`TokenManager::ensure_valid_token`] call exchanges the long-lived token again.
//! Every path that talks to the authorization service runs under one async singleflight
//! guard, so concurrent callers piggy-back on the same in-flight refresh instead of
//! stampeding the token endpoints.

pub mod metrics;
pub mod state;

pub use metrics::*;
pub use state::{RefreshPlan, TokenState};

// self
use crate::{
	_prelude::*,
	auth::{Credentials, LongLivedToken, ShortLivedToken},
	context::AuthContext,
	descriptor::AuthDescriptor,
	exchange::{RevocationOutcome, TokenExchange},
	http::TokenHttpClient,
	obs::{self, ExchangeKind, ExchangeOutcome, ExchangeSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use state::TokenSlots;

#[cfg(feature = "reqwest")]
/// Manager specialized for the crate's default reqwest transport.
pub type ReqwestTokenManager = TokenManager<ReqwestHttpClient>;

/// Owns the credentials and token state for one logical API client.
///
/// Clones share the transport, token slots, singleflight guard, and metrics, so a manager
/// can be handed to many tasks. It is the sole mutator of its token state.
pub struct TokenManager<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// HTTP transport used for every exchange.
	pub http_client: Arc<C>,
	/// Endpoints, scopes, and refresh policy.
	pub descriptor: Arc<AuthDescriptor>,
	/// Exchange counters shared by every clone.
	pub metrics: Arc<ExchangeMetrics>,
	credentials: Arc<Credentials>,
	slots: Arc<RwLock<TokenSlots>>,
	singleflight: Arc<AsyncMutex<()>>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a manager that reuses the caller-provided transport.
	pub fn with_http_client(
		credentials: Credentials,
		descriptor: AuthDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor: Arc::new(descriptor),
			metrics: Default::default(),
			credentials: Arc::new(credentials),
			slots: Default::default(),
			singleflight: Default::default(),
		}
	}

	/// Client credentials used for long-lived exchanges.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Exchanges the client credentials for a new long-lived token and stores it.
	///
	/// Always contacts the service. Failures are returned as-is and leave the slot untouched.
	pub async fn acquire_long_lived_token(&self) -> Result<LongLivedToken> {
		let span = ExchangeSpan::new(ExchangeKind::LongLived, "acquire_long_lived_token");

		span.instrument(async move {
			let _singleflight = self.singleflight.lock().await;

			self.exchange_long_lived().await
		})
		.await
	}

	/// Exchanges the long-lived token for a new short-lived token and stores it.
	///
	/// Acquires the long-lived token first when none is held. A long-lived failure is
	/// returned unchanged and no short-lived request is sent.
	pub async fn acquire_short_lived_token(&self) -> Result<ShortLivedToken> {
		let span = ExchangeSpan::new(ExchangeKind::ShortLived, "acquire_short_lived_token");

		span.instrument(async move {
			let _singleflight = self.singleflight.lock().await;
			let plan = self.slots.read().exchange_plan();

			self.execute(plan).await
		})
		.await
	}

	/// Returns a short-lived token valid for at least the safety margin.
	///
	/// A cached token that is still valid is returned without a network call. Otherwise the
	/// caller waits on the singleflight guard, re-checks the cache (another caller may have
	/// refreshed it meanwhile), and performs at most the exchanges the plan requires.
	///
	/// A freshly issued token is returned as-is, even when the service granted a lifetime
	/// shorter than the safety margin; the next call exchanges again.
	pub async fn ensure_valid_token(&self) -> Result<ShortLivedToken> {
		let margin = self.descriptor.policy.safety_margin;
		let plan = self.slots.read().plan_at(OffsetDateTime::now_utc(), margin);

		if let RefreshPlan::UseCached(token) = plan {
			self.record_reuse(&token);

			return Ok(token);
		}

		let span = ExchangeSpan::new(ExchangeKind::ShortLived, "ensure_valid_token");

		span.instrument(async move {
			let _singleflight = self.singleflight.lock().await;
			let plan = self.slots.read().plan_at(OffsetDateTime::now_utc(), margin);

			self.execute(plan).await
		})
		.await
	}

	/// Ensures a valid short-lived token and wraps it for downstream requests.
	pub async fn build_authenticated_context(&self) -> Result<AuthContext> {
		let token = self.ensure_valid_token().await?;

		Ok(AuthContext::from(&token))
	}

	/// Replaces the short-lived token regardless of its remaining lifetime.
	///
	/// The held long-lived token is reused; one is acquired first only when none is held.
	/// Cached tokens are only replaced by successful exchanges.
	pub async fn refresh_tokens(&self) -> Result<ShortLivedToken> {
		let span = ExchangeSpan::new(ExchangeKind::ShortLived, "refresh_tokens");

		span.instrument(async move {
			let _singleflight = self.singleflight.lock().await;
			let plan = self.slots.read().exchange_plan();

			self.execute(plan).await
		})
		.await
	}

	/// Drops the cached short-lived token so the next call to
	/// [`TokenManager::ensure_valid_token`] refreshes it.
	///
	/// Use this when a downstream API rejects a token before its reported expiry.
	pub fn invalidate_short_token(&self) -> Option<ShortLivedToken> {
		self.slots.write().short.take()
	}

	/// Revokes the cached short-lived token and clears its slot.
	///
	/// Returns `Ok(None)` without contacting the service when no short-lived token is cached
	/// or the cached token carries no identifier. A `404` counts as
	/// [`RevocationOutcome::AlreadyRevoked`].
	pub async fn revoke_short_token(&self) -> Result<Option<RevocationOutcome>> {
		const KIND: ExchangeKind = ExchangeKind::Revocation;

		let span = ExchangeSpan::new(KIND, "revoke_short_token");

		span.instrument(async move {
			let _singleflight = self.singleflight.lock().await;
			let cached = self.slots.read().short.clone();
			let Some((token, token_id)) =
				cached.and_then(|token| token.token_id.clone().map(|id| (token, id)))
			else {
				return Ok(None);
			};

			self.begin(KIND);

			let result = self.exchange().revoke(&token_id, &token.value).await;
			let outcome = self.finish(KIND, result)?;

			self.slots.write().short = None;

			obs::record_token_revoked(&token_id, outcome == RevocationOutcome::AlreadyRevoked);

			Ok(Some(outcome))
		})
		.await
	}

	/// Current lifecycle state of the token slots.
	pub fn state(&self) -> TokenState {
		self.slots.read().state_at(OffsetDateTime::now_utc(), self.descriptor.policy.safety_margin)
	}

	/// Snapshot of the held long-lived token.
	pub fn long_lived_token(&self) -> Option<LongLivedToken> {
		self.slots.read().long.clone()
	}

	/// Snapshot of the cached short-lived token.
	pub fn short_lived_token(&self) -> Option<ShortLivedToken> {
		self.slots.read().short.clone()
	}

	fn exchange(&self) -> TokenExchange<'_, C> {
		TokenExchange::new(&self.descriptor, &self.http_client)
	}

	// Callers hold the singleflight guard.
	async fn execute(&self, plan: RefreshPlan) -> Result<ShortLivedToken> {
		match plan {
			RefreshPlan::UseCached(token) => {
				self.record_reuse(&token);

				Ok(token)
			},
			RefreshPlan::ExchangeShort(long) => self.exchange_short_lived(&long).await,
			RefreshPlan::AcquireLongThenShort => {
				let long = self.exchange_long_lived().await?;

				self.exchange_short_lived(&long).await
			},
		}
	}

	async fn exchange_long_lived(&self) -> Result<LongLivedToken> {
		const KIND: ExchangeKind = ExchangeKind::LongLived;

		self.begin(KIND);

		let result = self.exchange().request_long_lived(&self.credentials).await;
		let token = self.finish(KIND, result)?;

		obs::record_token_issued(KIND, token.token_id.as_ref(), token.expires_at);

		self.slots.write().long = Some(token.clone());

		Ok(token)
	}

	async fn exchange_short_lived(&self, long: &LongLivedToken) -> Result<ShortLivedToken> {
		const KIND: ExchangeKind = ExchangeKind::ShortLived;

		self.begin(KIND);

		let result = self.exchange().request_short_lived(long).await;

		if matches!(&result, Err(Error::Auth(err)) if err.status == 401) {
			// The long-lived token was rejected; the next acquisition mints a new one.
			self.slots.write().long = None;
		}

		let token = self.finish(KIND, result)?;

		obs::record_token_issued(KIND, token.token_id.as_ref(), Some(token.expires_at));

		self.slots.write().short = Some(token.clone());

		Ok(token)
	}

	fn begin(&self, kind: ExchangeKind) {
		self.metrics.record_attempt();

		obs::record_exchange_outcome(kind, ExchangeOutcome::Attempt);
	}

	fn finish<T>(&self, kind: ExchangeKind, result: Result<T>) -> Result<T> {
		match &result {
			Ok(_) => {
				self.metrics.record_success();

				obs::record_exchange_outcome(kind, ExchangeOutcome::Success);
			},
			Err(err) => {
				self.metrics.record_failure();

				obs::record_exchange_outcome(kind, ExchangeOutcome::Failure);
				obs::record_exchange_failed(kind, err);
			},
		}

		result
	}

	fn record_reuse(&self, token: &ShortLivedToken) {
		self.metrics.record_cache_hit();

		obs::record_cache_hit();
		obs::record_token_reused(token.expires_at);
	}
}
#[cfg(feature = "reqwest")]
impl TokenManager<ReqwestHttpClient> {
	/// Creates a manager backed by a reqwest transport.
	///
	/// The transport applies the descriptor's request timeout (30 seconds by default) and
	/// never follows redirects.
	pub fn new(credentials: Credentials, descriptor: AuthDescriptor) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(descriptor.policy.request_timeout_std())?;

		Ok(Self::with_http_client(credentials, descriptor, http_client))
	}
}
impl<C> Clone for TokenManager<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			metrics: self.metrics.clone(),
			credentials: self.credentials.clone(),
			slots: self.slots.clone(),
			singleflight: self.singleflight.clone(),
		}
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("descriptor", &self.descriptor)
			.field("client_id", self.credentials.client_id())
			.field("state", &self.state())
			.finish()
	}
}
