//! Two-tier client-credentials token manager: exchange a long-lived credential for short-lived
//! bearer tokens, cache them, and refresh on expiry behind a singleflight guard.
//!
//! The entry point is [`manager::TokenManager`]. It owns the client credentials, acquires the
//! long-lived token lazily, exchanges it for short-lived tokens, and hands downstream callers an
//! [`context::AuthContext`] carrier that any HTTP client can attach as a bearer credential.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod exchange;
pub mod http;
pub mod manager;
pub mod obs;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
