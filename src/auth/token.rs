//! Long-lived and short-lived token models plus the redacting secret wrapper.

pub mod long;
pub mod secret;
pub mod short;

// self
use crate::_prelude::*;

/// Errors produced while constructing token models.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TokenError {
	/// The bearer value was empty.
	#[error("Token value cannot be empty.")]
	EmptyValue,
}
