//! Credential and token models shared by the manager, the wire codec, and callers.

pub mod credentials;
pub mod id;
pub mod scope;
pub mod token;

pub use credentials::*;
pub use id::*;
pub use scope::*;
pub use token::{TokenError, long::*, secret::*, short::*};
