//!
//! HTTP signature handling for federated server-to-server requests
//!
//! Implements the cavage draft signature scheme as deployed across the
//! fediverse. Only asymmetric signing schemes are supported.
//!

#![forbid(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    forbidden_lint_groups
)]

use http::HeaderName;

pub mod cavage;
pub mod crypto;
pub mod digest;

/// Name of the header carrying the cavage signature
pub static SIGNATURE_HEADER: HeaderName = HeaderName::from_static("signature");

/// Name of the header asserting a hash over the request body
pub static DIGEST_HEADER: HeaderName = HeaderName::from_static("digest");
