//!
//! Utilities for handling signature strings
//!

use super::SignatureHeader;
use miette::Diagnostic;
use std::fmt::Write;
use thiserror::Error;

/// Signature string error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Header had an invalid value (non-UTF8 value)
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::ToStrError),

    /// Header is missing from the request
    #[error("Missing header value: {0}")]
    MissingHeaderValue(String),
}

/// Construct a new signature string from a parsed signature header and the head of an HTTP request
///
/// The header names listed in the signature header are looked up on the request
/// verbatim. Pseudo-headers other than `(request-target)` cannot be
/// reconstructed from the request head and are treated as missing.
#[inline]
pub fn construct(
    parts: &http::request::Parts,
    signature_header: &SignatureHeader<'_>,
) -> Result<String, Error> {
    let mut signature_string = String::new();
    for name in &signature_header.headers {
        match *name {
            name @ "(request-target)" => {
                let method = parts.method.as_str().to_lowercase();
                let path_and_query = parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path(), |path_and_query| path_and_query.as_str());

                let _ = writeln!(signature_string, "{name}: {method} {path_and_query}");
            }
            header => {
                let value = parts
                    .headers
                    .get(header)
                    .ok_or_else(|| Error::MissingHeaderValue(header.to_string()))?
                    .to_str()?;

                let _ = writeln!(signature_string, "{}: {}", header.to_lowercase(), value);
            }
        }
    }

    // Remove the last new-line
    signature_string.pop();

    Ok(signature_string)
}
