//!
//! Handling of the `Digest` header carried by federated POST requests
//!

use miette::Diagnostic;
use sha2::{Digest, Sha256};
use std::str::FromStr;
use strum::{AsRefStr, EnumString};
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Digest header error
#[derive(Debug, Diagnostic, Error, PartialEq, Eq)]
pub enum Error {
    /// Header didn't follow the `algorithm=value` form
    #[error("Malformed digest header")]
    MalformedHeader,

    /// Body hash didn't match the asserted digest
    #[error("Digest mismatch")]
    Mismatch,

    /// Digest algorithm isn't on the allow-list
    #[error("Unsupported digest algorithm")]
    UnsupportedAlgorithm,
}

#[derive(AsRefStr, Clone, Copy, Default, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum Algorithm {
    #[default]
    #[strum(serialize = "SHA-256")]
    Sha256,
}

impl Algorithm {
    pub fn digest(&self, data: impl AsRef<[u8]>) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
        }
    }
}

/// Compute the digest header value for a request body
#[must_use]
pub fn header_value(algorithm: Algorithm, body: &[u8]) -> String {
    let hash = algorithm.digest(body);
    format!(
        "{}={}",
        algorithm.as_ref(),
        base64_simd::STANDARD.encode_to_string(hash)
    )
}

/// Verify the digest header of a request against the raw body bytes
///
/// The comparison of the asserted and the recomputed digest runs in
/// constant time.
pub fn verify(header: &str, body: &[u8]) -> Result<(), Error> {
    let (algorithm_name, asserted_digest) =
        header.split_once('=').ok_or(Error::MalformedHeader)?;
    let algorithm =
        Algorithm::from_str(algorithm_name).map_err(|_| Error::UnsupportedAlgorithm)?;

    let hash = algorithm.digest(body);
    let expected_digest = base64_simd::STANDARD.encode_to_string(hash);

    if expected_digest
        .as_bytes()
        .ct_eq(asserted_digest.as_bytes())
        .into()
    {
        Ok(())
    } else {
        Err(Error::Mismatch)
    }
}
