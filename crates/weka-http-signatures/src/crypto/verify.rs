use super::parse;
use const_oid::ObjectIdentifier;
use miette::Diagnostic;
use ring::signature::{UnparsedPublicKey, VerificationAlgorithm, RSA_PKCS1_2048_8192_SHA256};
use std::collections::HashMap;
use thiserror::Error;

/// Verification error
#[derive(Debug, Diagnostic, Error)]
pub enum VerifyError {
    /// Public key failed to parse
    #[error(transparent)]
    InvalidKey(#[from] parse::Error),

    /// Key type doesn't belong to the requested signature algorithm
    #[error("Key algorithm mismatch")]
    KeyAlgorithmMismatch,

    /// Signature algorithm isn't on the allow-list
    #[error("Unsupported signature algorithm")]
    UnsupportedAlgorithm,

    /// Verification failed
    #[error("Verification failed")]
    Verification,
}

#[derive(Clone, Copy)]
struct Scheme {
    key_oid: ObjectIdentifier,
    verification: &'static dyn VerificationAlgorithm,
}

/// Registry of signature algorithms accepted by this server
///
/// Maps cavage `algorithm` parameter values onto key types and
/// verification primitives. Anything not registered is rejected before
/// touching key material.
#[derive(Clone)]
pub struct VerifierRegistry {
    schemes: HashMap<&'static str, Scheme>,
}

impl VerifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemes: HashMap::new(),
        }
    }

    #[must_use]
    pub fn register(
        mut self,
        algorithm: &'static str,
        key_oid: ObjectIdentifier,
        verification: &'static dyn VerificationAlgorithm,
    ) -> Self {
        self.schemes.insert(
            algorithm,
            Scheme {
                key_oid,
                verification,
            },
        );
        self
    }

    /// Whether the algorithm name is on the allow-list
    #[must_use]
    pub fn supports(&self, algorithm: &str) -> bool {
        self.schemes.contains_key(algorithm)
    }

    /// Verify that the message corresponds with the signature using the provided PEM-encoded public key
    pub fn verify(
        &self,
        algorithm: &str,
        public_key_pem: &str,
        msg: &[u8],
        signature: &[u8],
    ) -> Result<(), VerifyError> {
        let scheme = self
            .schemes
            .get(algorithm)
            .ok_or(VerifyError::UnsupportedAlgorithm)?;

        let (key_oid, key_bytes) = parse::public_key(public_key_pem)?;
        if key_oid != scheme.key_oid {
            return Err(VerifyError::KeyAlgorithmMismatch);
        }

        UnparsedPublicKey::new(scheme.verification, key_bytes)
            .verify(msg, signature)
            .map_err(|_| VerifyError::Verification)
    }
}

impl Default for VerifierRegistry {
    fn default() -> Self {
        Self::new().register(
            "rsa-sha256",
            const_oid::db::rfc5912::RSA_ENCRYPTION,
            &RSA_PKCS1_2048_8192_SHA256,
        )
    }
}
