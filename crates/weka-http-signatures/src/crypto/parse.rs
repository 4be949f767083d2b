//!
//! Parse cryptographic keys for use in the HTTP signature implementations
//!

use const_oid::ObjectIdentifier;
use miette::Diagnostic;
use pkcs8::{Document, PrivateKeyInfo, SecretDocument, SubjectPublicKeyInfoRef};
use ring::signature::RsaKeyPair;
use thiserror::Error;

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Malformed PKCS#8 document
    #[error(transparent)]
    Pkcs8(#[from] pkcs8::Error),

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

/// Parse a public key from its SPKI PEM form into its algorithm OID and raw key bytes
///
/// The caller decides which OIDs it accepts. Keys that decode but carry
/// no key material are rejected as malformed.
#[inline]
pub fn public_key(pem: &str) -> Result<(ObjectIdentifier, Vec<u8>), Error> {
    let (_pem_tag, document) = Document::from_pem(pem)?;
    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg()?;

    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?
        .to_vec();

    Ok((spki.algorithm.oid, raw_bytes))
}

/// Parse an RSA private key from its PKCS#8 PEM form
///
/// This function uses constant-time PEM decoding and zeroizes any temporary allocations.
#[inline]
pub fn private_key(pem: &str) -> Result<RsaKeyPair, Error> {
    let (_tag_line, document) = SecretDocument::from_pem(pem)?;
    let private_key_raw: PrivateKeyInfo<'_> = document.decode_msg()?;

    if private_key_raw.algorithm.oid != const_oid::db::rfc5912::RSA_ENCRYPTION {
        return Err(Error::UnknownKeyType);
    }

    Ok(RsaKeyPair::from_der(private_key_raw.private_key)?)
}
