//!
//! Parsing and serialisation of cavage `Signature` headers
//!

mod parse;
mod serialise;

pub mod signature_string;

pub use self::parse::{parse, ParseError};
pub use self::serialise::serialise;

/// Structured form of a cavage `Signature` header
///
/// Every field is required and non-empty, otherwise [`parse`] fails.
/// The order of `headers` is significant: it dictates the layout of
/// the signing string and is preserved verbatim from the wire form.
#[derive(Clone)]
pub struct SignatureHeader<'a> {
    /// Identifier of the signer and its key
    pub key_id: &'a str,

    /// Name of the signature scheme
    pub algorithm: &'a str,

    /// Ordered list of the request parts covered by the signature
    pub headers: Vec<&'a str>,

    /// Decoded signature bytes
    pub signature: Vec<u8>,
}
