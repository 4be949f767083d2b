use super::SignatureHeader;
use std::fmt::Write;

/// Serialise a signature header back into its wire representation
#[inline]
#[must_use]
pub fn serialise(header: &SignatureHeader<'_>) -> String {
    let mut buffer = String::new();

    let _ = write!(buffer, "keyId=\"{}\"", header.key_id);
    let _ = write!(buffer, ",algorithm=\"{}\"", header.algorithm);
    let _ = write!(buffer, ",headers=\"{}\"", header.headers.join(" "));
    let _ = write!(
        buffer,
        ",signature=\"{}\"",
        base64_simd::STANDARD.encode_to_string(&header.signature)
    );

    buffer
}

#[cfg(test)]
mod test {
    use crate::cavage::SignatureHeader;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip() {
        let header = SignatureHeader {
            key_id: "https://example.com/users/test#main-key",
            algorithm: "rsa-sha256",
            headers: vec!["(request-target)", "host", "date"],
            signature: b"test signature".to_vec(),
        };

        let raw = super::serialise(&header);
        let reparsed = crate::cavage::parse(&raw).unwrap();

        assert_eq!(reparsed.key_id, header.key_id);
        assert_eq!(reparsed.algorithm, header.algorithm);
        assert_eq!(reparsed.headers, header.headers);
        assert_eq!(reparsed.signature, header.signature);
    }
}
