use weka_http_signatures::{
    cavage::{self, SignatureHeader},
    crypto,
};

mod data;

#[test]
fn sign_serialise_verify() {
    let (parts, ()) = self::data::get_request().into_parts();
    let private_key = self::data::get_private_key();
    let public_key_pem = self::data::get_public_key_pem();

    let mut header = SignatureHeader {
        key_id: "https://example.com/users/test#main-key",
        algorithm: "rsa-sha256",
        headers: vec!["(request-target)", "host", "date", "digest"],
        signature: Vec::new(),
    };

    let signature_string = cavage::signature_string::construct(&parts, &header).unwrap();
    header.signature = crypto::sign(signature_string.as_bytes(), &private_key);

    let raw = cavage::serialise(&header);
    let reparsed = cavage::parse(&raw).unwrap();
    let reconstructed = cavage::signature_string::construct(&parts, &reparsed).unwrap();

    assert_eq!(reconstructed, signature_string);

    let registry = crypto::VerifierRegistry::default();
    assert!(registry.supports(reparsed.algorithm));
    registry
        .verify(
            reparsed.algorithm,
            &public_key_pem,
            reconstructed.as_bytes(),
            &reparsed.signature,
        )
        .unwrap();
}

#[test]
fn flipped_signature_rejected() {
    let (parts, ()) = self::data::get_request().into_parts();
    let private_key = self::data::get_private_key();
    let public_key_pem = self::data::get_public_key_pem();

    let header = SignatureHeader {
        key_id: "https://example.com/users/test#main-key",
        algorithm: "rsa-sha256",
        headers: vec!["(request-target)", "host", "date"],
        signature: Vec::new(),
    };

    let signature_string = cavage::signature_string::construct(&parts, &header).unwrap();
    let mut signature = crypto::sign(signature_string.as_bytes(), &private_key);
    signature[0] ^= 0x01;

    let registry = crypto::VerifierRegistry::default();
    assert!(matches!(
        registry.verify(
            "rsa-sha256",
            &public_key_pem,
            signature_string.as_bytes(),
            &signature,
        ),
        Err(crypto::VerifyError::Verification)
    ));
}

#[test]
fn unregistered_algorithm_rejected() {
    let registry = crypto::VerifierRegistry::default();

    assert!(!registry.supports("hs2019"));
    assert!(matches!(
        registry.verify("hs2019", &self::data::get_public_key_pem(), b"msg", b"sig"),
        Err(crypto::VerifyError::UnsupportedAlgorithm)
    ));
}
