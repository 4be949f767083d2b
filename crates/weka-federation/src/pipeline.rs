//!
//! The inbox authentication pipeline
//!

use crate::{
    canonicalize::Canonicalize,
    resolver::{ResolveActor, ResolveError},
};
use serde::Deserialize;
use typed_builder::TypedBuilder;
use weka_http_signatures::{
    cavage::{self, signature_string},
    crypto::{VerifierRegistry, VerifyError},
    digest, DIGEST_HEADER, SIGNATURE_HEADER,
};
use weka_type::ap::Activity;

/// Why a request was rejected
///
/// This taxonomy exists for logging and metrics. The peer always gets
/// the same undifferentiated client error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    MalformedSignatureHeader,
    UnsupportedAlgorithm,
    DigestMismatch,
    MissingSignedHeader,
    MalformedBody,
    UnknownActor,
    ActorResolutionTimeout,
    InvalidSignature,
}

/// Outcome of authenticating a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The request is authentic. Carries the verified actor URI.
    Trusted(String),

    /// One of the checks failed
    Rejected(RejectionReason),
}

/// Authentication pipeline for inbox deliveries
///
/// Checks run cheapest-first and the pipeline bails on the first
/// failure. Key material is only resolved once everything that can be
/// validated locally has passed.
#[derive(TypedBuilder)]
pub struct AuthPipeline<C, R> {
    canonicalizer: C,
    resolver: R,
    #[builder(default)]
    registry: VerifierRegistry,
    /// Header names that every signature has to cover, on top of
    /// whatever the peer chose to sign
    #[builder(default)]
    required_covered_headers: Vec<String>,
}

impl<C, R> AuthPipeline<C, R>
where
    C: Canonicalize,
    R: ResolveActor,
{
    /// Authenticate a single inbox delivery
    ///
    /// `parts` is the request head, `body` the raw bytes exactly as
    /// they arrived on the wire.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, parts: &http::request::Parts, body: &[u8]) -> Outcome {
        match self.run(parts, body).await {
            Ok(actor_id) => Outcome::Trusted(actor_id),
            Err(reason) => Outcome::Rejected(reason),
        }
    }

    async fn run(
        &self,
        parts: &http::request::Parts,
        body: &[u8],
    ) -> Result<String, RejectionReason> {
        let raw_signature = parts
            .headers
            .get(&SIGNATURE_HEADER)
            .ok_or(RejectionReason::MalformedSignatureHeader)?
            .to_str()
            .map_err(|_| RejectionReason::MalformedSignatureHeader)?;

        let signature_header = cavage::parse(raw_signature)
            .map_err(|_| RejectionReason::MalformedSignatureHeader)?;

        trace!(key_id = signature_header.key_id, "parsed signature header");

        if !self.registry.supports(signature_header.algorithm) {
            debug!(algorithm = signature_header.algorithm, "algorithm not on allow-list");
            return Err(RejectionReason::UnsupportedAlgorithm);
        }

        for required in &self.required_covered_headers {
            let covered = signature_header
                .headers
                .iter()
                .any(|name| name.eq_ignore_ascii_case(required));

            if !covered {
                debug!(header = required.as_str(), "required header not covered by signature");
                return Err(RejectionReason::MissingSignedHeader);
            }
        }

        // The digest binds the signed headers to the body. Validate it
        // against the raw bytes before anything gets parsed.
        if let Some(digest_header) = parts.headers.get(&DIGEST_HEADER) {
            let digest_header = digest_header
                .to_str()
                .map_err(|_| RejectionReason::DigestMismatch)?;
            digest::verify(digest_header, body).map_err(|_| RejectionReason::DigestMismatch)?;
        }

        let signature_string = signature_string::construct(parts, &signature_header)
            .map_err(|_| RejectionReason::MissingSignedHeader)?;

        let document: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| RejectionReason::MalformedBody)?;
        let document = self
            .canonicalizer
            .canonicalize(&document)
            .map_err(|_| RejectionReason::MalformedBody)?;

        let activity = Activity::deserialize(document.value())
            .map_err(|_| RejectionReason::MalformedBody)?;
        let actor_id = activity.actor.id().to_string();

        let actor_key = self.resolver.resolve(&actor_id).await.map_err(|error| {
            debug!(%actor_id, %error, "actor resolution failed");
            match error {
                ResolveError::Timeout => RejectionReason::ActorResolutionTimeout,
                _ => RejectionReason::UnknownActor,
            }
        })?;

        let registry = self.registry.clone();
        let algorithm = signature_header.algorithm.to_string();
        let signature = signature_header.signature;

        // RSA verification is CPU-bound, keep it off the async executor
        let verification = tokio::task::spawn_blocking(move || {
            registry.verify(
                &algorithm,
                &actor_key.public_key_pem,
                signature_string.as_bytes(),
                &signature,
            )
        })
        .await
        .map_err(|_| RejectionReason::InvalidSignature)?;

        verification.map_err(|error| match error {
            VerifyError::UnsupportedAlgorithm => RejectionReason::UnsupportedAlgorithm,
            _ => RejectionReason::InvalidSignature,
        })?;

        Ok(actor_id)
    }
}
