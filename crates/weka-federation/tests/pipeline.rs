use bytes::Bytes;
use core::convert::Infallible;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tower::service_fn;
use triomphe::Arc;
use weka_cache::{AnyCache, InMemoryCache};
use weka_federation::{
    AuthPipeline, HttpActorResolver, JsonCanonicalizer, Outcome, RejectionReason,
};
use weka_http_client::{Body, Client};

mod data;

fn build_pipeline(
    client: Client,
    required_covered_headers: Vec<String>,
) -> AuthPipeline<JsonCanonicalizer, HttpActorResolver> {
    let cache = Arc::new(AnyCache::from(InMemoryCache::new(
        10,
        Duration::from_secs(60),
    )));

    let resolver = HttpActorResolver::builder()
        .client(client)
        .cache(cache)
        .fetch_timeout(Duration::from_millis(100))
        .max_attempts(1)
        .build();

    AuthPipeline::builder()
        .canonicalizer(JsonCanonicalizer)
        .resolver(resolver)
        .required_covered_headers(required_covered_headers)
        .build()
}

fn actor_client() -> Client {
    let public_key_pem = data::get_public_key_pem();

    Client::builder().service(service_fn(move |req: Request<Body>| {
        let public_key_pem = public_key_pem.clone();
        async move {
            assert_eq!(req.uri().to_string(), data::ACTOR_ID);
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(data::actor_document(
                &public_key_pem,
            )))))
        }
    }))
}

#[tokio::test]
async fn trusted_delivery() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Trusted(data::ACTOR_ID.to_string())
    );
}

#[tokio::test]
async fn embedded_actor_object_delivery() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = serde_json::to_vec(&serde_json::json!({
        "id": "https://example.com/activities/3",
        "type": "Follow",
        "actor": { "id": data::ACTOR_ID },
        "object": "https://weka.example/users/admin",
    }))
    .unwrap();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Trusted(data::ACTOR_ID.to_string())
    );
}

#[tokio::test]
async fn flipped_signature_rejected() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = data::activity_body();
    let parts = data::badly_signed_parts(&body);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::InvalidSignature)
    );
}

#[tokio::test]
async fn tampered_body_with_digest() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    let mut tampered = body.clone();
    let position = tampered.len() - 2;
    tampered[position] ^= 0x01;

    assert_eq!(
        pipeline.authenticate(&parts, &tampered).await,
        Outcome::Rejected(RejectionReason::DigestMismatch)
    );
}

#[tokio::test]
async fn body_not_bound_without_digest() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", false);

    // Without a digest header the signature only covers the head.
    // A swapped body with the same actor still authenticates.
    let swapped = serde_json::to_vec(&serde_json::json!({
        "id": "https://example.com/activities/2",
        "type": "Like",
        "actor": data::ACTOR_ID,
        "object": "https://weka.example/notes/1",
    }))
    .unwrap();

    assert_eq!(
        pipeline.authenticate(&parts, &swapped).await,
        Outcome::Trusted(data::ACTOR_ID.to_string())
    );
}

#[tokio::test]
async fn unknown_actor() {
    let client = Client::builder().service(service_fn(|_req: Request<Body>| async move {
        let response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::new()))
            .unwrap();

        Ok::<_, Infallible>(response)
    }));
    let pipeline = build_pipeline(client, Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::UnknownActor)
    );
}

#[tokio::test]
async fn foreign_actor_document_rejected() {
    let public_key_pem = data::get_public_key_pem();
    let client = Client::builder().service(service_fn(move |_req: Request<Body>| {
        let document = data::actor_document(&public_key_pem)
            .replace(data::ACTOR_ID, "https://malicious.example/users/test");

        async move { Ok::<_, Infallible>(Response::new(Full::new(Bytes::from(document)))) }
    }));
    let pipeline = build_pipeline(client, Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::UnknownActor)
    );
}

#[tokio::test]
async fn unsupported_algorithm_skips_resolution() {
    let client = Client::builder().service(service_fn(|_req: Request<Body>| async move {
        panic!("resolver must not be reached");

        #[allow(unreachable_code)]
        {
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::new())))
        }
    }));
    let pipeline = build_pipeline(client, Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "hs2019", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::UnsupportedAlgorithm)
    );
}

#[tokio::test]
async fn resolution_timeout() {
    let client = Client::builder().service(service_fn(|_req: Request<Body>| async move {
        std::future::pending::<Result<Response<Full<Bytes>>, Infallible>>().await
    }));
    let pipeline = build_pipeline(client, Vec::new());

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", true);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::ActorResolutionTimeout)
    );
}

#[tokio::test]
async fn required_covered_headers_enforced() {
    let pipeline = build_pipeline(actor_client(), vec!["digest".to_string()]);

    let body = data::activity_body();
    let parts = data::signed_parts(&body, "rsa-sha256", false);

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::MissingSignedHeader)
    );
}

#[tokio::test]
async fn missing_signature_header() {
    let pipeline = build_pipeline(actor_client(), Vec::new());

    let body = data::activity_body();
    let (parts, ()) = Request::builder()
        .method(http::Method::POST)
        .uri("https://weka.example/users/admin/inbox")
        .body(())
        .unwrap()
        .into_parts();

    assert_eq!(
        pipeline.authenticate(&parts, &body).await,
        Outcome::Rejected(RejectionReason::MalformedSignatureHeader)
    );
}
