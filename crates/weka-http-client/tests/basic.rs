use bytes::Bytes;
use core::convert::Infallible;
use http::{Request, Response};
use http_body_util::Full;
use tower::service_fn;
use weka_http_client::{Body, Client};

#[tokio::test]
async fn basic_request() {
    let client = service_fn(|req: Request<Body>| async move {
        assert_eq!(req.uri().path_and_query().unwrap(), "/path");
        Ok::<_, Infallible>(Response::new(Full::new(Bytes::new())))
    });
    let client = Client::builder().service(client);

    let req = Request::builder()
        .uri("https://example.com/path")
        .body(Body::default())
        .unwrap();
    let response = client.execute(req).await.unwrap();

    assert!(response.status().is_success());
}
