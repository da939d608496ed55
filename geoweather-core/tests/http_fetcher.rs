//! `HttpFetcher` against a local axum server on a random port.

use std::{net::SocketAddr, time::Duration};

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::Redirect,
    routing::get,
};
use geoweather_core::{FetchError, Fetcher, HttpFetcher, WeatherError, config::HttpSettings};

const BODY_LEN: usize = 256 * 1024;

fn big_body() -> String {
    (0..BODY_LEN).map(|i| char::from(b'a' + (i % 26) as u8)).collect()
}

async fn agent(headers: HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/body", get(|| async { big_body() }))
        .route("/moved", get(|| async { Redirect::temporary("/body") }))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/agent", get(agent))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route("/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    addr
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(HttpSettings {
        timeout_secs: 1,
        max_redirects: 3,
        user_agent: "weather_app/1.0".to_string(),
        max_body_bytes: None,
    })
}

#[tokio::test]
async fn assembles_the_whole_body() {
    let addr = serve().await;

    let body = fetcher().get(&format!("http://{addr}/body")).await.unwrap();

    assert_eq!(body.len(), BODY_LEN);
    assert_eq!(body.as_bytes(), big_body().as_bytes());
    assert_eq!(body.as_bytes_with_nul().last(), Some(&0));
}

#[tokio::test]
async fn follows_redirects() {
    let addr = serve().await;

    let body = fetcher().get(&format!("http://{addr}/moved")).await.unwrap();
    assert_eq!(body.len(), BODY_LEN);
}

#[tokio::test]
async fn redirect_loop_is_a_transport_failure() {
    let addr = serve().await;

    let err = fetcher().get(&format!("http://{addr}/loop")).await.unwrap_err();
    assert!(matches!(err, FetchError::Redirect(_)), "got {err:?}");
}

#[tokio::test]
async fn sends_identification_header() {
    let addr = serve().await;

    let body = fetcher().get(&format!("http://{addr}/agent")).await.unwrap();
    assert_eq!(body.as_bytes(), b"weather_app/1.0");
}

#[tokio::test]
async fn non_success_status_is_rejected() {
    let addr = serve().await;

    let err = fetcher().get(&format!("http://{addr}/missing")).await.unwrap_err();
    assert_eq!(err, FetchError::Status { status: 404 });
}

#[tokio::test]
async fn slow_server_times_out() {
    let addr = serve().await;

    let err = fetcher().get(&format!("http://{addr}/slow")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_is_reported() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = fetcher().get(&format!("http://{addr}/body")).await.unwrap_err();
    assert!(matches!(err, FetchError::Connect(_)), "got {err:?}");
}

#[tokio::test]
async fn a_failed_call_does_not_affect_the_next() {
    let addr = serve().await;
    let fetcher = fetcher();

    assert!(fetcher.get(&format!("http://{addr}/missing")).await.is_err());
    let body = fetcher.get(&format!("http://{addr}/agent")).await.unwrap();
    assert_eq!(body.as_bytes(), b"weather_app/1.0");
}

#[tokio::test]
async fn oversized_body_is_abandoned() {
    let addr = serve().await;
    let fetcher = HttpFetcher::new(HttpSettings {
        timeout_secs: 1,
        max_body_bytes: Some(1024),
        ..HttpSettings::default()
    });

    let err = fetcher.get(&format!("http://{addr}/body")).await.unwrap_err();
    match &err {
        FetchError::Accumulate { received } => assert!(*received <= 1024, "kept {received} bytes"),
        other => panic!("expected Accumulate, got {other:?}"),
    }
    assert_eq!(WeatherError::GeocodeTransport(err).exit_code(), 3);

    let body = fetcher.get(&format!("http://{addr}/agent")).await.unwrap();
    assert_eq!(body.as_bytes(), b"weather_app/1.0");
}
