//! CORS filter behavior over real axum requests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::Body;
use axum::http::{HeaderValue, Request, Response, StatusCode};
use axum::{routing::get, Router};
use tower::ServiceExt;

use corsgate_gateway::{app_state::AppState, config, router};

const DOWNSTREAM_MARKER: &str = "x-downstream";

fn configured_state() -> AppState {
    let cfg = config::load_from_str(
        r#"
version: 1
cors:
  xhr_allowed_uris: ["^/uaa/userinfo$", '^/uaa/logout\.do$']
  xhr_allowed_origins: ["example.com$"]
  allowed_headers: ["Accept", "Authorization"]
  allowed_methods: ["GET", "OPTIONS"]
  max_age_secs: 1728000
"#,
    )
    .unwrap();
    AppState::new(cfg).ok().expect("state")
}

fn app(state: AppState) -> Router {
    let downstream = Router::new().route(
        "/uaa/userinfo",
        get(|| async { ([(DOWNSTREAM_MARKER, "1")], "userinfo") })
            .post(|| async { ([(DOWNSTREAM_MARKER, "1")], "posted") })
            .options(|| async { ([(DOWNSTREAM_MARKER, "1")], "options") }),
    );
    router::build_router(state, downstream)
}

async fn send(app: Router, req: Request<Body>) -> Response<Body> {
    app.oneshot(req).await.unwrap()
}

fn header<'a>(resp: &'a Response<Body>, name: &str) -> Option<&'a str> {
    resp.headers().get(name).map(|v| v.to_str().unwrap())
}

#[tokio::test]
async fn standard_request_gets_wildcard_origin() {
    let req = Request::get("/uaa/userinfo")
        .header("Origin", "example.com")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&resp, "access-control-allow-methods"), Some("GET, POST, PUT, DELETE"));
    assert_eq!(header(&resp, "access-control-max-age"), None);
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), Some("1"));
}

#[tokio::test]
async fn malicious_origin_is_forbidden() {
    let req = Request::get("/uaa/userinfo")
        .header("Origin", "<script>alert('1ee7 h@x0r')</script>")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(header(&resp, "access-control-allow-origin"), None);
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), None);
}

#[tokio::test]
async fn xhr_request_echoes_origin() {
    let req = Request::get("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("example.com"));
    assert_eq!(header(&resp, "access-control-allow-methods"), Some("GET"));
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), Some("1"));
}

#[tokio::test]
async fn same_origin_request_reaches_handler_untouched() {
    let req = Request::get("/uaa/userinfo")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), None);
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), Some("1"));
}

#[tokio::test]
async fn forbidden_origin_and_uri() {
    let state = configured_state();

    let req = Request::get("/uaa/userinfo")
        .header("Origin", "bunnyoutlet.com")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(app(state.clone()), req).await.status(), StatusCode::FORBIDDEN);

    let req = Request::get("/uaa/login")
        .header("Origin", "example.com")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(app(state), req).await.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn xhr_method_not_allowed() {
    let req = Request::post("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), None);
}

#[tokio::test]
async fn standard_preflight_short_circuits() {
    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "Authorization")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&resp, "access-control-allow-methods"), Some("GET, POST, PUT, DELETE"));
    assert_eq!(header(&resp, "access-control-allow-headers"), Some("Accept, Authorization"));
    assert_eq!(header(&resp, "access-control-max-age"), Some("1728000"));
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), None);
}

#[tokio::test]
async fn xhr_preflight_short_circuits() {
    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "Authorization, X-Requested-With")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("example.com"));
    assert_eq!(header(&resp, "access-control-allow-methods"), Some("GET"));
    assert_eq!(
        header(&resp, "access-control-allow-headers"),
        Some("Authorization, X-Requested-With")
    );
    assert_eq!(header(&resp, "access-control-max-age"), Some("1728000"));
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), None);
}

#[tokio::test]
async fn split_request_header_lines_are_folded() {
    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "Authorization")
        .header("Access-Control-Request-Headers", "X-Requested-With")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(header(&resp, "access-control-allow-origin"), Some("example.com"));
    assert_eq!(
        header(&resp, "access-control-allow-headers"),
        Some("Authorization, X-Requested-With")
    );
}

#[tokio::test]
async fn preflight_rejections() {
    let state = configured_state();
    let cases = [
        (
            "/uaa/userinfo",
            "bunnyoutlet.com",
            "GET",
            "Authorization, X-Requested-With",
            StatusCode::FORBIDDEN,
        ),
        (
            "/uaa/userinfo",
            "example.com",
            "POST",
            "Authorization, X-Requested-With",
            StatusCode::METHOD_NOT_ALLOWED,
        ),
        (
            "/uaa/userinfo",
            "example.com",
            "GET",
            "Authorization, X-Requested-With, X-Not-Allowed",
            StatusCode::FORBIDDEN,
        ),
        ("/uaa/login", "example.com", "GET", "X-Requested-With", StatusCode::FORBIDDEN),
        ("/uaa/userinfo", "bunnyoutlet.com", "GET", "X-Requested-With", StatusCode::FORBIDDEN),
    ];

    for (path, origin, method, headers, expected) in cases {
        let req = Request::options(path)
            .header("Origin", origin)
            .header("Access-Control-Request-Method", method)
            .header("Access-Control-Request-Headers", headers)
            .body(Body::empty())
            .unwrap();
        let resp = send(app(state.clone()), req).await;
        assert_eq!(resp.status(), expected, "{path} {origin} {method} {headers}");
    }
}

#[tokio::test]
async fn non_ascii_origin_is_forbidden_not_rewritten() {
    let req = Request::get("/uaa/userinfo")
        .header("Origin", HeaderValue::from_bytes(b"\xffexample.com").unwrap())
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get("access-control-allow-origin").is_none());
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), None);
}

#[tokio::test]
async fn non_ascii_request_headers_are_forbidden() {
    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Method", "GET")
        .header(
            "Access-Control-Request-Headers",
            HeaderValue::from_bytes(b"Authorization, X-Requested-With, \xe9").unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.headers().get("access-control-allow-headers").is_none());
}

#[tokio::test]
async fn echoed_origin_round_trips_byte_exact() {
    let sent = "https://App.example.com:8443";
    let req = Request::get("/uaa/userinfo")
        .header("Origin", sent)
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let sent = "https://app.example.com";
    let req = Request::get("/uaa/userinfo")
        .header("Origin", sent)
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed = resp.headers().get("access-control-allow-origin").unwrap();
    assert_eq!(echoed.as_bytes(), sent.as_bytes());
}

#[tokio::test]
async fn options_probe_without_request_method_reaches_handler() {
    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Headers", "Authorization, X-Requested-With")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(configured_state()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("example.com"));
    assert_eq!(header(&resp, DOWNSTREAM_MARKER), Some("1"));
}

#[tokio::test]
async fn unconfigured_gateway_answers_standard_preflight() {
    let cfg = config::load_from_str("version: 1\n").unwrap();
    let state = AppState::new(cfg).ok().expect("state");

    let req = Request::options("/uaa/userinfo")
        .header("Origin", "example.com")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();
    let resp = send(app(state), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
    assert_eq!(header(&resp, "access-control-allow-methods"), Some("GET, POST, PUT, DELETE"));
    assert_eq!(header(&resp, "access-control-allow-headers"), Some("Authorization"));
    assert_eq!(header(&resp, "access-control-max-age"), Some("1728000"));
}

#[tokio::test]
async fn decisions_are_counted() {
    let state = configured_state();

    let req = Request::get("/uaa/userinfo")
        .header("Origin", "bunnyoutlet.com")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(Body::empty())
        .unwrap();
    send(app(state.clone()), req).await;

    let req = Request::get("/healthz").body(Body::empty()).unwrap();
    let resp = send(app(state.clone()), req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    assert_eq!(state.metrics().decisions.get(&[("outcome", "forbidden")]), 1);
    assert_eq!(state.metrics().decisions.get(&[("outcome", "pass_through")]), 1);
    assert!(state.metrics().render().contains("corsgate_decisions_total"));
}
