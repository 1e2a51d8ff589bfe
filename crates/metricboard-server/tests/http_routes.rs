//! Full router driven in-process with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use metricboard_server::{app_state::AppState, config::ServerConfig, router};

const ORIGIN: &str = "http://workshop.example";

fn app() -> Router {
    let state = AppState::new(ServerConfig::default()).unwrap();
    router::build_router(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response {
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, ORIGIN);
    let body = match body {
        Some(b) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(b.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(req.body(body).unwrap()).await.unwrap()
}

async fn read_body(resp: Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn read_json(resp: Response) -> Value {
    serde_json::from_str(&read_body(resp).await).expect("json body")
}

fn allow_origin(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .and_then(|v| v.to_str().ok())
}

async fn register(app: &Router, name: &str) -> String {
    let body = json!({ "name": name }).to_string();
    let resp = call(app, Method::POST, "/api/register", Some(&body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let v = read_json(resp).await;
    assert_eq!(v["name"], name);
    v["user_id"].as_str().unwrap().to_string()
}

async fn submit(app: &Router, user_id: &str, key: &str, value: i64) -> Response {
    let body = json!({ "user_id": user_id, "metric_key": key, "value": value }).to_string();
    call(app, Method::POST, "/api/results", Some(&body)).await
}

#[tokio::test]
async fn liveness_banner_with_cors() {
    let app = app();
    let resp = call(&app, Method::GET, "/", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(allow_origin(&resp), Some("*"));
    assert!(resp
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());
    assert!(read_json(resp).await["message"].is_string());
}

#[tokio::test]
async fn preflight_is_answered() {
    let app = app();
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/results")
        .header(header::ORIGIN, ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert!(resp.status().is_success());
    assert_eq!(allow_origin(&resp), Some("*"));
    let h = resp.headers();
    assert_eq!(h.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "*");
    assert_eq!(h.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "*");
}

#[tokio::test]
async fn register_submit_and_aggregate() {
    let app = app();
    let a = register(&app, "Alice").await;
    let b = register(&app, "Bob").await;
    assert_ne!(a, b);

    for (id, key, value) in [
        (&a, "clicks", 3),
        (&b, "clicks", 5),
        (&a, "exp1_time1", 1200),
        (&b, "exp1_time1", 1801),
    ] {
        let resp = submit(&app, id, key, value).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_json(resp).await["status"], "ok");
    }

    let resp = call(&app, Method::GET, "/api/stats/averages", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(allow_origin(&resp), Some("*"));
    let avgs = read_json(resp).await;
    assert_eq!(avgs["clicks"]["avg"], 4.0);
    assert_eq!(avgs["clicks"]["count"], 2);
    assert_eq!(avgs["clicks"]["unit"], "Count");
    assert_eq!(avgs["exp1_time1"]["avg"], 1500.5);
    assert_eq!(avgs["exp1_time1"]["unit"], "Milliseconds");

    let resp = call(&app, Method::GET, "/api/stats/users", None).await;
    let users = read_json(resp).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["user_id"], a.as_str());
    assert_eq!(users[0]["name"], "Alice");
    assert_eq!(users[1]["name"], "Bob");
}

#[tokio::test]
async fn unknown_user_and_blank_name() {
    let app = app();

    let resp = submit(&app, "ghost", "clicks", 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(allow_origin(&resp), Some("*"));
    assert_eq!(read_json(resp).await["error"], "UNKNOWN_USER");

    let resp = call(&app, Method::POST, "/api/register", Some(r#"{"name":"  "}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["error"], "INVALID_INPUT");

    let resp = call(&app, Method::GET, "/api/stats/averages", None).await;
    assert_eq!(read_json(resp).await, json!({}));
}

#[tokio::test]
async fn malformed_bodies_get_json_errors() {
    let app = app();
    let a = register(&app, "Alice").await;

    let cases = [
        ("/api/register", "{}".to_string()),
        ("/api/register", "not json".to_string()),
        (
            "/api/results",
            json!({ "user_id": a, "metric_key": "clicks", "value": "three" }).to_string(),
        ),
    ];
    for (uri, body) in &cases {
        let resp = call(&app, Method::POST, uri, Some(body.as_str())).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri} {body}");
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let v = read_json(resp).await;
        assert_eq!(v["error"], "INVALID_INPUT");
        assert!(v["message"].as_str().unwrap().contains("malformed body"));
        assert_eq!(v["detail"], v["message"]);
    }

    let metrics = read_body(call(&app, Method::GET, "/metrics", None).await).await;
    assert!(metrics.contains("metricboard_rejections_total{code=\"INVALID_INPUT\"} 3"));

    // nothing was recorded for Alice
    let resp = call(&app, Method::GET, "/api/stats/averages", None).await;
    assert_eq!(read_json(resp).await, json!({}));
}

#[tokio::test]
async fn averages_query_is_idempotent() {
    let app = app();
    let a = register(&app, "Alice").await;
    submit(&app, &a, "exp3_r1_done", 2).await;

    let first = read_body(call(&app, Method::GET, "/api/stats/averages", None).await).await;
    let second = read_body(call(&app, Method::GET, "/api/stats/averages", None).await).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn ops_endpoints() {
    let app = app();
    let resp = call(&app, Method::GET, "/healthz", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_body(resp).await, "ok");

    register(&app, "Alice").await;
    let resp = call(&app, Method::GET, "/metrics", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_body(resp).await;
    assert!(body.contains("metricboard_registrations_total 1"));
    assert!(body.contains("metricboard_users 1"));
}
