//! End-to-end tests over a real listener.

use std::convert::Infallible;

use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use serde_json::Value;
use tower_http::services::ServeDir;
use wish::http::{error, json, param, respond};
use wish::{bootstrap, Context, MethodSet, Middleware, Provider, Shutdown};

mod common;

struct ServerContext;

impl ServerContext {
    async fn handle_root(self, _req: Request) -> Response {
        respond("text/plain", StatusCode::OK, "is root")
    }

    async fn get_json(self, _req: Request) -> Response {
        json(StatusCode::OK, &serde_json::json!({ "a": "1" }))
    }

    async fn get_error(self, _req: Request) -> Response {
        error(StatusCode::METHOD_NOT_ALLOWED)
    }

    async fn post_echo(self, mut req: Request) -> Response {
        let value = param(&mut req, "value").await.unwrap_or_default();
        respond("text/plain", StatusCode::OK, value)
    }

    async fn get_trail(self, req: Request) -> Response {
        let trail = req
            .headers()
            .get("x-trail")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        respond("text/plain", StatusCode::OK, trail)
    }

    fn mount_web(&self) -> ServeDir {
        ServeDir::new(common::server_files())
    }
}

impl Context for ServerContext {
    fn methods(&self) -> MethodSet<Self> {
        MethodSet::new()
            .handler("HandleRoot", Self::handle_root)
            .handler("GetJSON", Self::get_json)
            .handler("GetError", Self::get_error)
            .handler("PostEcho", Self::post_echo)
            .handler("GetTrail", Self::get_trail)
            .mount("MountWeb", Self::mount_web)
    }
}

fn provider() -> Provider<ServerContext> {
    Provider::from_fn(|| Ok::<_, Infallible>(ServerContext))
}

async fn tag(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert("x-wish-test", HeaderValue::from_static("1"));
    response
}

async fn trail_a(mut req: Request, next: Next) -> Response {
    req.headers_mut().insert("x-trail", HeaderValue::from_static("a"));
    next.run(req).await
}

async fn trail_b(mut req: Request, next: Next) -> Response {
    let trail = req
        .headers()
        .get("x-trail")
        .and_then(|v| v.to_str().ok())
        .map(|v| format!("{},b", v))
        .unwrap_or_else(|| "b".to_string());
    if let Ok(value) = HeaderValue::from_str(&trail) {
        req.headers_mut().insert("x-trail", value);
    }
    next.run(req).await
}

#[tokio::test]
async fn test_live_server() {
    let server = bootstrap(
        provider(),
        vec![
            Middleware::request_id(),
            Middleware::log(),
            Middleware::layer(from_fn(tag)),
        ],
    )
    .unwrap();

    let shutdown = Shutdown::new();
    let addr = common::spawn_server(server, &shutdown).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let cases: Vec<(Method, &str, u16, &str)> = vec![
        (Method::GET, "/", 200, "is root"),
        (Method::PUT, "/", 200, "is root"),
        (Method::POST, "/", 200, "is root"),
        (Method::PATCH, "/", 200, "is root"),
        (Method::DELETE, "/", 200, "is root"),
        (Method::OPTIONS, "/", 200, "is root"),
        (Method::HEAD, "/", 200, ""),
        (Method::GET, "/json", 200, r#"{"a":"1"}"#),
        (Method::GET, "/error", 405, "Method Not Allowed"),
        (Method::GET, "/web/a.txt", 200, "is a.txt"),
        (Method::GET, "/web/b.txt", 200, "is b.txt"),
        (Method::GET, "/other", 404, ""),
        (Method::GET, "/web/other.txt", 404, ""),
    ];

    for (method, path, status, content) in cases {
        let res = client
            .request(method.clone(), format!("http://{}{}", addr, path))
            .send()
            .await
            .expect("server unreachable");

        assert_eq!(res.status().as_u16(), status, "{} {}", method, path);
        assert_eq!(
            res.headers().get("x-wish-test").map(|v| v.as_bytes()),
            Some(&b"1"[..]),
            "{} {}",
            method,
            path
        );
        assert_eq!(
            res.headers().get("x-request-id").map(|v| v.len()),
            Some(36),
            "{} {}",
            method,
            path
        );
        assert_eq!(res.text().await.unwrap(), content, "{} {}", method, path);
    }

    let res = client
        .post(format!("http://{}/echo?other=1", addr))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("value=from+form")
        .send()
        .await
        .unwrap();
    assert_eq!(res.text().await.unwrap(), "from form");

    let res = client
        .get(format!("http://{}/json", addr))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["a"], "1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_first_middleware_is_outermost() {
    let server = bootstrap(
        provider(),
        vec![
            Middleware::layer(from_fn(trail_a)),
            Middleware::layer(from_fn(trail_b)),
        ],
    )
    .unwrap();

    let response = common::send(&server, Method::GET, "/trail").await;
    assert_eq!(common::body_string(response).await, "a,b");
}

#[tokio::test]
async fn test_recover_turns_panics_into_500() {
    struct Panicky;

    impl Panicky {
        async fn get_boom(self, _req: Request) -> StatusCode {
            panic!("boom")
        }
    }

    impl Context for Panicky {
        fn methods(&self) -> MethodSet<Self> {
            MethodSet::new().handler("GetBoom", Self::get_boom)
        }
    }

    let provider = Provider::from_fn(|| Ok::<_, Infallible>(Panicky));
    let server = bootstrap(provider, vec![Middleware::recover()]).unwrap();

    let response = common::send(&server, Method::GET, "/boom").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
