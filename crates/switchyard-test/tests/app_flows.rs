//! Request flows through a full app, driven by the in-memory client.

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use switchyard_core::{handler, App, DispatchError};
use switchyard_test::TestClient;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct User {
    id: String,
    name: String,
}

fn app() -> App {
    let mut app = App::new();
    app.use_middleware([handler(|ctx| {
        ctx.set_header(
            HeaderName::from_static("x-served-by"),
            HeaderValue::from_static("switchyard"),
        );
        ctx.advance();
    })]);

    app.get(
        "/users/:id",
        [handler(|ctx| {
            let user = User {
                id: ctx.param("id").to_string(),
                name: "Ada".to_string(),
            };
            ctx.json(StatusCode::OK, &user);
        })],
    )
    .unwrap();

    app.get(
        "/files/*",
        [handler(|ctx| {
            let rest = ctx.param("*").to_string();
            ctx.string(StatusCode::OK, rest);
        })],
    )
    .unwrap();

    app.get("/boom", [handler(|_| panic!("boom"))]).unwrap();

    app.set_internal_error_handler(handler(|ctx| {
        let message = match ctx.error() {
            Some(DispatchError::HandlerPanic(msg)) => format!("panic: {msg}"),
            Some(other) => other.to_string(),
            None => "unknown".to_string(),
        };
        ctx.string(StatusCode::INTERNAL_SERVER_ERROR, message);
    }));
    app
}

#[test]
fn test_json_route_with_middleware_header() {
    let client = TestClient::new(app());
    let response = client.get("/users/42").send();
    response
        .assert_status(StatusCode::OK)
        .assert_content_type("application/json")
        .assert_header("x-served-by", "switchyard");

    let user: User = response.json().unwrap();
    assert_eq!(
        user,
        User {
            id: "42".to_string(),
            name: "Ada".to_string()
        }
    );
}

#[test]
fn test_catch_all_binds_remainder() {
    let client = TestClient::new(app());
    client
        .get("/files/docs/guide.md")
        .send()
        .assert_status(StatusCode::OK)
        .assert_body_eq("docs/guide.md");
}

#[test]
fn test_not_found_and_method_not_allowed() {
    let client = TestClient::new(app());
    client
        .get("/teams/1")
        .send()
        .assert_status(StatusCode::NOT_FOUND)
        .assert_body_eq("Not Found\n");

    client
        .post("/users/1")
        .send()
        .assert_status(StatusCode::METHOD_NOT_ALLOWED)
        .assert_header("allow", "GET");
}

#[test]
fn test_panic_renders_custom_internal_error() {
    let client = TestClient::new(app());
    client
        .get("/boom")
        .send()
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_body_eq("panic: boom");

    // The app keeps serving after a panic.
    client.get("/users/1").send().assert_status(StatusCode::OK);
}

#[test]
fn test_shared_app_across_threads() {
    let client = TestClient::from_shared(Arc::new(app()));
    std::thread::scope(|scope| {
        for i in 0..4 {
            let client = client.clone();
            scope.spawn(move || {
                for j in 0..50 {
                    let id = format!("{i}-{j}");
                    let user: User = client
                        .get(&format!("/users/{id}"))
                        .send()
                        .json()
                        .unwrap();
                    assert_eq!(user.id, id);
                }
            });
        }
    });
}
