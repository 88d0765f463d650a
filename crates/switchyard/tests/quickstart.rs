//! The facade wires configuration, app and test client together.

use std::time::Duration;

use switchyard::prelude::*;
use switchyard_test::TestClient;

const CONFIG: &str = r#"
[server]
http_addr = "127.0.0.1:9090"
request_timeout_ms = 2000

[router]
max_params = 2
pool_max_idle = 4

[logging]
level = "warn"
format = "pretty"
"#;

#[test]
fn test_config_drives_app_and_server() {
    let config = ConfigLoader::new()
        .with_string(CONFIG, "toml")
        .unwrap()
        .with_vars("SWITCHYARD", [("SWITCHYARD__ROUTER__POOL_MAX_IDLE", "8")])
        .unwrap()
        .load()
        .unwrap();

    let app_config = switchyard::app_config(&config.router);
    assert_eq!(app_config.max_params, 2);
    assert_eq!(app_config.pool_max_idle, 8);

    let server_config = ServerConfig::from(&config.server);
    assert_eq!(server_config.http_addr(), "127.0.0.1:9090");
    assert_eq!(server_config.request_timeout(), Duration::from_secs(2));

    let log_config = LogConfig::from(&config.logging);
    assert_eq!(log_config.level, "warn");
    assert!(!log_config.json_format);

    let mut app = App::with_config(app_config);
    app.get(
        "/orgs/:org/repos/:repo/issues/:issue",
        [handler(|ctx| {
            let body = format!(
                "{}/{}#{}",
                ctx.param("org"),
                ctx.param("repo"),
                ctx.param("issue")
            );
            ctx.string(StatusCode::OK, body);
        })],
    )
    .unwrap();
    assert!(app.pool().param_capacity() >= 3);

    TestClient::new(app)
        .get("/orgs/rust-lang/repos/rust/issues/1")
        .send()
        .assert_status(StatusCode::OK)
        .assert_body_eq("rust-lang/rust#1");
}
