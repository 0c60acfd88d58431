// Integration tests for `DomusClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domus_api::{DomusClient, Error};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DomusClient) {
    let server = MockServer::start().await;
    let url = server.uri().parse().expect("mock server URL");
    let client = DomusClient::new(url, Duration::from_secs(5)).expect("client build");
    (server, client)
}

fn state_body() -> serde_json::Value {
    json!({
        "devices": { "luz_living": true, "luz_cocina": false, "alarma": false },
        "sensors": {
            "temperatura": 21.5,
            "movimiento": false,
            "puerta_abierta": true,
            "humo": false
        },
        "events": [
            {
                "timestamp": "2026-08-25T10:00:00",
                "user": "admin",
                "action": "toggle_ON",
                "device": "luz_living",
                "extra": null
            }
        ],
        "user": "admin",
        "role": "admin"
    })
}

// ── State ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_state_parses_full_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_body()))
        .mount(&server)
        .await;

    let state = client.fetch_state().await.expect("state fetch");

    assert_eq!(state.user, "admin");
    assert_eq!(state.role, "admin");
    assert_eq!(state.devices.len(), 3);
    assert_eq!(state.devices["luz_living"], true);
    assert_eq!(state.sensors.temperature, 21.5);
    assert!(state.sensors.door_open);
    assert!(!state.sensors.smoke);
    assert_eq!(state.events.len(), 1);
    assert_eq!(state.events[0].device_display(), "luz_living");
    assert_eq!(state.events[0].extra_display(), "");
}

#[tokio::test]
async fn fetch_state_preserves_device_order() {
    let (server, client) = setup().await;

    // Deliberately non-alphabetical key order.
    let body = r#"{
        "devices": {"zeta": true, "alpha": false, "mid": true},
        "sensors": {"temperatura": 20.0, "movimiento": false, "puerta_abierta": false, "humo": false},
        "events": [],
        "user": "user",
        "role": "user"
    }"#;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let state = client.fetch_state().await.expect("state fetch");
    let names: Vec<&str> = state.devices.keys().map(String::as_str).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn fetch_state_redirect_means_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/state"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/login"))
        .mount(&server)
        .await;

    let err = client.fetch_state().await.expect_err("should fail");
    assert!(err.is_auth_expired(), "got {err:?}");
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_events_unwraps_envelope_and_passes_limit() {
    let (server, client) = setup().await;

    let body = json!({
        "events": [
            { "timestamp": "2026-08-25T10:00:00", "user": "alice", "action": "login" },
            { "timestamp": "2026-08-25T09:59:00", "user": "system", "action": "Servidor iniciado" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let events = client.fetch_events(50).await.expect("events fetch");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].user, "alice");
    assert_eq!(events[1].action, "Servidor iniciado");
    assert_eq!(events[1].device, None);
}

#[tokio::test]
async fn export_events_returns_raw_csv() {
    let (server, client) = setup().await;

    let csv = "timestamp,user,action,device,extra\r\n2026-08-25T10:00:00,admin,login,,\r\n";
    Mock::given(method("GET"))
        .and(path("/api/events/export"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(csv, "text/csv"))
        .mount(&server)
        .await;

    let body = client.export_events().await.expect("export");
    assert!(body.starts_with("timestamp,user,action"));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_posts_device_and_state() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .and(body_json(json!({ "device": "luz_cocina", "state": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "devices": {} })),
        )
        .expect(1)
        .mount(&server)
        .await;

    client.toggle("luz_cocina", true).await.expect("toggle");
}

#[tokio::test]
async fn command_error_surfaces_server_message() {
    let (server, client) = setup().await;

    // The server pairs the error envelope with a 400 status; the message
    // must still come through as a command error, not a transport one.
    Mock::given(method("POST"))
        .and(path("/api/toggle"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Dispositivo inválido" })),
        )
        .mount(&server)
        .await;

    let err = client.toggle("ghost", true).await.expect_err("should fail");
    assert_eq!(err.command_message(), Some("Dispositivo inválido"));
}

#[tokio::test]
async fn command_error_on_200_still_detected() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/mode"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Modo inválido" })),
        )
        .mount(&server)
        .await;

    let err = client.set_mode("fiesta").await.expect_err("should fail");
    assert_eq!(err.command_message(), Some("Modo inválido"));
}

#[tokio::test]
async fn plain_text_403_is_http_error_not_command_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/add_device"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_raw("No autorizado (se requiere rol admin)", "text/plain"),
        )
        .mount(&server)
        .await;

    let err = client.add_device("lampara").await.expect_err("should fail");
    match err {
        Error::Http { status, .. } => assert_eq!(status, 403),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_device_posts_name() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/delete_device"))
        .and(body_json(json!({ "name": "alarma" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_device("alarma").await.expect("delete");
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn login_redirect_is_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;

    client.login("admin", "admin123").await.expect("login");
}

#[tokio::test]
async fn login_rerendered_page_is_rejection() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"))
        .mount(&server)
        .await;

    let err = client.login("admin", "wrong").await.expect_err("should fail");
    assert!(err.is_auth_expired());
}
