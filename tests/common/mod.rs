//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use splendid::backend::{ActionError, AuthError, SwitchBackend, SwitchSession};
use splendid::config::{AuthorizedKeys, ServerConfig};
use splendid::HttpServer;

/// A backend call observed by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    On(String),
    Off(String),
}

/// What the mock backend saw.
#[derive(Debug, Default)]
pub struct Recorder {
    logins: AtomicUsize,
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    pub fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

/// In-memory backend with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub recorder: Arc<Recorder>,
    pub fail_login: bool,
    pub fail_action: bool,
}

impl MockBackend {
    pub fn failing_login() -> Self {
        Self {
            fail_login: true,
            ..Self::default()
        }
    }

    pub fn failing_action() -> Self {
        Self {
            fail_action: true,
            ..Self::default()
        }
    }
}

pub struct MockSession {
    recorder: Arc<Recorder>,
    fail_action: bool,
}

impl MockSession {
    fn record(&self, call: Call) -> Result<(), ActionError> {
        self.recorder.calls.lock().unwrap().push(call);
        if self.fail_action {
            Err(ActionError::Rejected("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

impl SwitchBackend for MockBackend {
    type Session = MockSession;

    async fn login(&self) -> Result<MockSession, AuthError> {
        self.recorder.logins.fetch_add(1, Ordering::SeqCst);
        if self.fail_login {
            return Err(AuthError::Rejected);
        }
        Ok(MockSession {
            recorder: Arc::clone(&self.recorder),
            fail_action: self.fail_action,
        })
    }
}

impl SwitchSession for MockSession {
    async fn turn_on(&self, name: &str) -> Result<(), ActionError> {
        self.record(Call::On(name.to_string()))
    }

    async fn turn_off(&self, name: &str) -> Result<(), ActionError> {
        self.record(Call::Off(name.to_string()))
    }
}

pub fn keys(raw: &[&str]) -> AuthorizedKeys {
    AuthorizedKeys::new(raw.iter().map(|k| k.to_string())).unwrap()
}

/// The relay router backed by `backend`, authorizing key "k1".
pub fn relay(backend: MockBackend) -> Router {
    HttpServer::new(Arc::new(backend), keys(&["k1"]), ServerConfig::default()).router()
}

pub fn command_body(key: &str, device: &str, name: &str, action: &str, value: &str) -> String {
    serde_json::json!({
        "Key": key,
        "Device": device,
        "Name": name,
        "Action": action,
        "Value": value,
    })
    .to_string()
}

/// Send one request through the router and collect status and body text.
pub async fn send(router: Router, method: Method, uri: &str, body: impl Into<Body>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub const SID: &str = "a1b2c3d4e5f60718";

/// Mount a FRITZ!Box login flow on `server` using the MD5 challenge
/// "1234567z" and the password "äbc".
pub async fn mount_fritz_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .and(query_param("version", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
            "0000000000000000",
            "1234567z",
            0,
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/login_sid.lua"))
        .and(body_string_contains("response=1234567z-9e224a41eeefa284df7bb0f26c2913e2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(SID, "1234567z", 0)))
        .mount(server)
        .await;
}

/// Mount a switch list with the given `(ain, name)` pairs.
pub async fn mount_fritz_switches(server: &MockServer, switches: &[(&str, &str)]) {
    let list: Vec<&str> = switches.iter().map(|(ain, _)| *ain).collect();
    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .and(query_param("switchcmd", "getswitchlist"))
        .and(query_param("sid", SID))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{}\n", list.join(","))))
        .mount(server)
        .await;

    for (ain, name) in switches {
        Mock::given(method("GET"))
            .and(path("/webservices/homeautoswitch.lua"))
            .and(query_param("switchcmd", "getswitchname"))
            .and(query_param("ain", *ain))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{name}\n")))
            .mount(server)
            .await;
    }
}

pub fn session_info(sid: &str, challenge: &str, block_time: u64) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><SessionInfo><SID>{sid}</SID><Challenge>{challenge}</Challenge><BlockTime>{block_time}</BlockTime><Rights></Rights></SessionInfo>"#
    )
}
