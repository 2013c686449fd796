//! The relay answering over HTTPS with a self-signed certificate.

use std::sync::Arc;
use std::time::Duration;

use splendid::config::ServerConfig;
use splendid::net::tls::load_tls_config;
use splendid::{HttpServer, Shutdown};

mod common;

use common::{command_body, keys, Call, MockBackend};

#[tokio::test]
async fn lamp_switches_on_over_https() {
    let dir = tempfile::tempdir().unwrap();
    let cert = dir.path().join("cert.pem");
    let key = dir.path().join("key.pem");
    std::fs::write(&cert, include_str!("fixtures/cert.pem")).unwrap();
    std::fs::write(&key, include_str!("fixtures/key.pem")).unwrap();
    let tls = load_tls_config(&cert, &key).await.unwrap();

    let backend = MockBackend::default();
    let server = HttpServer::new(Arc::new(backend.clone()), keys(&["k1"]), ServerConfig::default());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server_task = tokio::spawn(async move { server.serve_tls(listener, tls, server_shutdown).await });

    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .no_proxy()
        .build()
        .unwrap();
    let res = client
        .post(format!("https://{addr}/gghr/"))
        .body(command_body("k1", "switch", "Lamp", "set", "1"))
        .send()
        .await
        .expect("relay unreachable over TLS");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "200 - Ok");
    assert_eq!(backend.recorder.calls(), vec![Call::On("Lamp".into())]);

    drop(client);
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(15), server_task)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
