//! FRITZ!Box client tests against a wiremock box.

use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use splendid::backend::{ActionError, AuthError, FritzBox, SwitchBackend, SwitchSession};
use splendid::config::{BackendConfig, Credentials};

mod common;

use common::{mount_fritz_login, mount_fritz_switches, session_info, SID};

async fn setup() -> (MockServer, FritzBox) {
    let server = MockServer::start().await;
    let config = BackendConfig {
        url: Url::parse(&server.uri()).unwrap(),
        ..BackendConfig::default()
    };
    let credentials = Credentials {
        username: String::new(),
        password: "äbc".to_string().into(),
    };
    let backend = FritzBox::new(&config, credentials).unwrap();
    (server, backend)
}

fn switch_command(command: &str, ain: &str) -> wiremock::MockBuilder {
    Mock::given(method("GET"))
        .and(path("/webservices/homeautoswitch.lua"))
        .and(query_param("switchcmd", command))
        .and(query_param("sid", SID))
        .and(query_param("ain", ain))
}

#[tokio::test]
async fn login_answers_md5_challenge() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;

    assert!(backend.login().await.is_ok());
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let (server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
            "0000000000000000",
            "deadbeef",
            0,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
            "0000000000000000",
            "cafebabe",
            0,
        )))
        .mount(&server)
        .await;

    let result = backend.login().await;
    assert!(matches!(result, Err(AuthError::Rejected)), "got {result:?}");
}

#[tokio::test]
async fn login_while_blocked_fails_fast() {
    let (server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(200).set_body_string(session_info(
            "0000000000000000",
            "deadbeef",
            8,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = backend.login().await;
    assert!(matches!(result, Err(AuthError::Blocked(8))), "got {result:?}");
}

#[tokio::test]
async fn login_endpoint_errors_are_transport_errors() {
    let (server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/login_sid.lua"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = backend.login().await;
    assert!(matches!(result, Err(AuthError::Transport(_))), "got {result:?}");
}

#[tokio::test]
async fn turn_on_resolves_name_and_switches() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;
    mount_fritz_switches(&server, &[("087610000434", "Lamp"), ("116570149698", "Fan")]).await;

    switch_command("setswitchon", "116570149698")
        .respond_with(ResponseTemplate::new(200).set_body_string("1\n"))
        .expect(1)
        .mount(&server)
        .await;

    let session = backend.login().await.unwrap();
    session.turn_on("Fan").await.unwrap();
}

#[tokio::test]
async fn turn_off_switches_matching_device() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;
    mount_fritz_switches(&server, &[("087610000434", "Lamp")]).await;

    switch_command("setswitchoff", "087610000434")
        .respond_with(ResponseTemplate::new(200).set_body_string("0\n"))
        .expect(1)
        .mount(&server)
        .await;

    let session = backend.login().await.unwrap();
    session.turn_off("Lamp").await.unwrap();
}

#[tokio::test]
async fn unknown_device_name_is_an_action_error() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;
    mount_fritz_switches(&server, &[("087610000434", "Lamp")]).await;

    let session = backend.login().await.unwrap();
    let result = session.turn_on("Toaster").await;
    assert!(
        matches!(result, Err(ActionError::UnknownDevice(ref name)) if name == "Toaster"),
        "got {result:?}"
    );
}

#[tokio::test]
async fn rejected_switch_command_is_an_action_error() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;
    mount_fritz_switches(&server, &[("087610000434", "Lamp")]).await;

    switch_command("setswitchon", "087610000434")
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let session = backend.login().await.unwrap();
    let result = session.turn_on("Lamp").await;
    assert!(matches!(result, Err(ActionError::Rejected(_))), "got {result:?}");
}

#[tokio::test]
async fn inval_answer_is_an_action_error() {
    let (server, backend) = setup().await;
    mount_fritz_login(&server).await;
    mount_fritz_switches(&server, &[("087610000434", "Lamp")]).await;

    switch_command("setswitchoff", "087610000434")
        .respond_with(ResponseTemplate::new(200).set_body_string("inval\n"))
        .mount(&server)
        .await;

    let session = backend.login().await.unwrap();
    assert!(matches!(
        session.turn_off("Lamp").await,
        Err(ActionError::Rejected(_))
    ));
}
