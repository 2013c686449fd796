//! FRITZ!Box AHA-HTTP client.
//!
//! # Responsibilities
//! - Log in through `login_sid.lua` (challenge-response, session ID)
//! - Resolve switch names to actor identification numbers (AIN)
//! - Switch actors on and off through `homeautoswitch.lua`

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::backend::{challenge, ActionError, AuthError, SwitchBackend, SwitchSession};
use crate::config::{BackendConfig, Credentials};

const LOGIN_PATH: &str = "/login_sid.lua";
const SWITCH_PATH: &str = "/webservices/homeautoswitch.lua";
const LOGIN_VERSION: (&str, &str) = ("version", "2");

/// The invalid session ID the box reports while nobody is logged in.
const NO_SESSION: &str = "0000000000000000";

/// Backend client for a FRITZ!Box.
///
/// Holds the HTTP connection pool and credentials; both are read-only, so a
/// single instance is shared by every request.
#[derive(Debug)]
pub struct FritzBox {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl FritzBox {
    /// Create a new client. No network traffic happens here.
    pub fn new(config: &BackendConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure_tls)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.clone(),
            username: credentials.username,
            password: credentials.password,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn session_info(&self, request: reqwest::RequestBuilder) -> Result<SessionInfo, AuthError> {
        let response = request
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Transport(format!("login endpoint returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        SessionInfo::parse(&body)
    }
}

impl SwitchBackend for FritzBox {
    type Session = FritzSession;

    async fn login(&self) -> Result<FritzSession, AuthError> {
        let url = self
            .base_url
            .join(LOGIN_PATH)
            .map_err(|e| AuthError::Protocol(e.to_string()))?;

        debug!(url = %url, "Requesting login challenge");
        let info = self
            .session_info(self.http.get(url.clone()).query(&[LOGIN_VERSION]))
            .await?;

        if info.block_time > 0 {
            return Err(AuthError::Blocked(info.block_time));
        }

        let response = challenge::respond(&info.challenge, self.password.expose_secret())?;
        let form = [("username", self.username.as_str()), ("response", response.as_str())];
        let info = self
            .session_info(self.http.post(url).query(&[LOGIN_VERSION]).form(&form))
            .await?;

        if !info.is_authenticated() {
            return Err(match info.block_time {
                0 => AuthError::Rejected,
                secs => AuthError::Blocked(secs),
            });
        }

        debug!("Backend login successful");
        Ok(FritzSession {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            sid: info.sid,
        })
    }
}

/// An authenticated FRITZ!Box session.
#[derive(Debug)]
pub struct FritzSession {
    http: reqwest::Client,
    base_url: Url,
    sid: String,
}

impl FritzSession {
    /// Issue one `switchcmd` and return the trimmed response body.
    async fn switch_command(&self, command: &str, ain: Option<&str>) -> Result<String, ActionError> {
        let mut url = self
            .base_url
            .join(SWITCH_PATH)
            .map_err(|e| ActionError::Transport(e.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("switchcmd", command);
            query.append_pair("sid", &self.sid);
            if let Some(ain) = ain {
                query.append_pair("ain", ain);
            }
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ActionError::Rejected(format!("{command} returned HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ActionError::Transport(e.to_string()))?;
        let body = body.trim();
        if body == "inval" {
            return Err(ActionError::Rejected(format!("{command} answered inval")));
        }
        Ok(body.to_string())
    }

    /// Find the AIN of the switch called `name`.
    pub async fn resolve_ain(&self, name: &str) -> Result<String, ActionError> {
        let list = self.switch_command("getswitchlist", None).await?;
        for ain in list.split(',').map(str::trim).filter(|a| !a.is_empty()) {
            if self.switch_command("getswitchname", Some(ain)).await? == name {
                debug!(name = %name, ain = %ain, "Resolved switch");
                return Ok(ain.to_string());
            }
        }
        Err(ActionError::UnknownDevice(name.to_string()))
    }

    async fn switch_to(&self, name: &str, command: &str) -> Result<(), ActionError> {
        let ain = self.resolve_ain(name).await?;
        self.switch_command(command, Some(&ain)).await?;
        Ok(())
    }
}

impl SwitchSession for FritzSession {
    async fn turn_on(&self, name: &str) -> Result<(), ActionError> {
        self.switch_to(name, "setswitchon").await
    }

    async fn turn_off(&self, name: &str) -> Result<(), ActionError> {
        self.switch_to(name, "setswitchoff").await
    }
}

/// The fields of `<SessionInfo>` the client needs.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionInfo {
    sid: String,
    challenge: String,
    block_time: u64,
}

impl SessionInfo {
    fn parse(xml: &str) -> Result<Self, AuthError> {
        let field = |tag: &str| {
            element_text(xml, tag)
                .ok_or_else(|| AuthError::Protocol(format!("SessionInfo without <{tag}>")))
        };

        let block_time: u64 = match element_text(xml, "BlockTime") {
            Some(raw) => raw
                .parse()
                .map_err(|_| AuthError::Protocol(format!("bad BlockTime {raw:?}")))?,
            None => 0,
        };

        Ok(Self {
            sid: field("SID")?.to_string(),
            challenge: field("Challenge")?.to_string(),
            block_time,
        })
    }

    fn is_authenticated(&self) -> bool {
        !self.sid.is_empty() && self.sid != NO_SESSION
    }
}

/// Text of the first `<tag>...</tag>` element. The session document is flat
/// and never nests these tags.
///
/// Entities are not decoded. SID, Challenge and BlockTime only ever hold hex
/// digits, decimal digits and `$`, none of which XML escapes.
fn element_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(xml[start..end].trim())
}
