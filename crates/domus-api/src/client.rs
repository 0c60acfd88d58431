// HTTP client for the domus server.
//
// Wraps `reqwest::Client` with cookie-session handling, URL construction,
// and the command-response envelope. The server speaks plain JSON but
// signals command failures through an `{error: "..."}` body that may ride
// on either a 2xx or 4xx status, so bodies are parsed before statuses are
// judged.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::types::{CommandResponse, EventRecord, EventsResponse, StateResponse};

/// Raw HTTP client for the domus home-automation API.
///
/// Holds a cookie jar for the Flask session; redirects are never followed
/// because the server uses them both for login success and for bouncing
/// unauthenticated API calls back to the login page.
#[derive(Debug)]
pub struct DomusClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DomusClient {
    /// Create a new client for the given server root (e.g. `http://hub:8080`).
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("domus/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Log in with form credentials, storing the session cookie.
    ///
    /// The server answers a successful login with a redirect to the
    /// dashboard; a re-rendered login page (HTTP 200) means the
    /// credentials were rejected.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), Error> {
        let url = self.endpoint("login")?;
        debug!(%url, user = username, "POST login");

        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if resp.status().is_redirection() {
            return Ok(());
        }
        Err(Error::Authentication {
            message: "invalid username or password".into(),
        })
    }

    // ── State & events ───────────────────────────────────────────────

    /// Fetch the full dashboard state: devices, sensors, recent events,
    /// and the session identity.
    pub async fn fetch_state(&self) -> Result<StateResponse, Error> {
        let url = self.endpoint("api/state")?;
        self.get_json(url).await
    }

    /// Fetch the latest `limit` events.
    pub async fn fetch_events(&self, limit: u32) -> Result<Vec<EventRecord>, Error> {
        let mut url = self.endpoint("api/events")?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        let envelope: EventsResponse = self.get_json(url).await?;
        Ok(envelope.events)
    }

    /// Download the event log as CSV (server-side export).
    pub async fn export_events(&self) -> Result<String, Error> {
        let url = self.endpoint("api/events/export")?;
        debug!(%url, "GET events export");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_redirection() {
            return Err(session_expired());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: preview(&body).into(),
            });
        }
        Ok(resp.text().await?)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Request a device state change: on (`true`) or off (`false`).
    pub async fn toggle(&self, device: &str, state: bool) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            device: &'a str,
            state: bool,
        }
        let url = self.endpoint("api/toggle")?;
        self.post_command(url, &Body { device, state }).await
    }

    /// Switch the operating mode. Mode strings are server-defined and
    /// opaque to this client.
    pub async fn set_mode(&self, mode: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            mode: &'a str,
        }
        let url = self.endpoint("api/mode")?;
        self.post_command(url, &Body { mode }).await
    }

    /// Register a new device (admin only).
    pub async fn add_device(&self, name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }
        let url = self.endpoint("api/admin/add_device")?;
        self.post_command(url, &Body { name }).await
    }

    /// Remove a device (admin only).
    pub async fn delete_device(&self, name: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }
        let url = self.endpoint("api/admin/delete_device")?;
        self.post_command(url, &Body { name }).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Send a GET request and parse the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        // Unauthenticated API calls are redirected to the login page.
        if status.is_redirection() {
            return Err(session_expired());
        }

        let body = resp.text().await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Send a JSON command and interpret the `{ok, error}` envelope.
    ///
    /// The `error` field is the command-failure signal regardless of HTTP
    /// status — the server pairs it with a 400, but clients must not rely
    /// on that.
    async fn post_command(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();

        if status.is_redirection() {
            return Err(session_expired());
        }

        let text = resp.text().await?;
        if let Ok(envelope) = serde_json::from_str::<CommandResponse>(&text) {
            if let Some(message) = envelope.error.filter(|m| !m.is_empty()) {
                return Err(Error::Command { message });
            }
            if status.is_success() {
                return Ok(());
            }
        }

        if status.is_success() {
            return Err(Error::Deserialization {
                message: format!("expected a JSON command response, got {:?}", preview(&text)),
                body: text,
            });
        }
        Err(status_error(status.as_u16(), &text))
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn session_expired() -> Error {
    Error::Authentication {
        message: "session expired or not logged in".into(),
    }
}

/// Map a non-success status to an error, honoring an `error` body if one
/// parses (admin routes answer plain text, most others answer JSON).
fn status_error(status: u16, body: &str) -> Error {
    if let Ok(envelope) = serde_json::from_str::<CommandResponse>(body) {
        if let Some(message) = envelope.error.filter(|m| !m.is_empty()) {
            return Error::Command { message };
        }
    }
    Error::Http {
        status,
        message: preview(body).into(),
    }
}

fn preview(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(i, _)| i);
    &body[..end]
}
