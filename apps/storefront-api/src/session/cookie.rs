//! Session cookie middleware.
//!
//! ```text
//! Request ─► session_middleware ─► SessionId in extensions ─► handler
//!               │                                               │
//!               │ cookie missing/invalid?                       │
//!               └── generate UUID v4 ──► Set-Cookie on response ◄┘
//! ```

use axum::extract::{Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use super::SessionId;

/// How the session cookie is named and issued.
#[derive(Debug, Clone)]
pub struct SessionCookieConfig {
    pub name: String,
    /// Cookie lifetime in seconds.
    pub max_age_secs: u64,
}

impl SessionCookieConfig {
    pub fn new(name: impl Into<String>, idle_days: u32) -> Self {
        SessionCookieConfig {
            name: name.into(),
            max_age_secs: u64::from(idle_days) * 24 * 60 * 60,
        }
    }

    /// Finds and parses this cookie in the request headers.
    pub fn read(&self, headers: &HeaderMap) -> Option<SessionId> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .and_then(|(_, value)| value.parse().ok())
    }

    /// `Set-Cookie` value issuing `session`.
    pub fn issue(&self, session: &SessionId) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.name, session, self.max_age_secs
        )
    }
}

/// Resolves the caller's session and issues a cookie for new sessions.
pub async fn session_middleware(
    State(config): State<SessionCookieConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let (session, is_new) = match config.read(request.headers()) {
        Some(session) => (session, false),
        None => {
            let session = SessionId::generate();
            debug!(session_id = %session, "Issuing new session");
            (session, true)
        }
    };

    request.extensions_mut().insert(session);
    let mut response = next.run(request).await;

    if is_new {
        match HeaderValue::from_str(&config.issue(&session)) {
            Ok(cookie) => {
                response.headers_mut().append(SET_COOKIE, cookie);
            }
            Err(e) => warn!(error = %e, "Could not encode session cookie"),
        }
    }

    response
}
