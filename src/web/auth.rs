//! Static HTTP Basic credential gate applied to every route.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use super::AppContext;

pub const CHALLENGE: &str = r#"Basic realm="Login""#;

/// The single shared credential pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// Verbatim comparison against an `Authorization` header.
    pub fn accepts(&self, headers: &HeaderMap) -> bool {
        match parse_basic(headers) {
            Some((user, pass)) => user == self.username && pass == self.password,
            None => false,
        }
    }
}

/// Extract `(username, password)` from `Authorization: Basic <base64>`.
fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub async fn require_basic_auth(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    if ctx.credentials.accepts(request.headers()) {
        return next.run(request).await;
    }

    debug!(path = %request.uri().path(), "rejected request without valid credentials");
    unauthorized()
}

pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
    )
        .into_response()
}
