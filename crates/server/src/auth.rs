//! Session middleware and trace context.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use shelfmark_metadata::models::ProfileRow;
use time::OffsetDateTime;
use tracing::Instrument;
use uuid::Uuid;

/// Maximum length for trace IDs and user identifiers.
/// Longer values are truncated to prevent log bloat and log injection.
const MAX_TRACE_ID_LEN: usize = 128;
const MAX_USER_ID_LEN: usize = 128;
const MAX_DISPLAY_NAME_LEN: usize = 256;

/// Trace ID for request correlation.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Generate a new random trace ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a trace ID from a client-provided value.
    /// The value is sanitized: truncated to MAX_TRACE_ID_LEN characters
    /// and non-printable characters removed.
    pub fn from_client(value: &str) -> Self {
        // Limit by character count, not byte count, to safely handle
        // multi-byte UTF-8. Then filter to ASCII-only for log safety.
        let sanitized: String = value
            .chars()
            .take(MAX_TRACE_ID_LEN)
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .collect();

        if sanitized.is_empty() {
            Self::new()
        } else {
            Self(sanitized)
        }
    }

    /// Get the trace ID as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated session extension.
///
/// The user identifier is opaque: the server never parses or validates
/// its shape beyond sanitization. The authenticating proxy in front of
/// the server is responsible for its integrity.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: String,
    pub display_name: Option<String>,
}

fn sanitize_header(value: &str, max_len: usize) -> Option<String> {
    let sanitized: String = value
        .chars()
        .take(max_len)
        .filter(|c| c.is_ascii_graphic() || *c == ' ')
        .collect();
    let sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// Extract trace ID from X-Trace-Id header or generate a new one.
fn extract_or_generate_trace_id(req: &Request) -> TraceId {
    req.headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(TraceId::from_client)
        .unwrap_or_else(TraceId::new)
}

/// Session middleware: extracts the caller's identity and sets up trace
/// context.
///
/// Identity arrives as the `X-User-Id` header with an optional
/// `X-User-Name`. When a display name accompanies the id, the profile
/// row is refreshed fire-and-forget; a failed upsert never fails the
/// request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let trace_id = extract_or_generate_trace_id(&req);
    let trace_id_str = trace_id.0.clone();
    req.extensions_mut().insert(trace_id);

    let user_id = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| sanitize_header(v, MAX_USER_ID_LEN));

    if let Some(user_id) = user_id {
        let display_name = req
            .headers()
            .get("x-user-name")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| sanitize_header(v, MAX_DISPLAY_NAME_LEN));

        if let Some(name) = &display_name {
            // Refresh the profile (fire and forget)
            let metadata = state.metadata.clone();
            let now = OffsetDateTime::now_utc();
            let profile = ProfileRow {
                user_id: user_id.clone(),
                display_name: Some(name.clone()),
                created_at: now,
                updated_at: now,
            };
            tokio::spawn(async move {
                if let Err(e) = metadata.upsert_profile(&profile).await {
                    tracing::warn!(error = %e, "failed to refresh profile");
                }
            });
        }

        req.extensions_mut().insert(Session {
            user_id,
            display_name,
        });
    }

    // Run the request within a tracing span that includes the trace ID
    let response = next
        .run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id_str))
        .await;

    Ok(response)
}

/// Require a session (X-User-Id must be present).
pub fn require_session(req: &Request) -> ApiResult<&Session> {
    req.extensions()
        .get::<Session>()
        .ok_or_else(|| ApiError::Unauthorized("session required".to_string()))
}
