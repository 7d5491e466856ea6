//! # Authentication Middleware
//!
//! Session-token middleware guarding every company endpoint.
//!
//! ## Token Format
//!
//! ```text
//! Bearer {session_id}:{secret}
//! ```
//!
//! Sessions are minted by the `company-admin` CLI via
//! [`SessionRecord::issue`](crate::state::SessionRecord::issue); only the
//! SHA-256 hash of the secret is stored. Validation walks a fixed sequence
//! (header present, Bearer scheme, token shape, session lookup, secret
//! digest comparison, revocation, expiry, company lookup) and responds
//! `401` with a specific message for each failure.
//!
//! ## CurrentCompany
//!
//! Every authenticated request gets a [`CurrentCompany`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl.

use axum::extract::{Request, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use company_core::SessionId;

use crate::error::{AppError, ErrorBody};
use crate::state::{AppState, CompanyRecord};

// ── Token Handling ──────────────────────────────────────────────────────────

/// Hex-encode a byte slice (lowercase).
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// SHA-256 digest of a session secret, hex-encoded.
///
/// Stored in [`SessionRecord::secret_hash`](crate::state::SessionRecord);
/// the plaintext secret never touches the stores or the database.
pub fn hash_secret(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    hex_encode(&digest)
}

/// Constant-time comparison of hex digests.
///
/// Prevents timing side-channels that could reveal digest length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_digest_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing constant regardless of length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Check a presented secret against a stored secret hash.
///
/// Hashes the presented value first so the comparison always runs over
/// fixed-length digests.
pub fn verify_secret(provided: &str, stored_hash: &str) -> bool {
    constant_time_digest_eq(&hash_secret(provided), stored_hash)
}

/// Parse a session token in format `{session_id}:{secret}`.
///
/// The secret may itself contain colons; the split happens at the first one.
/// Returns `None` for any malformed shape. All parse failures collapse into
/// the same "invalid session token" response so the error does not reveal
/// which part was wrong.
pub fn parse_session_token(token: &str) -> Option<(SessionId, &str)> {
    let (id_part, secret) = token.split_once(':')?;
    if secret.is_empty() {
        return None;
    }
    let id = id_part.parse::<Uuid>().ok()?;
    Some((SessionId::from_uuid(id), secret))
}

// ── CurrentCompany ──────────────────────────────────────────────────────────

/// The authenticated company, resolved by the auth middleware and available
/// to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone)]
pub struct CurrentCompany {
    /// Full company record the session belongs to.
    pub company: CompanyRecord,
}

/// Axum `FromRequestParts` implementation for `CurrentCompany`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CurrentCompany {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentCompany>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no company identity in request context".into()))
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Validate the session token from the Authorization header.
///
/// Resolves the session against the store, checks the secret digest in
/// constant time, rejects revoked and expired sessions, and injects the
/// owning [`CurrentCompany`] into request extensions for downstream
/// handlers. Short-circuits with `401` before any handler runs.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let header_value = match auth_header {
        Some(value) => value,
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            return unauthorized_response("missing authorization header");
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(token) => token,
        None => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            return unauthorized_response("authorization header must use Bearer scheme");
        }
    };

    let (session_id, secret) = match parse_session_token(token) {
        Some(parsed) => parsed,
        None => {
            tracing::warn!("authentication failed: malformed session token");
            return unauthorized_response("invalid session token");
        }
    };

    let session = match state.sessions.get(&session_id) {
        Some(session) => session,
        None => {
            tracing::warn!(session_id = %session_id, "authentication failed: unknown session");
            return unauthorized_response("invalid session token");
        }
    };

    if !verify_secret(secret, &session.secret_hash) {
        tracing::warn!(session_id = %session_id, "authentication failed: session secret mismatch");
        return unauthorized_response("invalid session token");
    }

    if session.revoked {
        tracing::warn!(session_id = %session_id, "authentication failed: session revoked");
        return unauthorized_response("session revoked");
    }

    if session.is_expired() {
        tracing::warn!(session_id = %session_id, "authentication failed: session expired");
        return unauthorized_response("session expired");
    }

    let company = match state.companies.get(&session.company_id) {
        Some(company) => company,
        None => {
            tracing::warn!(
                session_id = %session_id,
                company_id = %session.company_id,
                "authentication failed: session references unknown company"
            );
            return unauthorized_response("invalid session token");
        }
    };

    request.extensions_mut().insert(CurrentCompany { company });
    next.run(request).await
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody::new(message, StatusCode::UNAUTHORIZED);
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CompanyStatus, SessionRecord};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum::Router;
    use chrono::{Duration, Utc};
    use company_core::CompanyId;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(state: AppState) -> Router {
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn_with_state(state, auth_middleware))
    }

    /// Seed a company with a live session; returns the plaintext token.
    fn seeded_state() -> (AppState, CompanyRecord, String) {
        let state = AppState::new();
        let now = Utc::now();
        let company = CompanyRecord {
            id: CompanyId::new(),
            name: "Acme Logistics".to_string(),
            email: "ops@acme.example".to_string(),
            status: CompanyStatus::PendingOnboarding,
            created_at: now,
            updated_at: now,
        };
        state.companies.insert(company.id, company.clone());

        let (session, token) = SessionRecord::issue(company.id, Duration::hours(1));
        state.sessions.insert(session.id, session);

        (state, company, token)
    }

    async fn error_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    // ── Middleware tests ─────────────────────────────────────────

    #[tokio::test]
    async fn valid_session_token_accepted() {
        let (state, _, token) = seeded_state();
        let app = test_app(state);

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn missing_authorization_header_rejected() {
        let (state, _, _) = seeded_state();
        let app = test_app(state);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["success"], false);
        assert_eq!(err["message"], "missing authorization header");
        assert_eq!(err["statusCode"], 401);
        assert!(err.get("errors").is_none());
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let (state, _, _) = seeded_state();
        let app = test_app(state);

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "authorization header must use Bearer scheme");
    }

    #[tokio::test]
    async fn malformed_token_rejected() {
        let (state, _, _) = seeded_state();
        let app = test_app(state);

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer not-a-session-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "invalid session token");
    }

    #[tokio::test]
    async fn unknown_session_rejected() {
        let (state, _, _) = seeded_state();
        let app = test_app(state);

        let token = format!("{}:{}", Uuid::new_v4(), "ab".repeat(32));
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "invalid session token");
    }

    #[tokio::test]
    async fn wrong_secret_rejected() {
        let (state, _, token) = seeded_state();
        let app = test_app(state);

        let session_id = token.split_once(':').unwrap().0;
        let forged = format!("{}:{}", session_id, "0".repeat(64));
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {forged}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "invalid session token");
    }

    #[tokio::test]
    async fn revoked_session_rejected() {
        let (state, _, token) = seeded_state();

        let (session_id, _) = parse_session_token(&token).unwrap();
        state.sessions.update(&session_id, |s| s.revoked = true);

        let app = test_app(state);
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "session revoked");
    }

    #[tokio::test]
    async fn expired_session_rejected() {
        let (state, _, token) = seeded_state();

        let (session_id, _) = parse_session_token(&token).unwrap();
        state.sessions.update(&session_id, |s| {
            s.expires_at = Utc::now() - Duration::minutes(5);
        });

        let app = test_app(state);
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "session expired");
    }

    #[tokio::test]
    async fn session_for_deleted_company_rejected() {
        let (state, company, token) = seeded_state();
        state.companies.remove(&company.id);

        let app = test_app(state);
        let request = Request::builder()
            .uri("/test")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let err = error_json(response).await;
        assert_eq!(err["message"], "invalid session token");
    }

    // ── CurrentCompany extractor tests ───────────────────────────

    #[tokio::test]
    async fn extractor_returns_injected_company() {
        let (state, company, token) = seeded_state();

        let app = Router::new()
            .route(
                "/whoami",
                get(|current: CurrentCompany| async move { current.company.name }),
            )
            .layer(from_fn_with_state(state, auth_middleware));

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], company.name.as_bytes());
    }

    #[tokio::test]
    async fn extractor_without_middleware_rejected() {
        let app = Router::new().route(
            "/whoami",
            get(|current: CurrentCompany| async move { current.company.name }),
        );

        let request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ── Token handling tests ─────────────────────────────────────

    #[test]
    fn parse_session_token_valid() {
        let id = Uuid::new_v4();
        let token = format!("{id}:deadbeef");
        let (session_id, secret) = parse_session_token(&token).unwrap();
        assert_eq!(session_id, SessionId::from_uuid(id));
        assert_eq!(secret, "deadbeef");
    }

    #[test]
    fn parse_session_token_splits_at_first_colon() {
        let id = Uuid::new_v4();
        let token = format!("{id}:se:cr:et");
        let (_, secret) = parse_session_token(&token).unwrap();
        assert_eq!(secret, "se:cr:et");
    }

    #[test]
    fn parse_session_token_rejects_malformed() {
        assert!(parse_session_token("no-colon-here").is_none());
        assert!(parse_session_token("not-a-uuid:secret").is_none());
        assert!(parse_session_token(&format!("{}:", Uuid::new_v4())).is_none());
        assert!(parse_session_token("").is_none());
    }

    #[test]
    fn hash_secret_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            hash_secret("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn hex_encode_lowercase() {
        assert_eq!(hex_encode(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn verify_secret_matches_own_hash() {
        let hash = hash_secret("session-secret");
        assert!(verify_secret("session-secret", &hash));
        assert!(!verify_secret("other-secret", &hash));
    }

    #[test]
    fn constant_time_eq_identical_digests() {
        assert!(constant_time_digest_eq("deadbeef", "deadbeef"));
    }

    #[test]
    fn constant_time_eq_rejects_wrong_digest() {
        assert!(!constant_time_digest_eq("deadbeef", "cafebabe"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(!constant_time_digest_eq("dead", "deadbeef"));
    }

    #[test]
    fn constant_time_eq_rejects_empty() {
        assert!(!constant_time_digest_eq("", "deadbeef"));
    }
}
