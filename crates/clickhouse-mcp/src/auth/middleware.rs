//! Route-conditional authentication gate for the HTTP transport
//!
//! Only the streaming tool route requires a bearer token; the descriptor
//! route and anything else pass through untouched. Rejections are raw
//! status/body responses and never reach the tool pipeline.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::error::AuthError;
use super::jwt::JwtValidator;

/// Path prefix of the gated streaming tool route
const GATED_PATH: &str = "/sse";

/// Authentication state shared with the gate middleware
#[derive(Clone, Default)]
pub struct AuthState {
    validator: Option<Arc<JwtValidator>>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl AuthState {
    /// Build the gate state from the configured signing secret.
    ///
    /// A missing secret still produces a usable state; gated routes then
    /// answer 500 until the secret is provisioned.
    #[must_use]
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            validator: secret.map(|s| Arc::new(JwtValidator::new(s))),
        }
    }

    /// Whether a signing secret has been provisioned
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.validator.is_some()
    }
}

/// Request-interception middleware applying the bearer-token check to the
/// streaming tool route only
pub async fn access_gate(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match evaluate(path, auth_header, &state) {
        Ok(()) => next.run(request).await,
        Err((status, body)) => {
            tracing::warn!(path, %status, "Request rejected by access gate");
            (status, body).into_response()
        }
    }
}

/// Gate decision, kept pure and synchronous for testability
fn evaluate(
    path: &str,
    auth_header: Option<&str>,
    state: &AuthState,
) -> Result<(), (StatusCode, String)> {
    if path != GATED_PATH && !path.starts_with("/sse/") {
        return Ok(());
    }

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Unauthorized: Missing or invalid token".to_string(),
            )
        })?;

    let validator = state.validator.as_ref().ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error: Missing JWT secret".to_string(),
        )
    })?;

    match validator.validate(token) {
        Ok(_claims) => Ok(()),
        Err(AuthError::Expired) => Err((
            StatusCode::UNAUTHORIZED,
            "Unauthorized: Token expired".to_string(),
        )),
        Err(AuthError::Invalid(detail)) => Err((
            StatusCode::UNAUTHORIZED,
            format!("Unauthorized: Invalid token - {detail}"),
        )),
    }
}
