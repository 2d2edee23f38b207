use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

/// Username of the authenticated admin, inserted into request extensions
/// so handlers can attribute actions (e.g. rating replies)
#[derive(Debug, Clone)]
pub struct AdminUser(pub String);

/// Configured admin credential. Only the SHA-256 digest of the password is
/// kept in memory; verification hashes the presented password and compares.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password_digest: [u8; 32],
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_digest: Sha256::digest(password.as_bytes()).into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let digest: [u8; 32] = Sha256::digest(password.as_bytes()).into();
        username == self.username && digest == self.password_digest
    }
}

/// Middleware enforcing HTTP Basic authentication on admin routes
pub async fn require_basic_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Admin request without credentials: {}", request.uri().path());
            ApiError::Unauthorized("Authentication required".to_string())
        })?;

    let (username, password) = decode_basic(header_value)
        .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

    if !state.admin.verify(&username, &password) {
        tracing::warn!("Failed admin login attempt for user {}", username);
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    request.extensions_mut().insert(AdminUser(username));
    Ok(next.run(request).await)
}

/// Decodes an `Authorization: Basic <base64(user:pass)>` header value
fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
