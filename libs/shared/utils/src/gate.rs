use std::sync::Arc;

use axum::{extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};
use tracing::warn;

use shared_config::AppConfig;
use shared_models::error::AppError;

pub const STAFF_PASSCODE_HEADER: &str = "x-staff-passcode";

/// Middleware guarding the staff dashboard routes with the shared
/// portal passcode.
///
/// This is NOT an authentication system: one static secret, no
/// identity, no expiry. The compare lives server-side so the secret
/// never ships to browsers.
/// TODO: replace with session-based staff accounts.
pub async fn staff_gate(
    State(config): State<Arc<AppConfig>>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = config.staff_passcode.as_deref() else {
        warn!("Dashboard request rejected: no staff passcode configured");
        return Err(AppError::Auth("staff portal is locked".to_string()));
    };

    let presented = request
        .headers()
        .get(STAFF_PASSCODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !passcode_matches(presented, expected) {
        return Err(AppError::Auth("invalid staff passcode".to_string()));
    }

    Ok(next.run(request).await)
}

/// Digest comparison so the check does not leak match length through
/// early-exit string equality.
pub fn passcode_matches(presented: &str, expected: &str) -> bool {
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_passcode_accepted() {
        assert!(passcode_matches("open-sesame", "open-sesame"));
    }

    #[test]
    fn wrong_passcode_rejected() {
        assert!(!passcode_matches("open-sesame", "open-sesam"));
        assert!(!passcode_matches("", "open-sesame"));
    }
}
