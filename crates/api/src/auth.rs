//! Bearer-token guard for the admin routes.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;

/// The configured admin token. `None` locks every admin route.
#[derive(Debug, Clone, Default)]
pub struct AdminToken(Option<Arc<str>>);

impl AdminToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.is_empty()).map(Arc::from))
    }

    fn accepts(&self, presented: &str) -> bool {
        self.0.as_deref().is_some_and(|expected| expected == presented)
    }
}

/// Extractor that requires `Authorization: Bearer <ADMIN_TOKEN>`.
///
/// ```rust,ignore
/// async fn handler(_admin: RequireAdmin) -> impl IntoResponse { .. }
/// ```
pub struct RequireAdmin;

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    AdminToken: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = AdminToken::from_ref(state);

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(presented) if token.accepts(presented) => Ok(Self),
            _ => {
                metrics::counter!("admin_auth_rejected_total").increment(1);
                tracing::warn!(path = %parts.uri.path(), "rejected admin request");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_token_accepts_nothing() {
        let token = AdminToken::new(None);
        assert!(!token.accepts(""));
        assert!(!token.accepts("anything"));
        assert!(!AdminToken::new(Some(String::new())).accepts(""));
    }

    #[test]
    fn configured_token_must_match_exactly() {
        let token = AdminToken::new(Some("s3cret".to_string()));
        assert!(token.accepts("s3cret"));
        assert!(!token.accepts("S3CRET"));
        assert!(!token.accepts("s3cret "));
    }
}
