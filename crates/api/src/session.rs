//! Session lookup against the auth provider.
//!
//! The storefront delegates authentication to an external provider; the
//! only operation the API consumes is "get current session" for a bearer
//! token. An in-memory implementation stands in for the provider in tests
//! and local development. Checkout works with or without a session; admin
//! routes require one with the ADMIN role.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use common::UserId;
use domain::Role;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ApiError;

/// An authenticated identity attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The authenticated user.
    pub user_id: UserId,

    /// Role granted to the session.
    pub role: Role,
}

/// "Get current session" contract of the external auth provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves a bearer token to a session, if the token is valid.
    async fn current_session(&self, token: &str) -> Option<Session>;
}

/// In-memory session table.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessions {
    tokens: Arc<RwLock<HashMap<String, Session>>>,
}

impl InMemorySessions {
    /// Creates an empty session table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a session token for a user.
    pub async fn issue(&self, user_id: UserId, role: Role) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens
            .write()
            .await
            .insert(token.clone(), Session { user_id, role });
        token
    }

    /// Revokes a previously issued token.
    pub async fn revoke(&self, token: &str) {
        self.tokens.write().await.remove(token);
    }
}

#[async_trait]
impl AuthProvider for InMemorySessions {
    async fn current_session(&self, token: &str) -> Option<Session> {
        self.tokens.read().await.get(token).copied()
    }
}

/// Extracts the bearer token from an Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the request's session, if any.
pub async fn session_from_headers<A: AuthProvider>(
    auth: &A,
    headers: &HeaderMap,
) -> Option<Session> {
    let token = bearer_token(headers)?;
    auth.current_session(token).await
}

/// Resolves the request's session and requires the ADMIN role.
pub async fn require_admin<A: AuthProvider>(
    auth: &A,
    headers: &HeaderMap,
) -> Result<Session, ApiError> {
    let session = session_from_headers(auth, headers)
        .await
        .ok_or(ApiError::Unauthorized)?;
    if session.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_token(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let sessions = InMemorySessions::new();
        let user_id = UserId::new();
        let token = sessions.issue(user_id, Role::Customer).await;

        let session = sessions.current_session(&token).await.unwrap();
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_unknown_token_resolves_to_none() {
        let sessions = InMemorySessions::new();
        assert!(sessions.current_session("bogus").await.is_none());
    }

    #[tokio::test]
    async fn test_revoked_token_stops_resolving() {
        let sessions = InMemorySessions::new();
        let token = sessions.issue(UserId::new(), Role::Customer).await;
        sessions.revoke(&token).await;
        assert!(sessions.current_session(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_session_from_headers() {
        let sessions = InMemorySessions::new();
        let token = sessions.issue(UserId::new(), Role::Customer).await;

        let session = session_from_headers(&sessions, &headers_with_token(&token)).await;
        assert!(session.is_some());

        let none = session_from_headers(&sessions, &HeaderMap::new()).await;
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_require_admin() {
        let sessions = InMemorySessions::new();

        let customer = sessions.issue(UserId::new(), Role::Customer).await;
        let admin = sessions.issue(UserId::new(), Role::Admin).await;

        assert!(matches!(
            require_admin(&sessions, &HeaderMap::new()).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            require_admin(&sessions, &headers_with_token(&customer)).await,
            Err(ApiError::Forbidden)
        ));
        assert!(
            require_admin(&sessions, &headers_with_token(&admin))
                .await
                .is_ok()
        );
    }
}
