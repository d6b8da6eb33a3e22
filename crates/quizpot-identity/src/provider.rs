//! The [`IdentityProvider`] trait and its built-in implementations.

use std::collections::HashMap;

use quizpot_types::UserId;

use crate::IdentityError;

/// Resolves an opaque auth token to a user identity.
///
/// # Trait bounds
///
/// - `Send + Sync` — the provider is shared across async tasks.
/// - `'static` — it lives as long as the service and borrows nothing
///   temporary.
///
/// # Example
///
/// ```rust
/// use quizpot_identity::{IdentityError, IdentityProvider};
/// use quizpot_types::UserId;
///
/// /// Accepts tokens of the form "user:<name>".
/// struct PrefixProvider;
///
/// impl IdentityProvider for PrefixProvider {
///     async fn resolve(&self, token: &str) -> Result<UserId, IdentityError> {
///         match token.strip_prefix("user:") {
///             Some(name) if !name.is_empty() => Ok(UserId::from(name)),
///             _ => Err(IdentityError::Unauthenticated(
///                 "expected a user: prefix".into(),
///             )),
///         }
///     }
/// }
/// ```
pub trait IdentityProvider: Send + Sync + 'static {
    /// Validates `token` and returns who the caller is.
    ///
    /// # Returns
    /// - `Ok(UserId)` — the token maps to a known user
    /// - `Err(IdentityError::Unauthenticated)` — the token was rejected
    /// - `Err(IdentityError::Unavailable)` — the provider couldn't answer
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<UserId, IdentityError>> + Send;
}

/// Treats the token itself as the user id.
///
/// Only blank tokens (empty or all whitespace) are rejected; anything
/// else passes through verbatim. Useful for demos and local
/// development where "alice" should just be alice.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl IdentityProvider for Passthrough {
    async fn resolve(&self, token: &str) -> Result<UserId, IdentityError> {
        if token.trim().is_empty() {
            return Err(IdentityError::Unauthenticated("blank token".into()));
        }
        Ok(UserId::from(token))
    }
}

/// A fixed token → user table.
///
/// Unknown tokens are rejected with
/// [`IdentityError::Unauthenticated`]. The table is built up front and
/// never mutated afterwards, so lookups need no locking.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    tokens: HashMap<String, UserId>,
}

impl TokenMap {
    /// Creates an empty table. Every token resolves to an error until
    /// entries are added with [`with_token`](Self::with_token).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one token → user entry, builder style.
    pub fn with_token(mut self, token: impl Into<String>, user: impl Into<UserId>) -> Self {
        self.tokens.insert(token.into(), user.into());
        self
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl IdentityProvider for TokenMap {
    async fn resolve(&self, token: &str) -> Result<UserId, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| IdentityError::Unauthenticated("unknown token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_uses_token_as_user_id() {
        let provider = Passthrough;
        let user = provider.resolve("alice").await.unwrap();
        assert_eq!(user.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_passthrough_rejects_empty_token() {
        let provider = Passthrough;
        let err = provider.resolve("").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_passthrough_rejects_whitespace_token() {
        let provider = Passthrough;
        assert!(provider.resolve("   ").await.is_err());
        assert!(provider.resolve("\t\n").await.is_err());
    }

    #[tokio::test]
    async fn test_token_map_resolves_registered_tokens() {
        let provider = TokenMap::new()
            .with_token("tok-1", "alice")
            .with_token("tok-2", "bob");

        assert_eq!(provider.len(), 2);
        assert_eq!(provider.resolve("tok-1").await.unwrap().as_str(), "alice");
        assert_eq!(provider.resolve("tok-2").await.unwrap().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_token_map_rejects_unknown_tokens() {
        let provider = TokenMap::new().with_token("tok-1", "alice");
        let err = provider.resolve("tok-9").await.unwrap_err();
        assert!(matches!(err, IdentityError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_empty_token_map_rejects_everything() {
        let provider = TokenMap::new();
        assert!(provider.is_empty());
        assert!(provider.resolve("anything").await.is_err());
    }
}
