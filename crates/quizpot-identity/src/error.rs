//! Error types for identity resolution.

/// Errors that can occur while resolving a caller's identity.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The token was missing, malformed, expired, or rejected by the
    /// provider. The caller stays anonymous and the request is refused.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The provider itself could not be reached. Distinct from
    /// [`Unauthenticated`](Self::Unauthenticated) so callers can retry
    /// instead of re-prompting for credentials.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}
