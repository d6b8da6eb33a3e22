//! Unified error type for the Quizpot service.

use quizpot_identity::IdentityError;
use quizpot_rooms::RoomError;

/// Top-level error that wraps the crate-specific errors.
///
/// Embedders of the `quizpot` meta-crate deal with this single type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuizpotError {
    /// The caller's token could not be resolved to a user.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A room operation was rejected or the room was unreachable.
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use quizpot_types::RoomId;

    use super::*;

    #[test]
    fn test_from_identity_error() {
        let err = IdentityError::Unauthenticated("bad token".into());
        let quizpot_err: QuizpotError = err.into();
        assert!(matches!(quizpot_err, QuizpotError::Identity(_)));
        assert!(quizpot_err.to_string().contains("bad token"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotFound(RoomId::new());
        let quizpot_err: QuizpotError = err.into();
        assert!(matches!(quizpot_err, QuizpotError::Room(_)));
        assert!(quizpot_err.to_string().contains("not found"));
    }
}
