use thiserror::Error;

/// Result type alias for lobby operations
pub type Result<T> = std::result::Result<T, LobbyError>;

/// Everything that can go wrong while driving the lobby state machine.
///
/// Only join failures are ever surfaced to a client (as the reason text of
/// a `join-error` event); start and move failures are treated as stale
/// client state and stay server-side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    /// Referenced lobby id (or participant) does not exist
    #[error("lobby not found")]
    NotFound,
    /// Start requested by a connection that is not the host
    #[error("only the host can start the game")]
    Forbidden,
    /// Join rejected: lobby is at capacity
    #[error("lobby is full")]
    Full,
    /// Join rejected: the game already started
    #[error("game already started")]
    AlreadyRunning,
    /// Move rejected: the game has not started yet
    #[error("game has not started")]
    NotRunning,
    /// Display name failed the structural check (empty)
    #[error("display name must not be empty")]
    InvalidName,
    /// Lobby id generation gave up after the retry budget
    #[error("could not allocate a unique lobby id")]
    IdExhausted,
}
