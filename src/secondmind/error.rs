use crate::model::NoteId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username already exists: {0}")]
    DuplicateUser(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid username {0:?}: must be non-empty without ':' or whitespace")]
    InvalidUsername(String),

    #[error("Credential file is corrupt (line {line}): {reason}")]
    CorruptCredentialFile { line: usize, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("Note not found: {0}")]
    NoSuchNote(NoteId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Note body cannot be empty")]
    EmptyBody,

    #[error("Note too long (max {0} characters)")]
    BodyTooLong(usize),

    #[error("Invalid date {0:?}, expected YYYY-MM-DD")]
    BadDateFormat(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Note already exists with the same content, tags and due date")]
    DuplicateNote,
}

#[derive(Error, Debug)]
pub enum SecondmindError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl SecondmindError {
    /// Errors after which no session can be established.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SecondmindError::Auth(AuthError::CorruptCredentialFile { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, SecondmindError>;
