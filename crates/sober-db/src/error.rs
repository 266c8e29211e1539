use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,

    /// A unique constraint rejected the row (duplicate email).
    #[error("record already exists")]
    Conflict,

    /// The row references a user that does not exist.
    #[error("referenced record does not exist")]
    ForeignKey,

    #[error("database did not respond in time")]
    Timeout,

    #[error("database lock poisoned")]
    Poisoned,

    #[error("blocking task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        if matches!(err, rusqlite::Error::QueryReturnedNoRows) {
            return Self::NotFound;
        }

        match err.sqlite_error().map(|e| e.extended_code) {
            Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => Self::ForeignKey,
            Some(ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY) => Self::Conflict,
            _ => Self::Sqlite(err),
        }
    }
}
