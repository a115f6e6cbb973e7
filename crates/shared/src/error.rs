#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the default aisle of a location cannot be deleted")]
    DeleteDefaultAisle,

    #[error("the location already has a default aisle")]
    DuplicateDefaultAisle,

    #[error("a product with this name already exists")]
    DuplicateProductName,

    #[error("a location with this name already exists")]
    DuplicateLocationName,

    #[error("home location not found")]
    HomeLocationMissing,

    #[error("the home location cannot be deleted")]
    DeleteHomeLocation,

    #[error("a home location already exists")]
    DuplicateHomeLocation,

    #[error("invalid backup: {0}")]
    InvalidBackup(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps a unique index violation to `duplicate`, anything else to [`Error::Database`].
    pub fn unique_violation(err: sqlx::Error, duplicate: Error) -> Self {
        match err.as_database_error() {
            Some(db) if db.is_unique_violation() => duplicate,
            _ => Self::Database(err),
        }
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<strum::ParseError> for Error {
    fn from(value: strum::ParseError) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Unknown($crate::__private::anyhow!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::Error::Unknown($crate::__private::anyhow!($err)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Unknown($crate::__private::anyhow!($fmt, $($arg)*)))
    };
}
