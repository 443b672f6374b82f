//! Catalog storage: connection setup and the schema version gate.
//!
//! Every connection handed out by this module has run the full migration
//! list. A catalog written by a newer build is refused rather than
//! downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The catalog could not be opened; `target` is the file path or `:memory:`.
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// A statement against an open catalog failed.
    Sqlite(rusqlite::Error),
    /// `user_version` is ahead of the migrations compiled into this build.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open catalog `{target}`: {source}")
            }
            Self::Sqlite(err) => write!(f, "catalog query failed: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "catalog was written by a newer atlas (schema {found}, this build reads up to {supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
