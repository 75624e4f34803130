//! Error types for mapping operations.

use crate::record::RecordId;

/// Errors that can occur while building or querying a mapping.
#[derive(Debug)]
pub enum Error {
    /// Not every root page needed for the language pair could be found.
    ///
    /// Fatal: a mapper is never constructed partially. Each field carries the
    /// root id when that language was found.
    RootPagesMissing {
        source: Option<RecordId>,
        target: Option<RecordId>,
        main: Option<RecordId>,
    },

    /// An id was looked up that is absent from the relevant map.
    ///
    /// This is a normal outcome for records whose language branch has no
    /// counterpart in the other language, not a defect.
    NotMapped(RecordId),

    /// Positional fallback hit a parent page that was never mapped.
    ///
    /// Cannot happen with a record source that only returns children of the
    /// parents it was asked for.
    ParentNotMapped(RecordId),

    /// The builder was asked for a table path it does not know.
    UnknownTable(String),

    /// The record source failed.
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RootPagesMissing {
                source,
                target,
                main,
            } => write!(
                f,
                "not all root pages could be found (source: {source:?}, target: {target:?}, main: {main:?})"
            ),
            Error::NotMapped(id) => write!(f, "id {id} is not mapped"),
            Error::ParentNotMapped(id) => write!(f, "parent page {id} has not been mapped"),
            Error::UnknownTable(path) => write!(f, "unknown table path: {path}"),
            Error::Backend(err) => write!(f, "record source error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Wrap a record-source failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Backend(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
