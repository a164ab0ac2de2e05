use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or saving group files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to list {path:?}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode group {name:?}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown group {0:?}")]
    UnknownGroup(String),
}

/// Failures that abort the import of one scan document.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid scan file pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to list {path:?}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed scan document: {0}")]
    Xml(String),
    #[error("unexpected root element <{found}>, expected <REQUEST>")]
    UnexpectedRoot { found: String },
    #[error("scan document has no {0} element")]
    MissingElement(&'static str),
}

impl From<quick_xml::Error> for ImportError {
    fn from(e: quick_xml::Error) -> Self {
        ImportError::Xml(e.to_string())
    }
}

impl From<quick_xml::DeError> for ImportError {
    fn from(e: quick_xml::DeError) -> Self {
        ImportError::Xml(e.to_string())
    }
}

/// A single scan entry that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("entry #{index} has no {field} element")]
    MissingField { index: usize, field: &'static str },
}
