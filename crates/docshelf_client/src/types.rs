use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// One document as served by the store. Unknown fields are ignored; `tags`
/// holds a single tag name or the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub title: String,
    pub filename: String,
    pub ext: String,
    pub size: u64,
    pub updated_at: i64,
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct RegistryRecord {
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct ReindexRecord {
    pub count: u64,
}

/// One file in an upload or restore submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A failed store call. The message is what the user sees: the response body
/// verbatim for status failures, the transport error text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Completion events emitted by the client worker, one per submitted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    RegistryLoaded {
        result: Result<Vec<String>, ApiError>,
    },
    DocsLoaded {
        generation: u64,
        result: Result<Vec<DocumentRecord>, ApiError>,
    },
    TagAdded {
        name: String,
        result: Result<(), ApiError>,
    },
    TagDeleted {
        name: String,
        result: Result<(), ApiError>,
    },
    TagAssigned {
        doc_id: String,
        result: Result<(), ApiError>,
    },
    DocDeleted {
        doc_id: String,
        result: Result<(), ApiError>,
    },
    UploadCompleted {
        count: usize,
        result: Result<(), ApiError>,
    },
    ReindexCompleted {
        result: Result<u64, ApiError>,
    },
    BackupSaved {
        result: Result<PathBuf, ApiError>,
    },
    RestoreCompleted {
        result: Result<(), ApiError>,
    },
}
