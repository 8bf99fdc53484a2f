//! Error types for the cleaning pipeline

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::AttributeKind;

/// Errors produced while parsing, reindexing or writing an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// A face token could not be decoded into attribute indices
    #[error("Malformed record on line {line}: {message}")]
    MalformedRecord {
        /// 1-based source line
        line: usize,
        /// What was wrong with the record
        message: String,
    },

    /// A face references an attribute that does not exist in its pool
    #[error("Dangling {kind} reference on line {line}: index {index} exceeds pool of {pool_len}")]
    DanglingReference {
        /// 1-based source line of the face
        line: usize,
        /// Which attribute pool the index points into
        kind: AttributeKind,
        /// The 1-based index as written in the source
        index: u32,
        /// Number of records in the pool
        pool_len: usize,
    },

    /// Reading or writing a file failed
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a stream failed
    #[error("IO error: {0}")]
    Stream(#[from] std::io::Error),
}

impl ObjError {
    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
