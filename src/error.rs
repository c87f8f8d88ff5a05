// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error kinds surfaced by the reader.
//!
//! Mirrors the kinds named in the specification: absence, misuse of a
//! closed/unopened reader, file corruption, a bad replacement table, and
//! internal inconsistency between the Dictionary and Guide images.

use std::fmt;
use std::io;

/// Errors produced while opening or querying a dictionary file.
#[derive(Debug)]
pub enum Error {
    /// The key is absent from the automaton.
    NotFound,
    /// A query was issued before a successful `open`, or after `close`.
    NotLoaded,
    /// The file's headers could not be parsed, or a section runs past EOF.
    MalformedFile { image: &'static str, detail: String },
    /// A replacement table's value set overlaps its key set.
    InvalidReplaceTable { from: Vec<u8>, to: Vec<u8> },
    /// Enumeration found the Dictionary and Guide images disagree.
    StructuralMismatch { index: u32 },
    /// Underlying I/O failure opening or reading the file.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "key not found"),
            Error::NotLoaded => write!(f, "reader is not loaded (unopened or already closed)"),
            Error::MalformedFile { image, detail } => {
                write!(f, "malformed {image} image: {detail}")
            }
            Error::InvalidReplaceTable { from, to } => write!(
                f,
                "invalid replacement table: {:?} is both a key and a value",
                String::from_utf8_lossy(if from == to { from } else { to })
            ),
            Error::StructuralMismatch { index } => {
                write!(f, "structural mismatch at node {index}: guide and dictionary disagree")
            }
            Error::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Build a `MalformedFile` error with context, the way the teacher builds
/// `io::Error::new(ErrorKind::InvalidData, format!(...))` at every format
/// validation site.
pub(crate) fn malformed(image: &'static str, detail: impl Into<String>) -> Error {
    Error::MalformedFile {
        image,
        detail: detail.into(),
    }
}
