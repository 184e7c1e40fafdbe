use std::io;

use thiserror::Error;

/// Exit status for a missing input file.
pub const EXIT_FILE_NOT_FOUND: i32 = 3;
/// Exit status for permission and other access failures.
pub const EXIT_ACCESS_DENIED: i32 = 4;
/// Exit status for input that is not valid UTF-8.
pub const EXIT_ENCODING_ERROR: i32 = 5;
/// Exit status for any other read failure.
pub const EXIT_READ_ERROR: i32 = 6;
/// Exit status for write and flush failures.
pub const EXIT_WRITE_ERROR: i32 = 7;

/// Fatal pipeline failures. None of these are retried.
#[derive(Error, Debug)]
pub enum MpregError {
    #[error("{name}: No such file or directory")]
    FileNotFound {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{name}: Permission denied")]
    AccessDenied {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{name}: invalid UTF-8 at byte offset {offset}")]
    EncodingError { name: String, offset: u64 },
    #[error("{name}: read error: {msg}")]
    ReadError {
        name: String,
        msg: String,
        #[source]
        source: io::Error,
    },
    #[error("{name}: write error: {msg}")]
    WriteError {
        name: String,
        msg: String,
        #[source]
        source: io::Error,
    },
}

impl MpregError {
    /// Classify a failure that happened while opening or reading the input.
    pub fn from_read(name: &str, offset: u64, source: io::Error) -> Self {
        let name = name.to_string();
        match source.kind() {
            io::ErrorKind::NotFound => MpregError::FileNotFound { name, source },
            io::ErrorKind::PermissionDenied => MpregError::AccessDenied { name, source },
            io::ErrorKind::InvalidData => MpregError::EncodingError { name, offset },
            _ => MpregError::ReadError {
                name,
                msg: crate::common::io_error_msg(&source),
                source,
            },
        }
    }

    /// Any failure on the output side, including opening the sink.
    pub fn from_write(name: &str, source: io::Error) -> Self {
        MpregError::WriteError {
            name: name.to_string(),
            msg: crate::common::io_error_msg(&source),
            source,
        }
    }

    /// Returns the process exit code for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            MpregError::FileNotFound { .. } => EXIT_FILE_NOT_FOUND,
            MpregError::AccessDenied { .. } => EXIT_ACCESS_DENIED,
            MpregError::EncodingError { .. } => EXIT_ENCODING_ERROR,
            MpregError::ReadError { .. } => EXIT_READ_ERROR,
            MpregError::WriteError { .. } => EXIT_WRITE_ERROR,
        }
    }
}
