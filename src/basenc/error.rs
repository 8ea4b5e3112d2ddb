use std::io;

use crate::common::io_error_msg;

/// Fatal failures of an encode/decode run.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A byte outside the active alphabet while garbage is not being ignored.
    #[error("invalid character: {}", printable(.byte))]
    InvalidCharacter { byte: u8 },

    #[error("{path}: {}", io_error_msg(.source))]
    FileOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CodecError {
    /// True for a write to a closed pipe, which callers treat as a clean exit.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, CodecError::Io(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

fn printable(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", *byte as char)
    } else {
        format!("'{}'", (*byte as char).escape_default())
    }
}
