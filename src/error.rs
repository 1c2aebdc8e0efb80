use std::{io, path::PathBuf, time::Duration};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("no client connected within {timeout:?}")]
    AcceptTimeout { timeout: Duration },

    #[error("failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("socket error: {0}")]
    Socket(#[source] io::Error),

    #[error("failed to write {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to stdout: {0}")]
    Console(#[source] io::Error),

    #[error("failed to listen for Ctrl-C: {0}")]
    Signal(#[source] io::Error),
}

impl ServerError {
    /// Process exit status: 1 when nobody connected, 2 for any I/O failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServerError::AcceptTimeout { .. } => 1,
            ServerError::Bind { .. }
            | ServerError::Accept(_)
            | ServerError::Socket(_)
            | ServerError::File { .. }
            | ServerError::Console(_)
            | ServerError::Signal(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
