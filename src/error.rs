use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UartError {
    #[error("no port specified")]
    NoPort,

    #[error("failed to open port '{port}': {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("failed to list serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    #[error("not connected to any port")]
    NotConnected,

    #[error("serial reader has stopped")]
    LinkClosed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("command is empty")]
    Empty,

    #[error("hex string must have an even number of digits (got {0})")]
    OddLength(usize),

    #[error("invalid hex digit '{0}'")]
    InvalidHex(char),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SendError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Uart(#[from] UartError),
}
