use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write packet bytes: {0}")]
    SinkWrite(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("host {host} has no IPv4 address")]
    Resolve { host: String },
}

pub type Result<T> = std::result::Result<T, Error>;
