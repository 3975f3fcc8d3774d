use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while loading configuration or room data. Scanning itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed RON: {0}")]
    Ron(#[from] ron::Error),
}
