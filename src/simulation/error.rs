use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected directory payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Directory answered but no entry carried a dial code.
    #[error("Country directory is empty")]
    EmptyDirectory,
}
