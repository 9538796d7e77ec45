//! Engine client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Request cancelled before analysis started")]
    Cancelled,

    #[error("Engine process error: {0}")]
    Process(String),

    #[error("Engine client is shut down")]
    Shutdown,
}
