use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The buffer is not decodable text; offset of the first invalid byte
    #[error("Input is not valid UTF-8 text (invalid byte at offset {0})")]
    NotText(usize),

    /// A cancellation signal fired; no partial result is returned
    #[error("Parse cancelled after {0} lines")]
    Cancelled(u64),
}

pub type EngineResult<T> = Result<T, EngineError>;
