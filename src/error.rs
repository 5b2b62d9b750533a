//! Error types for each pipeline component, composed into a single
//! top-level error by way of `thiserror`'s `#[from]` conversions.

use thiserror::Error;

/// Errors raised while resolving a chunk-size token (C1).
#[derive(Debug, Error)]
pub enum ChunkSizeError {
    #[error("wrong unit or power of chunk size: {0}")]
    BadSizeToken(String),
    #[error("chunk size too small: {0}")]
    SizeTooSmall(u32),
    #[error("chunk size should be a multiple of 4, but {0} % 4 = {1}")]
    SizeUnaligned(u32, u32),
}

/// Errors raised while resolving a hash name (C3).
#[derive(Debug, Error)]
pub enum HashError {
    #[error("unsupported hash name: {0}")]
    UnsupportedHash(String),
}

/// Errors raised while parsing an algorithm id or a chunksums line (C5).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed chunksums line: {0}")]
    MalformedChunksumsLine(String),
    #[error(transparent)]
    ChunkSize(#[from] ChunkSizeError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors surfaced by the orchestrators (C8/C9). These are never raised for
/// ordinary per-file I/O failures, which are logged and skipped instead.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("worker thread panicked")]
    WorkerCrash,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
