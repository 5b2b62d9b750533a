//! The resolved, validated form of the CLI arguments, crossing from the
//! `clap`-owned surface (C10) into the orchestrators (C8/C9).

use std::path::PathBuf;

use crate::algorithm::AlgorithmId;

/// Where computed chunksums lines are written.
#[derive(Debug, Clone)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub alg: AlgorithmId,
    /// Where every computed line is written. Defaults to stdout when `-f`
    /// is not given; only a real file path also doubles as the prior
    /// chunksums file consulted for the skip set.
    pub chunksums: Sink,
    pub incremental: Option<PathBuf>,
    pub multi_process: bool,
    pub stdin_paths: bool,
    pub paths: Vec<String>,
}
