//! The CLI surface (C10): a `clap` derive-based argument parser producing
//! a typed [`Cli`], resolved into a [`crate::config::Config`] by `main`.

use std::path::PathBuf;

use clap::Parser;

use crate::algorithm::AlgorithmId;
use crate::config::{Config, Sink};

const DEFAULT_ALG: &str = "fck4sha2";

/// Print FastCDC rolling-hash chunks and checksums for files and directory
/// trees.
#[derive(Debug, Parser)]
#[command(name = "chunksum", version, about, long_about = None)]
pub struct Cli {
    /// Algorithm id: "fc<unit><power><hash>[<digest_size>]", e.g. fck4sha2
    /// or fcm4blake2b32.
    #[arg(short = 'n', long = "alg", default_value = DEFAULT_ALG)]
    pub alg: String,

    /// Chunksums file: read for the skip set, appended to, or "-" for
    /// stdout.
    #[arg(short = 'f', long = "chunksums")]
    pub chunksums: Option<String>,

    /// Incremental updates file, receiving only newly computed lines.
    #[arg(short = 'i', long = "incremental")]
    pub incremental: Option<PathBuf>,

    /// Enable the threaded multi-worker orchestrator.
    #[arg(short = 'm', long = "multi-process")]
    pub multi_process: bool,

    /// Consumer mode: read paths from stdin, one per line; implies
    /// single-process.
    #[arg(short = 'x', long = "stdin-paths")]
    pub stdin_paths: bool,

    /// Input paths. "-" hashes stdin bytes as a single anonymous file.
    pub paths: Vec<String>,
}

impl Cli {
    /// Resolve this parsed CLI into a validated [`Config`], failing with a
    /// top-level error on a bad algorithm id (a configuration error, per
    /// the error-handling design, rather than a per-file one).
    pub fn into_config(self) -> anyhow::Result<Config> {
        let alg = AlgorithmId::parse(&self.alg)?;
        let chunksums = match self.chunksums.as_deref() {
            None | Some("-") => Sink::Stdout,
            Some(path) => Sink::File(PathBuf::from(path)),
        };
        Ok(Config {
            alg,
            chunksums,
            incremental: self.incremental,
            multi_process: self.multi_process && !self.stdin_paths,
            stdin_paths: self.stdin_paths,
            paths: self.paths,
        })
    }
}
