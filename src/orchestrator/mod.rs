//! Orchestration (C8/C9): drives the input enumerator, the skip
//! predicate, the file hasher, and the result formatter to a single
//! append-capable sink, either sequentially or across worker threads.

pub mod single;
pub mod multi;

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::{Config, Sink};

/// A line sink that flushes after every write, matching the
/// append-only-with-explicit-flush durability the chunksums format
/// relies on (a crash after a line is flushed leaves it durable).
pub enum LineSink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
}

impl LineSink {
    pub fn open(sink: &Sink) -> io::Result<Self> {
        match sink {
            Sink::Stdout => Ok(LineSink::Stdout(io::stdout())),
            Sink::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Ok(LineSink::File(BufWriter::new(file)))
            }
        }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            LineSink::Stdout(out) => {
                writeln!(out, "{line}")?;
                out.flush()
            }
            LineSink::File(out) => {
                writeln!(out, "{line}")?;
                out.flush()
            }
        }
    }
}

/// Open the incremental-updates file in append mode, if configured.
pub fn open_incremental(path: &Path) -> io::Result<LineSink> {
    LineSink::open(&Sink::File(path.to_path_buf()))
}

/// Sum the on-disk size of every enumerated input, used to size the
/// progress bar up front. Unreadable or missing paths contribute zero,
/// matching the permissive "skip and keep going" philosophy elsewhere.
pub fn total_input_size(inputs: &[crate::enumerate::Input]) -> u64 {
    inputs
        .iter()
        .map(|input| match input {
            crate::enumerate::Input::Path(path) => {
                std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
            }
            crate::enumerate::Input::StdinBytes => 0,
        })
        .sum()
}

/// Resolve the final enumerated input stream for a run, honoring the
/// `-x` consumer mode (paths arrive one per line on stdin) versus the
/// ordinary positional-argument expansion.
pub fn resolve_inputs(cfg: &Config) -> Vec<crate::enumerate::Input> {
    if cfg.stdin_paths {
        crate::enumerate::read_lines_from(io::stdin().lock())
    } else {
        crate::enumerate::enumerate_inputs(&cfg.paths)
    }
}
