//! Single-process orchestrator (C8): drives C6 → C4 → C5 → sink
//! sequentially, in input-enumeration order.

use std::fs::File;
use std::io::Cursor;

use crate::config::Config;
use crate::enumerate::Input;
use crate::file_hasher::{compute_file, file_digest};
use crate::format::format_line;
use crate::orchestrator::LineSink;
use crate::progress::Progress;
use crate::skip::SkipSet;

const STDIN_PATH: &str = "<stdin>";

/// Run the sequential pipeline over `inputs`, writing formatted lines to
/// `sink` (and, for newly computed files, to `incremental` if present).
pub fn run(
    cfg: &Config,
    inputs: &[Input],
    skip: &SkipSet,
    sink: &mut Option<LineSink>,
    incremental: &mut Option<LineSink>,
    progress: &dyn Progress,
) -> anyhow::Result<()> {
    for input in inputs {
        match input {
            Input::StdinBytes => {
                let mut stream = std::io::stdin().lock();
                let line = hash_stream(&mut stream, STDIN_PATH, cfg)?;
                write_everywhere(&line, sink, incremental)?;
            }
            Input::Path(path) => {
                let path_str = path.to_string_lossy().into_owned();
                let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                if skip.contains(&path_str) {
                    progress.update(size);
                    continue;
                }
                let file = match File::open(path) {
                    Ok(f) => f,
                    Err(err) => {
                        log::warn!("skipping unreadable file {path_str}: {err}");
                        progress.update(size);
                        continue;
                    }
                };
                let mut reader = std::io::BufReader::new(file);
                let line = match compute_and_format(&mut reader, &path_str, cfg) {
                    Ok(line) => line,
                    Err(err) => {
                        log::warn!("skipping unreadable file {path_str}: {err}");
                        progress.update(size);
                        continue;
                    }
                };
                write_everywhere(&line, sink, incremental)?;
                progress.update(size);
            }
        }
    }
    progress.finish();
    Ok(())
}

fn hash_stream<R: std::io::Read>(stream: &mut R, path: &str, cfg: &Config) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    let mut cursor = Cursor::new(buf);
    compute_and_format(&mut cursor, path, cfg)
}

fn compute_and_format<R: std::io::Read>(
    stream: &mut R,
    path: &str,
    cfg: &Config,
) -> anyhow::Result<String> {
    let chunks = compute_file(stream, &cfg.alg)?;
    let digest = file_digest(&chunks, &cfg.alg);
    Ok(format_line(&digest, path, &cfg.alg.token, &chunks))
}

fn write_everywhere(
    line: &str,
    sink: &mut Option<LineSink>,
    incremental: &mut Option<LineSink>,
) -> anyhow::Result<()> {
    if let Some(sink) = sink {
        sink.write_line(line)?;
    }
    if let Some(incremental) = incremental {
        incremental.write_line(line)?;
    }
    Ok(())
}
