//! Multi-process orchestrator (C9), reimplemented with OS threads per the
//! REDESIGN FLAG: a language without a GIL may freely use threads
//! provided the concurrency invariants in the design hold, and the
//! collector remaining the sole writer does.
//!
//! Topology: one producer thread, `num_cpus::get()` worker threads, one
//! collector thread, one progress-monitor thread, plus the driver (this
//! function, running on the calling thread). Two bounded channels of
//! capacity 10 (`path_q`, `result_q`) and one unbounded progress channel
//! connect them. Each worker owns a busy flag; the collector owns its
//! own; both are observable by the driver.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, RecvTimeoutError};

use crate::config::Config;
use crate::enumerate::Input;
use crate::file_hasher::{compute_file, file_digest};
use crate::format::format_line;
use crate::orchestrator::LineSink;
use crate::progress::Progress;
use crate::skip::SkipSet;

/// Bounded capacity of the path and result queues.
const QUEUE_CAPACITY: usize = 10;
/// How long a worker or the collector waits on an empty queue before
/// re-checking its stop flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(1);

enum ProgressMsg {
    Bytes(u64),
    Done,
}

/// Run the threaded pipeline over `inputs`. `sink` becomes the exclusive
/// property of the collector thread: no other thread ever touches it.
/// `incremental`, if present, is written to by the collector alongside
/// `sink` for every newly computed line.
pub fn run(
    cfg: &Config,
    inputs: Vec<Input>,
    skip: Arc<SkipSet>,
    sink: Option<LineSink>,
    incremental: Option<LineSink>,
    progress: Arc<dyn Progress>,
) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = inputs
        .into_iter()
        .filter_map(|input| match input {
            Input::Path(path) => Some(path),
            Input::StdinBytes => None,
        })
        .collect();

    let (path_tx, path_rx) = bounded::<PathBuf>(QUEUE_CAPACITY);
    let (result_tx, result_rx) = bounded::<String>(QUEUE_CAPACITY);
    let (progress_tx, progress_rx) = unbounded::<ProgressMsg>();

    let worker_stop = Arc::new(AtomicBool::new(false));
    let collector_stop = Arc::new(AtomicBool::new(false));

    let num_workers = num_cpus::get().max(1);
    let worker_busy: Vec<Arc<AtomicBool>> = (0..num_workers)
        .map(|_| Arc::new(AtomicBool::new(false)))
        .collect();
    let collector_busy = Arc::new(AtomicBool::new(false));

    let monitor_handle = {
        let progress = Arc::clone(&progress);
        thread::spawn(move || {
            loop {
                match progress_rx.recv() {
                    Ok(ProgressMsg::Bytes(n)) => progress.update(n),
                    Ok(ProgressMsg::Done) | Err(_) => break,
                }
            }
            progress.finish();
        })
    };

    let collector_handle = {
        let stop = Arc::clone(&collector_stop);
        let busy = Arc::clone(&collector_busy);
        let mut sink = sink;
        let mut incremental = incremental;
        thread::spawn(move || -> anyhow::Result<()> {
            loop {
                match result_rx.recv_timeout(POLL_TIMEOUT) {
                    Ok(line) => {
                        busy.store(true, Ordering::SeqCst);
                        if let Some(sink) = sink.as_mut() {
                            sink.write_line(&line)?;
                        }
                        if let Some(incremental) = incremental.as_mut() {
                            incremental.write_line(&line)?;
                        }
                        busy.store(false, Ordering::SeqCst);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if stop.load(Ordering::SeqCst) {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            Ok(())
        })
    };

    let worker_handles: Vec<_> = (0..num_workers)
        .map(|i| {
            let path_rx = path_rx.clone();
            let result_tx = result_tx.clone();
            let progress_tx = progress_tx.clone();
            let stop = Arc::clone(&worker_stop);
            let busy = Arc::clone(&worker_busy[i]);
            let skip = Arc::clone(&skip);
            let alg = cfg.alg.clone();
            thread::spawn(move || {
                loop {
                    match path_rx.recv_timeout(POLL_TIMEOUT) {
                        Ok(path) => {
                            busy.store(true, Ordering::SeqCst);
                            process_one(&path, &alg, &skip, &result_tx, &progress_tx);
                            busy.store(false, Ordering::SeqCst);
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            if stop.load(Ordering::SeqCst) {
                                break;
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
        })
        .collect();

    let producer_handle = thread::spawn(move || {
        for path in paths {
            if path_tx.send(path).is_err() {
                break;
            }
        }
    });

    producer_handle
        .join()
        .map_err(|_| anyhow::anyhow!("producer thread panicked"))?;

    loop {
        let all_idle = worker_busy.iter().all(|b| !b.load(Ordering::SeqCst));
        if path_rx.is_empty() && all_idle {
            worker_stop.store(true, Ordering::SeqCst);
            break;
        }
        thread::sleep(POLL_TIMEOUT);
    }
    for handle in worker_handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))?;
    }

    loop {
        if result_rx.is_empty() && !collector_busy.load(Ordering::SeqCst) {
            collector_stop.store(true, Ordering::SeqCst);
            break;
        }
        thread::sleep(POLL_TIMEOUT);
    }
    collector_handle
        .join()
        .map_err(|_| anyhow::anyhow!("collector thread panicked"))??;

    let _ = progress_tx.send(ProgressMsg::Done);
    monitor_handle
        .join()
        .map_err(|_| anyhow::anyhow!("progress monitor thread panicked"))?;

    Ok(())
}

fn process_one(
    path: &PathBuf,
    alg: &crate::algorithm::AlgorithmId,
    skip: &SkipSet,
    result_tx: &crossbeam_channel::Sender<String>,
    progress_tx: &crossbeam_channel::Sender<ProgressMsg>,
) {
    let path_str = path.to_string_lossy().into_owned();
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    if skip.contains(&path_str) {
        let _ = progress_tx.send(ProgressMsg::Bytes(size));
        return;
    }
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(err) => {
            log::warn!("skipping unreadable file {path_str}: {err}");
            let _ = progress_tx.send(ProgressMsg::Bytes(size));
            return;
        }
    };
    let mut reader = std::io::BufReader::new(file);
    let chunks = match compute_file(&mut reader, alg) {
        Ok(chunks) => chunks,
        Err(err) => {
            log::warn!("skipping unreadable file {path_str}: {err}");
            let _ = progress_tx.send(ProgressMsg::Bytes(size));
            return;
        }
    };
    let digest = file_digest(&chunks, alg);
    let line = format_line(&digest, &path_str, &alg.token, &chunks);
    let _ = result_tx.send(line);
    let _ = progress_tx.send(ProgressMsg::Bytes(size));
}
