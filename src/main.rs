//! Entry point: wires the CLI surface (C10) to the configuration,
//! diagnostics (C11), and the chosen orchestrator (C8/C9).

use std::sync::Arc;

use clap::Parser;

use chunksum::cli::Cli;
use chunksum::config::Sink;
use chunksum::enumerate::Input;
use chunksum::orchestrator::{self, LineSink};
use chunksum::progress::{IndicatifProgress, Progress};
use chunksum::skip::SkipSet;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = cli.into_config()?;

    let skip = match &cfg.chunksums {
        Sink::File(path) if path.exists() => SkipSet::from_file(path)?,
        _ => SkipSet::default(),
    };

    let mut inputs = orchestrator::resolve_inputs(&cfg);
    let uses_stdin_bytes = inputs.iter().any(|i| matches!(i, Input::StdinBytes));

    let total_size = orchestrator::total_input_size(&inputs);
    let progress: Arc<dyn Progress> = Arc::new(IndicatifProgress::new(total_size));

    let mut sink = Some(LineSink::open(&cfg.chunksums)?);
    let mut incremental = cfg
        .incremental
        .as_deref()
        .map(orchestrator::open_incremental)
        .transpose()?;

    if cfg.multi_process && !uses_stdin_bytes {
        let sink = sink.take();
        let incremental = incremental.take();
        orchestrator::multi::run(
            &cfg,
            std::mem::take(&mut inputs),
            Arc::new(skip),
            sink,
            incremental,
            Arc::clone(&progress),
        )?;
    } else {
        orchestrator::single::run(
            &cfg,
            &inputs,
            &skip,
            &mut sink,
            &mut incremental,
            progress.as_ref(),
        )?;
    }

    Ok(())
}
