mod cli;
mod console;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use engine_logging::{engine_error, engine_info};
use glowfic_engine::{Pipeline, PipelineOutcome};

use crate::cli::Args;
use crate::console::ConsoleProgress;
use crate::logging::LogDestination;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let destination = if args.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(destination, args.log_level);

    match run(&args).await {
        Ok(outcome) => {
            if !outcome.failed_icons.is_empty() {
                println!(
                    "{} icon(s) could not be downloaded and were replaced by a placeholder",
                    outcome.failed_icons.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            engine_error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<PipelineOutcome> {
    let config = args.pipeline_config();
    engine_info!(
        "output dir {}, icon batch size {}",
        config.output_dir.display(),
        config.icon_batch_size
    );
    let pipeline = Pipeline::new(config).context("could not start")?;
    pipeline
        .run(&args.url, &ConsoleProgress)
        .await
        .with_context(|| format!("could not convert {}", args.url))
}
