// Command-line runner: analyses one or more image files and prints the results
// as JSON on stdout. Logs go to stderr (`RUST_LOG` controls the level).
//
//     derma_vision [--history <file>] <image> [<image> ...]

use anyhow::{Context, Result, bail};
use derma_vision::core_modules::utils::image_helper::image_helper;
use derma_vision::{AnalysisPipeline, AnalyzerConfig, BatchAnalyzer, HistoryLog};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    history: Option<PathBuf>,
    images: Vec<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut history = None;
    let mut images = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--history" => {
                let path = args.next().context("--history needs a file path")?;
                history = Some(PathBuf::from(path));
            }
            _ => images.push(PathBuf::from(arg)),
        }
    }
    if images.is_empty() {
        bail!("Usage: derma_vision [--history <file>] <image> [<image> ...]");
    }
    Ok(Args { history, images })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = AnalyzerConfig::from_env()?;

    let mut buffers = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let buffer = image_helper::load(path).with_context(|| format!("failed to load {}", path.display()))?;
        info!(path = %path.display(), width = buffer.width(), height = buffer.height(), "loaded image");
        buffers.push(buffer);
    }

    let results = if buffers.len() == 1 {
        vec![AnalysisPipeline::new(config.clone()).analyze(&buffers[0])?]
    } else {
        let analyzer = BatchAnalyzer::new(config.clone());
        info!(workers = analyzer.worker_count(), images = buffers.len(), "analysing batch");
        let results = analyzer
            .analyze_batch(buffers)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        analyzer.shutdown().await;
        results
    };

    for (path, result) in args.images.iter().zip(&results) {
        info!(
            path = %path.display(),
            primary = result.primary.id,
            confidence = result.primary.confidence,
            "analysis complete"
        );
    }

    if let Some(history_path) = &args.history {
        let mut history = match std::fs::read_to_string(history_path) {
            Ok(json) => HistoryLog::from_json(&json, config.history_capacity)?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => HistoryLog::new(config.history_capacity),
            Err(error) => return Err(error).context("failed to read history file"),
        };
        for result in &results {
            history.record(result, None);
        }
        std::fs::write(history_path, history.to_json()?).context("failed to write history file")?;
        info!(path = %history_path.display(), entries = history.len(), "history updated");
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
