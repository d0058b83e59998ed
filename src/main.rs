use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod errors;
mod harvester;
mod lexicon;
mod relations;
mod storage;
#[cfg(test)]
mod tests;
mod vocabulary;

use config::Config;
use harvester::Harvester;
use lexicon::KategloClient;
use storage::{BackendLocal, StorageManager};
use vocabulary::Vocabulary;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} [{elapsed_precise}<{eta_precise}]")
    {
        bar.set_style(style);
    }
    bar
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging();

    let mut config = match &args.config {
        Some(path) => Config::load_with(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;

    let _span = tracing::info_span!("harvest", model = %args.model.display()).entered();

    let mut vocabulary = Vocabulary::load(&args.model)
        .with_context(|| format!("failed to load vocabulary from {}", args.model.display()))?;
    if let Some(limit) = config.vocabulary_limit {
        vocabulary.truncate(limit);
    }
    if vocabulary.is_empty() {
        log::warn!("vocabulary is empty, nothing to harvest");
    }

    let store = BackendLocal::new(&config.output_dir).with_context(|| {
        format!("failed to create output dir {}", config.output_dir.display())
    })?;
    for file in [&config.antonyms_file, &config.synonyms_file] {
        if store.exists(file) {
            log::warn!("{file} exists and will be overwritten");
        }
    }
    let client = KategloClient::new(&config)?;

    let mut harvester = Harvester::new(client, store, &config);
    if !args.no_progress {
        harvester = harvester.with_progress(progress_bar(vocabulary.len()));
    }

    let cancel = harvester.cancel_handle();
    ctrlc::set_handler(move || {
        log::warn!("interrupt received, finishing current word");
        cancel.store(true, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    let summary = harvester.run(&vocabulary)?;

    log::info!(
        "done: processed={} recorded={} skipped={} failed={} synonyms={} antonyms={} stop={:?}",
        summary.processed,
        summary.recorded,
        summary.skipped,
        summary.failed,
        summary.synonyms,
        summary.antonyms,
        summary.stop_reason
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
