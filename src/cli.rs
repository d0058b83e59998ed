use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Harvest synonym and antonym pairs from Kateglo for every word of an
/// embedding model's vocabulary.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Embedding model: fastText .bin, .vec, or a plain word list
    pub model: PathBuf,

    /// YAML config file
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for antonims.json and sinonims.json
    #[clap(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Pause before each lookup, in milliseconds
    #[clap(long)]
    pub delay_ms: Option<u64>,

    /// Stop once this many antonym pairs are collected
    #[clap(long)]
    pub antonym_limit: Option<usize>,

    /// Retries for transient network failures
    #[clap(long)]
    pub max_retries: Option<u32>,

    /// Kateglo api.php endpoint
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Only harvest the first N words
    #[clap(short, long)]
    pub limit: Option<usize>,

    /// Don't draw a progress bar
    #[clap(long, default_value = "false")]
    pub no_progress: bool,
}

impl Args {
    /// Command line flags win over the config file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delay_ms = delay_ms;
        }
        if let Some(limit) = self.antonym_limit {
            config.antonym_limit = limit;
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(limit) = self.limit {
            config.vocabulary_limit = Some(limit);
        }
    }
}
