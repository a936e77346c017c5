//! Encode a relation-extraction corpus into model-ready features.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use relmark_core::{BuilderConfig, MarkingScheme, TruncationPolicy};
use relmark_prep::{run_prep, PrepConfig};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "relmark-prep")]
#[command(about = "Encode relation-extraction examples with entity markers")]
#[command(version)]
struct Cli {
    /// tokenizer.json of the target model
    #[arg(short, long, env = "RELMARK_TOKENIZER")]
    tokenizer: PathBuf,

    /// Corpus file: TACRED-style JSON array or JSON Lines
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON Lines file
    #[arg(short, long)]
    output: PathBuf,

    /// Entity marking scheme
    #[arg(short, long, env = "RELMARK_SCHEME", default_value = "typed_entity_marker_punct")]
    scheme: MarkingScheme,

    /// Maximum sequence length, boundary tokens included
    #[arg(short = 'm', long, env = "RELMARK_MAX_LENGTH", default_value_t = 512)]
    max_length: usize,

    /// What to do with entities cut off by truncation: reject or keep
    #[arg(long, default_value = "reject")]
    truncation: TruncationPolicy,

    /// JSON object mapping relation labels to ids (TACRED labels if omitted)
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Encode examples in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Save the tokenizer with registered markers to this path
    #[arg(long)]
    save_tokenizer: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PrepConfig {
        tokenizer: cli.tokenizer,
        input: cli.input,
        output: cli.output,
        labels: cli.labels,
        builder: BuilderConfig::new()
            .with_scheme(cli.scheme)
            .with_max_length(cli.max_length)
            .with_truncation(cli.truncation),
        parallel: cli.parallel,
        save_tokenizer: cli.save_tokenizer,
    };

    let summary = run_prep(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
