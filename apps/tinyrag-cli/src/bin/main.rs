use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tinyrag_chunk::build_chunker;
use tinyrag_core::config::{expand_path, Config, Settings};
use tinyrag_core::data_processor::{DataProcessor, SourceDocument};
use tinyrag_core::types::{ChunkingConfig, Weighting};
use tinyrag_pipeline::RetrievalPipeline;

#[derive(Parser, Debug)]
#[command(name = "tinyrag")]
#[command(about = "Chunk, vectorize and search plain-text corpora in memory")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chunks of one file as JSON.
    Chunk(ChunkCmd),
    /// Print the vocabulary built from a corpus directory.
    Vocab(VocabCmd),
    /// Rank corpus chunks against a query.
    Search(SearchCmd),
}

#[derive(Args, Debug)]
struct ChunkCmd {
    file: PathBuf,
    #[command(flatten)]
    chunking: ChunkingArgs,
}

#[derive(Args, Debug)]
struct VocabCmd {
    #[arg(long)]
    dir: Option<String>,
    #[command(flatten)]
    chunking: ChunkingArgs,
}

#[derive(Args, Debug)]
struct SearchCmd {
    query: String,
    #[arg(long)]
    dir: Option<String>,
    #[arg(long)]
    top_k: Option<usize>,
    /// Weight terms by TF-IDF instead of plain term frequency.
    #[arg(long)]
    tfidf: bool,
    #[command(flatten)]
    chunking: ChunkingArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum StrategyArg {
    Fixed,
    Sentence,
    Paragraph,
}

/// Command-line overrides for the `[chunking]` configuration table.
#[derive(Args, Debug)]
struct ChunkingArgs {
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    /// chunk_size for `fixed`, max_size for `sentence`/`paragraph`.
    #[arg(long)]
    size: Option<usize>,
    /// Window overlap; only valid with `--strategy fixed`.
    #[arg(long)]
    overlap: Option<usize>,
}

impl ChunkingArgs {
    fn resolve(&self, base: &ChunkingConfig) -> anyhow::Result<ChunkingConfig> {
        let (base_size, base_overlap, base_separator) = match base {
            ChunkingConfig::Fixed { chunk_size, overlap } => (*chunk_size, *overlap, "\n\n".to_string()),
            ChunkingConfig::Sentence { max_size } => (*max_size, 0, "\n\n".to_string()),
            ChunkingConfig::Paragraph { max_size, separator } => (*max_size, 0, separator.clone()),
        };
        let strategy = self.strategy.unwrap_or(match base {
            ChunkingConfig::Fixed { .. } => StrategyArg::Fixed,
            ChunkingConfig::Sentence { .. } => StrategyArg::Sentence,
            ChunkingConfig::Paragraph { .. } => StrategyArg::Paragraph,
        });
        if self.overlap.is_some() && strategy != StrategyArg::Fixed {
            anyhow::bail!("--overlap only applies to the fixed strategy");
        }
        let size = self.size.unwrap_or(base_size);
        Ok(match strategy {
            StrategyArg::Fixed => ChunkingConfig::Fixed { chunk_size: size, overlap: self.overlap.unwrap_or(base_overlap) },
            StrategyArg::Sentence => ChunkingConfig::Sentence { max_size: size },
            StrategyArg::Paragraph => ChunkingConfig::Paragraph { max_size: size, separator: base_separator },
        })
    }
}

#[derive(Serialize)]
struct VocabReport<'a> {
    size: usize,
    fingerprint: String,
    terms: &'a [String],
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn corpus_dir(settings: &Settings, dir: Option<&str>) -> PathBuf {
    expand_path(dir.unwrap_or(settings.data.docs_dir.as_str()))
}

fn load_corpus(settings: &Settings, dir: &Path) -> anyhow::Result<Vec<SourceDocument>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("#>-"),
    );
    let processor = DataProcessor::with_language(settings.data.language.as_str());
    let docs = processor
        .load_directory(dir, settings.data.max_files, |file, loaded, total| {
            pb.set_length(total as u64);
            pb.set_position(loaded as u64);
            pb.set_message(file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default());
        })
        .with_context(|| format!("Failed to load corpus from {}", dir.display()))?;
    pb.finish_and_clear();
    if docs.is_empty() {
        anyhow::bail!("No .txt files found under {}", dir.display());
    }
    tracing::info!(files = docs.len(), dir = %dir.display(), "corpus loaded");
    Ok(docs)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_chunk(settings: &Settings, cmd: &ChunkCmd) -> anyhow::Result<()> {
    let config = cmd.chunking.resolve(&settings.chunking)?;
    let chunker = build_chunker(&config)?;
    let parent = cmd.file.parent().unwrap_or_else(|| Path::new("."));
    let doc = DataProcessor::with_language(settings.data.language.as_str()).load_file(&cmd.file, parent)?;
    let chunks = chunker.chunk(&doc.content);
    tracing::info!(strategy = chunker.name(), chunks = chunks.len(), chars = doc.meta.char_count, "chunked {}", cmd.file.display());
    print_json(&chunks)
}

fn run_vocab(settings: &Settings, cmd: &VocabCmd) -> anyhow::Result<()> {
    let dir = corpus_dir(settings, cmd.dir.as_deref());
    let config = cmd.chunking.resolve(&settings.chunking)?;
    let docs = load_corpus(settings, &dir)?;
    let pipeline = RetrievalPipeline::from_config(&config, Weighting::TermFrequency, &docs)?;
    let vocab = pipeline.vocabulary();
    print_json(&VocabReport { size: vocab.len(), fingerprint: format!("{:016x}", vocab.fingerprint()), terms: vocab.terms() })
}

fn run_search(settings: &Settings, cmd: &SearchCmd) -> anyhow::Result<()> {
    let dir = corpus_dir(settings, cmd.dir.as_deref());
    let config = cmd.chunking.resolve(&settings.chunking)?;
    let docs = load_corpus(settings, &dir)?;
    let weighting = if cmd.tfidf { Weighting::TfIdf } else { settings.search.weighting };
    let pipeline = RetrievalPipeline::from_config(&config, weighting, &docs)?;
    let top_k = cmd.top_k.unwrap_or(settings.search.top_k);
    let results = pipeline.query(&cmd.query, top_k).with_context(|| format!("Query failed: {:?}", cmd.query))?;
    print_json(&results)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().context("Error loading config")?;
    let settings = config.settings();
    match &cli.command {
        Command::Chunk(cmd) => run_chunk(settings, cmd),
        Command::Vocab(cmd) => run_vocab(settings, cmd),
        Command::Search(cmd) => run_search(settings, cmd),
    }
}
