//! Span QA evaluation CLI

use std::error::Error;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spanqa::ScoringModel;
use spanqa_eval::{
    config::Config,
    dataset::{find_example, load_examples},
    models::{OverlapBaseline, PrecomputedScores},
    reporting::{print_console_report, print_inspection, JsonSummary},
};

#[derive(Parser)]
#[command(name = "spanqa-eval")]
#[command(about = "Exact Match and F1 evaluation for extractive question answering")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a dataset and write a summary
    Run {
        /// Dataset file (.json or .jsonl)
        #[arg(short, long)]
        dataset: PathBuf,

        /// Precomputed start/end scores (default: overlap baseline)
        #[arg(short, long)]
        scores: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of example diagnostics to print
        #[arg(long)]
        show: Option<usize>,
    },

    /// Show the full diagnostic for one example
    Inspect {
        /// Dataset file (.json or .jsonl)
        #[arg(short, long)]
        dataset: PathBuf,

        /// Example id
        #[arg(long)]
        id: String,

        /// Precomputed start/end scores (default: overlap baseline)
        #[arg(short, long)]
        scores: Option<PathBuf>,
    },

    /// List the examples in a dataset
    List {
        /// Dataset file (.json or .jsonl)
        #[arg(short, long)]
        dataset: PathBuf,
    },

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/spanqa.toml")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("spanqa=debug,spanqa_eval=debug,info")
    } else {
        EnvFilter::new("spanqa_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Commands::Run {
            dataset,
            scores,
            output,
            show,
        } => {
            run_evaluation(&config, &dataset, scores.as_deref(), output, show)?;
        }

        Commands::Inspect { dataset, id, scores } => {
            inspect_example(&config, &dataset, &id, scores.as_deref())?;
        }

        Commands::List { dataset } => {
            list_examples(&config, &dataset)?;
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn load_model(config: &Config, scores: Option<&Path>) -> Result<Box<dyn ScoringModel>, Box<dyn Error>> {
    let model: Box<dyn ScoringModel> = match scores {
        Some(path) => Box::new(PrecomputedScores::from_json_file(path)?),
        None => {
            tracing::info!("No score file given, using the overlap baseline");
            Box::new(OverlapBaseline::new(config.model.padded_len, config.tokenizer()?))
        }
    };
    Ok(model)
}

fn run_evaluation(
    config: &Config,
    dataset: &Path,
    scores: Option<&Path>,
    output_dir: Option<PathBuf>,
    show: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d-%H%M%S").to_string();

    println!("Run ID: {}", run_id);

    let examples = load_examples(dataset)?;
    let model = load_model(config, scores)?;
    let evaluator = config.evaluator()?;

    #[cfg(feature = "parallel")]
    let report = evaluator.evaluate_par(&examples, &*model)?;
    #[cfg(not(feature = "parallel"))]
    let report = evaluator.evaluate(&examples, &*model)?;

    print_console_report(&report, &examples, show.unwrap_or(config.output.show_examples));

    if config.output.write_json {
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
        let run_dir = output_dir.join(&run_id);
        std::fs::create_dir_all(&run_dir)?;

        let summary_path = run_dir.join("summary.json");
        JsonSummary::from_report(&run_id, &report).write_to_file(&summary_path)?;
        println!("Summary written to {}", summary_path.display());
    }

    let elapsed = Utc::now() - started_at;
    tracing::info!("Run {} finished in {} ms", run_id, elapsed.num_milliseconds());
    Ok(())
}

fn inspect_example(config: &Config, dataset: &Path, id: &str, scores: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let examples = load_examples(dataset)?;
    let example = find_example(&examples, id).ok_or_else(|| format!("no example with id '{}'", id))?;
    let model = load_model(config, scores)?;

    let inspection = config.evaluator()?.inspect(example, &*model)?;
    print_inspection(&inspection);
    Ok(())
}

fn list_examples(config: &Config, dataset: &Path) -> Result<(), Box<dyn Error>> {
    let examples = load_examples(dataset)?;
    let tokenizer = config.tokenizer()?;

    println!("{:<16} {:>6} {:>8}  Question", "ID", "Tokens", "Answers");
    println!("{:-<60}", "");
    for example in &examples {
        println!(
            "{:<16} {:>6} {:>8}  {}",
            example.id,
            example.valid_len(&tokenizer),
            example.answers.len(),
            example.question
        );
    }
    println!("\nTotal: {} examples", examples.len());
    Ok(())
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Config::default().save_toml(&output)?;
    println!("Configuration written to {}", output.display());
    Ok(())
}
