use anyhow::{Context as AnyhowContext, Result};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use flags::{EncodingFlag, LabelPolicyFlag, LanguageFlag, SplitFlag};
use kpm_eval::{all_metrics, metric_by_slug, metric_slugs, Metric};
use kpm_matchers::{LabelPolicy, MatcherConfig, RegressionConfig, SvcConfig, TermOverlapConfig};
use pipeline::RunOptions;
use serde::Serialize;
use std::path::PathBuf;

mod datasets;
mod flags;
mod pipeline;
mod report;

#[derive(Parser)]
#[command(name = "kpm")]
#[command(about = "Match arguments to key points and evaluate the matches", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,

    /// Directory holding the dataset CSV files, model cache and predictions
    #[arg(long, global = true, env = "KPM_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the shared task dataset
    Download(DownloadArgs),

    /// Run a matcher on a split, save its predictions and evaluate them
    Run(RunArgs),

    /// Evaluate an existing predictions file
    Evaluate(EvaluateArgs),

    /// List available metrics
    Metrics(MetricsArgs),
}

#[derive(Args)]
struct DownloadArgs {
    /// Download files even if they already exist
    #[arg(long)]
    force: bool,

    /// Base URL of the dataset repository
    #[arg(long, env = "KPM_DATASET_URL", default_value = datasets::DEFAULT_BASE_URL)]
    base_url: String,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Metric to report
    #[arg(value_parser = PossibleValuesParser::new(metric_slugs()))]
    metric: String,

    /// Split to predict and evaluate
    #[arg(long, value_enum, default_value = "dev")]
    split: SplitFlag,

    /// Matcher configuration file (TOML, or JSON with a .json extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    matcher: Option<MatcherCommand>,
}

#[derive(Args)]
struct EvaluateArgs {
    /// Metric to report
    #[arg(value_parser = PossibleValuesParser::new(metric_slugs()))]
    metric: String,

    /// Predictions file: {"<arg_id>": {"<key_point_id>": score}}
    #[arg(long)]
    predictions: PathBuf,

    /// Split the predictions belong to
    #[arg(long, value_enum, default_value = "dev")]
    split: SplitFlag,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MetricsArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum MatcherCommand {
    /// Match every candidate pair
    All,

    /// Match no candidate pair
    None,

    /// Uniform random scores
    Random {
        /// Seed for reproducible scores
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Share of key point terms found in the argument
    TermOverlap(TermOverlapArgs),

    /// Logistic regression over bag-of-words or tf-idf features
    Regression(RegressionArgs),

    /// Linear support vector classifier with Platt-scaled scores
    Svc(SvcArgs),

    /// Soft voting of logistic regression (0.55) and SVC (0.45)
    Ensemble {
        #[arg(long, value_enum, default_value = "bow")]
        encoding: EncodingFlag,
    },
}

#[derive(Args)]
struct TermOverlapArgs {
    /// Compare Snowball stems instead of words
    #[arg(long)]
    stemming: bool,

    /// Ignore the language's stop words
    #[arg(long)]
    stop_words: bool,

    /// Ignore common debate filler words
    #[arg(long)]
    custom_stop_words: bool,

    /// Count synonyms as matching terms
    #[arg(long)]
    synonyms: bool,

    /// Let antonyms cancel matching terms
    #[arg(long)]
    antonyms: bool,

    #[arg(long, value_enum, default_value = "english")]
    language: LanguageFlag,

    /// Additional synonyms/antonyms as JSON: {"synonyms": {..}, "antonyms": {..}}
    #[arg(long)]
    lexicon: Option<PathBuf>,
}

#[derive(Args)]
struct RegressionArgs {
    #[arg(long, value_enum, default_value = "bow")]
    encoding: EncodingFlag,

    /// Inverse regularisation strength
    #[arg(long = "c")]
    c: Option<f64>,

    #[arg(long)]
    max_iter: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    #[command(flatten)]
    policy: LabelPolicyArgs,
}

#[derive(Args)]
struct SvcArgs {
    #[arg(long, value_enum, default_value = "bow")]
    encoding: EncodingFlag,

    /// Inverse regularisation strength
    #[arg(long = "c")]
    c: Option<f64>,

    #[arg(long)]
    max_iter: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    #[command(flatten)]
    policy: LabelPolicyArgs,
}

#[derive(Args)]
struct LabelPolicyArgs {
    /// How unannotated candidate pairs are used for training
    #[arg(long, value_enum, conflicts_with_all = ["strict", "relaxed"])]
    label_policy: Option<LabelPolicyFlag>,

    /// Shorthand for --label-policy strict
    #[arg(long, conflicts_with = "relaxed")]
    strict: bool,

    /// Shorthand for --label-policy relaxed
    #[arg(long)]
    relaxed: bool,
}

impl LabelPolicyArgs {
    fn resolve(&self, default: LabelPolicy) -> LabelPolicy {
        if self.strict {
            LabelPolicy::Strict
        } else if self.relaxed {
            LabelPolicy::Relaxed
        } else {
            self.label_policy.map_or(default, LabelPolicyFlag::as_domain)
        }
    }
}

impl MatcherCommand {
    fn into_config(self) -> MatcherConfig {
        match self {
            MatcherCommand::All => MatcherConfig::All,
            MatcherCommand::None => MatcherConfig::None,
            MatcherCommand::Random { seed } => MatcherConfig::Random { seed },
            MatcherCommand::TermOverlap(args) => MatcherConfig::TermOverlap(TermOverlapConfig {
                stemming: args.stemming,
                stop_words: args.stop_words,
                custom_stop_words: args.custom_stop_words,
                synonyms: args.synonyms,
                antonyms: args.antonyms,
                language: args.language.as_domain(),
                lexicon: args.lexicon,
            }),
            MatcherCommand::Regression(args) => {
                let defaults = RegressionConfig::default();
                MatcherConfig::Regression(RegressionConfig {
                    encoding: args.encoding.as_domain(),
                    c: args.c.unwrap_or(defaults.c),
                    max_iter: args.max_iter.unwrap_or(defaults.max_iter),
                    learning_rate: args.learning_rate.unwrap_or(defaults.learning_rate),
                    label_policy: args.policy.resolve(defaults.label_policy),
                    ..defaults
                })
            }
            MatcherCommand::Svc(args) => {
                let defaults = SvcConfig::default();
                MatcherConfig::Svc(SvcConfig {
                    encoding: args.encoding.as_domain(),
                    c: args.c.unwrap_or(defaults.c),
                    max_iter: args.max_iter.unwrap_or(defaults.max_iter),
                    learning_rate: args.learning_rate.unwrap_or(defaults.learning_rate),
                    label_policy: args.policy.resolve(defaults.label_policy),
                })
            }
            MatcherCommand::Ensemble { encoding } => {
                MatcherConfig::voting_ensemble(encoding.as_domain())
            }
        }
    }
}

#[derive(Serialize)]
struct MetricInfo {
    slug: &'static str,
    name: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let json_output = match &cli.command {
        Commands::Download(args) => args.json,
        Commands::Run(args) => args.json,
        Commands::Evaluate(args) => args.json,
        Commands::Metrics(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Download(args) => run_download(args, cli.data_dir, cli.quiet).await?,
        Commands::Run(args) => run_matcher(args, cli.data_dir).await?,
        Commands::Evaluate(args) => run_evaluate(args, cli.data_dir)?,
        Commands::Metrics(args) => run_metrics(args)?,
    }

    Ok(())
}

async fn run_download(args: DownloadArgs, data_dir: PathBuf, quiet: bool) -> Result<()> {
    let report = datasets::download_dataset(&data_dir, &args.base_url, args.force, !quiet).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_download_summary(&report));
    }
    Ok(())
}

async fn run_matcher(args: RunArgs, data_dir: PathBuf) -> Result<()> {
    let matcher = match (args.config, args.matcher) {
        (Some(_), Some(_)) => {
            anyhow::bail!("--config cannot be combined with a matcher subcommand")
        }
        (Some(path), None) => MatcherConfig::from_path(&path)
            .with_context(|| format!("Failed to read matcher config {}", path.display()))?,
        (None, Some(command)) => command.into_config(),
        (None, None) => anyhow::bail!("Specify a matcher subcommand or --config <FILE>"),
    };
    let options = RunOptions {
        data_dir,
        split: args.split.as_domain(),
        metric: lookup_metric(&args.metric)?,
        matcher,
    };

    let report = tokio::task::spawn_blocking(move || pipeline::run(&options))
        .await
        .context("Pipeline task failed")??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_run_summary(&report));
    }
    Ok(())
}

fn run_evaluate(args: EvaluateArgs, data_dir: PathBuf) -> Result<()> {
    let metric = lookup_metric(&args.metric)?;
    let report = pipeline::evaluate(
        &data_dir,
        args.split.as_domain(),
        metric.as_ref(),
        &args.predictions,
    )?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render_evaluate_summary(&report));
    }
    Ok(())
}

fn run_metrics(args: MetricsArgs) -> Result<()> {
    let metrics = all_metrics();
    if args.json {
        let infos: Vec<MetricInfo> = metrics
            .iter()
            .map(|metric| MetricInfo {
                slug: metric.slug(),
                name: metric.name(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        print!("{}", report::render_metric_list(&metrics));
    }
    Ok(())
}

fn lookup_metric(slug: &str) -> Result<Box<dyn Metric>> {
    metric_by_slug(slug).with_context(|| {
        format!(
            "Unknown metric '{slug}' (available: {})",
            metric_slugs().join(", ")
        )
    })
}
