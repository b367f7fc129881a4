use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use centre_rank::dataset::DEFAULT_INPUT_FILE;
use centre_rank::export::{BadNumberPolicy, KeyStyle};
use centre_rank::output::OutputFormat;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_SCORING: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// CSV file to rank (defaults to config `input`, then centre_scores.csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override a criterion weight, e.g. --weight Cost=8 (repeatable)
    #[arg(short, long = "weight", value_name = "NAME=VALUE",
          value_parser = centre_rank::scoring::parse_weight_override)]
    weights: Vec<(String, f64)>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the rendered ranking to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Enriched CSV to convert (defaults to config `export.input`)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// JSON file to write (defaults to config `export.output`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How header names become JSON keys
    #[arg(long, value_enum)]
    key_style: Option<KeyStyle>,

    /// What to do with numeric cells that cannot be converted
    #[arg(long, value_enum)]
    on_bad_number: Option<BadNumberPolicy>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score and rank centres (default if no subcommand)
    Rank(RankArgs),
    /// Convert an enriched CSV into the JSON array used by the web app
    Export(ExportArgs),
    /// Interactively create a config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "centre-rank")]
#[command(about = "Rank childcare centres by weighted criteria", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/centre-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    centre_rank::logging::init(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let code = match cli.command.unwrap_or(Commands::Rank(RankArgs::default())) {
        Commands::Rank(args) => run_rank(config_path, args),
        Commands::Export(args) => run_export(config_path, args),
        Commands::Init => match centre_rank::config::init::run_init_wizard(config_path) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("Init failed: {:#}", e);
                EXIT_CONFIG
            }
        },
    };
    std::process::exit(code);
}

fn load_config_or_exit_code(path: Option<PathBuf>) -> Result<centre_rank::config::Config, i32> {
    centre_rank::config::load_config(path).map_err(|e| {
        eprintln!("Config error: {:#}", e);
        EXIT_CONFIG
    })
}

fn run_rank(config_path: Option<PathBuf>, args: RankArgs) -> i32 {
    let start_time = Instant::now();

    let config = match load_config_or_exit_code(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    // Validate weights at startup, after CLI overrides
    let mut weights = config.effective_weights();
    centre_rank::scoring::apply_overrides(&mut weights, &args.weights);
    if let Err(errors) = centre_rank::scoring::validate_weights(&weights) {
        eprintln!("Weight config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }
    tracing::debug!(?weights, "effective weights");

    let input = args
        .input
        .or(config.input)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_FILE));
    let dataset = match centre_rank::dataset::load_dataset(&input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Input error: {}", e);
            return EXIT_INPUT;
        }
    };

    let ranked = match centre_rank::scoring::compute_scores(&dataset.entities, &weights) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            return EXIT_SCORING;
        }
    };

    let rendered = match args.format {
        OutputFormat::Table => {
            // Colors only make sense on a terminal, never in a file
            let use_colors = args.output.is_none() && centre_rank::output::should_use_colors();
            centre_rank::output::format_ranked_table(&ranked, use_colors)
        }
        OutputFormat::Tsv => centre_rank::output::format_tsv(&ranked, &dataset.columns),
        OutputFormat::Json => match centre_rank::output::format_json(&ranked) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to render JSON: {}", e);
                return EXIT_INPUT;
            }
        },
    };

    match args.output {
        Some(path) => {
            if let Err(e) = centre_rank::storage::write_text_atomic(&path, &format!("{}\n", rendered)) {
                eprintln!("Output error: {}", e);
                return EXIT_INPUT;
            }
            eprintln!("Wrote {} ranked centres to {}", ranked.len(), path.display());
        }
        None => println!("{}", rendered),
    }

    tracing::info!(
        centres = ranked.len(),
        elapsed = ?start_time.elapsed(),
        "ranking complete"
    );
    EXIT_SUCCESS
}

fn run_export(config_path: Option<PathBuf>, args: ExportArgs) -> i32 {
    let config = match load_config_or_exit_code(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let mut settings = config.export_settings();
    if let Some(input) = args.input {
        settings.input = input;
    }
    if let Some(output) = args.output {
        settings.output = output;
    }
    if let Some(style) = args.key_style {
        settings.key_style = style;
    }
    if let Some(policy) = args.on_bad_number {
        settings.on_bad_number = policy;
    }
    tracing::debug!(?settings, "export settings");

    match centre_rank::export::export_file(&settings) {
        Ok(summary) => {
            println!(
                "Wrote {} centres to {} ({} skipped)",
                summary.written,
                settings.output.display(),
                summary.skipped()
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Export error: {}", e);
            EXIT_INPUT
        }
    }
}
