//! schemagen CLI - generate entity classes from a schema description.

use clap::{Parser, Subcommand};
use schemagen::core::collect_violations;
use schemagen::error::{EXIT_CANCELLED, EXIT_GENERATION_ERROR};
use schemagen::pipeline::RunStatus;
use schemagen::{
    typemap, ColumnKind, Config, EmitterFactory, EntityEmitterFactory, FileSink, GenError,
    GenerationReport, Generator, MemorySink, Schema,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate JPA entity classes from a database schema description")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one entity class per table and view
    Generate {
        /// Override the schema document path
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Override output directory
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Override number of workers
        #[arg(long)]
        workers: Option<usize>,

        /// Stop starting new tables after the first failure
        #[arg(long)]
        fail_fast: bool,

        /// Dry run: render everything but write no files
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the schema without generating anything
    Validate {
        /// Report every violation instead of stopping at the first
        #[arg(long)]
        all: bool,
    },

    /// Print the column type mapping table
    Types,
}

enum Outcome {
    Success,
    Failed(u8),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failed(code)) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<Outcome, GenError> {
    let cli = Cli::parse();

    // Types command needs no configuration
    if let Commands::Types = cli.command {
        print_types(cli.output_json)?;
        return Ok(Outcome::Success);
    }

    setup_logging(&cli.verbosity, &cli.log_format).map_err(GenError::Config)?;

    let mut config = Config::load(&cli.config)?.with_auto_tuning();
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Types => unreachable!(), // Handled above
        Commands::Generate {
            schema,
            output_dir,
            workers,
            fail_fast,
            dry_run,
        } => {
            // Apply overrides
            if let Some(path) = schema {
                config.schema = path;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            if let Some(w) = workers {
                config.runtime.workers = Some(w);
            }
            if fail_fast {
                config.runtime.fail_fast = true;
            }
            config.validate()?;

            let schema = load_schema(&cli.config, &config.schema)?;
            let cancel_token = setup_signal_handler();

            let factory: Arc<dyn EmitterFactory> = if dry_run {
                Arc::new(EntityEmitterFactory::new(MemorySink::new()))
            } else {
                Arc::new(EntityEmitterFactory::new(FileSink::new(&config.output.dir)))
            };

            let report = Generator::from_config(&config, schema, factory)
                .run(Some(cancel_token))
                .await?;

            if cli.output_json {
                println!("{}", report.to_json()?);
            } else {
                print_report(&report, dry_run, &config.output.dir);
            }

            Ok(match report.status {
                RunStatus::Completed => Outcome::Success,
                RunStatus::Failed => Outcome::Failed(EXIT_GENERATION_ERROR),
                RunStatus::Cancelled => Outcome::Failed(EXIT_CANCELLED),
            })
        }

        Commands::Validate { all } => {
            let schema = load_schema(&cli.config, &config.schema)?;

            if !all {
                schemagen::core::validate(&schema)?;
                println!(
                    "Schema [{}] is valid: {} tables, {} views",
                    schema.name,
                    schema.tables.len(),
                    schema.views.len()
                );
                return Ok(Outcome::Success);
            }

            let violations = collect_violations(&schema);
            if cli.output_json {
                let messages: Vec<String> = violations.iter().map(|e| e.to_string()).collect();
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else if violations.is_empty() {
                println!("Schema [{}] is valid", schema.name);
            } else {
                println!("Schema [{}] has {} violation(s):", schema.name, violations.len());
                for violation in &violations {
                    println!("  {}", violation);
                }
            }

            match violations.first() {
                Some(first) => Ok(Outcome::Failed(first.exit_code())),
                None => Ok(Outcome::Success),
            }
        }
    }
}

/// Load the schema document. Relative paths resolve against the config
/// file's directory.
fn load_schema(config_path: &Path, schema_path: &Path) -> Result<Schema, GenError> {
    let path = match config_path.parent() {
        Some(dir) if schema_path.is_relative() && !dir.as_os_str().is_empty() => {
            dir.join(schema_path)
        }
        _ => schema_path.to_path_buf(),
    };
    info!("Loading schema from {:?}", path);
    Schema::load(&path)
}

fn print_report(report: &GenerationReport, dry_run: bool, output_dir: &Path) {
    for artifact in &report.artifacts {
        println!(
            "  {} -> {} ({} file{})",
            artifact.table,
            artifact.path.display(),
            artifact.files,
            if artifact.files == 1 { "" } else { "s" }
        );
    }
    for error in &report.errors {
        println!("  {} FAILED: {}", error.table, error.error);
    }

    let status_msg = match (report.status, dry_run) {
        (RunStatus::Completed, true) => "Dry run completed!",
        (RunStatus::Completed, false) => "Generation completed!",
        (RunStatus::Failed, _) => "Generation finished with errors.",
        (RunStatus::Cancelled, _) => "Generation cancelled.",
    };
    println!("\n{}", status_msg);
    println!("  Run ID: {}", report.run_id);
    println!("  Duration: {:.2}s", report.duration_seconds);
    println!("  Tables: {}", report.tables_processed);
    println!("  Files: {}", report.files_generated);
    if !dry_run {
        println!("  Output: {}", output_dir.display());
    }
    if report.tables_skipped > 0 {
        println!("  Skipped: {}", report.tables_skipped);
    }
    if !report.errors.is_empty() {
        println!("  Failed: {}", report.errors.len());
    }
}

fn print_types(output_json: bool) -> Result<(), GenError> {
    if output_json {
        let rows: Vec<_> = ColumnKind::ALL
            .iter()
            .map(|kind| (kind, kind.descriptor()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<12} {:<28} {:<28} {:<8} {:<9}",
        "KIND", "NOT NULL", "NULLABLE", "NUMERIC", "IMMUTABLE"
    );
    for kind in ColumnKind::ALL {
        let (non_null, nullable) = match (
            typemap::resolved_type(kind, false),
            typemap::resolved_type(kind, true),
        ) {
            (Ok(a), Ok(b)) => (a.to_string(), b.to_string()),
            (Err(e), _) | (_, Err(e)) => (format!("<{}>", e), String::new()),
        };
        println!(
            "{:<12} {:<28} {:<28} {:<8} {:<9}",
            kind.as_str(),
            non_null,
            nullable,
            typemap::is_numeric(kind),
            typemap::is_immutable(kind)
        );
    }
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("unknown log format '{}'", other)),
    }

    Ok(())
}

/// Setup signal handlers for graceful shutdown.
/// Handles SIGINT (Ctrl-C) and SIGTERM; jobs already running finish, the
/// rest are skipped.
#[cfg(unix)]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();

    for (kind, name) in [
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::terminate(), "SIGTERM"),
    ] {
        let token = cancel_token.clone();
        tokio::spawn(async move {
            let mut stream = match signal(kind) {
                Ok(stream) => stream,
                Err(e) => {
                    warn!("Failed to install {} handler: {}", name, e);
                    return;
                }
            };
            stream.recv().await;
            eprintln!("\nReceived {}. Finishing running tables...", name);
            token.cancel();
        });
    }

    cancel_token
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl-C handler: {}", e);
            return;
        }
        eprintln!("\nReceived Ctrl-C. Finishing running tables...");
        token.cancel();
    });

    cancel_token
}
