//! CLI binary entry point: wires folder discovery, the per-file pipeline, and
//! file moving together.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use biblio_reports::batch::{run_once, BatchSummary};
use biblio_reports::config::{FolderLayout, ProcessingConfig};
use biblio_reports::observe::{CompositeObserver, FileObserver, StdErrObserver};
use biblio_reports::pipeline::process_file;

#[derive(Parser)]
#[command(
    name = "biblio-reports",
    version,
    about = "Clean library loan/pending spreadsheet exports into per-branch workbooks",
    arg_required_else_help = true
)]
struct Cli {
    /// Path to a JSON processing config (defaults are used when absent).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Append processing events to this log file in addition to stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single export file
    Process {
        /// Input spreadsheet (.xlsx/.xls/.ods/.csv)
        file: PathBuf,
        /// Output folder for the cleaned workbook
        #[arg(long, default_value = "Saida")]
        output: PathBuf,
    },
    /// Process every file waiting in the input folder once
    Run {
        #[arg(long, default_value = "Entrada")]
        input: PathBuf,
        #[arg(long, default_value = "Saida")]
        output: PathBuf,
    },
    /// Keep watching the input folder, processing new files as they appear
    Watch {
        #[arg(long, default_value = "Entrada")]
        input: PathBuf,
        #[arg(long, default_value = "Saida")]
        output: PathBuf,
        /// Seconds to sleep between folder passes
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match ProcessingConfig::from_json_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("cannot load config {}: {e}", path.display());
                return ExitCode::from(2);
            }
        },
        None => ProcessingConfig::default(),
    };

    let observer = build_observer(cli.log_file.as_deref());

    match cli.cmd {
        Commands::Process { file, output } => {
            if let Err(e) = std::fs::create_dir_all(&output) {
                eprintln!("cannot create output folder {}: {e}", output.display());
                return ExitCode::from(2);
            }
            match process_file(&file, &output, &config, Some(&observer)) {
                Ok(outcome) => {
                    println!("wrote {}", outcome.output_path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("failed to process {}: {e}", file.display());
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Run { input, output } => {
            let layout = layout_for(input, output);
            match run_once(&config, &layout, Some(&observer)) {
                Ok(summary) => {
                    print_summary(&summary);
                    if summary.all_ok() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    }
                }
                Err(e) => {
                    eprintln!("batch run failed: {e}");
                    ExitCode::from(2)
                }
            }
        }
        Commands::Watch {
            input,
            output,
            interval,
        } => {
            let layout = layout_for(input, output);
            eprintln!(
                "watching {} every {interval}s (Ctrl+C to stop)",
                layout.input.display()
            );
            loop {
                match run_once(&config, &layout, Some(&observer)) {
                    Ok(summary) => {
                        if summary.total() > 0 {
                            print_summary(&summary);
                        }
                    }
                    Err(e) => eprintln!("batch run failed: {e}"),
                }
                std::thread::sleep(Duration::from_secs(interval));
            }
        }
    }
}

fn build_observer(log_file: Option<&std::path::Path>) -> CompositeObserver {
    let mut observers: Vec<Arc<dyn biblio_reports::observe::ProcessObserver>> =
        vec![Arc::new(StdErrObserver)];
    if let Some(path) = log_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    CompositeObserver::new(observers)
}

fn layout_for(input: PathBuf, output: PathBuf) -> FolderLayout {
    let processed = input.join("Processados");
    let errors = input.join("Erros");
    FolderLayout {
        input,
        output,
        processed,
        errors,
    }
}

fn print_summary(summary: &BatchSummary) {
    for (path, outcome) in &summary.succeeded {
        println!(
            "ok   {} -> {}",
            path.display(),
            outcome.output_path.display()
        );
    }
    for (path, error) in &summary.failed {
        println!("fail {} ({error})", path.display());
    }
    for (path, error) in &summary.move_failures {
        println!(
            "warn {} left in the input folder ({error})",
            path.display()
        );
    }
}
