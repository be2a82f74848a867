//! Command-line entry point for the API harness.
//!
//! # Commands
//!
//! - `api-harness run [PATHS]...`: discover case files and run them in order
//!   with one shared variable store; exits with status 1 if any step failed or
//!   errored
//! - `api-harness files [ROOT]`: list discovered case files by directory
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use api_harness::cases::{discover_case_files, CaseFiles};
use api_harness::config::{load_config, HarnessConfig, DEFAULT_CONFIG_FILE};
use api_harness::executor::HttpTransport;
use api_harness::runner::{Runner, SuiteReport};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api-harness", version, about = "Data-driven HTTP API test harness")]
struct Cli {
    /// Harness configuration file
    #[arg(long, global = true, env = "API_HARNESS_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run case files
    Run {
        /// Case files or directories; defaults to the configured case directory
        paths: Vec<PathBuf>,

        /// Host file, overriding `hostsFile` from the configuration
        #[arg(long)]
        hosts: Option<PathBuf>,

        /// Write PASS/FAIL/ERROR/SKIP into each case's result column
        #[arg(long)]
        write_results: bool,

        /// Print reports as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List case files grouped by directory
    Files {
        /// Directory to search; defaults to the configured case directory
        root: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match load_config(Some(&cli.config)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Run {
            paths,
            hosts,
            write_results,
            json,
        } => {
            if let Some(hosts) = hosts {
                config.hosts_file = hosts;
            }
            config.write_results |= write_results;
            run(&config, &paths, json)
        }
        Command::Files { root } => {
            let root = root.unwrap_or_else(|| config.case_dir.clone());
            match discover_case_files(&root, &config.case_extensions) {
                Ok(files) => {
                    print_files(&files);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn run(config: &HarnessConfig, paths: &[PathBuf], json: bool) -> ExitCode {
    let roots = if paths.is_empty() {
        vec![config.case_dir.clone()]
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for root in &roots {
        match discover_case_files(root, &config.case_extensions) {
            Ok(found) => files.extend(found.into_values().flatten()),
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut runner = Runner::from_config(transport, config);
    let mut reports = Vec::new();
    let mut success = true;

    for file in &files {
        match runner.run_file(file) {
            Ok(report) => {
                success &= report.is_success();
                reports.push(report);
            }
            Err(e) => {
                error!(file = %file.display(), "{}", e);
                success = false;
            }
        }
    }
    runner.teardown();

    print_reports(&reports, json);

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_reports(reports: &[SuiteReport], json: bool) {
    if json {
        match serde_json::to_string_pretty(reports) {
            Ok(output) => println!("{}", output),
            Err(e) => error!("failed to serialize reports: {}", e),
        }
        return;
    }

    for report in reports {
        println!("{}", report);
        for step in &report.steps {
            println!("  [{}] {}", step.status.result_text(), step.label);
            if let Some(reason) = step.status.reason() {
                println!("         {}", reason);
            }
        }
    }
}

fn print_files(files: &CaseFiles) {
    for (dir, paths) in files {
        println!("{}", display_dir(dir));
        for path in paths {
            println!("  {}", path.display());
        }
    }
}

fn display_dir(dir: &Path) -> String {
    if dir.as_os_str().is_empty() {
        ".".to_string()
    } else {
        dir.display().to_string()
    }
}
