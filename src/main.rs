use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use serde_json::Value;

use rusty_sonar::api::dataset::DatasetQuery;
use rusty_sonar::api::ApiResponse;
use rusty_sonar::data::loader::MalformedPolicy;
use rusty_sonar::{Route, SonarApp, SonarConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "rusty-sonar: mine vs rock sonar classifier")]
struct Cli {
    /// Training table (defaults to $SONAR_DATASET or public/sonar.csv)
    #[arg(long, value_name = "PATH")]
    dataset: Option<PathBuf>,

    /// Demo sample table (defaults to $SONAR_SAMPLES or public/sonar_samples.txt)
    #[arg(long, value_name = "PATH")]
    samples: Option<PathBuf>,

    /// Read malformed numbers as NaN instead of failing the load
    #[arg(long)]
    legacy_nan: bool,

    /// Increase output verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one request body, e.g. '{"features":[...60 numbers...]}'
    Predict {
        /// JSON body; read from stdin when omitted
        body: Option<String>,
    },
    /// Return a random labelled demo row
    Sample,
    /// Browse the training set
    Dataset {
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        /// all, rock or mine
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    /// Answer newline-delimited predict bodies from stdin with one model
    Batch,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let mut config = SonarConfig::from_env().context("invalid environment configuration")?;
    if let Some(path) = cli.dataset {
        config.dataset_path = path;
    }
    if let Some(path) = cli.samples {
        config.samples_path = path;
    }
    if cli.legacy_nan {
        config.malformed = MalformedPolicy::KeepNan;
    }

    let app = SonarApp::from_config(&config);

    let response = match cli.command {
        Command::Predict { body } => {
            let text = match body {
                Some(text) => text,
                None => {
                    let mut text = String::new();
                    io::stdin()
                        .read_to_string(&mut text)
                        .context("failed to read request body from stdin")?;
                    text
                }
            };
            app.handle(Route::Predict(parse_body(&text)?))
        }
        Command::Sample => app.handle(Route::Sample),
        Command::Dataset {
            page,
            limit,
            filter,
            id,
        } => app.handle(Route::Dataset(DatasetQuery {
            page,
            limit,
            filter,
            id,
        })),
        Command::Batch => return run_batch(&app),
    };

    print_response(&response)?;
    Ok(exit_code(&response))
}

fn parse_body(text: &str) -> Result<Value> {
    serde_json::from_str(text).context("request body is not valid JSON")
}

fn run_batch(app: &SonarApp) -> Result<ExitCode> {
    let stdin = io::stdin();
    let mut all_ok = true;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match parse_body(&line) {
            Ok(body) => app.handle(Route::Predict(body)),
            Err(err) => ApiResponse {
                status: 400,
                body: serde_json::json!({ "error": format!("{err:#}") }),
            },
        };
        all_ok &= response.is_success();
        print_response(&response)?;
    }
    log::info!(
        "Batch finished; model trained {} time(s)",
        app.service.training_runs()
    );
    Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_response(response: &ApiResponse) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, &response.body).context("failed to write response")?;
    writeln!(out)?;
    if !response.is_success() {
        log::warn!("request failed with status {}", response.status);
    }
    Ok(())
}

fn exit_code(response: &ApiResponse) -> ExitCode {
    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// `RUST_LOG` applies unless `-v` is given.
fn init_logging(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.try_init().map_err(|err| err.into())
}
