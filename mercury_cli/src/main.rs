use std::{io::Read, panic::AssertUnwindSafe, path::PathBuf};

use clap::Parser;
use mercury_optimizer::{
    json::{
        self,
        types::{JsonSolveRequest, JsonSolveResponse},
    },
    solver::solver_params::{SolverParams, Termination, Threads},
};
use tracing::debug;

mod parsers;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON solve request; read from stdin when omitted.
    input: Option<PathBuf>,

    /// Time budget for the search (e.g., "30s", "5m", "PT1H30M")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    duration: Option<jiff::SignedDuration>,

    /// The number of threads to use for the neighborhood scan (default: 1)
    #[arg(short, long, default_value_t = 1)]
    threads: u8,

    #[arg(long)]
    debug: bool,
}

fn build_params(cli: &Cli) -> SolverParams {
    let mut params = SolverParams::default();

    if let Some(duration) = cli.duration {
        params.terminations = params
            .terminations
            .into_iter()
            .map(|termination| match termination {
                Termination::Duration(_) => Termination::Duration(duration),
                other => other,
            })
            .collect();
    }

    params.search_threads = match cli.threads {
        0 | 1 => Threads::Single,
        n => Threads::Multi(n as usize),
    };

    params
}

fn read_request(cli: &Cli) -> Result<String, anyhow::Error> {
    match &cli.input {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // The response object owns stdout; everything else goes to stderr.
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let raw = read_request(&cli)?;

    let response = match serde_json::from_str::<JsonSolveRequest>(&raw) {
        Ok(request) => {
            let params = build_params(&cli);
            debug!(
                orders = request.orders.len(),
                vehicles = request.staff_capacities.len(),
                "solving request"
            );

            std::panic::catch_unwind(AssertUnwindSafe(|| json::solve(&request, params)))
                .unwrap_or_else(|_| JsonSolveResponse::Error {
                    error: String::from("Internal solver error"),
                })
        }
        Err(_) => JsonSolveResponse::Error {
            error: String::from("Invalid JSON input"),
        },
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
