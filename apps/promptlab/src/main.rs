mod config;
mod errors;
mod experiment;
mod llm_client;
mod report;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::experiment::aggregator::WinnerWeights;
use crate::experiment::prompts::{build_prompt, DEFAULT_JOB_DESCRIPTION};
use crate::experiment::run_experiment;
use crate::experiment::runner::StrategyRunner;
use crate::experiment::strategy::Strategy;
use crate::llm_client::LlmClient;
use crate::report::chart::render_charts;
use crate::report::console::{
    demo_display, demo_mode_notice, final_comparison, strategy_averages,
};
use crate::report::{build_report, load_report, write_report, ReportMeta};
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "promptlab")]
#[command(about = "Compare prompt strategies for interview question generation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the experiment against the completion API and save the results
    Run {
        /// Iterations per strategy (overrides PROMPTLAB_ITERATIONS)
        #[arg(short, long)]
        iterations: Option<u32>,

        /// Where to write the results (overrides PROMPTLAB_RESULTS_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Read the job description from this file
        #[arg(long)]
        jd_file: Option<PathBuf>,

        /// Only run these strategies, in the given order (repeatable)
        #[arg(short, long = "strategy")]
        strategies: Vec<Strategy>,
    },

    /// Display a saved results file
    Demo {
        /// Results file (defaults to PROMPTLAB_RESULTS_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Render comparison bar charts from a saved results file
    Chart {
        /// Results file (defaults to PROMPTLAB_RESULTS_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Also write the charts to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the prompt a strategy would send
    Prompt {
        strategy: Strategy,

        /// Read the job description from this file
        #[arg(long)]
        jd_file: Option<PathBuf>,
    },

    /// Serve saved results and prompt previews over HTTP
    Serve {
        /// Results file (defaults to PROMPTLAB_RESULTS_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Job description file used for prompt previews
        #[arg(long)]
        jd_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            iterations,
            output,
            jd_file,
            strategies,
        } => {
            let job_description = load_job_description(jd_file.as_deref())?;
            run(&config, iterations, output, &job_description, strategies).await
        }
        Commands::Demo { input } => {
            let path = input.unwrap_or_else(|| config.results_path.clone());
            let report = load_report(&path)
                .context("Make sure the experiment has been run and the path is correct")?;
            println!("{}", demo_display(&report));
            println!("Full results: {}", path.display());
            Ok(())
        }
        Commands::Chart { input, output } => {
            let path = input.unwrap_or_else(|| config.results_path.clone());
            let report = load_report(&path)?;
            let charts = render_charts(&report.result.summaries);
            println!("{charts}");
            if let Some(output) = output {
                std::fs::write(&output, &charts)
                    .with_context(|| format!("Failed to write charts to {}", output.display()))?;
                info!("Saved charts to {}", output.display());
            }
            Ok(())
        }
        Commands::Prompt { strategy, jd_file } => {
            let job_description = load_job_description(jd_file.as_deref())?;
            println!("{}", build_prompt(strategy, &job_description));
            Ok(())
        }
        Commands::Serve { input, jd_file } => {
            let job_description = load_job_description(jd_file.as_deref())?;
            serve(&config, input, job_description).await
        }
    }
}

async fn run(
    config: &Config,
    iterations: Option<u32>,
    output: Option<PathBuf>,
    job_description: &str,
    strategies: Vec<Strategy>,
) -> Result<()> {
    let mut runner_config = config.runner_config();
    if let Some(iterations) = iterations {
        runner_config.iterations = iterations;
    }

    // No credential: describe the experiment instead of calling the API
    let Some(api_key) = config.openai_api_key.clone() else {
        println!("{}", demo_mode_notice(runner_config.iterations));
        return Ok(());
    };

    let client = LlmClient::new(api_key, config.openai_base_url.clone())
        .context("Failed to build HTTP client")?;
    info!("LLM client initialized (model: {})", runner_config.model);

    let strategies = if strategies.is_empty() {
        Strategy::ALL.to_vec()
    } else {
        strategies
    };
    let meta = ReportMeta {
        researcher: config.researcher.clone(),
        model: runner_config.model.clone(),
        iterations: runner_config.iterations,
    };
    let weights = WinnerWeights::default();
    let runner = StrategyRunner::new(Arc::new(client), runner_config);

    let result = run_experiment(&runner, &strategies, job_description, &weights).await;
    for summary in &result.summaries {
        println!("{}", strategy_averages(summary));
    }

    let report = build_report(result, &meta, &weights, Utc::now());
    println!("{}", final_comparison(&report, &weights));

    let path = output.unwrap_or_else(|| config.results_path.clone());
    write_report(&path, &report)?;
    println!("Results saved to {}", path.display());
    Ok(())
}

async fn serve(config: &Config, input: Option<PathBuf>, job_description: String) -> Result<()> {
    let state = AppState {
        results_path: input.unwrap_or_else(|| config.results_path.clone()),
        job_description: job_description.into(),
        weights: WinnerWeights::default(),
    };
    info!("Serving results from {}", state.results_path.display());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_job_description(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job description from {}", path.display())),
        None => Ok(DEFAULT_JOB_DESCRIPTION.to_string()),
    }
}
