use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use playwright_suite::config::{selected_environment, AzureDevOpsConfig};
use playwright_suite::prelude::*;
use playwright_suite::reporter::{extract_case_ids, SyncOutcome};
use playwright_suite::{logging, specs};

#[derive(Parser)]
#[command(name = "playwright-suite")]
#[command(about = "Run the browser and API end-to-end suites", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Runner settings file
    #[arg(short, long, global = true, default_value = "e2e.yaml", env = "E2E_CONFIG")]
    config: PathBuf,

    /// Environment profiles file
    #[arg(long, global = true, default_value = "envConfig.json", env = "E2E_ENV_CONFIG")]
    env_config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run suites
    Run {
        /// Environment profile to use (default: $ENVIRONMENT or $environmentToRun)
        #[arg(short, long)]
        env: Option<String>,

        /// Suite names to run (default: all)
        #[arg(short, long)]
        suite: Vec<String>,

        /// Only run tests whose "suite > title" contains this text
        #[arg(short, long)]
        grep: Option<String>,

        /// Parallel workers (overrides config)
        #[arg(short, long)]
        workers: Option<usize>,

        /// Retries per failed test (overrides config)
        #[arg(short, long)]
        retries: Option<u32>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Don't push outcomes to Azure DevOps
        #[arg(long)]
        no_sync: bool,
    },

    /// List suites and their tests
    List {
        #[arg(short, long)]
        grep: Option<String>,
    },

    /// Print the test case ids embedded in a title
    ParseTitle {
        #[arg(value_name = "TITLE")]
        title: String,
    },

    /// Push one outcome to every test point of a test case
    Sync {
        #[arg(long = "case", value_name = "ID")]
        case_id: u64,

        /// passed or failed
        #[arg(long)]
        outcome: SyncOutcome,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = %e, "playwright-suite failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = RunnerConfig::load_or_default(&cli.config)?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    match cli.command {
        Commands::Run {
            env,
            suite,
            grep,
            workers,
            retries,
            headed,
            no_sync,
        } => {
            if let Some(workers) = workers {
                config.workers = workers;
            }
            if let Some(retries) = retries {
                config.retries = retries;
            }
            if headed {
                config.headless = false;
            }
            if no_sync {
                config.sync.enabled = false;
            }
            init_logging(&config)?;
            run_suites(config, &cli.env_config, env.as_deref(), &suite, grep.as_deref()).await
        }
        Commands::List { grep } => list_suites(grep.as_deref()),
        Commands::ParseTitle { title } => {
            let ids = extract_case_ids(&title);
            if ids.is_empty() {
                println!("No test case ids in \"{}\"", title);
            }
            for id in ids {
                println!("{}", id);
            }
            Ok(true)
        }
        Commands::Sync { case_id, outcome } => {
            init_logging(&config)?;
            sync_case(&config, &cli.env_config, case_id, outcome).await
        }
    }
}

fn init_logging(config: &RunnerConfig) -> anyhow::Result<()> {
    let path = logging::init(&config.logging)?;
    tracing::info!("Logging to {}", path.display());
    Ok(())
}

/// Active profile plus the Azure DevOps block, if the file has one
fn load_environment(
    path: &Path,
    explicit: Option<&str>,
) -> anyhow::Result<(EnvProfile, Option<AzureDevOpsConfig>)> {
    if !path.exists() {
        if let Some(name) = explicit {
            return Err(anyhow!(
                "environment '{}' requested but {} does not exist",
                name,
                path.display()
            ));
        }
        tracing::warn!("{} not found, using an empty environment profile", path.display());
        return Ok((EnvProfile::default(), None));
    }

    let env_config = EnvConfig::load(path)?;
    let profile = if explicit.is_some() || selected_environment().is_some() {
        env_config.active_profile(explicit)?
    } else {
        tracing::warn!(
            "No environment selected (available: {}), using an empty profile",
            env_config.environment_names().join(", ")
        );
        EnvProfile::default()
    };
    Ok((profile, env_config.azure_devops))
}

async fn run_suites(
    config: RunnerConfig,
    env_config: &Path,
    env: Option<&str>,
    names: &[String],
    grep: Option<&str>,
) -> anyhow::Result<bool> {
    let mut suites = specs::select(names).map_err(|e| anyhow!(e))?;
    if let Some(pattern) = grep {
        suites = suites.into_iter().map(|s| s.grep(pattern)).collect();
    }
    suites.retain(|s| !s.tests.is_empty());
    if suites.is_empty() {
        tracing::warn!("No tests matched");
        return Ok(true);
    }

    let (profile, azure) = load_environment(env_config, env)?;
    tracing::info!("Running against {}", profile.base_url);

    let mut runner = Runner::new(config.clone(), profile)?
        .with_reporter(Arc::new(LogReporter::new()));

    if config.sync.enabled {
        match &azure {
            Some(azure) => {
                let reporter = AzureDevOpsReporter::from_config(azure, &config.sync)
                    .context("Failed to set up Azure DevOps sync")?;
                runner = runner.with_reporter(Arc::new(reporter));
            }
            None => tracing::info!("No AzureDevOps block configured, outcome sync disabled"),
        }
    }

    let bridge = if suites.iter().any(|s| s.needs_browser()) {
        let bridge = Arc::new(
            PlaywrightBridge::start(&config.sidecar, config.browser, config.headless)
                .await
                .context("Failed to start the Playwright sidecar")?,
        );
        runner = runner.with_driver(bridge.clone());
        Some(bridge)
    } else {
        None
    };

    let summary = runner.run(&suites).await;

    if let Some(bridge) = bridge {
        if let Err(e) = bridge.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
    }

    println!(
        "{} passed, {} failed, {} flaky, {} skipped ({:.2}s)",
        summary.passed,
        summary.failed,
        summary.flaky,
        summary.skipped,
        summary.duration.as_secs_f64()
    );
    Ok(summary.success())
}

fn list_suites(grep: Option<&str>) -> anyhow::Result<bool> {
    for (name, suite) in specs::registry() {
        let suite = match grep {
            Some(pattern) => suite.grep(pattern),
            None => suite,
        };
        if suite.tests.is_empty() {
            continue;
        }
        println!("{} - {} ({:?})", name, suite.title, suite.mode);
        for test in &suite.tests {
            let ids = extract_case_ids(&test.title);
            if ids.is_empty() {
                println!("  {:?}  {}", test.kind, test.title);
            } else {
                println!("  {:?}  {}  -> cases {:?}", test.kind, test.title, ids);
            }
        }
    }
    Ok(true)
}

async fn sync_case(
    config: &RunnerConfig,
    env_config: &Path,
    case_id: u64,
    outcome: SyncOutcome,
) -> anyhow::Result<bool> {
    let env_config = EnvConfig::load(env_config)?;
    let azure = env_config
        .azure_devops
        .ok_or_else(|| anyhow!("envConfig has no AzureDevOps block"))?;
    let reporter = AzureDevOpsReporter::from_config(&azure, &config.sync)?;

    let results = reporter.sync_cases(&[case_id], outcome).await;
    let updated: usize = results.iter().map(|r| r.updated_points).sum();
    println!("Updated {} test point(s) for case {}", updated, case_id);
    Ok(updated > 0)
}
