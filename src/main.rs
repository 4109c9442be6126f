use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use icebreakr::engage::{CooldownLedger, CycleOutcome, EngagementLoop, run_cycle};
use icebreakr::services::{InMemoryDirectory, LogNotifier, StaticSettings};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("icebreakr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("icebreakr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Build the collaborators the engine runs against: a directory seeded from
/// file (or empty), and settings taken from the config.
fn build_services(
    config: &Config,
    seed_override: Option<&PathBuf>,
) -> Result<(Arc<InMemoryDirectory>, Arc<StaticSettings>)> {
    let seed_path = seed_override.or(config.seed.as_ref());
    let directory = match seed_path {
        Some(path) => {
            info!("Loading profile seed from {}", path.display());
            InMemoryDirectory::from_seed_file(path)
                .context(format!("Failed to load seed from {}", path.display()))?
        }
        None => {
            log::warn!("No profile seed configured, directory is empty");
            InMemoryDirectory::empty()
        }
    };

    let settings = StaticSettings::new(config.settings.discoverable, config.filter.clone());

    Ok((Arc::new(directory), Arc::new(settings)))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => run_loop(config, None, None, None).await,
        Some(Commands::Run {
            seed,
            period_secs,
            cooldown_secs,
        }) => run_loop(config, seed.as_ref(), *period_secs, *cooldown_secs).await,
        Some(Commands::Check { seed }) => handle_check(config, seed.as_ref()).await,
        Some(Commands::Peers { seed, json }) => handle_peers(config, seed.as_ref(), *json).await,
    }
}

async fn run_loop(
    config: &Config,
    seed: Option<&PathBuf>,
    period_secs: Option<u64>,
    cooldown_secs: Option<u64>,
) -> Result<()> {
    let (directory, settings) = build_services(config, seed)?;
    let notifier = Arc::new(LogNotifier);

    let mut engine = config.engine.clone();
    engine.apply_overrides(period_secs, cooldown_secs);
    engine.validate().context("Invalid timing override")?;
    let loop_config = engine.loop_config();

    let period_secs = loop_config.period.as_secs();
    let cooldown_secs = loop_config.cooldown.as_secs();

    let engagement = EngagementLoop::new(directory, settings, notifier, loop_config);
    engagement.start().await;

    println!(
        "{} period {}s, cooldown {}s (ctrl-c to stop)",
        "Engagement loop running:".green(),
        period_secs,
        cooldown_secs
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    println!("{}", "Stopping...".yellow());
    engagement.stop().await;
    println!("{}", "Stopped.".green());

    Ok(())
}

async fn handle_check(config: &Config, seed: Option<&PathBuf>) -> Result<()> {
    let (directory, settings) = build_services(config, seed)?;
    let notifier = LogNotifier;
    let mut ledger = CooldownLedger::new();

    let cooldown = Duration::from_secs(config.engine.cooldown_secs);
    let outcome = run_cycle(&*directory, &*settings, &notifier, &mut ledger, cooldown)
        .await
        .context("Proximity check failed")?;

    match outcome {
        CycleOutcome::Skipped(reason) => {
            println!("{} {:?}", "Cycle skipped:".yellow(), reason);
        }
        CycleOutcome::Completed(stats) => {
            println!("{}", "Cycle completed".green());
            println!("  candidates:  {}", stats.candidates);
            println!("  dispatched:  {}", stats.dispatched);
            println!("  cooled down: {}", stats.cooled_down);
            println!("  no overlap:  {}", stats.no_overlap);
        }
    }

    Ok(())
}

async fn handle_peers(config: &Config, seed: Option<&PathBuf>, json: bool) -> Result<()> {
    use icebreakr::services::{ProfileDirectory, SettingsStore};

    let (directory, settings) = build_services(config, seed)?;

    let Some(me) = directory.self_profile().await? else {
        println!("{}", "No self profile in the seed".red());
        return Ok(());
    };
    let Some(center) = me.location else {
        println!("{}", "Self profile has no location".red());
        return Ok(());
    };

    let criteria = settings.filter_criteria().await?;
    let peers: Vec<_> = directory
        .filtered_profiles(center, &criteria)
        .await?
        .into_iter()
        .filter(|p| p.uid != me.uid)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&peers)?);
        return Ok(());
    }

    if peers.is_empty() {
        println!("{}", "No peers within the current filters".yellow());
        return Ok(());
    }

    println!("{}", "Nearby peers:".green());
    for peer in &peers {
        let tags: Vec<&str> = peer.tags.iter().map(String::as_str).collect();
        println!("  {} ({}) tags: {}", peer.name.cyan(), peer.uid, tags.join(", "));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config)
        .await
        .context("Application failed")?;

    Ok(())
}
