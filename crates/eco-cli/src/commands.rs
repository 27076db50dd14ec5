use anyhow::Context;
use colored::Colorize;
use eco_client::{ClientConfig, FileKeyValueStore, LedgerClient, PlantTreeResult, RemoteBackend};
use eco_server::{EcoServer, ServerConfig};
use eco_types::{LedgerSnapshot, PlantEvent};

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
        Command::Balance(args) => cmd_balance(args, format).await,
        Command::Add(args) => cmd_add(args, format).await,
        Command::Plant(args) => cmd_plant(args, format).await,
        Command::History(args) => cmd_history(args, format).await,
        Command::Sync(args) => cmd_sync(args, format).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    let server = EcoServer::open(config)?;
    println!(
        "{} EcoTrack ledger on {} (data: {})",
        "✓".green().bold(),
        listener.local_addr()?.to_string().bold(),
        server.config().data_dir.display()
    );
    server
        .serve_on(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

fn connect(args: &ClientArgs) -> anyhow::Result<LedgerClient<RemoteBackend, FileKeyValueStore>> {
    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(server) = &args.server {
        config.server_url = server.clone();
    }
    if let Some(cache) = &args.cache {
        config.cache_path = cache.clone();
    }
    tracing::debug!(server = %config.server_url, cache = %config.cache_path.display(), "ledger client");
    Ok(config.connect()?)
}

async fn cmd_balance(args: ClientArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = connect(&args)?;
    let snapshot = client.refresh().await?;
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "points": snapshot.points })),
        OutputFormat::Text => {
            println!("Balance: {} points", snapshot.points.to_string().yellow().bold());
            Ok(())
        }
    }
}

async fn cmd_add(args: AddArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = connect(&args.client)?;
    let result = client.request_add_points(args.points).await?;
    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Text => {
            let delta = if args.points >= 0 {
                format!("+{}", args.points).green()
            } else {
                args.points.to_string().red()
            };
            println!("{} {} points", "✓".green().bold(), delta);
            println!("  Balance: {}", result.balance.to_string().yellow().bold());
            Ok(())
        }
    }
}

async fn cmd_plant(args: ClientArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = connect(&args)?;
    let result = client.request_plant_tree().await?;
    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Text => {
            match &result {
                PlantTreeResult::Planted { balance, plant_event } => {
                    println!("{} Tree planted!", "🌳".green());
                    println!("  Points spent: {}", plant_event.points_spent.to_string().red());
                    println!("  Remaining points: {}", balance.to_string().yellow().bold());
                    println!("  When: {} {}", plant_event.date, plant_event.time.dimmed());
                }
                PlantTreeResult::NotEnoughPoints { balance } => {
                    println!("{} Could not plant tree: Not enough points", "✗".red().bold());
                    println!("  Current points: {}", balance.to_string().yellow());
                }
            }
            Ok(())
        }
    }
}

async fn cmd_history(args: ClientArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = connect(&args)?;
    let snapshot = client.refresh().await?;
    match format {
        OutputFormat::Json => print_json(&snapshot.plants),
        OutputFormat::Text => {
            print_history(&snapshot.plants);
            Ok(())
        }
    }
}

async fn cmd_sync(args: ClientArgs, format: OutputFormat) -> anyhow::Result<()> {
    let client = connect(&args)?;
    let snapshot = client.refresh().await?;
    match format {
        OutputFormat::Json => print_json(&snapshot),
        OutputFormat::Text => {
            print_summary(&snapshot);
            Ok(())
        }
    }
}

fn print_history(plants: &[PlantEvent]) {
    if plants.is_empty() {
        println!("No trees planted yet. Earn points to plant your first one!");
        return;
    }
    for (index, plant) in plants.iter().enumerate() {
        println!(
            "{} Tree #{}  {} {}  {}",
            "🌳".green(),
            index + 1,
            plant.date,
            plant.time.dimmed(),
            format!("-{} pts", plant.points_spent).red()
        );
    }
}

fn print_summary(snapshot: &LedgerSnapshot) {
    println!("{} Ledger", "✓".green().bold());
    println!("  Balance: {}", snapshot.points.to_string().yellow().bold());
    println!("  Trees planted: {}", snapshot.trees_planted().to_string().green());
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
