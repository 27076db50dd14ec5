use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "eco",
    about = "EcoTrack ledger: earn points, plant trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the ledger server
    Serve(ServeArgs),
    /// Show the current balance
    Balance(ClientArgs),
    /// Add (or with a negative value, remove) points
    Add(AddArgs),
    /// Spend 1000 points to plant a tree
    Plant(ClientArgs),
    /// List planted trees
    History(ClientArgs),
    /// Reconcile the local cache with the server
    Sync(ClientArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML server configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct ClientArgs {
    /// TOML client configuration file
    #[arg(long = "client-config")]
    pub config: Option<PathBuf>,
    /// Ledger server base URL
    #[arg(long)]
    pub server: Option<String>,
    /// Local cache file
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(allow_negative_numbers = true)]
    pub points: i64,
    #[command(flatten)]
    pub client: ClientArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_accepts_negative_delta() {
        let cli = Cli::try_parse_from(["eco", "add", "-250", "--server", "http://x:1"]).unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.points, -250);
                assert_eq!(args.client.server.as_deref(), Some("http://x:1"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn serve_overrides() {
        let cli = Cli::try_parse_from(["eco", "serve", "--bind", "0.0.0.0:9000", "--data-dir", "/srv/eco"])
            .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind.unwrap().port(), 9000);
                assert_eq!(args.data_dir.unwrap(), PathBuf::from("/srv/eco"));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn global_json_format() {
        let cli = Cli::try_parse_from(["eco", "plant", "--format", "json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
