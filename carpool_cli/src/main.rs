use carpool_providers::{
    google_maps_api::{GoogleMapsClient, GoogleMapsClientParams},
    routing_service::RoutingService,
};
use clap::{CommandFactory, Parser, Subcommand};
use mimalloc::MiMalloc;
use tracing::info;

use crate::match_command::MatchArgs;

mod match_command;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match the active companions of an input file to a driver
    #[command(visible_alias = "m")]
    Match {
        #[command(flatten)]
        args: MatchArgs,
    },
    /// Only check that the routing service is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Match { args }) => match_command::run(args).await?,
        Some(Commands::Check) => {
            let client = GoogleMapsClient::new(GoogleMapsClientParams::from_env()?);
            if !client.check_connectivity().await {
                anyhow::bail!("Google Maps API connectivity check failed");
            }
            info!("Google Maps API connected successfully");
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}
