use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use carpool_matcher::{
    input::MatchInput,
    matcher::{
        match_orchestrator::MatchOrchestrator, match_result::MatchResult,
        matcher_params::MatcherParams,
    },
    output::{file_output_store::FileOutputStore, output_store::OutputStore},
};
use carpool_providers::{
    google_maps_api::{GoogleMapsClient, GoogleMapsClientParams},
    location::Location,
    routing_service::TravelMode,
};
use clap::{Args, ValueEnum};
use tracing::{info, warn};

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl From<Mode> for TravelMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Driving => TravelMode::Driving,
            Mode::Walking => TravelMode::Walking,
            Mode::Bicycling => TravelMode::Bicycling,
            Mode::Transit => TravelMode::Transit,
        }
    }
}

#[derive(Args)]
pub struct MatchArgs {
    /// JSON file with the companion requests and driver offers
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Office address, overrides the one of the input file
    #[arg(long)]
    office: Option<String>,

    /// Folder the match output is written to
    #[arg(short = 'o', long, default_value = "./output")]
    output_dir: PathBuf,

    /// Minutes the driver may arrive at the meeting point before the companion
    #[arg(short, long, default_value_t = 5)]
    buffer_minutes: u32,

    /// Route nodes refined per driver-companion pair
    #[arg(short = 'k', long, default_value_t = 5)]
    candidates: usize,

    #[arg(long, value_enum, default_value_t = Mode::Driving)]
    mode: Mode,

    /// Pairs refined concurrently
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Print the result instead of storing it
    #[arg(long)]
    dry_run: bool,
}

fn log_outcome(result: &MatchResult) {
    match result.require_assignment() {
        Ok(assignment) => info!(
            driver_id = %assignment.pair.driver_id,
            companion_id = %assignment.pair.companion_id,
            meeting_point = %assignment.meeting_point,
            road_distance_km = assignment.road_distance_km,
            "Match result"
        ),
        Err(err) => warn!("{}", err),
    }

    for degradation in &result.degradations {
        warn!(?degradation, "Participant left out");
    }
}

pub async fn run(args: MatchArgs) -> anyhow::Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("Unable to open {}", args.input.display()))?;
    let input = MatchInput::from_reader(BufReader::new(file))?;
    let request = input.into_request(args.office.map(Location::address));

    info!(
        office = %request.office,
        drivers = request.drivers.len(),
        companions = request.companions.len(),
        "Structured locations for matching"
    );

    let client = GoogleMapsClient::new(GoogleMapsClientParams::from_env()?);
    let params = MatcherParams {
        candidate_count: args.candidates,
        buffer_minutes: args.buffer_minutes,
        travel_mode: args.mode.into(),
        max_concurrent_pairs: args.concurrency,
    };

    let orchestrator = MatchOrchestrator::new(client, params);
    let result = orchestrator.run(request).await?;

    log_outcome(&result);

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    std::fs::create_dir_all(&args.output_dir)?;
    let store = FileOutputStore::new(&args.output_dir);
    let id = store.store(&result)?;
    info!("Stored output with ID: {}", id);

    Ok(())
}
