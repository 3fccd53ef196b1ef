use anyhow::{Context, Result};
use geocheckin::{
    AppConfig, CheckInSession, CheckInStore, ConfigurationManager, JsonFileStore, LocationTracker, MapSyncController,
    MemoryStore, MockGeolocationProvider, PositionFix, RecordingBackend, UserIdentity, EARTH_RADIUS_M,
};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Distances (meters north of the fence center) of the simulated walk
const WALK_M: [f64; 6] = [400.0, 250.0, 160.0, 90.0, 40.0, 5.0];

fn print_help() {
    println!("Usage: geocheckin [CONFIG.json]");
    println!();
    println!("Simulates a walk toward the configured check-in point and checks in");
    println!("once the position is inside the geofence. Set RUST_LOG to adjust logging.");
}

fn load_config(args: &[String]) -> Result<AppConfig> {
    match args.get(1) {
        Some(path) => {
            let manager = ConfigurationManager::from_file(path)
                .with_context(|| format!("loading configuration from {}", path))?;
            Ok(manager.get_config().clone())
        }
        None => Ok(AppConfig::default()),
    }
}

fn open_store(config: &AppConfig) -> Result<Box<dyn CheckInStore>> {
    match &config.store_path {
        Some(path) => {
            let store = JsonFileStore::open(path).with_context(|| format!("opening check-in store {}", path))?;
            Ok(Box::new(store))
        }
        None => Ok(Box::new(MemoryStore::new())),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if matches!(args.get(1).map(String::as_str), Some("-h" | "--help")) {
        print_help();
        return Ok(());
    }

    let config = load_config(&args)?;
    let fence = config.geofence_spec()?;
    let mut store = open_store(&config)?;

    let tracker = LocationTracker::new(MockGeolocationProvider::new(), config.tracker.clone());
    let map = MapSyncController::new(RecordingBackend::new(), config.map.clone());
    let user = UserIdentity::new(1, "Liam");
    let mut session = CheckInSession::new(user, fence, tracker, map);
    session.start()?;

    let center = fence.center();
    let started = Instant::now();
    let step = Duration::from_millis(config.map.settle_delay_ms + 100);

    for (i, meters) in WALK_M.iter().enumerate() {
        let now = started + step * i as u32;
        let fix = PositionFix::new(center.latitude() + (meters / EARTH_RADIUS_M).to_degrees(), center.longitude())
            .with_accuracy(8.0);
        session.tracker_mut().provider_mut().push_fix(fix);
        session.pump(now)?;

        info!(
            step = i + 1,
            distance_m = *meters,
            range = ?session.range_state(),
            can_check_in = session.can_check_in(),
            "walk step"
        );

        if session.can_check_in() {
            let record = session.check_in(store.as_mut())?;
            info!(id = record.id, time = %record.time, "checked in");
            break;
        }
    }

    if !session.can_check_in() {
        warn!("never reached the check-in area");
    }

    // Let the last viewport fit run before teardown
    session.pump(started + step * (WALK_M.len() as u32 + 1))?;
    info!(
        fits = session.map().fits_executed(),
        overlays = session.map().overlay_count(),
        "map state"
    );
    session.shutdown()?;

    for record in store.records_for(session.user().id) {
        println!("{}\t{}\t{:.6},{:.6}", record.id, record.time, record.location.latitude(), record.location.longitude());
    }
    Ok(())
}
