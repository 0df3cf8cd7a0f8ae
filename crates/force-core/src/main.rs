//! Force Progression Simulation
//!
//! Headless driver: spawns (or loads) a population of pawns and ticks the
//! progression, appearance, job and meditation systems.

use clap::Parser;
use std::path::PathBuf;

use force_core::config::{Config, DEFAULT_TUNING_PATH};
use force_core::events::{NotificationLogger, NotificationOutbox};
use force_core::persistence::{capture_save, read_save, spawn_from_save, write_save};
use force_core::setup::create_world;
use force_core::systems::{build_schedule, MeditationSchedule, ProgressionStats};
use force_core::{spawn_demo_pawns, spawn_summary, ForceError, SimClock, SimRng};
use force_events::{SimDate, TICKS_PER_DAY};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "force_sim")]
#[command(about = "Headless Force progression simulation")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate (defaults to the config's default_ticks)
    #[arg(long)]
    ticks: Option<u64>,

    /// Number of pawns to spawn (defaults to the config's pawn_count)
    #[arg(long)]
    pawns: Option<usize>,

    /// Tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: PathBuf,

    /// Append notifications to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write a save file when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Start from a save file instead of spawning pawns
    #[arg(long)]
    load: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ForceError> {
    let config = Config::load_or_default(&args.config);
    let ticks = args.ticks.unwrap_or(config.simulation.default_ticks);

    println!("Force Progression Simulation");
    println!("============================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", ticks);
    println!("Archetypes: {}", config.archetypes.len());
    println!();

    let mut world = create_world(&config, args.seed);

    match &args.load {
        Some(path) => {
            let save = read_save(path)?;
            let spawned = spawn_from_save(&mut world, &save);
            world.resource_mut::<SimClock>().current_tick = save.tick;
            println!("Loaded {} pawns from {} (tick {})", spawned.len(), path.display(), save.tick);
        }
        None => {
            let count = args.pawns.unwrap_or(config.simulation.pawn_count);
            let registry = config.archetype_registry();
            // Take the RNG out to avoid borrow conflicts
            if let Some(mut sim_rng) = world.remove_resource::<SimRng>() {
                spawn_demo_pawns(&mut world, count, &registry, &mut sim_rng.0);
                world.insert_resource(sim_rng);
            }
        }
    }
    print!("{}", spawn_summary(&mut world));
    println!();

    let mut logger = match &args.events {
        Some(path) => NotificationLogger::new(path)?,
        None => NotificationLogger::null(),
    };

    let mut schedule = build_schedule();
    let start = world.resource::<SimClock>().current_tick;

    for _ in 0..ticks {
        world.resource_mut::<SimClock>().advance();
        schedule.run(&mut world);

        let notes = world.resource_mut::<NotificationOutbox>().drain();
        for note in &notes {
            println!("[{}] {} ({})", note.timestamp.date, note.message_key, note.pawn.name);
        }
        if let Err(e) = logger.log_batch(&notes) {
            tracing::warn!("Could not log notifications: {}", e);
        }

        let tick = world.resource::<SimClock>().current_tick;
        if (tick - start) % (TICKS_PER_DAY * 15) == 0 {
            let stats = world.resource::<ProgressionStats>();
            tracing::info!(
                "{}: {} checks, {} awakenings, {} level-ups",
                SimDate::from_tick(tick),
                stats.checks,
                stats.awakenings,
                stats.level_ups
            );
        }
    }
    logger.flush()?;

    let end = world.resource::<SimClock>().current_tick;
    let stats = world.resource::<ProgressionStats>().clone();
    let meditations = world.resource::<MeditationSchedule>().held;
    println!();
    println!("Simulation complete. Ran {} ticks (ending on {}).", ticks, SimDate::from_tick(end));
    println!(
        "Checks: {}  Awakenings: {}  Level-ups: {}  Capped: {}  Meditations: {}",
        stats.checks, stats.awakenings, stats.level_ups, stats.capped, meditations
    );
    println!("Notifications logged: {}", logger.logged());
    print!("{}", spawn_summary(&mut world));

    if let Some(path) = &args.save {
        let save = capture_save(&mut world, end);
        write_save(path, &save)?;
        println!("Saved {} pawns to {}", save.pawns.len(), path.display());
    }

    Ok(())
}
