//! Decomp Rollout CLI
//!
//! Run seeded random-policy rollouts over a tabular world and report the
//! per-component reward decomposition.

use clap::Parser;
use decomp_core::MdpEnv;
use decomp_env::{SeededSource, WorldModel};
use decomp_sim::{RolloutConfig, RolloutExport, RolloutRunner, TabularWorld};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Decomposed-reward rollout CLI
#[derive(Parser, Debug)]
#[command(name = "decomp-sim")]
#[command(about = "Run seeded rollouts over a decomposed-reward world", long_about = None)]
struct Args {
    /// World table (JSON)
    #[arg(short, long)]
    world: String,

    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of episodes
    #[arg(short, long, default_value = "10")]
    episodes: usize,

    /// Step cap per episode
    #[arg(short, long, default_value = "100")]
    max_steps: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the rollout summary to a JSON file
    #[arg(long)]
    export: Option<String>,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    let world = match TabularWorld::from_path(&args.world) {
        Ok(world) => world,
        Err(e) => {
            error!("Failed to load world {}: {}", args.world, e);
            std::process::exit(1);
        }
    };

    let reward_types = world.reward_types().to_vec();
    let actions = world.actions().to_vec();
    let metadata = world.metadata().clone();

    if !args.json {
        info!("Decomp rollout harness v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!(
            "World: {} | States: {} | Actions: {} | Reward types: {}",
            args.world,
            world.states().len(),
            actions.len(),
            reward_types.join(", ")
        );
    }

    let config = RolloutConfig::default()
        .with_seed(seed)
        .with_episodes(args.episodes)
        .with_max_steps(args.max_steps);

    let env = MdpEnv::new(world, SeededSource::new(seed)).with_metadata(metadata);
    let mut runner = RolloutRunner::new(env, actions, config.clone());

    let summary = match runner.run() {
        Ok(summary) => summary,
        Err(e) => {
            error!("Rollout aborted (seed={}): {}", seed, e);
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize summary: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!(
            "  Episodes: {} | Terminated: {} | Mean steps: {:.1}",
            summary.episodes.len(),
            summary.terminated_count,
            summary.mean_steps
        );
        info!("  Mean return: {:.3}", summary.mean_return);
        for (name, value) in summary.component_means.iter() {
            info!("    {:<40} {:>10.3}", name, value);
        }
        if summary.total_mismatches > 0 {
            warn!(
                "  {} steps had a decomposition that did not sum to the reward",
                summary.total_mismatches
            );
        }
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    if let Some(path) = &args.export {
        let export = RolloutExport::new(&args.world, reward_types, config, summary);
        if let Err(e) = export.write_to_file(path) {
            error!("Failed to write export: {:?}", e);
            std::process::exit(1);
        }
        info!("Exported rollout summary to {}", path);
    }
}
