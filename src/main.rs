use std::io::{self, BufReader};
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use gridworld::policy::{run_episode, HumanControlPolicy, Policy, RandomPolicy};
use gridworld::report::write_episodes;
use gridworld::world::{Random, RandomConfig, Static, World, WorldGenerator};
use gridworld::Simulation;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PolicyKind {
    Random,
    Human,
}

/// Run grid-world episodes and report their scores.
#[derive(Debug, Parser)]
#[command(name = "gridworld", version)]
struct Args {
    /// Text map to play on; a random world is generated per episode otherwise.
    #[arg(long)]
    map: Option<PathBuf>,
    #[arg(long, default_value_t = 8)]
    width: usize,
    #[arg(long, default_value_t = 8)]
    height: usize,
    #[arg(long, default_value_t = 0.2)]
    wall_density: f64,
    #[arg(long, default_value_t = 3)]
    traps: usize,
    /// Seed for world generation and the random policy.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 10)]
    episodes: usize,
    #[arg(long, default_value_t = 500)]
    max_steps: usize,
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    policy: PolicyKind,
    /// Write per-episode results to this CSV file.
    #[arg(long)]
    csv: Option<PathBuf>,
}

enum MapSource {
    Static(Static),
    Random(Random),
}

impl WorldGenerator for MapSource {
    type World = World;

    fn generate(&mut self) -> World {
        match self {
            MapSource::Static(g) => g.generate(),
            MapSource::Random(g) => g.generate(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = match &args.map {
        Some(path) => {
            let world = World::load(path)
                .with_context(|| format!("loading map {}", path.display()))?;
            MapSource::Static(Static::new(world))
        }
        None => MapSource::Random(Random::new(RandomConfig {
            w: args.width,
            h: args.height,
            wall_density: args.wall_density,
            traps: args.traps,
            seed: args.seed,
        })?),
    };

    let mut policy: Box<dyn Policy> = match args.policy {
        PolicyKind::Random => Box::new(RandomPolicy::new(args.seed)),
        PolicyKind::Human => Box::new(HumanControlPolicy::new(BufReader::new(io::stdin()))),
    };

    let mut sim = Simulation::new(source);
    let mut episodes = Vec::with_capacity(args.episodes);
    for i in 0..args.episodes {
        if i > 0 {
            sim.reset();
        }
        if args.policy == PolicyKind::Human {
            println!("{}", sim.world());
        }
        let episode = run_episode(&mut sim, &mut *policy, args.max_steps);
        println!("Episode {}: {} in {} steps, score {}", i, episode.outcome, episode.steps, episode.score);
        episodes.push(episode);
    }

    if !episodes.is_empty() {
        let mean = episodes.iter().map(|e| e.score as f64).sum::<f64>() / episodes.len() as f64;
        println!("Mean score over {} episodes: {:.2}", episodes.len(), mean);
    }

    if let Some(path) = &args.csv {
        write_episodes(path, &episodes)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {} episodes to {}", episodes.len(), path.display());
    }

    Ok(())
}
