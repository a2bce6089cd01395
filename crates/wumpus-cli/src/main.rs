//! Wumpus CLI - knowledge-based agent in the wumpus world.
//!
//! Single binary that provides:
//! - `wumpus play` - watch the agent play one episode
//! - `wumpus batch` - play many episodes and tally the outcomes
//! - `wumpus generate` - print a generated layout
//! - `wumpus manual` - hunt the wumpus yourself

mod render;

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use wumpus_core::rng::{derive_seed, entropy_seed};
use wumpus_core::{
    generate_layout, Action, Episode, EpisodeStatus, GameConfig, LossCause, ManualGame,
    SplitMix64, StepOutcome,
};
use wumpus_nav::Direction;
use wumpus_tools::SharedTraceSink;

const DEFAULT_CONFIG: &str = "wumpus.yaml";

#[derive(Parser)]
#[command(name = "wumpus")]
#[command(about = "Knowledge-based wumpus world agent", version)]
struct Cli {
    /// Configuration file (defaults to ./wumpus.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the configuration file
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the agent play one episode
    Play {
        /// Stop after this many turns
        #[arg(long)]
        max_turns: Option<u64>,

        /// Print the final state as JSON instead of boards
        #[arg(long)]
        json: bool,

        /// Include the turn trace in the output
        #[arg(long)]
        trace: bool,
    },

    /// Play many episodes and print outcome counts
    Batch {
        /// Number of episodes
        #[arg(short, long, default_value_t = 100)]
        episodes: u64,
    },

    /// Print one generated layout as JSON
    Generate,

    /// Play by hand, reading commands from stdin
    Manual,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Some(Commands::Play {
            max_turns,
            json,
            trace,
        }) => play(config, max_turns, json, trace),
        Some(Commands::Batch { episodes }) => batch(config, episodes),
        Some(Commands::Generate) => generate(config),
        Some(Commands::Manual) => manual(config),
        None => {
            println!("Wumpus - knowledge-based agent");
            println!();
            println!("Usage: wumpus <COMMAND>");
            println!();
            println!("Commands:");
            println!("  play      Let the agent play one episode");
            println!("  batch     Play many episodes and tally the outcomes");
            println!("  generate  Print a generated layout");
            println!("  manual    Hunt the wumpus yourself");
            println!();
            println!("Run 'wumpus --help' for more information.");
            Ok(())
        }
    }
}

/// Resolve the configuration and pin a seed so every run can be replayed.
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::load_or_default(Path::new(DEFAULT_CONFIG))?,
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate().context("Invalid configuration")?;

    let seed = *config.seed.get_or_insert_with(entropy_seed);
    tracing::debug!(seed, grid_size = config.grid_size, pits = config.num_pits, "Loaded config");
    Ok(config)
}

fn play(config: GameConfig, max_turns: Option<u64>, json: bool, trace: bool) -> Result<()> {
    let max_turns = max_turns.unwrap_or(config.max_turns);
    let mut episode = Episode::new(config).context("Failed to generate layout")?;
    tracing::info!(seed = episode.seed(), "Playing episode");

    let sink = SharedTraceSink::new();
    if trace {
        episode.set_trace_sink(Box::new(sink.clone()));
    }

    if json {
        let summary = episode.run(max_turns);
        let mut output = serde_json::json!({
            "seed": episode.seed(),
            "summary": summary,
            "final": episode.snapshot(),
        });
        if trace {
            output["trace"] = serde_json::to_value(sink.snapshot())?;
        }
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", render::LEGEND);
    println!();
    print!("{}", render::board(&episode.snapshot()));

    let mut turns = 0;
    while turns < max_turns && !episode.is_terminal() {
        turns += 1;
        let outcome = episode.step();
        println!();
        println!("turn {} ({})", episode.turn(), describe(outcome));
        print!("{}", render::board(&episode.snapshot()));
        if outcome == StepOutcome::Stayed {
            break;
        }
    }

    if trace {
        println!();
        for event in sink.snapshot().events {
            let cell = event.cell.map(|c| c.to_string()).unwrap_or_default();
            let detail = event.detail.unwrap_or_default();
            println!("[{:>3}] {:<12} {:<8} {}", event.turn, event.tag, cell, detail);
        }
    }

    println!();
    println!("Seed:    {}", episode.seed());
    println!("Turns:   {}", episode.turn());
    println!("Outcome: {}", episode.status());
    Ok(())
}

fn describe(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::Moved(cell) => format!("moved to {cell}"),
        StepOutcome::Stayed => "no move left".to_owned(),
        StepOutcome::Finished(status) => status.to_string(),
    }
}

#[derive(Debug, Default)]
struct Tally {
    won: u64,
    pit: u64,
    monster: u64,
    trapped: u64,
    stalled: u64,
    capped: u64,
    turns: u64,
}

fn batch(config: GameConfig, episodes: u64) -> Result<()> {
    let base_seed = config.seed.unwrap_or_else(entropy_seed);
    let max_turns = config.max_turns;
    let mut tally = Tally::default();

    for i in 0..episodes {
        let episode_config = GameConfig {
            seed: Some(derive_seed(base_seed, i)),
            ..config.clone()
        };
        let mut episode = Episode::new(episode_config)
            .with_context(|| format!("Failed to generate layout for episode {i}"))?;
        let summary = episode.run(max_turns);
        tally.turns += summary.turns;

        match summary.status {
            EpisodeStatus::Won => tally.won += 1,
            EpisodeStatus::Lost(LossCause::Pit) => tally.pit += 1,
            EpisodeStatus::Lost(LossCause::Monster) => tally.monster += 1,
            EpisodeStatus::Lost(LossCause::Trapped) => tally.trapped += 1,
            EpisodeStatus::Exploring if summary.hit_turn_cap => tally.capped += 1,
            EpisodeStatus::Exploring => tally.stalled += 1,
        }
    }

    tracing::info!(episodes, base_seed, "Batch finished");
    println!("Episodes: {episodes} (seed {base_seed})");
    println!("Won:      {}", tally.won);
    println!("Lost:     {} pit, {} monster, {} trapped", tally.pit, tally.monster, tally.trapped);
    println!("Stalled:  {}", tally.stalled);
    println!("Capped:   {}", tally.capped);
    if episodes > 0 {
        println!("Avg turns: {:.1}", tally.turns as f64 / episodes as f64);
    }
    Ok(())
}

fn generate(config: GameConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(entropy_seed);
    let layout = generate_layout(&config.mapgen(), &mut SplitMix64::new(seed))
        .context("Failed to generate layout")?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}

fn manual(config: GameConfig) -> Result<()> {
    let seed = config.seed.unwrap_or_else(entropy_seed);
    let mut game = ManualGame::generate(&config, &mut SplitMix64::new(seed))
        .context("Failed to generate layout")?;

    println!("Commands: up | down | left | right | shoot <dir> | grab | climb | quit");
    println!("{}", render::manual_status(&game));

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == "quit" {
            break;
        }

        match parse_action(command) {
            Ok(action) => {
                if !game.apply(action) {
                    println!("Nothing happens.");
                }
            }
            Err(err) => {
                println!("{err}");
                continue;
            }
        }

        println!("{}", render::manual_status(&game));
        if game.is_over() {
            println!("Game over: {:?}, score {}", game.status(), game.score());
            break;
        }
    }
    Ok(())
}

fn parse_direction(word: &str) -> Result<Direction> {
    match word {
        "up" | "north" => Ok(Direction::North),
        "down" | "south" => Ok(Direction::South),
        "left" | "west" => Ok(Direction::West),
        "right" | "east" => Ok(Direction::East),
        other => bail!("Unknown direction '{other}'"),
    }
}

fn parse_action(command: &str) -> Result<Action> {
    let mut words = command.split_whitespace();
    let Some(verb) = words.next() else {
        bail!("Empty command");
    };
    let action = match verb {
        "grab" => Action::Grab,
        "climb" => Action::Climb,
        "shoot" => {
            let dir = words.next().context("Shoot where? e.g. 'shoot up'")?;
            Action::Shoot(parse_direction(dir)?)
        }
        other => Action::Move(parse_direction(other)?),
    };
    Ok(action)
}
