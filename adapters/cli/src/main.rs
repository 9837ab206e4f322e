#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Train Match rounds headlessly and manages
//! the saved player profile.

mod autopilot;
mod profile_store;
mod tuning;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use train_match_core::GameMode;

use crate::{
    autopilot::{RoundOptions, Session},
    profile_store::ProfileStore,
};

#[derive(Parser)]
#[command(name = "train-match", about = "Train Match round engine")]
struct Cli {
    /// Location of the saved player profile.
    #[arg(long, default_value = "train-match-profile.bin")]
    profile: PathBuf,

    /// TOML file overriding lifecycle delays and vehicle physics.
    #[arg(long)]
    tuning: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play rounds with the autopilot and fold the results into the profile.
    Play {
        /// Seed of the first round; later rounds count up from it.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Number of rounds to play back to back.
        #[arg(short, long, default_value_t = 1)]
        rounds: u32,

        /// Switch the profile to this game mode before playing.
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Seats in the vehicle.
        #[arg(long, default_value_t = 4)]
        capacity: usize,

        /// Seats on the departure platform.
        #[arg(long, default_value_t = 20)]
        depot_seats: usize,

        /// Simulated milliseconds per step.
        #[arg(long, default_value_t = 50)]
        step_ms: u64,

        /// Print one JSON object per round instead of a text line.
        #[arg(long)]
        json: bool,
    },
    /// Print the saved profile as JSON.
    Show,
    /// Delete the saved profile.
    Reset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    SimpleTextures,
    NumberRange,
    Letters,
    ExampleMath,
    Class1Math,
    Class2Math,
    Class3Math,
    Class4Math,
    Class45Math,
    Class5Math,
    ExampleEnglish,
    CustomMapping,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::SimpleTextures => Self::SimpleTextures,
            ModeArg::NumberRange => Self::NumberRange,
            ModeArg::Letters => Self::Letters,
            ModeArg::ExampleMath => Self::ExampleMath,
            ModeArg::Class1Math => Self::Class1Math,
            ModeArg::Class2Math => Self::Class2Math,
            ModeArg::Class3Math => Self::Class3Math,
            ModeArg::Class4Math => Self::Class4Math,
            ModeArg::Class45Math => Self::Class45Math,
            ModeArg::Class5Math => Self::Class5Math,
            ModeArg::ExampleEnglish => Self::ExampleEnglish,
            ModeArg::CustomMapping => Self::CustomMapping,
        }
    }
}

/// Entry point for the Train Match command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let store = ProfileStore::new(cli.profile);

    match cli.command {
        Commands::Play {
            seed,
            rounds,
            mode,
            capacity,
            depot_seats,
            step_ms,
            json,
        } => {
            let tuning = tuning::load(cli.tuning.as_deref())?;
            let mut profile = store.load()?;
            if let Some(mode) = mode {
                profile.select_game_mode(mode.into());
            }

            let mut session = Session::new(profile, &tuning);
            for round in 0..rounds {
                let options = RoundOptions {
                    seed: seed.wrapping_add(u64::from(round)),
                    vehicle_capacity: capacity,
                    depot_seats,
                    step: Duration::from_millis(step_ms.max(1)),
                };
                let report = session
                    .play_round(options)
                    .with_context(|| format!("round {} failed", round + 1))?;

                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!(
                        "{:<16} seed {:<6} score {:>4} ({:>5.1}%)  avg {:>5.1}% over {} games{}",
                        report.mode.display_name(),
                        report.seed,
                        report.score,
                        report.percentage,
                        report.average,
                        report.games,
                        report
                            .advanced_to
                            .map(|mode| format!("  -> {}", mode.display_name()))
                            .unwrap_or_default(),
                    );
                }
            }
            store.save(&session.into_profile())
        }
        Commands::Show => {
            let profile = store.load()?;
            let rendered =
                serde_json::to_string_pretty(&profile).context("failed to render profile")?;
            println!("{rendered}");
            Ok(())
        }
        Commands::Reset => {
            let _ = store.reset()?;
            println!("reset profile at {}", store.path().display());
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
