#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Train Match engine.
//!
//! This crate defines the content model (symbols, mappings, game modes), the
//! transit collaborators (stations, seats, travellers, the vehicle) and the
//! message surface that connects adapters, the authoritative world, and pure
//! systems. Adapters and systems submit [`Command`] values, the world executes
//! them through its `apply` entry point and broadcasts [`Event`] values that
//! systems react to.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod mode;
mod palette;
mod symbol;
mod transit;
mod tuning;

pub use mode::GameMode;
pub use palette::{ColorScheme, Palette, Rgb};
pub use symbol::{ImageHandle, MappingError, Symbol, SymbolMapping};
pub use transit::{Passenger, Seat, Station, Vehicle};
pub use tuning::{Physics, Timings, Tuning};

/// Points awarded when a traveller gets off at a matching station.
pub const ARRIVAL_REWARD: i32 = 3;
/// Points removed when a traveller rides past its station.
pub const MISSED_STOP_PENALTY: i32 = 3;
/// Points removed when a traveller is dropped off at the wrong station.
pub const WRONG_STOP_PENALTY: i32 = 1;
/// Score ceiling increase for every traveller placed on a platform.
pub const CEILING_PER_TRAVELLER: u32 = 2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins a new round using the content currently selected in the profile.
    StartRound {
        /// Seed for every random draw made during the round.
        seed: u64,
        /// Number of seats in the vehicle.
        vehicle_capacity: usize,
        /// Number of seats on the departure platform.
        depot_seats: usize,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Player holds the accelerator for `dt`.
    Accelerate {
        /// Duration the control was held during this frame.
        dt: Duration,
    },
    /// Player touched the track away from any control for `dt`.
    Brake {
        /// Duration the brake was held during this frame.
        dt: Duration,
    },
    /// Player released every control; the vehicle halts.
    ReleaseControls,
    /// Moves the traveller in the given vehicle seat onto the station platform.
    Disembark {
        /// Index of the vehicle seat.
        seat: usize,
    },
    /// Moves the traveller in the given platform seat into the vehicle.
    Board {
        /// Index of the station seat.
        seat: usize,
    },
    /// Reveals the "press to start" prompt.
    ShowIntroPrompt,
    /// Reveals the "choose a traveller" hint.
    ShowChooseHint,
    /// Hides the back affordance shown at round start.
    HideBackAffordance,
    /// Hides the movement hint arrow.
    HideMoveHint,
    /// Ends the current round.
    EndRound,
    /// Folds the finished round's percentage into the profile's running average.
    RecordRoundScore,
    /// Shows the end-of-round summary and applies difficulty adaptation.
    RevealSummary,
    /// Hides the summary and leaves the round.
    ReturnToMenu,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A round began.
    RoundStarted {
        /// Identifier of the new round.
        round: RoundId,
        /// Game mode supplying the round's content.
        mode: GameMode,
        /// Presentation overrides for the selected color scheme.
        palette: Palette,
        /// Whether prompts and hints are enabled.
        labels: bool,
        /// Whether controls are mirrored for left-handed play.
        left_hand: bool,
        /// Whether the running score is displayed.
        score_visible: bool,
        /// Whether the calm background variant is used.
        calm_background: bool,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The vehicle moved for the first time this round.
    VehicleStarted,
    /// A station appeared ahead of the vehicle.
    StationSpawned {
        /// Identifier of the new station.
        station: StationId,
        /// Canonical symbol shown on the station.
        symbol: Symbol,
        /// Travellers waiting on its platform.
        travellers: usize,
    },
    /// The content queue ran dry; no further stations will appear.
    ContentExhausted,
    /// A traveller left the platform at its destination.
    PassengerArrived {
        /// Traveller that arrived.
        passenger: PassengerId,
        /// Station it arrived at.
        station: StationId,
    },
    /// A traveller reacts negatively to a scoring mistake.
    PassengerSaddened {
        /// Traveller showing the negative feedback.
        passenger: PassengerId,
        /// Points removed from the score.
        penalty: i32,
    },
    /// A traveller was moved between the vehicle and the platform.
    PassengerMoved {
        /// Traveller that moved.
        passenger: PassengerId,
        /// Whether the traveller is now in the vehicle.
        boarded: bool,
    },
    /// The running score changed.
    ScoreChanged {
        /// Score after the change.
        score: i32,
    },
    /// A player action could not be carried out.
    ActionRejected {
        /// Specific reason the action failed.
        reason: ActionError,
    },
    /// The intro prompt became visible.
    IntroPromptShown,
    /// The intro prompt was hidden.
    IntroPromptHidden,
    /// The choose hint became visible.
    ChooseHintShown,
    /// The choose hint was hidden.
    ChooseHintHidden,
    /// The back affordance was hidden.
    BackAffordanceHidden,
    /// The movement hint arrow was hidden.
    MoveHintHidden,
    /// The round reached its end state.
    RoundEnded {
        /// Round that ended.
        round: RoundId,
    },
    /// The round's percentage was folded into the score history.
    RoundScored {
        /// Final score of the round.
        score: i32,
        /// Score as a percentage of the round's ceiling.
        percentage: f64,
        /// Running average after folding in this round.
        average: f64,
        /// Games played on the current mode, including this one.
        games: u32,
    },
    /// The end-of-round summary became visible.
    SummaryShown {
        /// Final score of the round.
        score: i32,
        /// Running average on the current mode.
        average: f64,
    },
    /// The profile moved one step up its difficulty ladder.
    DifficultyIncreased {
        /// Mode before advancing.
        from: GameMode,
        /// Mode after advancing.
        to: GameMode,
    },
    /// The summary was hidden and control returned to the menu.
    ReturnedToMenu {
        /// Round that was left.
        round: RoundId,
    },
}

/// Reasons a player action inside a round may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum ActionError {
    /// No round is being played.
    #[error("no round is being played")]
    RoundNotActive,
    /// Travellers can only move while the vehicle is standing still.
    #[error("the vehicle is moving")]
    VehicleMoving,
    /// Travellers can only move while the vehicle is docked at the station.
    #[error("the vehicle is not docked at the station")]
    NotDocked,
    /// The referenced seat does not exist.
    #[error("seat {0} does not exist")]
    UnknownSeat(usize),
    /// The referenced seat is empty.
    #[error("seat {0} is empty")]
    EmptySeat(usize),
    /// Every seat on the receiving side is taken.
    #[error("no free seat is available")]
    NoFreeSeat,
}

/// Stage of the round lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// No round has been started.
    #[default]
    Intro,
    /// Stations are being generated and travellers scored.
    Playing,
    /// Content ran out; the round ends after the quit delay.
    Quit,
    /// The round ended; the summary sequence is running.
    Ending,
    /// The round is over and control went back to the menu.
    MenuReturn,
}

/// Read-only snapshot of the round's lifecycle flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundView {
    /// Identifier of the current round, if one was started.
    pub round: Option<RoundId>,
    /// Current lifecycle stage.
    pub phase: RoundPhase,
    /// Whether the player has accelerated this round.
    pub started: bool,
    /// Whether the choose hint was suppressed by the player acting first.
    pub hint_suppressed: bool,
    /// Whether prompts and hints are enabled.
    pub labels: bool,
}

impl RoundView {
    /// Reports whether the round reached its end state.
    #[must_use]
    pub fn ended(&self) -> bool {
        matches!(self.phase, RoundPhase::Ending | RoundPhase::MenuReturn)
    }

    /// Reports whether `round` is the round currently tracked.
    #[must_use]
    pub fn is_current(&self, round: RoundId) -> bool {
        self.round == Some(round)
    }
}

/// Unique identifier assigned to a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoundId(u32);

impl RoundId {
    /// Creates a new round identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(u32);

impl StationId {
    /// Creates a new station identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a traveller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassengerId(u32);

impl PassengerId {
    /// Creates a new traveller identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Stable identifier of an entry in a selectable pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(u32);

impl EntryId {
    /// Creates a new entry identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Computes `score` as a percentage of `ceiling`.
///
/// A zero ceiling yields 0%.
#[must_use]
pub fn percentage(score: i32, ceiling: u32) -> f64 {
    if ceiling == 0 {
        return 0.0;
    }
    100.0 * f64::from(score) / f64::from(ceiling)
}

/// Folds `latest` into a running average over `games` games.
///
/// `games` already counts the latest game. Zero games yields `latest`.
#[must_use]
pub fn fold_average(previous: f64, games: u32, latest: f64) -> f64 {
    if games == 0 {
        return latest;
    }
    let games = f64::from(games);
    (previous * (games - 1.0) + latest) / games
}
