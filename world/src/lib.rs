#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state for Train Match.
//!
//! The [`World`] owns the player [`Profile`] and the round being played. All
//! mutation flows through [`apply`]; read access goes through [`query`].

mod content;
mod pool;
mod profile;
mod registry;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use train_match_core::{
    ActionError, Command, Event, PassengerId, Physics, RoundId, RoundPhase, Station, Vehicle,
    ARRIVAL_REWARD, MISSED_STOP_PENALTY, WRONG_STOP_PENALTY,
};
use train_match_system_level::Level;

pub use pool::{Multi, PoolError, SelectablePool, SelectionPolicy, Single};
pub use profile::{
    resolve_content, ContentLibrary, NumberRange, Profile, ProfileError, ScoreHistory, Settings,
};
pub use registry::SymbolMappings;

/// Average percentage that must be exceeded before a mode advances.
const ADVANCE_THRESHOLD: f64 = 70.0;
/// Games that must be played on a mode before it advances.
const ADVANCE_MIN_GAMES: u32 = 10;

/// Mutable state of the round in progress.
#[derive(Debug)]
struct Round {
    id: RoundId,
    level: Level<ChaCha8Rng>,
    station: Station,
    vehicle: Vehicle,
    /// Signed distance the vehicle's leading edge has travelled past the station.
    travelled: f32,
    score: i32,
    phase: RoundPhase,
    started: bool,
    hint_suppressed: bool,
    intro_visible: bool,
    hint_visible: bool,
    move_hint_visible: bool,
    back_visible: bool,
    score_recorded: bool,
    difficulty_checked: bool,
}

impl Round {
    fn in_motion(&self) -> bool {
        matches!(self.phase, RoundPhase::Playing | RoundPhase::Quit)
    }

    fn ended(&self) -> bool {
        matches!(self.phase, RoundPhase::Ending | RoundPhase::MenuReturn)
    }

    fn is_docked(&self, physics: &Physics) -> bool {
        self.travelled.abs() <= physics.docking_tolerance
    }

    fn adjust_score(&mut self, delta: i32, out_events: &mut Vec<Event>) {
        self.score += delta;
        out_events.push(Event::ScoreChanged { score: self.score });
    }

    fn suppress_hint(&mut self, out_events: &mut Vec<Event>) {
        self.hint_suppressed = true;
        if self.hint_visible {
            self.hint_visible = false;
            out_events.push(Event::ChooseHintHidden);
        }
    }
}

/// Represents the authoritative Train Match state.
#[derive(Debug)]
pub struct World {
    profile: Profile,
    physics: Physics,
    round: Option<Round>,
    next_round: u32,
}

impl World {
    /// Creates a world around `profile` with default vehicle physics.
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        Self::with_physics(profile, Physics::default())
    }

    /// Creates a world around `profile` with explicit vehicle physics.
    #[must_use]
    pub fn with_physics(profile: Profile, physics: Physics) -> Self {
        Self {
            profile,
            physics,
            round: None,
            next_round: 0,
        }
    }

    /// Consumes the world, handing the profile back to its owner.
    #[must_use]
    pub fn into_profile(self) -> Profile {
        self.profile
    }

    fn start_round(
        &mut self,
        seed: u64,
        vehicle_capacity: usize,
        depot_seats: usize,
        out_events: &mut Vec<Event>,
    ) {
        let id = RoundId::new(self.next_round);
        self.next_round = self.next_round.wrapping_add(1);

        let settings = self.profile.settings().clone();
        let mut level = Level::new(
            self.profile.level_config(),
            self.profile.symbols(),
            self.profile.passenger_images(),
            ChaCha8Rng::seed_from_u64(seed),
        );
        let vehicle = Vehicle::new(vehicle_capacity, settings.speed_limit);
        let station = level.spawn_depot(depot_seats, &vehicle);
        let labels = settings.allow_labels;

        info!(
            round = id.get(),
            mode = self.profile.game_mode_name(),
            content = level.remaining(),
            seed,
            "round started"
        );

        self.round = Some(Round {
            id,
            level,
            station,
            vehicle,
            travelled: 0.0,
            score: 0,
            phase: RoundPhase::Playing,
            started: false,
            hint_suppressed: false,
            intro_visible: false,
            hint_visible: false,
            move_hint_visible: labels,
            back_visible: labels,
            score_recorded: false,
            difficulty_checked: false,
        });

        out_events.push(Event::RoundStarted {
            round: id,
            mode: self.profile.game_mode(),
            palette: settings.color_scheme.palette(),
            labels,
            left_hand: settings.left_hand,
            score_visible: settings.allow_score,
            calm_background: settings.calm_background,
        });
    }

    fn advance(&mut self, dt_secs: f32, out_events: &mut Vec<Event>) {
        let physics = &self.physics;
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if !round.in_motion() {
            return;
        }

        if round.phase == RoundPhase::Playing && round.travelled >= physics.departure_distance {
            depart(round, physics, out_events);
        }

        round.travelled += round.vehicle.speed() * dt_secs;
        round.vehicle.decelerate(dt_secs, physics);

        let arriving: Vec<usize> = round
            .station
            .seats()
            .iter()
            .enumerate()
            .filter(|(_, seat)| {
                seat.occupant()
                    .map_or(false, |passenger| round.station.does_match(passenger))
            })
            .map(|(index, _)| index)
            .collect();
        let arrivals: Vec<PassengerId> = arriving
            .into_iter()
            .filter_map(|index| round.station.seats_mut()[index].remove())
            .map(|passenger| passenger.id())
            .collect();
        for passenger in arrivals {
            debug!(passenger = passenger.get(), "passenger arrived");
            out_events.push(Event::PassengerArrived {
                passenger,
                station: round.station.id(),
            });
            round.adjust_score(ARRIVAL_REWARD, out_events);
        }
    }

    fn accelerate(&mut self, dt_secs: f32, out_events: &mut Vec<Event>) {
        let physics = &self.physics;
        let Some(round) = self.round.as_mut().filter(|round| round.in_motion()) else {
            return;
        };
        round.vehicle.accelerate(dt_secs, physics);
        if !round.started {
            round.started = true;
            out_events.push(Event::VehicleStarted);
        }
        if round.intro_visible {
            round.intro_visible = false;
            out_events.push(Event::IntroPromptHidden);
        }
        if round.move_hint_visible {
            round.move_hint_visible = false;
            out_events.push(Event::MoveHintHidden);
        }
    }

    fn disembark(&mut self, seat: usize, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        let round = self.reseat_target()?;
        let passenger = round
            .vehicle
            .seats()
            .get(seat)
            .ok_or(ActionError::UnknownSeat(seat))?
            .occupant()
            .ok_or(ActionError::EmptySeat(seat))?;
        let mismatch = !round.station.does_match(passenger);
        let free = round
            .station
            .free_seat_mut()
            .ok_or(ActionError::NoFreeSeat)?;
        let passenger = round.vehicle.seats_mut()[seat]
            .remove()
            .ok_or(ActionError::EmptySeat(seat))?;
        let id = passenger.id();
        free.place(passenger);

        out_events.push(Event::PassengerMoved {
            passenger: id,
            boarded: false,
        });
        if mismatch {
            out_events.push(Event::PassengerSaddened {
                passenger: id,
                penalty: WRONG_STOP_PENALTY,
            });
            round.adjust_score(-WRONG_STOP_PENALTY, out_events);
        }
        round.suppress_hint(out_events);
        Ok(())
    }

    fn board(&mut self, seat: usize, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        let round = self.reseat_target()?;
        if round
            .station
            .seats()
            .get(seat)
            .ok_or(ActionError::UnknownSeat(seat))?
            .is_empty()
        {
            return Err(ActionError::EmptySeat(seat));
        }
        let free = round
            .vehicle
            .free_seat_mut()
            .ok_or(ActionError::NoFreeSeat)?;
        let passenger = round.station.seats_mut()[seat]
            .remove()
            .ok_or(ActionError::EmptySeat(seat))?;
        let id = passenger.id();
        free.place(passenger);

        out_events.push(Event::PassengerMoved {
            passenger: id,
            boarded: true,
        });
        round.suppress_hint(out_events);
        Ok(())
    }

    /// Round that allows travellers to change seats right now.
    fn reseat_target(&mut self) -> Result<&mut Round, ActionError> {
        let physics = &self.physics;
        let round = self
            .round
            .as_mut()
            .filter(|round| round.in_motion())
            .ok_or(ActionError::RoundNotActive)?;
        if !round.vehicle.is_stationary() {
            return Err(ActionError::VehicleMoving);
        }
        if !round.is_docked(physics) {
            return Err(ActionError::NotDocked);
        }
        Ok(round)
    }

    fn end_round(&mut self, out_events: &mut Vec<Event>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.ended() {
            return;
        }
        round.phase = RoundPhase::Ending;
        info!(round = round.id.get(), score = round.score, "round ended");
        out_events.push(Event::RoundEnded { round: round.id });
    }

    fn record_score(&mut self, out_events: &mut Vec<Event>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if !round.ended() || round.score_recorded {
            return;
        }
        round.score_recorded = true;

        let percentage = train_match_core::percentage(round.score, round.level.max_score_to_earn());
        let history = self.profile.record_round(percentage);
        info!(
            round = round.id.get(),
            score = round.score,
            ceiling = round.level.max_score_to_earn(),
            percentage,
            average = history.average(),
            games = history.games(),
            "round scored"
        );
        out_events.push(Event::RoundScored {
            score: round.score,
            percentage,
            average: history.average(),
            games: history.games(),
        });
    }

    fn reveal_summary(&mut self, out_events: &mut Vec<Event>) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        if round.phase != RoundPhase::Ending {
            return;
        }
        if round.hint_visible {
            round.hint_visible = false;
            out_events.push(Event::ChooseHintHidden);
        }

        let history = self.profile.score_history();
        out_events.push(Event::SummaryShown {
            score: round.score,
            average: history.average(),
        });

        // Adaptation reads the folded history, so it waits for the fold.
        if round.difficulty_checked || !round.score_recorded {
            return;
        }
        round.difficulty_checked = true;

        let qualifies = history.average() > ADVANCE_THRESHOLD
            && history.games() >= ADVANCE_MIN_GAMES
            && self.profile.can_math_difficulty_be_increased();
        if !qualifies {
            return;
        }

        let from = self.profile.game_mode();
        if self.profile.increase_math_difficulty() {
            self.profile.reset_score();
            out_events.push(Event::DifficultyIncreased {
                from,
                to: self.profile.game_mode(),
            });
        }
    }
}

/// Leaves the current station: penalises riders who missed it and replaces
/// it with the next one, or enters the quit phase when content ran out.
fn depart(round: &mut Round, physics: &Physics, out_events: &mut Vec<Event>) {
    let missed: Vec<PassengerId> = round
        .vehicle
        .seats()
        .iter()
        .filter_map(|seat| seat.occupant())
        .filter(|passenger| round.station.does_match(passenger))
        .map(|passenger| passenger.id())
        .collect();
    for passenger in missed {
        out_events.push(Event::PassengerSaddened {
            passenger,
            penalty: MISSED_STOP_PENALTY,
        });
        round.adjust_score(-MISSED_STOP_PENALTY, out_events);
    }

    match round.level.spawn_next_station(&round.vehicle) {
        Some(station) => {
            let travellers = station
                .seats()
                .iter()
                .filter(|seat| !seat.is_empty())
                .count();
            let symbol = station.symbol().cloned();
            let id = station.id();
            round.station = station;
            round.travelled = -physics.station_spacing;
            if let Some(symbol) = symbol {
                out_events.push(Event::StationSpawned {
                    station: id,
                    symbol,
                    travellers,
                });
            }
        }
        None => {
            round.phase = RoundPhase::Quit;
            info!(round = round.id.get(), "content exhausted");
            out_events.push(Event::ContentExhausted);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartRound {
            seed,
            vehicle_capacity,
            depot_seats,
        } => world.start_round(seed, vehicle_capacity, depot_seats, out_events),
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt.as_secs_f32(), out_events);
        }
        Command::Accelerate { dt } => world.accelerate(dt.as_secs_f32(), out_events),
        Command::Brake { dt } => {
            let physics = &world.physics;
            if let Some(round) = world.round.as_mut().filter(|round| round.in_motion()) {
                round.vehicle.brake(dt.as_secs_f32(), physics);
            }
        }
        Command::ReleaseControls => {
            if let Some(round) = world.round.as_mut().filter(|round| round.in_motion()) {
                round.vehicle.stop();
            }
        }
        Command::Disembark { seat } => {
            if let Err(reason) = world.disembark(seat, out_events) {
                debug!(%reason, seat, "disembark rejected");
                out_events.push(Event::ActionRejected { reason });
            }
        }
        Command::Board { seat } => {
            if let Err(reason) = world.board(seat, out_events) {
                debug!(%reason, seat, "boarding rejected");
                out_events.push(Event::ActionRejected { reason });
            }
        }
        Command::ShowIntroPrompt => {
            if let Some(round) = world.round.as_mut() {
                let labels = world.profile.settings().allow_labels;
                if labels && !round.started && !round.ended() && !round.intro_visible {
                    round.intro_visible = true;
                    out_events.push(Event::IntroPromptShown);
                }
            }
        }
        Command::ShowChooseHint => {
            if let Some(round) = world.round.as_mut() {
                let labels = world.profile.settings().allow_labels;
                if labels && !round.hint_suppressed && !round.ended() && !round.hint_visible {
                    round.hint_visible = true;
                    out_events.push(Event::ChooseHintShown);
                }
            }
        }
        Command::HideBackAffordance => {
            if let Some(round) = world.round.as_mut().filter(|round| round.back_visible) {
                round.back_visible = false;
                out_events.push(Event::BackAffordanceHidden);
            }
        }
        Command::HideMoveHint => {
            if let Some(round) = world.round.as_mut().filter(|round| round.move_hint_visible) {
                round.move_hint_visible = false;
                out_events.push(Event::MoveHintHidden);
            }
        }
        Command::EndRound => world.end_round(out_events),
        Command::RecordRoundScore => world.record_score(out_events),
        Command::RevealSummary => world.reveal_summary(out_events),
        Command::ReturnToMenu => {
            if let Some(round) = world
                .round
                .as_mut()
                .filter(|round| round.phase == RoundPhase::Ending)
            {
                round.phase = RoundPhase::MenuReturn;
                info!(round = round.id.get(), "returned to menu");
                out_events.push(Event::ReturnedToMenu { round: round.id });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use train_match_core::{RoundPhase, RoundView, Station, Vehicle};

    use super::{Profile, World};

    /// Snapshot of the lifecycle flags the round's deferred tasks re-check.
    #[must_use]
    pub fn round_view(world: &World) -> RoundView {
        let labels = world.profile.settings().allow_labels;
        match &world.round {
            Some(round) => RoundView {
                round: Some(round.id),
                phase: round.phase,
                started: round.started,
                hint_suppressed: round.hint_suppressed,
                labels,
            },
            None => RoundView {
                labels,
                ..RoundView::default()
            },
        }
    }

    /// Player profile owned by the world.
    #[must_use]
    pub fn profile(world: &World) -> &Profile {
        &world.profile
    }

    /// Lifecycle stage of the current round.
    #[must_use]
    pub fn phase(world: &World) -> RoundPhase {
        world
            .round
            .as_ref()
            .map_or(RoundPhase::Intro, |round| round.phase)
    }

    /// Running score of the current round.
    #[must_use]
    pub fn score(world: &World) -> Option<i32> {
        world.round.as_ref().map(|round| round.score)
    }

    /// Score ceiling accumulated by the current round.
    #[must_use]
    pub fn max_score_to_earn(world: &World) -> Option<u32> {
        world
            .round
            .as_ref()
            .map(|round| round.level.max_score_to_earn())
    }

    /// Station the vehicle is approaching or standing at.
    #[must_use]
    pub fn station(world: &World) -> Option<&Station> {
        world.round.as_ref().map(|round| &round.station)
    }

    /// Vehicle of the current round.
    #[must_use]
    pub fn vehicle(world: &World) -> Option<&Vehicle> {
        world.round.as_ref().map(|round| &round.vehicle)
    }

    /// Signed distance the vehicle has travelled past the current station.
    #[must_use]
    pub fn station_offset(world: &World) -> Option<f32> {
        world.round.as_ref().map(|round| round.travelled)
    }

    /// Reports whether the vehicle lines up with the current station.
    #[must_use]
    pub fn is_docked(world: &World) -> bool {
        world
            .round
            .as_ref()
            .map_or(false, |round| round.is_docked(&world.physics))
    }
}
