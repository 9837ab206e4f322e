//! Headless driver that plays whole rounds without a player.
//!
//! The driver owns the world and the lifecycle controller, wires the events
//! of every applied command back through the controller, and steers the
//! vehicle with a simple policy: stop at each station, let off every rider
//! whose destination it is, pick up whoever still waits on the platform and
//! move on.

use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{debug, info};
use train_match_core::{
    Command, Event, GameMode, RoundPhase, Station, StationId, Tuning, Vehicle,
};
use train_match_system_lifecycle::Lifecycle;
use train_match_world::{self as world, query, Profile, World};

/// Upper bound on simulated steps for a single round.
const MAX_STEPS: u32 = 200_000;

/// Per-round parameters handed to the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RoundOptions {
    pub(crate) seed: u64,
    pub(crate) vehicle_capacity: usize,
    pub(crate) depot_seats: usize,
    pub(crate) step: Duration,
}

/// Outcome of one automatically played round.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct RoundReport {
    pub(crate) mode: GameMode,
    pub(crate) seed: u64,
    pub(crate) stations: usize,
    pub(crate) arrivals: usize,
    pub(crate) penalties: usize,
    pub(crate) score: i32,
    pub(crate) percentage: f64,
    pub(crate) average: f64,
    pub(crate) games: u32,
    pub(crate) advanced_to: Option<GameMode>,
    pub(crate) simulated: Duration,
}

#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    lifecycle: Lifecycle,
}

impl Session {
    pub(crate) fn new(profile: Profile, tuning: &Tuning) -> Self {
        Self {
            world: World::with_physics(profile, tuning.physics.clone()),
            lifecycle: Lifecycle::new(tuning.timings.clone()),
        }
    }

    pub(crate) fn into_profile(self) -> Profile {
        self.world.into_profile()
    }

    /// Applies `command` and keeps feeding the lifecycle until it goes quiet.
    fn submit(&mut self, command: Command, log: &mut Vec<Event>) {
        let mut commands = vec![command];
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let view = query::round_view(&self.world);
            self.lifecycle.handle(&events, view, &mut commands);
            log.extend(events);
        }
    }

    /// Plays a round from start until control returns to the menu.
    pub(crate) fn play_round(&mut self, options: RoundOptions) -> Result<RoundReport> {
        let mode = query::profile(&self.world).game_mode();
        let mut log = Vec::new();
        self.submit(
            Command::StartRound {
                seed: options.seed,
                vehicle_capacity: options.vehicle_capacity,
                depot_seats: options.depot_seats,
            },
            &mut log,
        );

        let mut serviced: Option<StationId> = None;
        let mut steps = 0;
        while query::phase(&self.world) != RoundPhase::MenuReturn {
            if steps == MAX_STEPS {
                bail!("round did not finish within {MAX_STEPS} steps");
            }
            steps += 1;

            for command in self.steer(options.step, &mut serviced) {
                self.submit(command, &mut log);
            }
            self.submit(Command::Tick { dt: options.step }, &mut log);
        }

        let report = summarise(mode, options, &log, options.step * steps)?;
        info!(
            mode = report.mode.display_name(),
            score = report.score,
            percentage = report.percentage,
            "autopilot round finished"
        );
        Ok(report)
    }

    /// Chooses this step's player commands.
    fn steer(&self, step: Duration, serviced: &mut Option<StationId>) -> Vec<Command> {
        let phase = query::phase(&self.world);
        if !matches!(phase, RoundPhase::Playing | RoundPhase::Quit) {
            return Vec::new();
        }
        let (Some(station), Some(vehicle)) =
            (query::station(&self.world), query::vehicle(&self.world))
        else {
            return Vec::new();
        };

        let pending = *serviced != Some(station.id());
        if pending && query::is_docked(&self.world) {
            if !vehicle.is_stationary() {
                return vec![Command::ReleaseControls];
            }
            // Riders leave first; arrivals free platform seats on the next tick.
            let leaving = disembark_riders(station, vehicle);
            if !leaving.is_empty() {
                return leaving;
            }
            *serviced = Some(station.id());
            debug!(station = station.id().get(), "station serviced");
            return board_waiting(station, vehicle);
        }

        if phase == RoundPhase::Playing {
            vec![Command::Accelerate { dt: step }]
        } else {
            Vec::new()
        }
    }
}

/// Lets off riders bound for `station`, as many as the platform has room for.
fn disembark_riders(station: &Station, vehicle: &Vehicle) -> Vec<Command> {
    let room = station.seats().iter().filter(|seat| seat.is_empty()).count();
    vehicle
        .seats()
        .iter()
        .enumerate()
        .filter(|(_, seat)| {
            seat.occupant()
                .map_or(false, |passenger| station.does_match(passenger))
        })
        .take(room)
        .map(|(seat, _)| Command::Disembark { seat })
        .collect()
}

/// Boards platform travellers headed elsewhere while vehicle seats remain.
fn board_waiting(station: &Station, vehicle: &Vehicle) -> Vec<Command> {
    let room = vehicle.seats().iter().filter(|seat| seat.is_empty()).count();
    station
        .seats()
        .iter()
        .enumerate()
        .filter(|(_, seat)| {
            seat.occupant()
                .map_or(false, |passenger| !station.does_match(passenger))
        })
        .take(room)
        .map(|(seat, _)| Command::Board { seat })
        .collect()
}

fn summarise(
    mode: GameMode,
    options: RoundOptions,
    log: &[Event],
    simulated: Duration,
) -> Result<RoundReport> {
    let Some((score, percentage, average, games)) = log.iter().find_map(|event| match event {
        Event::RoundScored {
            score,
            percentage,
            average,
            games,
        } => Some((*score, *percentage, *average, *games)),
        _ => None,
    }) else {
        bail!("round ended without being scored");
    };

    Ok(RoundReport {
        mode,
        seed: options.seed,
        stations: log
            .iter()
            .filter(|event| matches!(event, Event::StationSpawned { .. }))
            .count(),
        arrivals: log
            .iter()
            .filter(|event| matches!(event, Event::PassengerArrived { .. }))
            .count(),
        penalties: log
            .iter()
            .filter(|event| matches!(event, Event::PassengerSaddened { .. }))
            .count(),
        score,
        percentage,
        average,
        games,
        advanced_to: log.iter().find_map(|event| match event {
            Event::DifficultyIncreased { to, .. } => Some(*to),
            _ => None,
        }),
        simulated,
    })
}
