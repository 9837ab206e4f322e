#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-round content generation for Train Match.
//!
//! A [`Level`] owns a private copy of the round's symbol mappings and hands
//! them out one station at a time. Finite rounds consume the queue; endless
//! rounds rotate it. Every spawned station has its platform seeded with
//! travellers whose destinations are drawn from the content still ahead, and
//! each placed traveller raises the round's score ceiling.

use std::{collections::VecDeque, ops::Range};

use rand::Rng;
use tracing::debug;
use train_match_core::{
    ImageHandle, Passenger, PassengerId, Station, StationId, Symbol, SymbolMapping, Vehicle,
    CEILING_PER_TRAVELLER,
};

const LIMITED_SPAWN_CHANCE: f64 = 0.9;
const OPEN_SPAWN_CHANCE: f64 = 0.4;
const DEFAULT_STATION_SEATS: Range<usize> = 40..80;

/// Round options that shape station generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    does_end: bool,
    limit_passengers: bool,
    station_seats: Range<usize>,
}

impl LevelConfig {
    /// Creates a configuration with the default platform size range.
    #[must_use]
    pub fn new(does_end: bool, limit_passengers: bool) -> Self {
        Self {
            does_end,
            limit_passengers,
            station_seats: DEFAULT_STATION_SEATS,
        }
    }

    /// Overrides the range platform seat counts are drawn from.
    #[must_use]
    pub fn with_station_seats(mut self, station_seats: Range<usize>) -> Self {
        self.station_seats = station_seats;
        self
    }

    /// Range platform seat counts are drawn from.
    #[must_use]
    pub fn station_seats(&self) -> Range<usize> {
        self.station_seats.clone()
    }

    fn spawn_chance(&self) -> f64 {
        if self.limit_passengers {
            LIMITED_SPAWN_CHANCE
        } else {
            OPEN_SPAWN_CHANCE
        }
    }
}

/// Orchestrates one playthrough's content queue and traveller spawning.
#[derive(Debug)]
pub struct Level<R> {
    symbols: VecDeque<SymbolMapping>,
    passengers: Vec<ImageHandle>,
    config: LevelConfig,
    rng: R,
    max_points_to_earn: u32,
    next_station: u32,
    next_passenger: u32,
}

impl<R: Rng> Level<R> {
    /// Creates a level over the round's resolved content and traveller pictures.
    #[must_use]
    pub fn new(
        config: LevelConfig,
        symbols: Vec<SymbolMapping>,
        passengers: Vec<ImageHandle>,
        rng: R,
    ) -> Self {
        Self {
            symbols: symbols.into(),
            passengers,
            config,
            rng,
            max_points_to_earn: 0,
            next_station: 0,
            next_passenger: 0,
        }
    }

    /// Number of mappings still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.symbols.len()
    }

    /// Builds the departure platform and seeds it with travellers.
    ///
    /// Spawning is bounded by the vehicle's total capacity.
    pub fn spawn_depot(&mut self, seat_count: usize, vehicle: &Vehicle) -> Station {
        let mut depot = Station::depot(self.allocate_station(), seat_count);
        let placed = self.populate(&mut depot, vehicle.capacity());
        debug!(station = depot.id().get(), placed, "depot populated");
        depot
    }

    /// Pops the mapping for the next station.
    ///
    /// Endless rounds re-append the mapping, so the queue cycles. Finite
    /// rounds return `None` once every mapping was handed out.
    pub fn next_station_symbol_mapping(&mut self) -> Option<SymbolMapping> {
        let mapping = self.symbols.pop_front()?;
        if !self.config.does_end {
            self.symbols.push_back(mapping.clone());
        }
        Some(mapping)
    }

    /// Draws a destination from the mappings still queued.
    ///
    /// The index is the smaller of two uniform draws, which favours content
    /// the vehicle will reach soon. The destination is an equivalent form
    /// rather than the canonical label.
    pub fn random_possible_destination(&mut self) -> Option<Symbol> {
        let len = self.symbols.len();
        if len == 0 {
            return None;
        }

        let first = self.rng.gen_range(0..len);
        let second = self.rng.gen_range(0..len);
        let mapping = &self.symbols[first.min(second)];
        Some(mapping.draw_equivalent(&mut self.rng).clone())
    }

    /// Draws a traveller picture uniformly from the candidates.
    pub fn random_passenger_image(&mut self) -> Option<ImageHandle> {
        if self.passengers.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..self.passengers.len());
        Some(self.passengers[index].clone())
    }

    /// Creates the next traveller, or `None` when pictures or content ran out.
    pub fn next_passenger(&mut self) -> Option<Passenger> {
        let image = self.random_passenger_image()?;
        let destination = self.random_possible_destination()?;
        let id = PassengerId::new(self.next_passenger);
        self.next_passenger = self.next_passenger.wrapping_add(1);
        Some(Passenger::new(id, destination, image))
    }

    /// Spawns the station for the next queued mapping.
    ///
    /// With capacity limiting, spawning is bounded by the vehicle seats that
    /// are empty or hold a traveller getting off here. Returns `None` when the
    /// round has no stations left.
    pub fn spawn_next_station(&mut self, vehicle: &Vehicle) -> Option<Station> {
        let mapping = self.next_station_symbol_mapping()?;
        let seat_count = self.draw_seat_count();
        let mut station = Station::spawn(self.allocate_station(), mapping, seat_count);

        let to_spawn = vehicle
            .seats()
            .iter()
            .filter(|seat| {
                seat.occupant()
                    .map_or(true, |passenger| station.does_match(passenger))
            })
            .count();

        let placed = self.populate(&mut station, to_spawn);
        debug!(
            station = station.id().get(),
            seats = seat_count,
            to_spawn,
            placed,
            "station spawned"
        );
        Some(station)
    }

    /// Score ceiling: two points for every traveller placed this round.
    #[must_use]
    pub const fn max_score_to_earn(&self) -> u32 {
        self.max_points_to_earn
    }

    fn populate(&mut self, station: &mut Station, mut to_spawn: usize) -> usize {
        let limit = self.config.limit_passengers;
        let chance = self.config.spawn_chance();
        let mut placed = 0;

        for seat in station.seats_mut() {
            let roll: f64 = self.rng.gen();
            if limit {
                if to_spawn == 0 {
                    break;
                }
                to_spawn -= 1;
            }

            if roll >= chance || !seat.is_empty() {
                continue;
            }

            if let Some(passenger) = self.next_passenger() {
                seat.place(passenger);
                self.max_points_to_earn += CEILING_PER_TRAVELLER;
                placed += 1;
            }
        }

        placed
    }

    fn draw_seat_count(&mut self) -> usize {
        let range = self.config.station_seats();
        if range.is_empty() {
            range.start
        } else {
            self.rng.gen_range(range)
        }
    }

    fn allocate_station(&mut self) -> StationId {
        let id = StationId::new(self.next_station);
        self.next_station = self.next_station.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn open_spawning_uses_lower_chance() {
        let open = LevelConfig::new(true, false).spawn_chance();
        let limited = LevelConfig::new(true, true).spawn_chance();
        assert!(open < limited, "open spawning should be rarer");
    }

    #[test]
    fn empty_seat_range_uses_its_start() {
        let config = LevelConfig::new(true, true).with_station_seats(3..3);
        let mut level = Level::new(config, Vec::new(), Vec::new(), ChaCha8Rng::seed_from_u64(1));
        assert_eq!(level.draw_seat_count(), 3);
    }

    #[test]
    fn station_ids_are_sequential() {
        let mut level = Level::new(
            LevelConfig::new(true, true),
            Vec::new(),
            Vec::new(),
            ChaCha8Rng::seed_from_u64(1),
        );
        assert_eq!(level.allocate_station(), StationId::new(0));
        assert_eq!(level.allocate_station(), StationId::new(1));
    }
}
