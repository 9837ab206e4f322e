use crate::{ImageHandle, PassengerId, Physics, StationId, Symbol, SymbolMapping};

/// Traveller seeking a station whose mapping accepts its destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passenger {
    id: PassengerId,
    destination: Symbol,
    image: ImageHandle,
}

impl Passenger {
    /// Creates a traveller heading for `destination`, drawn with `image`.
    #[must_use]
    pub fn new(id: PassengerId, destination: Symbol, image: ImageHandle) -> Self {
        Self {
            id,
            destination,
            image,
        }
    }

    /// Identifier assigned when the traveller was spawned.
    #[must_use]
    pub const fn id(&self) -> PassengerId {
        self.id
    }

    /// Symbol the traveller wants to reach.
    #[must_use]
    pub fn destination(&self) -> &Symbol {
        &self.destination
    }

    /// Picture representing the traveller.
    #[must_use]
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }
}

/// Slot holding at most one traveller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seat {
    occupant: Option<Passenger>,
}

impl Seat {
    /// Reports whether nobody sits here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    /// Traveller currently seated, if any.
    #[must_use]
    pub fn occupant(&self) -> Option<&Passenger> {
        self.occupant.as_ref()
    }

    /// Seats the traveller. The seat must be empty.
    pub fn place(&mut self, passenger: Passenger) {
        debug_assert!(self.is_empty(), "place requires an empty seat");
        self.occupant = Some(passenger);
    }

    /// Takes the seated traveller out, leaving the seat empty.
    pub fn remove(&mut self) -> Option<Passenger> {
        self.occupant.take()
    }
}

fn first_free(seats: &mut [Seat]) -> Option<&mut Seat> {
    seats.iter_mut().find(|seat| seat.is_empty())
}

/// Waypoint carrying one symbol mapping and its own seats.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    id: StationId,
    mapping: Option<SymbolMapping>,
    seats: Vec<Seat>,
}

impl Station {
    /// Creates a station for `mapping` with `seat_count` empty seats.
    #[must_use]
    pub fn spawn(id: StationId, mapping: SymbolMapping, seat_count: usize) -> Self {
        Self {
            id,
            mapping: Some(mapping),
            seats: vec![Seat::default(); seat_count],
        }
    }

    /// Creates the departure station a round starts from. It accepts nobody.
    #[must_use]
    pub fn depot(id: StationId, seat_count: usize) -> Self {
        Self {
            id,
            mapping: None,
            seats: vec![Seat::default(); seat_count],
        }
    }

    /// Identifier assigned at spawn time.
    #[must_use]
    pub const fn id(&self) -> StationId {
        self.id
    }

    /// Mapping displayed on the station, `None` for the depot.
    #[must_use]
    pub fn mapping(&self) -> Option<&SymbolMapping> {
        self.mapping.as_ref()
    }

    /// Canonical symbol displayed on the station.
    #[must_use]
    pub fn symbol(&self) -> Option<&Symbol> {
        self.mapping.as_ref().map(SymbolMapping::canonical)
    }

    /// Reports whether the traveller's destination is accepted here.
    #[must_use]
    pub fn does_match(&self, passenger: &Passenger) -> bool {
        self.mapping
            .as_ref()
            .map_or(false, |mapping| mapping.accepts(passenger.destination()))
    }

    /// Seats in platform order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Mutable access to the seats in platform order.
    pub fn seats_mut(&mut self) -> &mut [Seat] {
        &mut self.seats
    }

    /// First empty seat on the platform.
    pub fn free_seat_mut(&mut self) -> Option<&mut Seat> {
        first_free(&mut self.seats)
    }
}

/// Vehicle carrying travellers between stations.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    seats: Vec<Seat>,
    speed: f32,
    speed_limit: f32,
}

impl Vehicle {
    /// Creates a stationary vehicle with `capacity` empty seats.
    #[must_use]
    pub fn new(capacity: usize, speed_limit: f32) -> Self {
        Self {
            seats: vec![Seat::default(); capacity],
            speed: 0.0,
            speed_limit: speed_limit.max(0.0),
        }
    }

    /// Total number of seats.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.seats.len()
    }

    /// Seats in carriage order.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Mutable access to the seats in carriage order.
    pub fn seats_mut(&mut self) -> &mut [Seat] {
        &mut self.seats
    }

    /// First empty seat in the carriage.
    pub fn free_seat_mut(&mut self) -> Option<&mut Seat> {
        first_free(&mut self.seats)
    }

    /// Current speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Highest speed the vehicle may reach.
    #[must_use]
    pub const fn speed_limit(&self) -> f32 {
        self.speed_limit
    }

    /// Reports whether the vehicle is standing still.
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.speed == 0.0
    }

    /// Sets the speed, clamped into `0.0..=speed_limit`.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(0.0, self.speed_limit);
    }

    /// Applies held acceleration for `dt_secs`.
    pub fn accelerate(&mut self, dt_secs: f32, physics: &Physics) {
        self.set_speed(self.speed + dt_secs * physics.acceleration);
    }

    /// Applies held braking for `dt_secs`.
    pub fn brake(&mut self, dt_secs: f32, physics: &Physics) {
        self.set_speed(self.speed - dt_secs * physics.brake);
    }

    /// Applies passive deceleration for `dt_secs`.
    pub fn decelerate(&mut self, dt_secs: f32, physics: &Physics) {
        if physics.deceleration_divisor <= 0.0 {
            return;
        }
        self.set_speed(self.speed - dt_secs * self.speed_limit / physics.deceleration_divisor);
    }

    /// Halts the vehicle immediately.
    pub fn stop(&mut self) {
        self.speed = 0.0;
    }
}
