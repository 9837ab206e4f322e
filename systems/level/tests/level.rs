use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use train_match_core::{
    ImageHandle, Passenger, PassengerId, Station, Symbol, SymbolMapping, Vehicle,
};
use train_match_system_level::{Level, LevelConfig};

fn numbers(range: std::ops::RangeInclusive<i32>) -> Vec<SymbolMapping> {
    range
        .map(|value| SymbolMapping::identity(Symbol::number(value)))
        .collect()
}

fn pictures() -> Vec<ImageHandle> {
    ["Images/Bee2", "Images/Monkey2", "Images/cat"]
        .into_iter()
        .map(ImageHandle::new)
        .collect()
}

fn level(config: LevelConfig, symbols: Vec<SymbolMapping>, seed: u64) -> Level<ChaCha8Rng> {
    Level::new(config, symbols, pictures(), ChaCha8Rng::seed_from_u64(seed))
}

fn seated(station: &Station) -> usize {
    station
        .seats()
        .iter()
        .filter(|seat| !seat.is_empty())
        .count()
}

#[test]
fn endless_queue_cycles_with_period_equal_to_its_length() {
    let content = numbers(1..=4);
    let period = content.len();
    let mut level = level(LevelConfig::new(false, true), content, 3);

    let drawn: Vec<SymbolMapping> = (0..period * 3)
        .map(|_| {
            level
                .next_station_symbol_mapping()
                .expect("endless queue never runs dry")
        })
        .collect();

    for index in 0..period * 2 {
        assert_eq!(drawn[index], drawn[index + period], "cycle broke at {index}");
    }
    assert_eq!(level.remaining(), period);
}

#[test]
fn finite_queue_serves_each_mapping_once() {
    let content = numbers(1..=3);
    let mut level = level(LevelConfig::new(true, true), content.clone(), 5);

    for expected in &content {
        let mapping = level
            .next_station_symbol_mapping()
            .expect("mapping available");
        assert_eq!(&mapping, expected);
    }
    assert!(level.next_station_symbol_mapping().is_none());
    assert!(level.next_station_symbol_mapping().is_none());
}

#[test]
fn score_ceiling_counts_two_points_per_placed_traveller() {
    for seed in 0..20 {
        let config = LevelConfig::new(true, seed % 2 == 0).with_station_seats(4..9);
        let mut level = level(config, numbers(1..=6), seed);
        let vehicle = Vehicle::new(4, 25.0);

        let depot = level.spawn_depot(6, &vehicle);
        let mut placed = seated(&depot);
        while let Some(station) = level.spawn_next_station(&vehicle) {
            placed += seated(&station);
        }

        assert_eq!(
            level.max_score_to_earn() as usize,
            2 * placed,
            "ceiling mismatch for seed {seed}"
        );
    }
}

#[test]
fn capacity_limit_bounds_fills_per_station() {
    for seed in 0..50 {
        let config = LevelConfig::new(false, true).with_station_seats(12..13);
        let mut level = level(config, numbers(1..=5), seed);
        let vehicle = Vehicle::new(2, 25.0);

        let depot = level.spawn_depot(12, &vehicle);
        assert!(seated(&depot) <= 2, "depot overfilled for seed {seed}");

        for _ in 0..10 {
            let station = level.spawn_next_station(&vehicle).expect("endless");
            assert!(seated(&station) <= 2, "station overfilled for seed {seed}");
        }
    }
}

#[test]
fn countdown_runs_out_on_the_leading_seats() {
    const CAPACITY: usize = 2;
    let mut filled_leading = 0;

    for seed in 0..200 {
        let config = LevelConfig::new(false, true).with_station_seats(12..13);
        let mut level = level(config, numbers(1..=5), seed);
        let vehicle = Vehicle::new(CAPACITY, 25.0);

        let mut stations = vec![level.spawn_depot(12, &vehicle)];
        for _ in 0..5 {
            stations.push(level.spawn_next_station(&vehicle).expect("endless"));
        }

        for station in &stations {
            let (leading, trailing) = station.seats().split_at(CAPACITY);
            assert!(
                trailing.iter().all(|seat| seat.is_empty()),
                "seat past the countdown filled for seed {seed}"
            );
            filled_leading += leading.iter().filter(|seat| !seat.is_empty()).count();
        }
    }
    assert!(filled_leading > 0, "no leading seat was ever filled");
}

#[test]
fn countdown_only_counts_seats_that_could_vacate() {
    let content = numbers(1..=3);
    let front = content[0].clone();

    for seed in 0..50 {
        let config = LevelConfig::new(true, true).with_station_seats(20..21);
        let mut level = level(config, content.clone(), seed);
        let mut vehicle = Vehicle::new(3, 25.0);
        vehicle.seats_mut()[0].place(Passenger::new(
            PassengerId::new(900),
            front.canonical().clone(),
            ImageHandle::new("Images/cat"),
        ));
        vehicle.seats_mut()[1].place(Passenger::new(
            PassengerId::new(901),
            Symbol::text("elsewhere"),
            ImageHandle::new("Images/cat"),
        ));

        let station = level.spawn_next_station(&vehicle).expect("station");
        assert_eq!(station.mapping(), Some(&front));
        assert!(seated(&station) <= 2, "countdown exceeded for seed {seed}");
    }
}

#[test]
fn destinations_come_from_content_still_ahead() {
    let content = vec![
        SymbolMapping::from_text("12", &["2*6", "3*4"]).expect("mapping"),
        SymbolMapping::from_text("5", &["2+3", "8-3"]).expect("mapping"),
        SymbolMapping::from_text("15", &["20-5", "3*5"]).expect("mapping"),
    ];
    let mut level = level(
        LevelConfig::new(false, false).with_station_seats(30..31),
        content.clone(),
        17,
    );
    let vehicle = Vehicle::new(4, 25.0);

    for _ in 0..6 {
        let station = level.spawn_next_station(&vehicle).expect("endless");
        for passenger in station.seats().iter().filter_map(|seat| seat.occupant()) {
            assert!(
                content
                    .iter()
                    .any(|mapping| mapping.equivalents().contains(passenger.destination())),
                "destination {} is not an equivalent form",
                passenger.destination()
            );
        }
    }
}

#[test]
fn destination_draw_favours_the_front_of_the_queue() {
    let mut level = level(LevelConfig::new(false, true), numbers(1..=5), 23);
    let mut counts = [0usize; 5];

    for _ in 0..5_000 {
        let destination = level.random_possible_destination().expect("content");
        let value: usize = destination
            .as_text()
            .and_then(|text| text.parse().ok())
            .expect("numeric destination");
        counts[value - 1] += 1;
    }

    assert!(
        counts[0] > counts[4] * 3,
        "front not favoured: {counts:?}"
    );
}

#[test]
fn missing_pictures_or_content_yield_no_travellers() {
    let mut no_pictures = Level::new(
        LevelConfig::new(true, true),
        numbers(1..=3),
        Vec::new(),
        ChaCha8Rng::seed_from_u64(1),
    );
    assert!(no_pictures.random_passenger_image().is_none());
    assert!(no_pictures.next_passenger().is_none());
    let vehicle = Vehicle::new(4, 25.0);
    let station = no_pictures.spawn_next_station(&vehicle).expect("station");
    assert_eq!(seated(&station), 0);
    assert_eq!(no_pictures.max_score_to_earn(), 0);

    let mut no_content = level(LevelConfig::new(true, true), Vec::new(), 1);
    assert!(no_content.random_possible_destination().is_none());
    assert!(no_content.next_passenger().is_none());
    assert!(no_content.spawn_next_station(&vehicle).is_none());
}

#[test]
fn identical_seeds_generate_identical_rounds() {
    let run = |seed| {
        let config = LevelConfig::new(true, false).with_station_seats(5..10);
        let mut level = level(config, numbers(1..=8), seed);
        let vehicle = Vehicle::new(4, 25.0);
        let mut stations = vec![level.spawn_depot(6, &vehicle)];
        while let Some(station) = level.spawn_next_station(&vehicle) {
            stations.push(station);
        }
        stations
    };

    assert_eq!(run(0xfeed), run(0xfeed), "replay diverged between runs");
}
