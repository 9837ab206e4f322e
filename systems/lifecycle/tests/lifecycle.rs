use std::time::Duration;

use train_match_core::{Command, Event, GameMode, Physics, RoundPhase, Timings};
use train_match_system_lifecycle::Lifecycle;
use train_match_world::{self as world, query, Profile, World};

const STEP: Duration = Duration::from_millis(100);

struct Session {
    world: World,
    lifecycle: Lifecycle,
    log: Vec<Event>,
}

impl Session {
    fn new(profile: Profile) -> Self {
        Self::with_physics(profile, Physics::default())
    }

    fn with_physics(profile: Profile, physics: Physics) -> Self {
        Self {
            world: World::with_physics(profile, physics),
            lifecycle: Lifecycle::new(Timings::default()),
            log: Vec::new(),
        }
    }

    /// Applies `command` and feeds the resulting events through the
    /// lifecycle until it stops issuing commands.
    fn submit(&mut self, command: Command) {
        let mut commands = vec![command];
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let view = query::round_view(&self.world);
            self.lifecycle.handle(&events, view, &mut commands);
            self.log.extend(events);
        }
    }

    fn start(&mut self, seed: u64) {
        self.submit(Command::StartRound {
            seed,
            vehicle_capacity: 4,
            depot_seats: 20,
        });
    }

    fn wait(&mut self, total: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            self.submit(Command::Tick { dt: STEP });
            elapsed += STEP;
        }
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().filter(|event| predicate(event)).count()
    }

    fn position(&self, predicate: impl Fn(&Event) -> bool) -> Option<usize> {
        self.log.iter().position(|event| predicate(event))
    }
}

fn single_number_profile() -> Profile {
    let mut profile = Profile::default();
    profile.set_number_range(1, 1).expect("valid range");
    profile.select_game_mode(GameMode::NumberRange);
    profile
}

#[test]
fn intro_prompt_appears_when_the_player_waits() {
    let mut session = Session::new(Profile::default());
    session.start(1);
    session.wait(Duration::from_millis(3_900));
    assert_eq!(session.count(|event| *event == Event::IntroPromptShown), 0);

    session.wait(STEP);
    assert_eq!(session.count(|event| *event == Event::IntroPromptShown), 1);
    assert_eq!(session.count(|event| *event == Event::BackAffordanceHidden), 1);
}

#[test]
fn intro_prompt_stays_hidden_once_the_player_started() {
    let mut session = Session::new(Profile::default());
    session.start(1);
    session.wait(Duration::from_secs(1));
    session.submit(Command::Accelerate { dt: STEP });
    session.submit(Command::ReleaseControls);
    session.wait(Duration::from_secs(5));

    assert_eq!(session.count(|event| *event == Event::VehicleStarted), 1);
    assert_eq!(session.count(|event| *event == Event::IntroPromptShown), 0);
}

#[test]
fn choose_hint_is_suppressed_by_moving_a_traveller() {
    let mut session = Session::new(Profile::default());
    session.start(2);
    let seat = query::station(&session.world)
        .expect("depot")
        .seats()
        .iter()
        .position(|seat| !seat.is_empty())
        .expect("depot traveller");
    session.submit(Command::Board { seat });
    session.wait(Duration::from_secs(7));

    assert_eq!(session.count(|event| *event == Event::ChooseHintShown), 0);
    assert!(query::round_view(&session.world).hint_suppressed);
}

#[test]
fn choose_hint_appears_for_an_idle_player() {
    let mut session = Session::new(Profile::default());
    session.start(2);
    session.wait(Duration::from_secs(6));
    assert_eq!(session.count(|event| *event == Event::ChooseHintShown), 1);
}

#[test]
fn running_out_of_content_drives_the_end_sequence_exactly_once() {
    let mut session = Session::new(single_number_profile());
    session.start(3);

    for _ in 0..2_000 {
        if query::phase(&session.world) == RoundPhase::Quit {
            break;
        }
        session.submit(Command::Accelerate { dt: STEP });
        session.submit(Command::Tick { dt: STEP });
    }
    assert_eq!(query::phase(&session.world), RoundPhase::Quit);

    // An explicit end arriving before the quit delay must not double the sequence.
    session.submit(Command::EndRound);
    session.wait(Duration::from_secs(15));

    assert_eq!(session.count(|event| matches!(event, Event::RoundEnded { .. })), 1);
    assert_eq!(session.count(|event| matches!(event, Event::RoundScored { .. })), 1);
    assert_eq!(session.count(|event| matches!(event, Event::SummaryShown { .. })), 1);
    assert_eq!(session.count(|event| matches!(event, Event::ReturnedToMenu { .. })), 1);
    assert_eq!(query::phase(&session.world), RoundPhase::MenuReturn);
    assert_eq!(query::profile(&session.world).score_history().games(), 1);

    let ended = session.position(|event| matches!(event, Event::RoundEnded { .. }));
    let scored = session.position(|event| matches!(event, Event::RoundScored { .. }));
    let shown = session.position(|event| matches!(event, Event::SummaryShown { .. }));
    let left = session.position(|event| matches!(event, Event::ReturnedToMenu { .. }));
    assert!(ended < scored && scored < shown && shown < left, "sequence out of order");
}

#[test]
fn quit_delay_ends_the_round_without_player_input() {
    let mut session = Session::new(single_number_profile());
    session.start(4);

    for _ in 0..2_000 {
        if query::phase(&session.world) == RoundPhase::Quit {
            break;
        }
        session.submit(Command::Accelerate { dt: STEP });
        session.submit(Command::Tick { dt: STEP });
    }
    assert_eq!(session.count(|event| *event == Event::ContentExhausted), 1);

    session.wait(Duration::from_millis(1_900));
    assert_eq!(session.count(|event| matches!(event, Event::RoundEnded { .. })), 0);
    session.wait(STEP);
    assert_eq!(session.count(|event| matches!(event, Event::RoundEnded { .. })), 1);
}

#[test]
fn summary_waits_for_its_reveal_delay() {
    let mut session = Session::new(Profile::default());
    session.start(5);
    session.submit(Command::EndRound);
    assert_eq!(session.count(|event| matches!(event, Event::RoundScored { .. })), 1);
    assert_eq!(session.count(|event| matches!(event, Event::SummaryShown { .. })), 0);

    session.wait(Duration::from_secs(1));
    assert_eq!(session.count(|event| matches!(event, Event::SummaryShown { .. })), 1);
    assert_eq!(query::phase(&session.world), RoundPhase::Ending);

    session.wait(Duration::from_secs(10));
    assert_eq!(query::phase(&session.world), RoundPhase::MenuReturn);
}

#[test]
fn strong_history_on_a_ladder_advances_the_mode() {
    let mut profile = Profile::default();
    profile.select_game_mode(GameMode::Class4Math);
    for _ in 0..9 {
        let _ = profile.record_round(100.0);
    }
    let mut session = Session::new(profile);
    session.start(6);
    session.submit(Command::EndRound);
    session.wait(Duration::from_secs(12));

    assert_eq!(
        session.count(|event| matches!(
            event,
            Event::DifficultyIncreased {
                from: GameMode::Class4Math,
                to: GameMode::Class45Math,
            }
        )),
        1
    );
    let profile = query::profile(&session.world);
    assert_eq!(profile.game_mode(), GameMode::Class45Math);
    assert_eq!(profile.score_history().games(), 0);
}

#[test]
fn weak_history_keeps_the_mode() {
    let mut profile = Profile::default();
    profile.select_game_mode(GameMode::Class1Math);
    for _ in 0..20 {
        let _ = profile.record_round(40.0);
    }
    let mut session = Session::new(profile);
    session.start(7);
    session.submit(Command::EndRound);
    session.wait(Duration::from_secs(12));

    assert_eq!(
        session.count(|event| matches!(event, Event::DifficultyIncreased { .. })),
        0
    );
    assert_eq!(query::profile(&session.world).game_mode(), GameMode::Class1Math);
}

#[test]
fn tasks_from_a_replaced_round_are_ignored() {
    let mut session = Session::new(Profile::default());
    session.start(8);
    session.wait(Duration::from_secs(1));
    session.start(9);

    session.wait(Duration::from_millis(3_500));
    assert_eq!(
        session.count(|event| *event == Event::IntroPromptShown),
        0,
        "first round's prompt fired into the second round"
    );

    session.wait(Duration::from_millis(500));
    assert_eq!(session.count(|event| *event == Event::IntroPromptShown), 1);
}

#[test]
fn deterministic_replay_produces_identical_logs() {
    let play = || {
        let mut session = Session::with_physics(
            single_number_profile(),
            Physics {
                station_spacing: 20.0,
                ..Physics::default()
            },
        );
        session.start(0x5eed);
        for step in 0..300 {
            if step % 2 == 0 {
                session.submit(Command::Accelerate { dt: STEP });
            }
            session.submit(Command::Tick { dt: STEP });
        }
        session.wait(Duration::from_secs(15));
        session.log
    };

    let first = play();
    let second = play();
    assert_eq!(first, second, "replay diverged between runs");
}
