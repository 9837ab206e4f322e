//! Player configuration and progress carried between rounds.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use train_match_core::{ColorScheme, GameMode, ImageHandle, Symbol, SymbolMapping};
use train_match_system_level::LevelConfig;

use crate::content;
use crate::pool::{Multi, SelectablePool, Single};
use crate::registry::SymbolMappings;

/// Failures raised while editing profile content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// The number range starts after it ends.
    #[error("number range {begin}..={end} is empty")]
    InvalidNumberRange {
        /// Requested first value.
        begin: i32,
        /// Requested last value.
        end: i32,
    },
    /// The letter range is empty or not made of ASCII letters.
    #[error("letter range {from}..={to} is not a run of ASCII letters")]
    InvalidLetterRange {
        /// Requested first letter.
        from: char,
        /// Requested last letter.
        to: char,
    },
}

/// Inclusive range of integers used by [`GameMode::NumberRange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberRange {
    begin: i32,
    end: i32,
}

impl NumberRange {
    /// First value of the range.
    #[must_use]
    pub const fn begin(&self) -> i32 {
        self.begin
    }

    /// Last value of the range.
    #[must_use]
    pub const fn end(&self) -> i32 {
        self.end
    }
}

impl Default for NumberRange {
    fn default() -> Self {
        Self { begin: 1, end: 10 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Curated {
    example_math: Vec<SymbolMapping>,
    class1_math: Vec<SymbolMapping>,
    class2_math: Vec<SymbolMapping>,
    class3_math: Vec<SymbolMapping>,
    class4_math: Vec<SymbolMapping>,
    class45_math: Vec<SymbolMapping>,
    class5_math: Vec<SymbolMapping>,
    example_english: Vec<SymbolMapping>,
}

impl Default for Curated {
    fn default() -> Self {
        Self {
            example_math: content::example_math(),
            class1_math: content::class1_math(),
            class2_math: content::class2_math(),
            class3_math: content::class3_math(),
            class4_math: content::class4_math(),
            class45_math: content::class45_math(),
            class5_math: content::class5_math(),
            example_english: content::example_english(),
        }
    }
}

/// Per-mode content sources.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentLibrary {
    pictures: SelectablePool<ImageHandle, Multi>,
    numbers: NumberRange,
    letters: Vec<char>,
    custom: SymbolMappings,
    curated: Curated,
}

impl ContentLibrary {
    /// Picture pool backing [`GameMode::SimpleTextures`].
    #[must_use]
    pub fn pictures(&self) -> &SelectablePool<ImageHandle, Multi> {
        &self.pictures
    }

    /// Mutable picture pool.
    pub fn pictures_mut(&mut self) -> &mut SelectablePool<ImageHandle, Multi> {
        &mut self.pictures
    }

    /// Configured number range.
    #[must_use]
    pub fn number_range(&self) -> NumberRange {
        self.numbers
    }

    /// Configured letters, in order.
    #[must_use]
    pub fn letters(&self) -> &[char] {
        &self.letters
    }

    /// Registry backing [`GameMode::CustomMapping`].
    #[must_use]
    pub fn custom(&self) -> &SymbolMappings {
        &self.custom
    }

    /// Mutable custom registry.
    pub fn custom_mut(&mut self) -> &mut SymbolMappings {
        &mut self.custom
    }
}

impl Default for ContentLibrary {
    fn default() -> Self {
        let mut pictures = SelectablePool::new();
        let mut custom = SymbolMappings::new();
        for key in content::DEFAULT_PICTURES {
            let id = pictures.add(ImageHandle::new(key));
            let _ = pictures.select(id);
            let _ = custom.add_matchee(Symbol::image(ImageHandle::new(key)));
        }

        let _ = custom.add(SymbolMapping::identity(Symbol::image(ImageHandle::new(
            "Images/doctor2",
        ))));
        let businessman = custom.add(SymbolMapping::identity(Symbol::image(ImageHandle::new(
            "Images/businessman2",
        ))));
        let _ = custom.select(businessman);

        Self {
            pictures,
            numbers: NumberRange::default(),
            letters: vec!['a', 'b', 'c'],
            custom,
            curated: Curated::default(),
        }
    }
}

/// Resolves the ordered content for `mode`.
///
/// An empty result means no content is configured for the mode.
#[must_use]
pub fn resolve_content(mode: GameMode, library: &ContentLibrary) -> Vec<SymbolMapping> {
    let curated = &library.curated;
    match mode {
        GameMode::SimpleTextures => library
            .pictures
            .selected()
            .map(|handle| SymbolMapping::identity(Symbol::image(handle.clone())))
            .collect(),
        GameMode::NumberRange => (library.numbers.begin..=library.numbers.end)
            .map(|value| SymbolMapping::identity(Symbol::number(value)))
            .collect(),
        GameMode::Letters => library
            .letters
            .iter()
            .map(|letter| SymbolMapping::identity(Symbol::text(letter.to_string())))
            .collect(),
        GameMode::ExampleMath => curated.example_math.clone(),
        GameMode::Class1Math => curated.class1_math.clone(),
        GameMode::Class2Math => curated.class2_math.clone(),
        GameMode::Class3Math => curated.class3_math.clone(),
        GameMode::Class4Math => curated.class4_math.clone(),
        GameMode::Class45Math => curated.class45_math.clone(),
        GameMode::Class5Math => curated.class5_math.clone(),
        GameMode::ExampleEnglish => curated.example_english.clone(),
        GameMode::CustomMapping => library.custom.selected(),
    }
}

/// Player-adjustable options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Highest speed the vehicle may reach.
    pub speed_limit: f32,
    /// Display contrast.
    pub contrast: f32,
    /// Sound effect volume.
    pub sounds: f32,
    /// Music volume.
    pub music: f32,
    /// Whether the round ends once every mapping was shown.
    pub does_end: bool,
    /// Whether spawning is bounded by the seats the vehicle could offer.
    pub limit_passengers: bool,
    /// Whether the running score is displayed.
    pub allow_score: bool,
    /// Whether prompts and hints are shown.
    pub allow_labels: bool,
    /// Whether the calm background variant is used.
    pub calm_background: bool,
    /// Whether controls are mirrored for left-handed play.
    pub left_hand: bool,
    /// Color-vision accessibility scheme.
    pub color_scheme: ColorScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_limit: 25.0,
            contrast: 25.0,
            sounds: 10.0,
            music: 10.0,
            does_end: true,
            limit_passengers: true,
            allow_score: true,
            allow_labels: true,
            calm_background: false,
            left_hand: false,
            color_scheme: ColorScheme::Default,
        }
    }
}

/// Running percentage average on the current mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    average: f64,
    games: u32,
}

impl ScoreHistory {
    /// Mean percentage over the games played on the current mode.
    #[must_use]
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Games played on the current mode.
    #[must_use]
    pub const fn games(&self) -> u32 {
        self.games
    }
}

/// Which traveller picture families are offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct TravellerKinds {
    animals: bool,
    humans: bool,
}

impl TravellerKinds {
    fn for_mode(mode: GameMode) -> Self {
        if mode > GameMode::Class3Math && mode <= GameMode::Class5Math {
            Self {
                animals: false,
                humans: true,
            }
        } else if (GameMode::Class1Math..=GameMode::Class3Math).contains(&mode) {
            Self {
                animals: true,
                humans: false,
            }
        } else {
            Self {
                animals: true,
                humans: true,
            }
        }
    }

    fn pool(self) -> SelectablePool<ImageHandle, Multi> {
        let mut pool = SelectablePool::new();
        let families = [
            (&content::ANIMAL_PASSENGERS[..], self.animals),
            (&content::HUMAN_PASSENGERS[..], self.humans),
        ];
        for (keys, selected) in families {
            for key in keys {
                let id = pool.add(ImageHandle::new(*key));
                if selected {
                    let _ = pool.select(id);
                }
            }
        }
        pool
    }
}

/// Persisted player configuration and progress.
///
/// The profile never touches storage itself; an outer layer loads and saves
/// it as an opaque blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    mode: GameMode,
    content: ContentLibrary,
    drivers: SelectablePool<ImageHandle, Single>,
    passengers: SelectablePool<ImageHandle, Multi>,
    travellers: TravellerKinds,
    settings: Settings,
    history: ScoreHistory,
}

impl Default for Profile {
    fn default() -> Self {
        let mut drivers = SelectablePool::new();
        let mut chosen = None;
        for key in content::DRIVERS {
            chosen = Some(drivers.add(ImageHandle::new(key)));
        }
        if let Some(id) = chosen {
            let _ = drivers.select(id);
        }

        let travellers = TravellerKinds {
            animals: true,
            humans: false,
        };

        Self {
            mode: GameMode::default(),
            content: ContentLibrary::default(),
            drivers,
            passengers: travellers.pool(),
            travellers,
            settings: Settings::default(),
            history: ScoreHistory::default(),
        }
    }
}

impl Profile {
    /// Content for the active mode, in round order.
    #[must_use]
    pub fn symbols(&self) -> Vec<SymbolMapping> {
        resolve_content(self.mode, &self.content)
    }

    /// Active game mode.
    #[must_use]
    pub const fn game_mode(&self) -> GameMode {
        self.mode
    }

    /// Display name of the active game mode.
    #[must_use]
    pub const fn game_mode_name(&self) -> &'static str {
        self.mode.display_name()
    }

    /// Switches the active mode.
    ///
    /// Choosing a different mode clears the score history. The traveller
    /// pool is rebuilt for the chosen mode: younger grades get animals, older
    /// grades get humans, every other mode gets both.
    pub fn select_game_mode(&mut self, mode: GameMode) {
        if mode != self.mode {
            self.reset_score();
        }
        self.travellers = TravellerKinds::for_mode(mode);
        self.passengers = self.travellers.pool();
        self.mode = mode;
        info!(mode = mode.display_name(), "game mode selected");
    }

    /// Whether the active mode sits strictly inside a difficulty ladder.
    #[must_use]
    pub fn can_math_difficulty_be_increased(&self) -> bool {
        self.mode.is_ladder_eligible()
    }

    /// Moves one step up the active ladder. Returns whether the mode changed.
    ///
    /// The score history is left untouched; callers reset it separately.
    pub fn increase_math_difficulty(&mut self) -> bool {
        match self.mode.next_on_ladder() {
            Some(next) => {
                info!(
                    from = self.mode.display_name(),
                    to = next.display_name(),
                    "math difficulty increased"
                );
                self.mode = next;
                true
            }
            None => false,
        }
    }

    /// Clears the running average and game counter.
    pub fn reset_score(&mut self) {
        self.history = ScoreHistory::default();
    }

    /// Score history on the active mode.
    #[must_use]
    pub const fn score_history(&self) -> ScoreHistory {
        self.history
    }

    /// Folds a finished round's percentage into the running average.
    pub fn record_round(&mut self, percentage: f64) -> ScoreHistory {
        let games = self.history.games.saturating_add(1);
        self.history = ScoreHistory {
            average: train_match_core::fold_average(self.history.average, games, percentage),
            games,
        };
        self.history
    }

    /// Replaces the number range.
    pub fn set_number_range(&mut self, begin: i32, end: i32) -> Result<(), ProfileError> {
        if begin > end {
            return Err(ProfileError::InvalidNumberRange { begin, end });
        }
        self.content.numbers = NumberRange { begin, end };
        Ok(())
    }

    /// Replaces the letters with the inclusive run `from..=to`.
    pub fn set_letter_range(&mut self, from: char, to: char) -> Result<(), ProfileError> {
        let valid = from.is_ascii_alphabetic()
            && to.is_ascii_alphabetic()
            && from <= to
            && from.is_ascii_lowercase() == to.is_ascii_lowercase();
        if !valid {
            return Err(ProfileError::InvalidLetterRange { from, to });
        }
        self.content.letters = (from..=to).collect();
        Ok(())
    }

    /// Per-mode content sources.
    #[must_use]
    pub fn content(&self) -> &ContentLibrary {
        &self.content
    }

    /// Mutable content sources.
    pub fn content_mut(&mut self) -> &mut ContentLibrary {
        &mut self.content
    }

    /// Driver picture pool.
    #[must_use]
    pub fn drivers(&self) -> &SelectablePool<ImageHandle, Single> {
        &self.drivers
    }

    /// Mutable driver picture pool.
    pub fn drivers_mut(&mut self) -> &mut SelectablePool<ImageHandle, Single> {
        &mut self.drivers
    }

    /// Selected driver picture.
    #[must_use]
    pub fn driver(&self) -> Option<&ImageHandle> {
        self.drivers.current()
    }

    /// Traveller picture pool.
    #[must_use]
    pub fn passengers(&self) -> &SelectablePool<ImageHandle, Multi> {
        &self.passengers
    }

    /// Mutable traveller picture pool.
    pub fn passengers_mut(&mut self) -> &mut SelectablePool<ImageHandle, Multi> {
        &mut self.passengers
    }

    /// Selected traveller pictures, in pool order.
    #[must_use]
    pub fn passenger_images(&self) -> Vec<ImageHandle> {
        self.passengers.selected().cloned().collect()
    }

    /// Player-adjustable options.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable player-adjustable options.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Level options derived from the settings.
    #[must_use]
    pub fn level_config(&self) -> LevelConfig {
        LevelConfig::new(self.settings.does_end, self.settings.limit_passengers)
    }
}
