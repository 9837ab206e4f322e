use serde::{Deserialize, Serialize};

/// Content source selected for a round.
///
/// Declaration order is significant: the math difficulty ladders advance by
/// exactly one ordinal step.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum GameMode {
    /// Selected pictures from the picture pool.
    SimpleTextures,
    /// Every integer in the configured inclusive range.
    NumberRange,
    /// The configured list of letters.
    Letters,
    /// Mixed arithmetic sampler.
    #[default]
    ExampleMath,
    /// Grades 1-3, easy arithmetic.
    Class1Math,
    /// Grades 1-3, medium arithmetic.
    Class2Math,
    /// Grades 1-3, hard arithmetic.
    Class3Math,
    /// Grades 4-5, easy arithmetic.
    Class4Math,
    /// Grades 4-5, medium arithmetic.
    Class45Math,
    /// Grades 4-5, hard arithmetic.
    Class5Math,
    /// Words paired with pictures.
    ExampleEnglish,
    /// Mappings selected in the custom registry.
    CustomMapping,
}

/// Half-open ordinal ranges eligible for automatic advancement.
const LADDERS: [(GameMode, GameMode); 2] = [
    (GameMode::Class1Math, GameMode::Class3Math),
    (GameMode::Class4Math, GameMode::Class5Math),
];

impl GameMode {
    /// Every mode in ordinal order.
    pub const ALL: [GameMode; 12] = [
        Self::SimpleTextures,
        Self::NumberRange,
        Self::Letters,
        Self::ExampleMath,
        Self::Class1Math,
        Self::Class2Math,
        Self::Class3Math,
        Self::Class4Math,
        Self::Class45Math,
        Self::Class5Math,
        Self::ExampleEnglish,
        Self::CustomMapping,
    ];

    /// Zero-based ordinal of the mode.
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Looks up the mode with the provided ordinal.
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Human readable name shown on menus and the round banner.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SimpleTextures => "Simple Textures",
            Self::NumberRange => "Number Range",
            Self::Letters => "Letters",
            Self::ExampleMath => "Math Mixer",
            Self::Class1Math => "Math 1-3 Easy",
            Self::Class2Math => "Math 1-3 Medium",
            Self::Class3Math => "Math 1-3 Hard",
            Self::Class4Math => "Math 4-5 Easy",
            Self::Class45Math => "Math 4-5 Medium",
            Self::Class5Math => "Math 4-5 Hard",
            Self::ExampleEnglish => "English",
            Self::CustomMapping => "Custom",
        }
    }

    /// Reports whether the mode sits strictly below the top of a difficulty ladder.
    #[must_use]
    pub fn is_ladder_eligible(self) -> bool {
        LADDERS
            .iter()
            .any(|&(start, top)| self >= start && self < top)
    }

    /// Mode one step up the ladder, or `None` when the mode is not eligible.
    #[must_use]
    pub fn next_on_ladder(self) -> Option<Self> {
        if !self.is_ladder_eligible() {
            return None;
        }
        Self::from_ordinal(self.ordinal() + 1)
    }
}
