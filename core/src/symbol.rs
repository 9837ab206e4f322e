use std::{
    fmt,
    hash::{Hash, Hasher},
};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque reference to a picture resource owned by the presentation layer.
///
/// Two handles are the same picture exactly when their resource keys match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Creates a handle referring to the resource stored under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Resource key identifying the picture.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// Atomic unit of content shown on stations and carried as a destination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Label rendered as text.
    Text(String),
    /// Label rendered as a picture.
    Image(ImageHandle),
}

impl Symbol {
    /// Creates a text symbol.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a picture symbol.
    #[must_use]
    pub fn image(handle: ImageHandle) -> Self {
        Self::Image(handle)
    }

    /// Creates a text symbol spelling out the provided number.
    #[must_use]
    pub fn number(value: i32) -> Self {
        Self::Text(value.to_string())
    }

    /// Returns the text when this is a text symbol.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Returns the picture handle when this is a picture symbol.
    #[must_use]
    pub fn as_image(&self) -> Option<&ImageHandle> {
        match self {
            Self::Text(_) => None,
            Self::Image(handle) => Some(handle),
        }
    }

    /// Reports whether both symbols are of the same kind (text or picture).
    #[must_use]
    pub fn is_same_kind(&self, other: &Symbol) -> bool {
        matches!(
            (self, other),
            (Self::Text(_), Self::Text(_)) | (Self::Image(_), Self::Image(_))
        )
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Image(handle) => write!(f, "[{}]", handle.key()),
        }
    }
}

/// Reasons a symbol mapping cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The mapping was given an empty equivalents list.
    #[error("a symbol mapping needs at least one equivalent")]
    NoEquivalents,
}

/// Canonical symbol plus the ordered set of forms a traveller may carry for it.
///
/// Mappings compare and hash by their canonical symbol only.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "MappingParts")]
pub struct SymbolMapping {
    canonical: Symbol,
    equivalents: Vec<Symbol>,
}

impl SymbolMapping {
    /// Creates a mapping from a canonical symbol and its accepted equivalents.
    pub fn new(canonical: Symbol, equivalents: Vec<Symbol>) -> Result<Self, MappingError> {
        if equivalents.is_empty() {
            return Err(MappingError::NoEquivalents);
        }

        Ok(Self {
            canonical,
            equivalents,
        })
    }

    /// Creates a mapping whose only equivalent is the canonical symbol itself.
    #[must_use]
    pub fn identity(symbol: Symbol) -> Self {
        Self {
            equivalents: vec![symbol.clone()],
            canonical: symbol,
        }
    }

    /// Builds a mapping from text labels, failing when `equivalents` is empty.
    pub fn from_text(canonical: &str, equivalents: &[&str]) -> Result<Self, MappingError> {
        Self::new(
            Symbol::text(canonical),
            equivalents.iter().copied().map(Symbol::text).collect(),
        )
    }

    /// Symbol displayed on the station carrying this mapping.
    #[must_use]
    pub fn canonical(&self) -> &Symbol {
        &self.canonical
    }

    /// Forms accepted as destinations for this mapping, in authored order.
    #[must_use]
    pub fn equivalents(&self) -> &[Symbol] {
        &self.equivalents
    }

    /// Reports whether a traveller heading for `symbol` belongs to this mapping.
    #[must_use]
    pub fn accepts(&self, symbol: &Symbol) -> bool {
        self.canonical == *symbol || self.equivalents.contains(symbol)
    }

    /// Draws one equivalent uniformly at random.
    pub fn draw_equivalent<R>(&self, rng: &mut R) -> &Symbol
    where
        R: Rng + ?Sized,
    {
        let index = rng.gen_range(0..self.equivalents.len());
        &self.equivalents[index]
    }
}

impl PartialEq for SymbolMapping {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for SymbolMapping {}

impl Hash for SymbolMapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

#[derive(Deserialize)]
struct MappingParts {
    canonical: Symbol,
    equivalents: Vec<Symbol>,
}

impl TryFrom<MappingParts> for SymbolMapping {
    type Error = MappingError;

    fn try_from(parts: MappingParts) -> Result<Self, Self::Error> {
        Self::new(parts.canonical, parts.equivalents)
    }
}
