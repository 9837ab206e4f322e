use serde::{Deserialize, Serialize};

/// Opaque byte RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Pure white.
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    /// Pure yellow.
    pub const YELLOW: Rgb = Rgb::new(0xff, 0xeb, 0x04);
    /// Pure blue.
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    /// Pure cyan.
    pub const CYAN: Rgb = Rgb::new(0x00, 0xff, 0xff);

    /// Creates a color from byte components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Color-vision accessibility scheme chosen by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorScheme {
    /// Unmodified presentation.
    #[default]
    Default,
    /// Red-blind friendly presentation.
    Protanope,
    /// Green-blind friendly presentation.
    Deuteranope,
    /// Blue-blind friendly presentation.
    Tritanope,
}

/// Presentation overrides derived from a [`ColorScheme`].
///
/// `None` fields keep the adapter's stock appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Palette {
    /// Tint applied to the vehicle sprite.
    pub vehicle_tint: Option<Rgb>,
    /// Color of the scene's directional light.
    pub light_color: Option<Rgb>,
    /// Intensity of the scene's directional light.
    pub light_intensity: Option<f32>,
    /// Color of prompt, hint and summary labels.
    pub label_color: Option<Rgb>,
}

impl ColorScheme {
    /// Resolves the presentation overrides for this scheme.
    #[must_use]
    pub fn palette(self) -> Palette {
        match self {
            Self::Default => Palette::default(),
            Self::Protanope => Palette {
                vehicle_tint: Some(Rgb::YELLOW),
                light_color: Some(Rgb::BLUE),
                light_intensity: Some(0.8),
                label_color: Some(Rgb::WHITE),
            },
            Self::Deuteranope => Palette {
                vehicle_tint: Some(Rgb::YELLOW),
                light_color: Some(Rgb::BLUE),
                light_intensity: Some(1.0),
                label_color: Some(Rgb::WHITE),
            },
            Self::Tritanope => Palette {
                vehicle_tint: Some(Rgb::YELLOW),
                light_color: Some(Rgb::CYAN),
                light_intensity: Some(0.5),
                label_color: Some(Rgb::YELLOW),
            },
        }
    }
}
