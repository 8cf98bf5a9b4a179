use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde::Serialize;

#[derive(Debug, Hash, Serialize, enumset::EnumSetType)]
#[serde(rename_all = "snake_case")]
pub enum FlightMode {
    /// Spiral climb in a thermal.
    Thermal,

    /// Economical glide.
    Cruise,

    /// Dive driving the CO2 compression turbine.
    Dive,

    /// Engine running on the CO2 cycle heated by H2 sparks, or on the sealed coal.
    Night,

    /// Nothing left to burn, gliding down.
    Emergency,
}

impl Display for FlightMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Thermal => write!(f, "Spirale thermique"),
            Self::Cruise => write!(f, "Croisière"),
            Self::Dive => write!(f, "Piqué"),
            Self::Night => write!(f, "Vol nocturne"),
            Self::Emergency => write!(f, "Urgence"),
        }
    }
}

impl FlightMode {
    pub const fn color(self) -> Color {
        match self {
            Self::Thermal => Color::Green,
            Self::Cruise => Color::Cyan,
            Self::Dive => Color::Blue,
            Self::Night => Color::DarkYellow,
            Self::Emergency => Color::Red,
        }
    }

    /// Fires can only be spotted while gliding over the landscape.
    pub const fn is_patrolling(self) -> bool {
        matches!(self, Self::Thermal | Self::Cruise)
    }
}
