use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{
    flight::mode::FlightMode,
    quantity::{
        energy::WattHours,
        length::{Kilometres, Metres},
        mass::Kilograms,
    },
};

/// Change in every on-board resource.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Deltas {
    pub co2: Kilograms,
    pub h2: Kilograms,
    pub water: Kilograms,
    pub coal: Kilograms,
    pub o2: Kilograms,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    /// H2 ran short, the sealed coal was opened.
    CoalBackup,

    /// Nothing left to burn.
    EmergencyDescent,
}

impl Display for Alert {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoalBackup => write!(f, "secours charbon activé"),
            Self::EmergencyDescent => write!(f, "descente d'urgence"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Fire {
    pub detected: bool,
    pub extinguished: bool,
}

/// Outcome of one simulated hour.
#[derive(Clone, Debug, Serialize)]
pub struct HourlyBalance {
    pub day: u32,
    pub hour: u32,
    pub mode: FlightMode,
    pub altitude_start: Metres,
    pub altitude_end: Metres,
    pub deltas: Deltas,
    pub solar_energy: WattHours,
    pub engine_energy: WattHours,
    pub distance: Kilometres,
    pub fire: Fire,

    /// Liquid CO2 dropped on a fire.
    pub co2_dropped: Kilograms,

    pub alerts: Vec<Alert>,

    /// The glider touched down during the hour.
    pub landed: bool,
}

impl HourlyBalance {
    pub fn new(day: u32, hour: u32, mode: FlightMode, altitude: Metres) -> Self {
        Self {
            day,
            hour,
            mode,
            altitude_start: altitude,
            altitude_end: altitude,
            deltas: Deltas::default(),
            solar_energy: WattHours::ZERO,
            engine_energy: WattHours::ZERO,
            distance: Kilometres::ZERO,
            fire: Fire::default(),
            co2_dropped: Kilograms::ZERO,
            alerts: Vec::new(),
            landed: false,
        }
    }
}
