use std::fmt::{Display, Formatter};

use enumset::{EnumSet, EnumSetType};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    flight::{
        balance::{Alert, Deltas, HourlyBalance},
        mode::FlightMode,
        state::Snapshot,
    },
    quantity::{
        energy::WattHours,
        length::{Kilometres, Metres},
        mass::Kilograms,
    },
};

/// Final-state shortfalls that make the flight fail.
#[derive(Debug, Deserialize, Serialize, EnumSetType)]
#[enumset(serialize_repr = "list")]
pub enum Shortfall {
    /// More than 90 % of the coal was burnt.
    CoalExhausted,

    HydrogenDepleted,
    Co2Critical,
    WaterCritical,
    AltitudeCritical,
}

impl Display for Shortfall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CoalExhausted => write!(f, "charbon épuisé (> 90 % consommé)"),
            Self::HydrogenDepleted => write!(f, "hydrogène épuisé (< 0.1 kg)"),
            Self::Co2Critical => write!(f, "CO2 critique (< 5 kg)"),
            Self::WaterCritical => write!(f, "eau critique (< 0.5 kg)"),
            Self::AltitudeCritical => write!(f, "altitude critique (< 500 m)"),
        }
    }
}

impl Shortfall {
    pub fn assess(initial: &Snapshot, final_: &Snapshot) -> EnumSet<Self> {
        let mut shortfalls = EnumSet::empty();
        if final_.reservoirs.coal - initial.reservoirs.coal < -(initial.reservoirs.coal * 0.9) {
            shortfalls |= Self::CoalExhausted;
        }
        if final_.reservoirs.h2 < Kilograms(0.1) {
            shortfalls |= Self::HydrogenDepleted;
        }
        if final_.reservoirs.co2 < Kilograms(5.0) {
            shortfalls |= Self::Co2Critical;
        }
        if final_.reservoirs.water < Kilograms(0.5) {
            shortfalls |= Self::WaterCritical;
        }
        if final_.altitude < Metres(500.0) {
            shortfalls |= Self::AltitudeCritical;
        }
        shortfalls
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct TimedAlert {
    pub day: u32,
    pub hour: u32,
    pub alert: Alert,
}

#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub initial: Snapshot,

    #[serde(rename = "final")]
    pub final_: Snapshot,

    pub deltas: Deltas,
    pub n_hours: usize,
    pub mode_hours: Vec<(FlightMode, usize)>,
    pub distance: Kilometres,
    pub min_altitude: Metres,
    pub fires_detected: usize,
    pub fires_extinguished: usize,
    pub solar_energy: WattHours,
    pub engine_energy: WattHours,
    pub landings: usize,
    pub alerts: Vec<TimedAlert>,
    pub shortfalls: EnumSet<Shortfall>,
}

impl Summary {
    pub fn new(initial: Snapshot, final_: Snapshot, balances: &[HourlyBalance]) -> Self {
        let mode_counts = balances.iter().map(|balance| balance.mode).counts();
        Self {
            initial,
            final_,
            deltas: final_.deltas_since(&initial),
            n_hours: balances.len(),
            mode_hours: EnumSet::<FlightMode>::all()
                .iter()
                .map(|mode| (mode, mode_counts.get(&mode).copied().unwrap_or_default()))
                .collect(),
            distance: balances.iter().map(|balance| balance.distance).sum(),
            min_altitude: balances
                .iter()
                .map(|balance| balance.altitude_end)
                .chain([initial.altitude])
                .min()
                .unwrap_or(initial.altitude),
            fires_detected: balances.iter().filter(|balance| balance.fire.detected).count(),
            fires_extinguished: balances.iter().filter(|balance| balance.fire.extinguished).count(),
            solar_energy: balances.iter().map(|balance| balance.solar_energy).sum(),
            engine_energy: balances.iter().map(|balance| balance.engine_energy).sum(),
            landings: balances.iter().filter(|balance| balance.landed).count(),
            alerts: balances
                .iter()
                .flat_map(|balance| {
                    balance.alerts.iter().map(|alert| TimedAlert { day: balance.day, hour: balance.hour, alert: *alert })
                })
                .collect(),
            shortfalls: Shortfall::assess(&initial, &final_),
        }
    }

    pub fn is_viable(&self) -> bool {
        self.shortfalls.is_empty()
    }
}
