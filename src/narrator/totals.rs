use std::fmt::{Display, Formatter};

use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

use crate::quantity::{energy::WattHours, mass::Kilograms};

#[derive(Debug, Deserialize, Serialize, EnumSetType)]
#[enumset(serialize_repr = "list")]
pub enum Accumulator {
    Energy,
    Fuel,
    LiquidCo2,
}

impl Display for Accumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Energy => write!(f, "réserve d'énergie"),
            Self::Fuel => write!(f, "carburant"),
            Self::LiquidCo2 => write!(f, "CO2 liquide"),
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct RunningTotals {
    pub energy: WattHours,
    pub fuel: Kilograms,
    pub liquid_co2: Kilograms,
}

impl RunningTotals {
    /// Accumulators that went below zero.
    pub fn below_floor(&self) -> EnumSet<Accumulator> {
        let mut breached = EnumSet::empty();
        if self.energy < WattHours::ZERO {
            breached |= Accumulator::Energy;
        }
        if self.fuel < Kilograms::ZERO {
            breached |= Accumulator::Fuel;
        }
        if self.liquid_co2 < Kilograms::ZERO {
            breached |= Accumulator::LiquidCo2;
        }
        breached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_floor() {
        let totals = RunningTotals { energy: WattHours(-1.0), fuel: Kilograms(0.0), liquid_co2: Kilograms(-0.1) };
        assert_eq!(totals.below_floor(), Accumulator::Energy | Accumulator::LiquidCo2);
    }

    #[test]
    fn breached_set_is_a_list_in_the_ledger() {
        let breached = Accumulator::Energy | Accumulator::LiquidCo2;
        let json = serde_json::to_string(&breached).unwrap();
        assert_eq!(json, r#"["Energy","LiquidCo2"]"#);
        assert_eq!(serde_json::from_str::<EnumSet<Accumulator>>(&json).unwrap(), breached);
    }

    #[test]
    fn zero_is_on_the_floor() {
        let totals = RunningTotals { energy: WattHours::ZERO, fuel: Kilograms::ZERO, liquid_co2: Kilograms::ZERO };
        assert!(totals.below_floor().is_empty());
    }
}
