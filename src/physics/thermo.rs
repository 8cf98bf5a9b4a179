//! Thermodynamics of the CO2 working fluid.

use serde::Serialize;

use crate::{
    physics::constants::{GAS_CONSTANT, co2},
    quantity::{energy::Joules, mass::Kilograms, pressure::Pascals, temperature::Kelvin},
};

/// `1 − Tc/Th`, zero when the hot source is not hotter than the cold one.
pub fn carnot(cold: Kelvin, hot: Kelvin) -> f64 {
    if hot > cold && hot.0 > 0.0 { 1.0 - cold / hot } else { 0.0 }
}

/// Isothermal work `n·R·T·ln(P1/P2)`, negative when compressing.
pub fn isothermal_work(moles: f64, temperature: Kelvin, from: Pascals, to: Pascals) -> Joules {
    Joules(moles * GAS_CONSTANT * temperature.0 * (from / to).ln())
}

/// Heat released by burning the fuel mass, the heating value being per kilogram.
pub fn combustion_heat(mass: Kilograms, heating_value: Joules) -> Joules {
    heating_value * mass.0
}

/// `T + Q/(m·cp)`.
pub fn temperature_after_heating(initial: Kelvin, heat: Joules, mass: Kilograms, specific_heat: f64) -> Kelvin {
    Kelvin(initial.0 + heat.0 / (mass.0 * specific_heat))
}

/// Four-stroke CO2 cycle: isothermal compression at the cold temperature, isochoric heating,
/// isothermal expansion at the hot temperature, isochoric cooling.
#[derive(Copy, Clone, Debug)]
pub struct Cycle {
    pub mass: Kilograms,
    pub cold: Kelvin,
    pub hot: Kelvin,
    pub low_pressure: Pascals,
    pub high_pressure: Pascals,
    pub mechanical_efficiency: f64,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct CycleBalance {
    /// Negative, consumed.
    pub compression_work: Joules,

    /// Positive, produced.
    pub expansion_work: Joules,

    pub heat_in: Joules,
    pub heat_out: Joules,
    pub net_work: Joules,
    pub real_work: Joules,
    pub thermal_efficiency: f64,
    pub carnot_efficiency: f64,
    pub real_efficiency: f64,
}

impl Cycle {
    pub fn compute(&self) -> CycleBalance {
        let moles = self.mass.0 / co2::MOLAR_MASS;
        let compression_work = isothermal_work(moles, self.cold, self.low_pressure, self.high_pressure);
        let expansion_work = isothermal_work(moles, self.hot, self.high_pressure, self.low_pressure);
        let heat_in = Joules(self.mass.0 * co2::CV * (self.hot.0 - self.cold.0));
        let net_work = expansion_work + compression_work;
        let thermal_efficiency = if heat_in.0 > 0.0 { net_work / heat_in } else { 0.0 };
        CycleBalance {
            compression_work,
            expansion_work,
            heat_in,
            heat_out: heat_in,
            net_work,
            real_work: net_work * self.mechanical_efficiency,
            thermal_efficiency,
            carnot_efficiency: carnot(self.cold, self.hot),
            real_efficiency: thermal_efficiency * self.mechanical_efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::physics::constants::h2;

    fn cycle() -> Cycle {
        Cycle {
            mass: Kilograms(0.5),
            cold: Kelvin(268.0),
            hot: Kelvin(800.0),
            low_pressure: Pascals::from_bars(1.0),
            high_pressure: Pascals::from_bars(60.0),
            mechanical_efficiency: 0.85,
        }
    }

    #[test]
    fn carnot_bound() {
        assert_abs_diff_eq!(carnot(Kelvin(268.0), Kelvin(800.0)), 0.665, epsilon = 1e-12);
        assert_abs_diff_eq!(carnot(Kelvin(300.0), Kelvin(300.0)), 0.0);
    }

    #[test]
    fn compression_consumes_work() {
        let work = isothermal_work(1.0, Kelvin(300.0), Pascals::from_bars(1.0), Pascals::from_bars(10.0));
        assert!(work.0 < 0.0);
        assert_abs_diff_eq!(work.0, -GAS_CONSTANT * 300.0 * 10.0_f64.ln(), epsilon = 1e-9);
    }

    #[test]
    fn hydrogen_spark() {
        let heat = combustion_heat(Kilograms(0.001), h2::LOWER_HEATING_VALUE);
        assert_abs_diff_eq!(heat.0, 119_960.0, epsilon = 1e-6);
        let temperature = temperature_after_heating(Kelvin(280.0), heat, Kilograms(0.5), co2::CP);
        assert_abs_diff_eq!(temperature.0, 280.0 + 119_960.0 / 423.0, epsilon = 1e-9);
    }

    #[test]
    fn cycle_balance() {
        let balance = cycle().compute();
        assert!(balance.compression_work.0 < 0.0);
        assert!(balance.expansion_work.0 > 0.0);
        assert_abs_diff_eq!(balance.net_work.0, balance.expansion_work.0 + balance.compression_work.0);
        assert_abs_diff_eq!(balance.real_work.0, balance.net_work.0 * 0.85, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.heat_in.0, 0.5 * 657.0 * 532.0, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.real_efficiency, balance.thermal_efficiency * 0.85, epsilon = 1e-12);
        assert_abs_diff_eq!(balance.carnot_efficiency, 0.665, epsilon = 1e-12);
    }

    #[test]
    fn cycle_without_heating() {
        let balance = Cycle { hot: Kelvin(268.0), ..cycle() }.compute();
        assert_abs_diff_eq!(balance.net_work.0, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.thermal_efficiency, 0.0);
    }
}
