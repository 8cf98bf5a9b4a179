//! International Standard Atmosphere.

use crate::{
    physics::constants::{GAS_CONSTANT, GRAVITY, isa},
    quantity::{
        density::KilogramsPerCubicMetre,
        length::Metres,
        pressure::Pascals,
        temperature::Kelvin,
    },
};

/// Temperature at the altitude, starting from the ground temperature (ISA sea level by default).
pub fn temperature(altitude: Metres, ground: Option<Kelvin>) -> Kelvin {
    let ground = ground.unwrap_or(isa::SEA_LEVEL_TEMPERATURE);
    Kelvin(ground.0 - isa::LAPSE_RATE * altitude.0)
}

/// Barometric formula: `P0 × (1 − L·h/T0)^(g·M/(R·L))`.
pub fn pressure(altitude: Metres) -> Pascals {
    let exponent = GRAVITY * isa::AIR_MOLAR_MASS / (GAS_CONSTANT * isa::LAPSE_RATE);
    let base = 1.0 - isa::LAPSE_RATE * altitude.0 / isa::SEA_LEVEL_TEMPERATURE.0;
    isa::SEA_LEVEL_PRESSURE * base.powf(exponent)
}

/// `ρ = P·M / (R·T)`.
pub fn density(altitude: Metres) -> KilogramsPerCubicMetre {
    let pressure = pressure(altitude);
    let temperature = temperature(altitude, None);
    KilogramsPerCubicMetre(pressure.0 * isa::AIR_MOLAR_MASS / (GAS_CONSTANT * temperature.0))
}

/// Mass of water vapour per cubic metre of air.
///
/// Saturation pressure follows the Magnus formula, and the relative humidity decays
/// exponentially with a 2500 m scale height.
pub fn absolute_humidity(altitude: Metres, ground_relative_humidity: f64) -> KilogramsPerCubicMetre {
    const WATER_MOLAR_MASS: f64 = 0.018_015;

    let temperature = temperature(altitude, None);
    let celsius = temperature.to_celsius();
    let saturation_pressure = 6.112 * (17.67 * celsius / (celsius + 243.5)).exp() * 100.0;
    let relative_humidity = ground_relative_humidity * (-altitude.0 / 2500.0).exp();
    let vapour_pressure = relative_humidity * saturation_pressure;
    KilogramsPerCubicMetre(vapour_pressure * WATER_MOLAR_MASS / (GAS_CONSTANT * temperature.0))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn sea_level() {
        assert_abs_diff_eq!(pressure(Metres::ZERO).0, 101_325.0);
        assert_abs_diff_eq!(density(Metres::ZERO).0, 1.225, epsilon = 1e-3);
    }

    #[test]
    fn at_3000_metres() {
        assert_abs_diff_eq!(temperature(Metres(3000.0), None).0, 268.65, epsilon = 1e-9);
        assert_abs_diff_eq!(density(Metres(3000.0)).0, 0.909, epsilon = 1e-3);
    }

    #[test]
    fn custom_ground_temperature() {
        assert_abs_diff_eq!(temperature(Metres(1000.0), Some(Kelvin(293.0))).0, 286.5);
    }

    #[test]
    fn humidity_decreases_with_altitude() {
        let low = absolute_humidity(Metres(500.0), 0.6);
        let high = absolute_humidity(Metres(4000.0), 0.6);
        assert!(low > high);
        assert!(high > KilogramsPerCubicMetre::ZERO);
    }
}
