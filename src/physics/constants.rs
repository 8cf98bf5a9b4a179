//! Physical constants (NIST, CRC Handbook) and air/fluid properties.

use crate::quantity::{
    density::KilogramsPerCubicMetre,
    energy::Joules,
    pressure::Pascals,
    temperature::Kelvin,
};

/// Ideal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314_462_618_153_24;

/// Standard gravity, m/s².
pub const GRAVITY: f64 = 9.806_65;

/// Solar constant outside the atmosphere, W/m².
pub const SOLAR_CONSTANT: f64 = 1361.0;

/// International Standard Atmosphere.
pub mod isa {
    use super::{Kelvin, Pascals};

    pub const SEA_LEVEL_PRESSURE: Pascals = Pascals(101_325.0);
    pub const SEA_LEVEL_TEMPERATURE: Kelvin = Kelvin(288.15);

    /// K/m.
    pub const LAPSE_RATE: f64 = 0.0065;

    /// Molar mass of dry air, kg/mol.
    pub const AIR_MOLAR_MASS: f64 = 0.028_964_4;
}

pub mod co2 {
    use super::{Joules, Kelvin, KilogramsPerCubicMetre, Pascals};

    pub const CRITICAL_TEMPERATURE: Kelvin = Kelvin(304.128);
    pub const CRITICAL_PRESSURE: Pascals = Pascals(7.3773e6);
    pub const TRIPLE_POINT_TEMPERATURE: Kelvin = Kelvin(216.55);

    /// kg/mol.
    pub const MOLAR_MASS: f64 = 0.044_01;

    /// J/(kg·K) at 300 K, 1 bar.
    pub const CP: f64 = 846.0;

    /// J/(kg·K) at 300 K, 1 bar.
    pub const CV: f64 = 657.0;

    /// Latent heat of vaporisation at the triple point, per kilogram.
    pub const LATENT_HEAT: Joules = Joules(234_000.0);

    pub const LIQUID_DENSITY: KilogramsPerCubicMetre = KilogramsPerCubicMetre(770.0);
}

pub mod h2 {
    use super::Joules;

    /// kg/mol.
    pub const MOLAR_MASS: f64 = 0.002_015_88;

    /// Lower heating value per kilogram.
    pub const LOWER_HEATING_VALUE: Joules = Joules(119.96e6);

    /// Electrolysis energy per kilogram (39.4 kWh/kg).
    pub const ELECTROLYSIS_ENERGY: Joules = Joules(39.4 * 3.6e6);

    /// Leak fraction per day for a composite tank.
    pub const DAILY_LEAK_RATE: f64 = 0.005;

    /// Kilograms of O2 released per kilogram of H2 electrolysed.
    pub const O2_PER_H2: f64 = 8.0;
}

pub mod water {
    /// Kilograms of water per kilogram of hydrogen (2 H2O → 2 H2 + O2).
    pub const WATER_PER_H2: f64 = 9.0;
}

pub mod carbon {
    use super::Joules;

    /// Lower heating value per kilogram.
    pub const LOWER_HEATING_VALUE: Joules = Joules(32.8e6);

    /// Kilograms of CO2 per kilogram of carbon burnt (C + O2 → CO2).
    pub const CO2_PER_CARBON: f64 = 44.0 / 12.0;
}
