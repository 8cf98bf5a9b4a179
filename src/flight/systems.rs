//! On-board systems.

use crate::{
    config::Equipment,
    physics::{
        atmosphere,
        constants::{h2, water},
    },
    quantity::{
        area::SquareMetres,
        energy::Joules,
        length::Metres,
        mass::Kilograms,
        power::Watts,
        speed::MetresPerSecond,
        time::Seconds,
    },
};

/// Relative humidity at ground level assumed by the water collector.
const GROUND_RELATIVE_HUMIDITY: f64 = 0.6;

/// Energy to liquefy one kilogram of CO2 at 60 bar, compression and latent heat together.
const LIQUEFACTION_ENERGY: Joules = Joules(300_000.0);

/// PEM electrolyser.
#[derive(Copy, Clone, Debug)]
pub struct Electrolyser {
    pub max_power: Watts,
    pub efficiency: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Electrolysis {
    pub h2: Kilograms,
    pub o2: Kilograms,
    pub water: Kilograms,
}

impl Electrolyser {
    /// Split water with the available power, limited by the water on board.
    pub fn run(&self, power: Watts, duration: Seconds, available_water: Kilograms) -> Electrolysis {
        let energy = Joules(power.min(self.max_power).0 * duration.0 * self.efficiency);
        let mut produced = Kilograms(energy / h2::ELECTROLYSIS_ENERGY);
        let mut consumed = produced * water::WATER_PER_H2;
        if consumed > available_water {
            consumed = available_water.max(Kilograms::ZERO);
            produced = consumed / water::WATER_PER_H2;
        }
        Electrolysis { h2: produced, o2: produced * h2::O2_PER_H2, water: consumed }
    }
}

/// Atmospheric water collector.
#[derive(Copy, Clone, Debug)]
pub struct WaterCollector {
    pub section: SquareMetres,
    pub efficiency: f64,
}

impl WaterCollector {
    pub fn collect(&self, speed: MetresPerSecond, altitude: Metres, duration: Seconds) -> Kilograms {
        let volume = speed.0 * self.section.0 * duration.0;
        let humidity = atmosphere::absolute_humidity(altitude, GROUND_RELATIVE_HUMIDITY);
        Kilograms(volume * humidity.0 * self.efficiency)
    }
}

/// Exhaust condenser recovering the water of H2 combustion.
#[derive(Copy, Clone, Debug)]
pub struct Condenser {
    pub efficiency: f64,
}

impl Condenser {
    pub fn recover(&self, burnt_h2: Kilograms) -> Kilograms {
        burnt_h2 * water::WATER_PER_H2 * self.efficiency
    }
}

/// Turbine compressing and liquefying CO2 during a dive.
#[derive(Copy, Clone, Debug)]
pub struct CompressionTurbine {
    pub efficiency: f64,
}

impl CompressionTurbine {
    pub fn liquefy(&self, power: Watts, duration: Seconds) -> Kilograms {
        Kilograms(power.0 * duration.0 * self.efficiency / LIQUEFACTION_ENERGY.0)
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Systems {
    pub electrolyser: Electrolyser,
    pub collector: WaterCollector,
    pub condenser: Condenser,
    pub turbine: CompressionTurbine,
}

impl From<&Equipment> for Systems {
    fn from(equipment: &Equipment) -> Self {
        Self {
            electrolyser: Electrolyser {
                max_power: equipment.electrolyser_power,
                efficiency: equipment.electrolyser_efficiency,
            },
            collector: WaterCollector {
                section: equipment.collector_section,
                efficiency: equipment.collector_efficiency,
            },
            condenser: Condenser { efficiency: equipment.condenser_efficiency },
            turbine: CompressionTurbine { efficiency: equipment.compression_efficiency },
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn electrolyser() -> Electrolyser {
        Electrolyser { max_power: Watts(400.0), efficiency: 0.75 }
    }

    #[test]
    fn electrolysis_is_power_limited() {
        let electrolysis = electrolyser().run(Watts(1000.0), Seconds(3600.0), Kilograms(5.0));
        let expected_h2 = 400.0 * 3600.0 * 0.75 / (39.4 * 3.6e6);
        assert_abs_diff_eq!(electrolysis.h2.0, expected_h2, epsilon = 1e-12);
        assert_abs_diff_eq!(electrolysis.o2.0, expected_h2 * 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(electrolysis.water.0, expected_h2 * 9.0, epsilon = 1e-12);
    }

    #[test]
    fn electrolysis_is_water_limited() {
        let electrolysis = electrolyser().run(Watts(400.0), Seconds(3600.0), Kilograms(0.009));
        assert_abs_diff_eq!(electrolysis.water.0, 0.009);
        assert_abs_diff_eq!(electrolysis.h2.0, 0.001, epsilon = 1e-15);
    }

    #[test]
    fn condenser() {
        assert_abs_diff_eq!(Condenser { efficiency: 0.95 }.recover(Kilograms(0.01)).0, 0.0855, epsilon = 1e-12);
    }

    #[test]
    fn collector_dries_out_with_altitude() {
        let collector = WaterCollector { section: SquareMetres(0.1), efficiency: 0.12 };
        let low = collector.collect(MetresPerSecond(25.0), Metres(1000.0), Seconds(3600.0));
        let high = collector.collect(MetresPerSecond(25.0), Metres(4000.0), Seconds(3600.0));
        assert!(low > high);
        assert!(high > Kilograms::ZERO);
    }

    #[test]
    fn dive_liquefaction() {
        let turbine = CompressionTurbine { efficiency: 0.7 };
        assert_abs_diff_eq!(turbine.liquefy(Watts(100_000.0), Seconds(600.0)).0, 140.0, epsilon = 1e-9);
    }
}
