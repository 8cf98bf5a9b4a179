//! Closed-form checks run before a flight, and the closed CO2/N2 cylinder cycle.

use serde::Serialize;

use crate::{
    config::Glider,
    physics::{
        aero,
        atmosphere,
        constants::{GRAVITY, co2, h2},
        thermo::{self, Cycle, CycleBalance},
        wind,
    },
    quantity::{
        area::SquareMetres,
        density::KilogramsPerCubicMetre,
        energy::Joules,
        length::Metres,
        mass::Kilograms,
        power::Watts,
        pressure::Pascals,
        speed::MetresPerSecond,
        temperature::Kelvin,
        time::{Hours, Seconds},
    },
};

/// Wing loading above which the glider performs poorly, kg/m².
pub const MAX_WING_LOADING: f64 = 50.0;

const CRUISE_ALTITUDE: Metres = Metres(3000.0);

/// Outside air at the cruise altitude.
const COLD_SOURCE: Kelvin = Kelvin(268.0);

/// Expansion chamber after combustion.
const HOT_SOURCE: Kelvin = Kelvin(800.0);

const CHECK_CYCLE_MASS: Kilograms = Kilograms(0.5);
const CHECK_CYCLE_EFFICIENCY: f64 = 0.85;
const CHECK_DIVE_ANGLE_DEGREES: f64 = 30.0;
const CHECK_DIVE_SPEED: MetresPerSecond = MetresPerSecond(50.0);
const CHECK_HIGH_PRESSURE_BARS: f64 = 60.0;

/// Hydrogen burnt by one spark, heating the cycle charge from the liquid CO2 temperature.
const CHECK_SPARK_H2: Kilograms = Kilograms(0.001);
const LIQUID_CO2_TEMPERATURE: Kelvin = Kelvin(280.0);

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Checks {
    pub mass: Kilograms,
    pub empty_mass: Kilograms,
    pub fluids: Kilograms,

    /// kg/m².
    pub wing_loading: f64,

    pub cold: Kelvin,
    pub hot: Kelvin,
    pub carnot: f64,
    pub cycle: CycleBalance,
    pub cruise_speed: MetresPerSecond,

    /// Forces at the cruise speed, N.
    pub cruise_lift: f64,
    pub cruise_drag: f64,

    pub level_flight_power: Watts,
    pub dive_power: Watts,

    /// CO2 stays liquid in the tank: cold source between the triple and critical points,
    /// storage pressure below the critical pressure.
    pub co2_condenses: bool,

    pub co2_storage_pressure: Pascals,

    /// Tank volume for the initial CO2 held as a liquid, m³.
    pub co2_tank_volume: f64,

    /// Heat to reject to liquefy the initial CO2.
    pub co2_condensation_heat: Joules,

    pub spark_heat: Joules,

    /// Temperature of the cycle charge after one spark.
    pub spark_temperature: Kelvin,
}

impl Checks {
    pub fn compute(glider: &Glider) -> Self {
        let empty_mass = glider.empty_mass();
        let fluids = glider.initial.reservoirs().total();
        let mass = empty_mass + fluids;
        let aerodynamics = &glider.aerodynamics;
        let drag_coefficient = aero::drag_coefficient(
            aerodynamics.parasitic_drag,
            aerodynamics.induced_drag_factor,
            aerodynamics.cruise_lift_coefficient,
        );
        let cruise_density = atmosphere::density(CRUISE_ALTITUDE);
        let cruise_speed = aero::equilibrium_speed(
            mass,
            cruise_density,
            glider.geometry.wing_area,
            aerodynamics.cruise_lift_coefficient,
        );
        let spark_heat = thermo::combustion_heat(CHECK_SPARK_H2, h2::LOWER_HEATING_VALUE);
        let cycle = Cycle {
            mass: CHECK_CYCLE_MASS,
            cold: COLD_SOURCE,
            hot: HOT_SOURCE,
            low_pressure: Pascals::from_bars(1.0),
            high_pressure: Pascals::from_bars(CHECK_HIGH_PRESSURE_BARS),
            mechanical_efficiency: CHECK_CYCLE_EFFICIENCY,
        };
        Self {
            mass,
            empty_mass,
            fluids,
            wing_loading: mass.0 / glider.geometry.wing_area.0,
            cold: COLD_SOURCE,
            hot: HOT_SOURCE,
            carnot: thermo::carnot(COLD_SOURCE, HOT_SOURCE),
            cycle: cycle.compute(),
            cruise_speed,
            cruise_lift: aero::lift(
                cruise_density,
                cruise_speed,
                glider.geometry.wing_area,
                aerodynamics.cruise_lift_coefficient,
            ),
            cruise_drag: aero::drag(cruise_density, cruise_speed, glider.geometry.wing_area, drag_coefficient),
            level_flight_power: aero::level_flight_power(
                mass,
                cruise_density,
                glider.geometry.wing_area,
                aerodynamics.cruise_lift_coefficient,
                drag_coefficient,
            ),
            dive_power: aero::dive_power(mass, CHECK_DIVE_ANGLE_DEGREES, CHECK_DIVE_SPEED),
            co2_condenses: co2::TRIPLE_POINT_TEMPERATURE < COLD_SOURCE
                && COLD_SOURCE < co2::CRITICAL_TEMPERATURE
                && cycle.high_pressure < co2::CRITICAL_PRESSURE,
            co2_storage_pressure: cycle.high_pressure,
            co2_tank_volume: glider.initial.co2.0 / co2::LIQUID_DENSITY.0,
            co2_condensation_heat: co2::LATENT_HEAT * glider.initial.co2.0,
            spark_heat,
            spark_temperature: thermo::temperature_after_heating(
                LIQUID_CO2_TEMPERATURE,
                spark_heat,
                CHECK_CYCLE_MASS,
                co2::CP,
            ),
        }
    }

    pub fn wing_loading_is_acceptable(&self) -> bool {
        self.wing_loading < MAX_WING_LOADING
    }

    /// The heat input only counts the isochoric heating, so the ideal cycle can report more
    /// than the Carnot bound.
    pub fn cycle_exceeds_carnot(&self) -> bool {
        self.cycle.thermal_efficiency > self.carnot
    }

    pub fn spark_temperature_rise(&self) -> Kelvin {
        self.spark_temperature - LIQUID_CO2_TEMPERATURE
    }
}

/// Closed loop of nitrogen-enriched CO2 driving small pneumatic cylinders.
///
/// The fluid is compressed into the storage during dives, and expanded through the
/// cylinders at night.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ClosedCycle {
    pub fluid_mass: Kilograms,
    pub nitrogen_fraction: f64,
    pub co2_fraction: f64,
    pub mean_temperature: Kelvin,
    pub storage_pressure: Pascals,
    pub injection_pressure: Pascals,
    pub exhaust_pressure: Pascals,

    pub bore: Metres,
    pub stroke: Metres,
    pub cylinders: u32,
    pub rpm: f64,
    pub indicated_efficiency: f64,
    pub mechanical_efficiency: f64,

    pub aircraft_mass: Kilograms,
    pub dive_speed: MetresPerSecond,
    pub dive_angle_degrees: f64,
    pub dive_duration: Seconds,
    pub dives_per_day: u32,
    pub turbine_air_density: KilogramsPerCubicMetre,
    pub turbine_diameter: Metres,
    pub turbine_power_coefficient: f64,
    pub compression_efficiency: f64,

    /// Heat capacity ratio of the N2/CO2 mixture.
    pub gamma: f64,

    pub isentropic_efficiency: f64,
    pub night: Hours,
}

impl Default for ClosedCycle {
    fn default() -> Self {
        Self {
            fluid_mass: Kilograms(12.0),
            nitrogen_fraction: 0.78,
            co2_fraction: 0.04,
            mean_temperature: Kelvin(280.0),
            storage_pressure: Pascals::from_bars(60.0),
            injection_pressure: Pascals::from_bars(25.0),
            exhaust_pressure: Pascals::from_bars(1.5),
            bore: Metres(0.020),
            stroke: Metres(0.022),
            cylinders: 3,
            rpm: 1000.0,
            indicated_efficiency: 0.72,
            mechanical_efficiency: 0.87,
            aircraft_mass: Kilograms(850.0),
            dive_speed: MetresPerSecond(55.0),
            dive_angle_degrees: 25.0,
            dive_duration: Seconds(60.0),
            dives_per_day: 6,
            turbine_air_density: KilogramsPerCubicMetre(0.82),
            turbine_diameter: Metres(0.50),
            turbine_power_coefficient: 0.40,
            compression_efficiency: 0.75,
            gamma: 1.35,
            isentropic_efficiency: 0.70,
            night: Hours(12.0),
        }
    }
}

/// Specific gas constants, J/(kg·K).
const NITROGEN_GAS_CONSTANT: f64 = 296.8;
const CO2_GAS_CONSTANT: f64 = 188.9;

#[derive(Copy, Clone, Debug, Serialize)]
pub struct ClosedCycleBalance {
    /// J/(kg·K).
    pub gas_constant: f64,

    /// m³, all cylinders.
    pub displacement: f64,

    pub mass_per_cycle: Kilograms,

    /// J/kg.
    pub specific_work: f64,

    pub work_per_cycle: Joules,
    pub cycles_per_second: f64,
    pub indicated_power: Watts,
    pub effective_power: Watts,

    /// kg/s.
    pub mass_flow: f64,

    /// Time to push the whole fluid mass through the cylinders once.
    pub circulation_time: Seconds,

    pub gravity_power: Watts,
    pub turbine_power: Watts,
    pub compression_power: Watts,
    pub energy_per_dive: Joules,
    pub daily_recharge: Joules,

    /// J/kg.
    pub compression_specific_work: f64,

    pub compressible_mass: Kilograms,
    pub night_energy: Joules,
    pub round_trip_efficiency: f64,
}

impl ClosedCycleBalance {
    /// Usual round-trip range of compressed-gas storage.
    pub fn is_plausible(&self) -> bool {
        (0.15..0.35).contains(&self.round_trip_efficiency)
    }
}

impl ClosedCycle {
    pub fn compute(&self) -> ClosedCycleBalance {
        let gas_constant =
            self.nitrogen_fraction * NITROGEN_GAS_CONSTANT + self.co2_fraction * CO2_GAS_CONSTANT;
        let rt = gas_constant * self.mean_temperature.0;

        let bore_area = SquareMetres::disc(self.bore / 2.0);
        let displacement = bore_area.0 * self.stroke.0 * f64::from(self.cylinders);
        let injection_density = self.injection_pressure.0 / rt;
        let mass_per_cycle = Kilograms(injection_density * displacement);

        let specific_work = rt * (self.injection_pressure / self.exhaust_pressure).ln();
        let work_per_cycle = Joules(mass_per_cycle.0 * specific_work);

        // Four strokes: one cycle every two revolutions.
        let cycles_per_second = self.rpm / 120.0;
        let indicated_power = Watts(work_per_cycle.0 * cycles_per_second);
        let effective_power = indicated_power * (self.indicated_efficiency * self.mechanical_efficiency);

        let mass_flow = mass_per_cycle.0 * cycles_per_second;
        let circulation_time = Seconds(self.fluid_mass.0 / mass_flow);

        let gravity_power = aero::dive_power(self.aircraft_mass, self.dive_angle_degrees, self.dive_speed);
        let turbine_power = wind::turbine_power(
            self.turbine_air_density,
            SquareMetres::disc(self.turbine_diameter / 2.0),
            self.dive_speed,
            self.turbine_power_coefficient,
        );
        let compression_power = (gravity_power + turbine_power) * self.compression_efficiency;
        let energy_per_dive = Joules(compression_power.0 * self.dive_duration.0);
        let daily_recharge = energy_per_dive * f64::from(self.dives_per_day);

        let exponent = (self.gamma - 1.0) / self.gamma;
        let compression_specific_work = self.gamma / (self.gamma - 1.0)
            * rt
            * ((self.storage_pressure / self.exhaust_pressure).powf(exponent) - 1.0)
            / self.isentropic_efficiency;
        let compressible_mass = Kilograms(daily_recharge.0 / compression_specific_work);

        let night_energy = Joules(effective_power.0 * Seconds::from(self.night).0);

        ClosedCycleBalance {
            gas_constant,
            displacement,
            mass_per_cycle,
            specific_work,
            work_per_cycle,
            cycles_per_second,
            indicated_power,
            effective_power,
            mass_flow,
            circulation_time,
            gravity_power,
            turbine_power,
            compression_power,
            energy_per_dive,
            daily_recharge,
            compression_specific_work,
            compressible_mass,
            night_energy,
            round_trip_efficiency: night_energy / daily_recharge,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn default_glider_checks() {
        let checks = Checks::compute(&Glider::default());
        assert_abs_diff_eq!(checks.empty_mass.0, 328.0);
        assert_abs_diff_eq!(checks.mass.0, 397.0);
        assert_abs_diff_eq!(checks.wing_loading, 397.0 / 15.0);
        assert!(checks.wing_loading_is_acceptable());
        assert_abs_diff_eq!(checks.carnot, 0.665, epsilon = 1e-12);
        assert_abs_diff_eq!(checks.cycle.net_work.0, 205_754.263, epsilon = 1e-3);
        assert_abs_diff_eq!(checks.cycle.heat_in.0, 174_762.0, epsilon = 1e-9);
        assert_abs_diff_eq!(checks.cycle.thermal_efficiency, 1.177_340, epsilon = 1e-6);
        assert_abs_diff_eq!(checks.cycle.real_efficiency, 1.000_739, epsilon = 1e-6);
        assert_abs_diff_eq!(checks.dive_power.0, 397.0 * GRAVITY * 25.0, epsilon = 1e-6);
    }

    #[test]
    fn ideal_cycle_beats_carnot() {
        let checks = Checks::compute(&Glider::default());
        assert!(checks.cycle_exceeds_carnot());
        assert!(checks.cycle.real_efficiency > checks.carnot);
    }

    #[test]
    fn one_gram_spark() {
        let checks = Checks::compute(&Glider::default());
        assert_abs_diff_eq!(checks.spark_heat.0, 119_960.0, epsilon = 1e-6);
        assert_abs_diff_eq!(checks.spark_temperature_rise().0, 119_960.0 / (0.5 * 846.0), epsilon = 1e-9);
        assert!(checks.spark_temperature > checks.cold);
    }

    #[test]
    fn co2_storage() {
        let checks = Checks::compute(&Glider::default());
        assert!(checks.co2_condenses);
        assert_abs_diff_eq!(checks.co2_storage_pressure.to_bars(), 60.0, epsilon = 1e-12);
        assert_abs_diff_eq!(checks.co2_tank_volume, 50.0 / 770.0, epsilon = 1e-12);
        assert_abs_diff_eq!(checks.co2_condensation_heat.0, 50.0 * 234_000.0, epsilon = 1e-6);
    }

    #[test]
    fn level_flight_power_at_cruise_altitude() {
        let checks = Checks::compute(&Glider::default());
        assert!(checks.level_flight_power.0 > 2500.0 && checks.level_flight_power.0 < 3500.0);
    }

    #[test]
    fn cruise_forces() {
        let checks = Checks::compute(&Glider::default());
        assert_abs_diff_eq!(checks.cruise_lift, 397.0 * GRAVITY, epsilon = 1e-6);
        assert_abs_diff_eq!(checks.cruise_lift / checks.cruise_drag, 0.8 / 0.024, epsilon = 1e-9);
        assert_abs_diff_eq!(checks.cruise_drag * checks.cruise_speed.0, checks.level_flight_power.0, epsilon = 1e-6);
    }

    #[test]
    fn heavy_glider_has_poor_wing_loading() {
        let mut glider = Glider::default();
        glider.empty.structure = Kilograms(1000.0);
        assert!(!Checks::compute(&glider).wing_loading_is_acceptable());
    }

    #[test]
    fn cylinders() {
        let balance = ClosedCycle::default().compute();
        assert_abs_diff_eq!(balance.gas_constant, 239.06, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.displacement, 2.073_451e-5, epsilon = 1e-11);
        assert_abs_diff_eq!(balance.mass_per_cycle.0, 7.744_06e-4, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.specific_work, 188_320.71, epsilon = 0.01);
        assert_abs_diff_eq!(balance.indicated_power.0, 1215.306, epsilon = 1e-3);
        assert_abs_diff_eq!(balance.effective_power.0, 761.268, epsilon = 1e-3);
        assert_abs_diff_eq!(balance.circulation_time.0, 1859.489, epsilon = 1e-3);
    }

    #[test]
    fn dive_recharge() {
        let balance = ClosedCycle::default().compute();
        assert_abs_diff_eq!(balance.gravity_power.0, 193_753.94, epsilon = 0.01);
        assert_abs_diff_eq!(balance.turbine_power.0, 5357.495, epsilon = 1e-3);
        assert_abs_diff_eq!(balance.daily_recharge.0, 53_760_088.46, epsilon = 0.1);
        assert_abs_diff_eq!(balance.compression_specific_work, 590_966.28, epsilon = 0.01);
        assert_abs_diff_eq!(balance.compressible_mass.0, 90.970, epsilon = 1e-3);
    }

    #[test]
    fn night_round_trip() {
        let balance = ClosedCycle::default().compute();
        assert_abs_diff_eq!(balance.night_energy.0, 32_886_768.72, epsilon = 0.1);
        assert_abs_diff_eq!(balance.round_trip_efficiency, 0.611_732, epsilon = 1e-6);
        assert!(!balance.is_plausible());
    }

    #[test]
    fn slower_engine_is_plausible() {
        let balance = ClosedCycle { rpm: 400.0, ..ClosedCycle::default() }.compute();
        assert!(balance.is_plausible());
    }
}
