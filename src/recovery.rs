//! Reversible nose turbine and the dive recharge of the liquid CO2.
//!
//! The same rotor is driven by the CO2 expansion for thrust, by the relative wind to feed the
//! electrolyser, or by a dive to liquefy the CO2 again. The protocol picks one mode per hour.

use std::{
    f64::consts::TAU,
    fmt::{Display, Formatter},
};

use bon::Builder;
use comfy_table::Color;
use serde::Serialize;

use crate::{
    config::{Glider, Reservoirs},
    flight::Electrolyser,
    physics::{
        aero,
        constants::{GRAVITY, co2, water::WATER_PER_H2},
        wind,
    },
    prelude::*,
    quantity::{
        area::SquareMetres,
        density::KilogramsPerCubicMetre,
        energy::{Joules, WattHours},
        length::Metres,
        mass::Kilograms,
        power::Watts,
        pressure::Pascals,
        speed::MetresPerSecond,
        temperature::Kelvin,
        time::{Hours, Seconds},
    },
};

/// Climb rate above which the turbine idles and the thermal does the work.
const STRONG_THERMAL: MetresPerSecond = MetresPerSecond(3.0);

/// Sink rate beyond which thrust is needed.
const THRUST_NEEDED: MetresPerSecond = MetresPerSecond(-1.0);

/// Airspeed from which the glider counts as diving.
const DIVE_SPEED: MetresPerSecond = MetresPerSecond(50.0);

/// Liquid CO2 under which a dive is spent compressing.
const REFILL_BELOW: Kilograms = Kilograms(40.0);

/// CO2 flow through the turbine in propulsion, kg/s.
const PROPULSION_FLOW: f64 = 0.1;
const PROPULSION_PRESSURE_BARS: f64 = 60.0;
const PROPULSION_TEMPERATURE: Kelvin = Kelvin(500.0);

/// Share of the hour spent under thrust.
const PROPULSION_DUTY: f64 = 0.1;

/// Hydrogen burnt by the sparks over an hour of propulsion.
const SPARK_H2: Kilograms = Kilograms(0.005);

/// Average height lost over an hour of regeneration.
const REGENERATION_SINK: Metres = Metres(50.0);

const COMPRESSION_ANGLE_DEGREES: f64 = 25.0;
const COMPRESSION_DURATION: Seconds = Seconds(600.0);

/// Energy to compress and cool one kilogram of CO2 down to a liquid.
const LIQUEFACTION_ENERGY: Joules = Joules(200_000.0);

/// Power the triboelectric film must deliver for a reliable H2 ignition.
pub const IGNITION_POWER: Watts = Watts(2.0);

/// Power an electric compressor would need to liquefy the CO2.
pub const COMPRESSOR_DEMAND: Watts = Watts(8000.0);

const CEILING: Metres = Metres(4000.0);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbineMode {
    /// CO2 expansion drives the rotor: thrust.
    Propulsion,

    /// Relative wind drives the rotor: electricity for the electrolyser.
    Regeneration,

    /// A dive drives the rotor: CO2 liquefaction.
    Compression,

    /// Strong thermal, the rotor is feathered.
    Idle,
}

impl Display for TurbineMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Propulsion => write!(f, "Propulsion"),
            Self::Regeneration => write!(f, "Régénération"),
            Self::Compression => write!(f, "Compression"),
            Self::Idle => write!(f, "Repos"),
        }
    }
}

impl TurbineMode {
    pub const fn color(self) -> Color {
        match self {
            Self::Propulsion => Color::DarkYellow,
            Self::Regeneration => Color::Green,
            Self::Compression => Color::Blue,
            Self::Idle => Color::Cyan,
        }
    }

    /// Pick the mode for the airspeed, the vertical speed (positive upwards) and the liquid CO2 left.
    pub fn decide(speed: MetresPerSecond, vertical_speed: MetresPerSecond, liquid_co2: Kilograms) -> Self {
        if vertical_speed > STRONG_THERMAL {
            Self::Idle
        } else if speed > DIVE_SPEED && liquid_co2 < REFILL_BELOW {
            Self::Compression
        } else if vertical_speed >= THRUST_NEEDED {
            Self::Regeneration
        } else {
            Self::Propulsion
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct TurbineState {
    pub mode: TurbineMode,
    pub rpm: f64,

    /// Negative when the rotor consumes CO2.
    pub mechanical_power: Watts,

    pub electrical_power: Watts,

    /// N·m, negative when the rotor consumes CO2.
    pub torque: f64,

    pub efficiency: f64,
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct RegenerativeTurbine {
    pub radius: Metres,
    pub power_coefficient: f64,
    pub mechanical_efficiency: f64,
    pub generator_efficiency: f64,
    pub max_rpm: f64,
    pub regeneration_tip_speed_ratio: f64,
    pub compression_tip_speed_ratio: f64,
}

impl Default for RegenerativeTurbine {
    fn default() -> Self {
        Self {
            radius: Metres(0.25),
            power_coefficient: 0.45,
            mechanical_efficiency: 0.92,
            generator_efficiency: 0.85,
            max_rpm: 12_000.0,
            regeneration_tip_speed_ratio: 6.5,
            compression_tip_speed_ratio: 5.0,
        }
    }
}

/// Torque for the unclamped rotor speed, zero for a still rotor.
fn torque(power: Watts, rpm: f64) -> f64 {
    let omega = rpm * TAU / 60.0;
    if omega > 0.0 { power.0 / omega } else { 0.0 }
}

impl RegenerativeTurbine {
    fn area(&self) -> SquareMetres {
        SquareMetres::disc(self.radius)
    }

    fn shaft_power(&self, density: KilogramsPerCubicMetre, speed: MetresPerSecond) -> Watts {
        wind::turbine_power(density, self.area(), speed, self.power_coefficient)
    }

    pub fn regeneration(&self, speed: MetresPerSecond, density: KilogramsPerCubicMetre) -> TurbineState {
        let mechanical_power = self.shaft_power(density, speed) * self.mechanical_efficiency;
        let rpm = wind::rotor_speed_rpm(self.regeneration_tip_speed_ratio, speed, self.radius);
        TurbineState {
            mode: TurbineMode::Regeneration,
            rpm: rpm.min(self.max_rpm),
            mechanical_power,
            electrical_power: mechanical_power * self.generator_efficiency,
            torque: torque(mechanical_power, rpm),
            efficiency: self.power_coefficient * self.mechanical_efficiency * self.generator_efficiency,
        }
    }

    /// Isentropic expansion `cp·T·(1 − (P₀/P)^((γ−1)/γ))` of the CO2 flow, in kg/s, down to one bar.
    pub fn propulsion(&self, co2_flow: f64, inlet_pressure: Pascals, temperature: Kelvin) -> TurbineState {
        let gamma = co2::CP / co2::CV;
        let pressure_ratio = Pascals::from_bars(1.0) / inlet_pressure;
        let specific_work = co2::CP * temperature.0 * (1.0 - pressure_ratio.powf((gamma - 1.0) / gamma));
        let mechanical_power = Watts(co2_flow * specific_work * self.mechanical_efficiency);
        let rpm = 3000.0 + co2_flow * 10_000.0;
        TurbineState {
            mode: TurbineMode::Propulsion,
            rpm: rpm.min(self.max_rpm),
            mechanical_power: -mechanical_power,
            electrical_power: Watts::ZERO,
            torque: -torque(mechanical_power, rpm),
            efficiency: self.mechanical_efficiency,
        }
    }

    /// Gravity and the relative wind drive the compressor, returns the liquefied CO2 flow in kg/s.
    pub fn compression(
        &self,
        speed: MetresPerSecond,
        angle_degrees: f64,
        mass: Kilograms,
        density: KilogramsPerCubicMetre,
    ) -> (TurbineState, f64) {
        let gravity = aero::dive_power(mass, angle_degrees, speed);
        let mechanical_power = (gravity + self.shaft_power(density, speed)) * self.mechanical_efficiency;
        let rpm = wind::rotor_speed_rpm(self.compression_tip_speed_ratio, speed, self.radius);
        let state = TurbineState {
            mode: TurbineMode::Compression,
            rpm: rpm.min(self.max_rpm),
            mechanical_power,
            electrical_power: Watts::ZERO,
            torque: torque(mechanical_power, rpm),
            efficiency: self.mechanical_efficiency,
        };
        (state, mechanical_power.0 / LIQUEFACTION_ENERGY.0)
    }
}

/// Flight conditions of one hour in the scripted day.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Scenario {
    pub hour: u32,
    pub speed: MetresPerSecond,

    /// Positive upwards.
    pub vertical_speed: MetresPerSecond,

    pub description: &'static str,
}

impl Scenario {
    const fn new(hour: u32, speed: f64, vertical_speed: f64, description: &'static str) -> Self {
        Self { hour, speed: MetresPerSecond(speed), vertical_speed: MetresPerSecond(vertical_speed), description }
    }
}

pub static DAY: [Scenario; 8] = [
    Scenario::new(0, 20.0, -0.5, "Nuit, vol plané"),
    Scenario::new(1, 22.0, -0.3, "Nuit, récupération"),
    Scenario::new(6, 25.0, 0.5, "Aube, premiers thermiques"),
    Scenario::new(10, 20.0, 4.0, "Matin, thermique fort"),
    Scenario::new(12, 55.0, -8.0, "Midi, piqué volontaire"),
    Scenario::new(14, 25.0, 2.0, "Après-midi, thermique moyen"),
    Scenario::new(18, 22.0, 0.0, "Soir, croisière"),
    Scenario::new(22, 20.0, -0.5, "Nuit, vol plané"),
];

#[derive(Copy, Clone, Debug, Serialize)]
pub struct RecoveryHour {
    pub scenario: Scenario,
    pub turbine: TurbineState,
    pub teng_power: Watts,

    /// Applied changes of the reservoirs, after clamping to the tanks.
    pub h2: Kilograms,
    pub water: Kilograms,
    pub liquid_co2: Kilograms,

    pub energy_produced: WattHours,
    pub energy_consumed: WattHours,
    pub altitude_start: Metres,
    pub altitude_end: Metres,
}

impl RecoveryHour {
    pub fn net_energy(&self) -> WattHours {
        self.energy_produced - self.energy_consumed
    }
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Recovery<'a> {
    glider: &'a Glider,

    #[builder(default = DAY.as_slice())]
    scenarios: &'a [Scenario],

    #[builder(default = KilogramsPerCubicMetre(1.0))]
    air_density: KilogramsPerCubicMetre,

    #[builder(default)]
    turbine: RegenerativeTurbine,
}

impl<S: recovery_builder::IsComplete> RecoveryBuilder<'_, S> {
    pub fn run(self) -> RecoveryDay {
        self.build().run()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RecoveryDay {
    pub initial: Reservoirs,

    #[serde(rename = "final")]
    pub final_: Reservoirs,

    pub final_altitude: Metres,
    pub hours: Vec<RecoveryHour>,
}

impl RecoveryDay {
    pub fn h2_balance(&self) -> Kilograms {
        self.hours.iter().map(|hour| hour.h2).sum()
    }

    pub fn liquid_co2_balance(&self) -> Kilograms {
        self.hours.iter().map(|hour| hour.liquid_co2).sum()
    }

    pub fn net_energy(&self) -> WattHours {
        self.hours.iter().map(RecoveryHour::net_energy).sum()
    }

    /// The electrolyser made more hydrogen than the sparks burnt.
    pub fn h2_regenerated(&self) -> bool {
        self.h2_balance() > Kilograms::ZERO
    }
}

/// Move the level by the delta within `[0, capacity]`, returning the applied change.
fn adjust(level: &mut Kilograms, delta: Kilograms, capacity: Kilograms) -> Kilograms {
    let target = (*level + delta).min(capacity).max(Kilograms::ZERO);
    let applied = target - *level;
    *level = target;
    applied
}

impl Recovery<'_> {
    fn mass(&self, reservoirs: &Reservoirs) -> Kilograms {
        self.glider.empty_mass() + reservoirs.total()
    }

    #[instrument(skip_all, fields(n_hours = self.scenarios.len()))]
    fn run(self) -> RecoveryDay {
        let glider = self.glider;
        let initial = glider.initial.reservoirs();
        let mut reservoirs = initial;
        let mut altitude = glider.initial.altitude;
        let electrolyser = Electrolyser {
            max_power: glider.equipment.electrolyser_power,
            efficiency: glider.equipment.electrolyser_efficiency,
        };

        let mut hours = Vec::with_capacity(self.scenarios.len());
        for scenario in self.scenarios {
            let mode = TurbineMode::decide(scenario.speed, scenario.vertical_speed, reservoirs.co2);
            let teng_power = glider.teng.power(scenario.speed);
            let mut hour = RecoveryHour {
                scenario: *scenario,
                turbine: TurbineState {
                    mode,
                    rpm: 0.0,
                    mechanical_power: Watts::ZERO,
                    electrical_power: Watts::ZERO,
                    torque: 0.0,
                    efficiency: 0.0,
                },
                teng_power,
                h2: Kilograms::ZERO,
                water: Kilograms::ZERO,
                liquid_co2: Kilograms::ZERO,
                energy_produced: WattHours::ZERO,
                energy_consumed: WattHours::ZERO,
                altitude_start: altitude,
                altitude_end: altitude,
            };
            let climb = match mode {
                TurbineMode::Idle => Metres(scenario.vertical_speed.0 * Seconds::from(Hours::ONE).0),
                TurbineMode::Regeneration => {
                    let state = self.turbine.regeneration(scenario.speed, self.air_density);
                    let electrolysis =
                        electrolyser.run(state.electrical_power, Seconds::from(Hours::ONE), reservoirs.water);
                    hour.h2 = adjust(&mut reservoirs.h2, electrolysis.h2, glider.capacity.h2);
                    hour.water = adjust(&mut reservoirs.water, -electrolysis.water, glider.capacity.water);
                    hour.energy_produced = (state.electrical_power + teng_power) * Hours::ONE;
                    hour.turbine = state;
                    -REGENERATION_SINK
                }
                TurbineMode::Propulsion => {
                    let state = self.turbine.propulsion(
                        PROPULSION_FLOW,
                        Pascals::from_bars(PROPULSION_PRESSURE_BARS),
                        PROPULSION_TEMPERATURE,
                    );
                    let expanded = Kilograms(PROPULSION_FLOW * Seconds::from(Hours::ONE).0 * PROPULSION_DUTY);
                    hour.liquid_co2 = adjust(&mut reservoirs.co2, -expanded, glider.capacity.co2);
                    hour.h2 = adjust(&mut reservoirs.h2, -SPARK_H2, glider.capacity.h2);
                    hour.water = adjust(&mut reservoirs.water, SPARK_H2 * WATER_PER_H2, glider.capacity.water);
                    hour.energy_consumed = state.mechanical_power.abs() * Hours(PROPULSION_DUTY);
                    hour.turbine = state;
                    Metres::ZERO
                }
                TurbineMode::Compression => {
                    let (state, flow) = self.turbine.compression(
                        scenario.speed,
                        COMPRESSION_ANGLE_DEGREES,
                        self.mass(&reservoirs),
                        self.air_density,
                    );
                    let liquefied = Kilograms(flow * COMPRESSION_DURATION.0);
                    hour.liquid_co2 = adjust(&mut reservoirs.co2, liquefied, glider.capacity.co2);
                    hour.turbine = state;
                    -Metres(scenario.speed.0 * COMPRESSION_ANGLE_DEGREES.to_radians().sin() * COMPRESSION_DURATION.0)
                }
            };
            altitude = (altitude + climb).min(CEILING).max(Metres::ZERO);
            hour.altitude_end = altitude;
            debug!(
                hour = scenario.hour,
                %mode,
                h2 = %reservoirs.h2,
                co2 = %reservoirs.co2,
                altitude = %altitude,
            );
            hours.push(hour);
        }

        let day = RecoveryDay { initial, final_: reservoirs, final_altitude: altitude, hours };
        if day.h2_regenerated() {
            info!(h2 = %day.h2_balance(), co2 = %day.liquid_co2_balance(), "the turbine regenerates");
        } else {
            warn!(h2 = %day.h2_balance(), co2 = %day.liquid_co2_balance(), "hydrogen deficit");
        }
        day
    }
}

/// One dive spent liquefying CO2, with gravity and the relative wind driving the turbine.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct DiveRecharge {
    pub mass: Kilograms,
    pub turbine_radius: Metres,
    pub power_coefficient: f64,
    pub compression_efficiency: f64,

    /// Per kilogram of CO2.
    pub liquefaction_energy: Joules,

    pub speed: MetresPerSecond,
    pub angle_degrees: f64,
    pub duration: Seconds,
    pub initial_altitude: Metres,
    pub air_density: KilogramsPerCubicMetre,
}

impl Default for DiveRecharge {
    fn default() -> Self {
        Self {
            mass: Kilograms(400.0),
            turbine_radius: Metres(0.25),
            power_coefficient: 0.40,
            compression_efficiency: 0.85,
            liquefaction_energy: LIQUEFACTION_ENERGY,
            speed: MetresPerSecond(55.0),
            angle_degrees: 25.0,
            duration: Seconds(300.0),
            initial_altitude: Metres(4000.0),
            // Around 3000 m.
            air_density: KilogramsPerCubicMetre(0.9),
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct DiveRechargeBalance {
    pub gravity_power: Watts,
    pub turbine_power: Watts,
    pub compression_power: Watts,

    /// kg/s.
    pub liquefaction_rate: f64,

    pub liquefied: Kilograms,
    pub vertical_speed: MetresPerSecond,
    pub altitude_lost: Metres,

    /// Clamped at the ground.
    pub final_altitude: Metres,

    pub potential_energy: Joules,
    pub stored_energy: Joules,
    pub conversion_efficiency: f64,
}

impl DiveRechargeBalance {
    pub fn surplus(&self) -> Watts {
        self.compression_power - COMPRESSOR_DEMAND
    }

    pub fn covers_compressor(&self) -> bool {
        self.compression_power > COMPRESSOR_DEMAND
    }

    /// The dive as configured would need more height than the glider has.
    pub fn hits_ground(&self, initial_altitude: Metres) -> bool {
        self.altitude_lost >= initial_altitude
    }
}

impl DiveRecharge {
    /// Default dive for the loaded glider.
    pub fn for_glider(glider: &Glider) -> Self {
        Self { mass: glider.empty_mass() + glider.initial.reservoirs().total(), ..Self::default() }
    }

    /// Dive time until the ground.
    pub fn max_duration(&self) -> Seconds {
        let vertical_speed = self.speed.0 * self.angle_degrees.to_radians().sin();
        if vertical_speed > 0.0 { Seconds(self.initial_altitude.0 / vertical_speed) } else { Seconds(f64::INFINITY) }
    }

    pub fn compute(&self) -> DiveRechargeBalance {
        let gravity_power = aero::dive_power(self.mass, self.angle_degrees, self.speed);
        let turbine_power = wind::turbine_power(
            self.air_density,
            SquareMetres::disc(self.turbine_radius),
            self.speed,
            self.power_coefficient,
        );
        let compression_power = (gravity_power + turbine_power) * self.compression_efficiency;
        let liquefaction_rate = compression_power.0 / self.liquefaction_energy.0;
        let liquefied = Kilograms(liquefaction_rate * self.duration.0);

        let vertical_speed = self.speed * self.angle_degrees.to_radians().sin();
        let altitude_lost = Metres(vertical_speed.0 * self.duration.0);
        let potential_energy = Joules(self.mass.0 * GRAVITY * altitude_lost.0);
        let stored_energy = self.liquefaction_energy * liquefied.0;

        DiveRechargeBalance {
            gravity_power,
            turbine_power,
            compression_power,
            liquefaction_rate,
            liquefied,
            vertical_speed,
            altitude_lost,
            final_altitude: (self.initial_altitude - altitude_lost).max(Metres::ZERO),
            potential_energy,
            stored_energy,
            conversion_efficiency: if potential_energy.0 > 0.0 { stored_energy / potential_energy } else { 0.0 },
        }
    }
}
