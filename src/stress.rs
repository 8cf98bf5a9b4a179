//! Crisis scenario: a few nominal hours, then hours without wind or sun, then recovery.
//!
//! During the crisis the glider only glides. Once it sinks under the rescue altitude,
//! it burns the remaining hydrogen, then the sealed coal, to drive the CO2 cycle and climb back.

use std::fmt::{Display, Formatter};

use bon::Builder;
use comfy_table::Color;
use serde::Serialize;

use crate::{
    config::{Glider, Reservoirs},
    physics::{
        constants::{GAS_CONSTANT, GRAVITY, carbon, co2, h2, isa, water::WATER_PER_H2},
        thermo,
    },
    prelude::*,
    quantity::{
        density::KilogramsPerCubicMetre,
        energy::Joules,
        length::Metres,
        mass::Kilograms,
        pressure::Pascals,
        speed::MetresPerSecond,
        temperature::Kelvin,
        time::Hours,
    },
};

const NOMINAL_HOURS: u32 = 6;
const RECOVERY_HOURS: u32 = 24;

const GLIDE_RATIO: f64 = 40.0;
const BEST_GLIDE_LIFT_COEFFICIENT: f64 = 0.8;
const MAX_HOURLY_LOSS: Metres = Metres(300.0);

/// Share of the natural sink actually lost while gliding on the altitude reserve.
const RESERVE_GLIDE_SHARE: f64 = 0.7;

/// Share of the natural sink lost while the engine runs.
const POWERED_SINK_SHARE: f64 = 0.5;

const RESCUE_ALTITUDE: Metres = Metres(2000.0);
const FLOOR: Metres = Metres(500.0);
const CEILING: Metres = Metres(4000.0);
const RESCUE_CLIMB: Metres = Metres(800.0);

const CYCLE_MASS: Kilograms = Kilograms(0.5);
const HOT_SOURCE: Kelvin = Kelvin(800.0);
const CYCLE_LOSSES: f64 = 0.65;
const H2_EFFECTIVENESS: f64 = 0.7;
const COAL_EFFECTIVENESS: f64 = 0.65;

/// Share of the engine energy turned into climb.
const THRUST_SHARE: f64 = 0.4;

/// Hydrogen kept in the tank, never burnt.
const H2_RESERVE: Kilograms = Kilograms(0.001);

/// Water condensed from the coal combustion products, per kilogram of coal.
const WATER_PER_COAL: f64 = 0.5;

const CAPTURE_HUMIDITY: f64 = 0.4;

/// Water captured per hour and per unit of humidity.
const CAPTURE_RATE: Kilograms = Kilograms(0.05);

const SUNNY: f64 = 0.5;
const THERMAL_CLIMB: Metres = Metres(100.0);

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Weather {
    pub wind: MetresPerSecond,

    /// Sunshine fraction.
    pub sun: f64,

    pub humidity: f64,
    pub temperature: Kelvin,
    pub pressure: Pascals,
}

impl Weather {
    const fn new(wind: f64, sun: f64, humidity: f64) -> Self {
        Self {
            wind: MetresPerSecond(wind),
            sun,
            humidity,
            temperature: Kelvin(288.0),
            pressure: Pascals(101_325.0),
        }
    }

    pub const NOMINAL: Self = Self::new(8.0, 0.8, 0.6);
    pub const CRISIS: Self = Self::new(0.0, 0.0, 0.2);
    pub const RECOVERY: Self = Self::new(6.0, 0.7, 0.5);

    fn air_density(&self) -> KilogramsPerCubicMetre {
        KilogramsPerCubicMetre(self.pressure.0 * isa::AIR_MOLAR_MASS / (GAS_CONSTANT * self.temperature.0))
    }
}

#[derive(Debug, Hash, Serialize, enumset::EnumSetType)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Nominal,
    Crisis,
    Recovery,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nominal => write!(f, "Avant la crise"),
            Self::Crisis => write!(f, "Crise totale"),
            Self::Recovery => write!(f, "Récupération"),
        }
    }
}

impl Phase {
    pub const fn weather(self) -> Weather {
        match self {
            Self::Nominal => Weather::NOMINAL,
            Self::Crisis => Weather::CRISIS,
            Self::Recovery => Weather::RECOVERY,
        }
    }
}

/// What the glider did during the hour.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Gliding down on the altitude reserve.
    Glide,

    /// Rescue climb on the hydrogen left.
    Hydrogen,

    /// Rescue climb that had to open the sealed coal.
    Coal,

    /// Under the rescue altitude with nothing left to burn.
    Stranded,

    /// Electrolysis, water capture and thermals are back.
    Regenerate,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Glide => write!(f, "Vol plané, réserve d'altitude"),
            Self::Hydrogen => write!(f, "H2 de secours"),
            Self::Coal => write!(f, "Charbon activé"),
            Self::Stranded => write!(f, "Plus rien à brûler"),
            Self::Regenerate => write!(f, "Régénération"),
        }
    }
}

impl Action {
    pub const fn color(self) -> Color {
        match self {
            Self::Glide => Color::Cyan,
            Self::Hydrogen => Color::DarkYellow,
            Self::Coal => Color::Red,
            Self::Stranded => Color::DarkRed,
            Self::Regenerate => Color::Green,
        }
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub struct StressHour {
    pub hour: u32,
    pub phase: Phase,
    pub action: Action,
    pub altitude_start: Metres,
    pub altitude_end: Metres,
    pub h2_burnt: Kilograms,
    pub coal_burnt: Kilograms,
    pub co2_produced: Kilograms,
    pub water_produced: Kilograms,
    pub engine_energy: Joules,
    pub cycles: u32,
}

impl StressHour {
    const fn new(hour: u32, phase: Phase, altitude: Metres) -> Self {
        Self {
            hour,
            phase,
            action: Action::Glide,
            altitude_start: altitude,
            altitude_end: altitude,
            h2_burnt: Kilograms::ZERO,
            coal_burnt: Kilograms::ZERO,
            co2_produced: Kilograms::ZERO,
            water_produced: Kilograms::ZERO,
            engine_energy: Joules::ZERO,
            cycles: 0,
        }
    }
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Stress<'a> {
    glider: &'a Glider,

    #[builder(default = 48)]
    crisis_hours: u32,

    /// Overrides the initial coal of the glider.
    coal: Option<Kilograms>,
}

impl<S: stress_builder::IsComplete> StressBuilder<'_, S> {
    pub fn run(self) -> StressOutcome {
        self.build().run()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StressOutcome {
    pub crisis_hours: u32,
    pub initial: Reservoirs,

    #[serde(rename = "final")]
    pub final_: Reservoirs,

    pub final_altitude: Metres,
    pub min_altitude: Metres,
    pub coal_used: Kilograms,
    pub h2_used: Kilograms,
    pub engine_cycles: u64,
    pub hours: Vec<StressHour>,
    pub survived: bool,
}

impl StressOutcome {
    /// Hydrogen after recovery compared to the beginning of the crisis.
    pub fn h2_regenerated(&self) -> bool {
        self.final_.h2 > self.initial.h2
    }

    pub fn coal_used_fraction(&self) -> f64 {
        if self.initial.coal > Kilograms::ZERO { self.coal_used / self.initial.coal } else { 0.0 }
    }

    pub fn safety_margin(&self) -> bool {
        self.min_altitude > FLOOR
    }
}

struct Tanks<'a> {
    glider: &'a Glider,
    altitude: Metres,
    reservoirs: Reservoirs,
    coal_used: Kilograms,
    h2_used: Kilograms,
    engine_cycles: u64,
}

impl Stress<'_> {
    #[instrument(skip_all, fields(crisis_hours = self.crisis_hours))]
    fn run(self) -> StressOutcome {
        let mut reservoirs = self.glider.initial.reservoirs();
        if let Some(coal) = self.coal {
            reservoirs.coal = coal;
        }
        let initial = reservoirs;
        let mut tanks = Tanks {
            glider: self.glider,
            altitude: self.glider.initial.altitude,
            reservoirs,
            coal_used: Kilograms::ZERO,
            h2_used: Kilograms::ZERO,
            engine_cycles: 0,
        };

        let phases = [
            (Phase::Nominal, NOMINAL_HOURS),
            (Phase::Crisis, self.crisis_hours),
            (Phase::Recovery, RECOVERY_HOURS),
        ];
        let mut hours = Vec::with_capacity(phases.iter().map(|(_, n)| *n as usize).sum());
        let mut hour = 0;
        for (phase, n_hours) in phases {
            info!(%phase, n_hours, "entering phase…");
            let weather = phase.weather();
            for _ in 0..n_hours {
                let record = match phase {
                    Phase::Crisis => tanks.crisis_hour(hour, &weather),
                    Phase::Nominal | Phase::Recovery => tanks.nominal_hour(hour, phase, &weather),
                };
                if record.action == Action::Stranded {
                    warn!(hour, altitude = %record.altitude_end, "nothing left to burn");
                }
                hours.push(record);
                hour += 1;
            }
            debug!(%phase, altitude = %tanks.altitude, h2 = %tanks.reservoirs.h2, coal = %tanks.reservoirs.coal);
        }

        let min_altitude =
            hours.iter().map(|record| record.altitude_end).min().unwrap_or(tanks.altitude);
        let survived = min_altitude > Metres::ZERO && tanks.reservoirs.coal > Kilograms::ZERO;
        info!(%min_altitude, coal_used = %tanks.coal_used, survived, "crisis is over");

        StressOutcome {
            crisis_hours: self.crisis_hours,
            initial,
            final_: tanks.reservoirs,
            final_altitude: tanks.altitude,
            min_altitude,
            coal_used: tanks.coal_used,
            h2_used: tanks.h2_used,
            engine_cycles: tanks.engine_cycles,
            hours,
            survived,
        }
    }
}

impl Tanks<'_> {
    fn total_mass(&self) -> Kilograms {
        self.glider.empty_mass() + self.reservoirs.total()
    }

    /// Natural altitude loss over one hour at the best glide, capped.
    fn hourly_loss(&self, weather: &Weather) -> Metres {
        let weight = self.total_mass().0 * GRAVITY;
        let wing_area = self.glider.geometry.wing_area.0;
        let best_glide_speed = (2.0 * weight
            / (weather.air_density().0 * wing_area * BEST_GLIDE_LIFT_COEFFICIENT))
            .sqrt();
        Metres(best_glide_speed / GLIDE_RATIO * 3600.0).min(MAX_HOURLY_LOSS)
    }

    fn altitude_gained(&self, energy: Joules) -> Metres {
        Metres(energy.0 / (self.total_mass().0 * GRAVITY))
    }

    fn crisis_hour(&mut self, hour: u32, weather: &Weather) -> StressHour {
        let mut record = StressHour::new(hour, Phase::Crisis, self.altitude);
        let loss = self.hourly_loss(weather);

        if self.altitude > RESCUE_ALTITUDE {
            self.altitude = (self.altitude - loss * RESERVE_GLIDE_SHARE).max(FLOOR);
            record.altitude_end = self.altitude;
            return record;
        }

        let needed = Joules(self.total_mass().0 * GRAVITY * RESCUE_CLIMB.0);
        let cycle_heat = Joules(CYCLE_MASS.0 * co2::CP * (HOT_SOURCE.0 - weather.temperature.0));
        let cycle_work = cycle_heat * (thermo::carnot(weather.temperature, HOT_SOURCE) * CYCLE_LOSSES);
        // The ratio is a small positive count.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cycles = (needed / cycle_work).ceil().max(1.0) as u32;
        let mut heat = cycle_heat * f64::from(cycles) / CYCLE_LOSSES;
        let mut energy = Joules::ZERO;
        record.action = Action::Stranded;

        if self.reservoirs.h2 > H2_RESERVE {
            let wanted = Kilograms(heat / h2::LOWER_HEATING_VALUE);
            let burnt = wanted.min(self.reservoirs.h2);
            self.reservoirs.h2 -= burnt;
            self.h2_used += burnt;
            record.h2_burnt = burnt;
            record.water_produced += burnt * WATER_PER_H2;
            let released = thermo::combustion_heat(burnt, h2::LOWER_HEATING_VALUE);
            energy += released * H2_EFFECTIVENESS;
            heat = if burnt < wanted { heat - released } else { Joules::ZERO };
            record.action = Action::Hydrogen;
        }

        if heat > Joules::ZERO && self.reservoirs.coal > Kilograms::ZERO {
            let burnt = Kilograms(heat / carbon::LOWER_HEATING_VALUE).min(self.reservoirs.coal);
            self.reservoirs.coal -= burnt;
            self.coal_used += burnt;
            record.coal_burnt = burnt;
            record.co2_produced = burnt * carbon::CO2_PER_CARBON;
            record.water_produced += burnt * WATER_PER_COAL;
            energy += thermo::combustion_heat(burnt, carbon::LOWER_HEATING_VALUE) * COAL_EFFECTIVENESS;
            self.reservoirs.co2 =
                (self.reservoirs.co2 + record.co2_produced).min(self.glider.capacity.co2);
            record.action = Action::Coal;
        }

        self.reservoirs.water =
            (self.reservoirs.water + record.water_produced).min(self.glider.capacity.water);
        record.engine_energy = energy;
        if record.action != Action::Stranded {
            record.cycles = cycles;
            self.engine_cycles += u64::from(cycles);
        }

        let climb = self.altitude_gained(energy * THRUST_SHARE) - loss * POWERED_SINK_SHARE;
        self.altitude = (self.altitude + climb).clamp(FLOOR, CEILING);
        record.altitude_end = self.altitude;
        record
    }

    fn nominal_hour(&mut self, hour: u32, phase: Phase, weather: &Weather) -> StressHour {
        let mut record = StressHour::new(hour, phase, self.altitude);
        record.action = Action::Regenerate;

        let equipment = &self.glider.equipment;
        let solar = Joules::from(equipment.electrolyser_power * weather.sun * Hours::ONE);
        let produced = Kilograms(
            solar / (h2::ELECTROLYSIS_ENERGY / equipment.electrolyser_efficiency),
        );
        self.reservoirs.h2 = (self.reservoirs.h2 + produced).min(self.glider.capacity.h2);

        if weather.humidity > CAPTURE_HUMIDITY {
            let captured = CAPTURE_RATE * weather.humidity;
            record.water_produced = captured;
            self.reservoirs.water = (self.reservoirs.water + captured).min(self.glider.capacity.water);
        }

        if weather.sun > SUNNY {
            self.altitude = (self.altitude + THERMAL_CLIMB).min(CEILING);
        }

        record.altitude_end = self.altitude;
        record
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn run(crisis_hours: u32, coal: Option<f64>) -> StressOutcome {
        let glider = Glider::default();
        Stress::builder()
            .glider(&glider)
            .crisis_hours(crisis_hours)
            .maybe_coal(coal.map(Kilograms))
            .run()
    }

    #[test]
    fn phases_have_expected_lengths() {
        let outcome = run(48, None);
        assert_eq!(outcome.hours.len(), 6 + 48 + 24);
        assert!(outcome.hours[..6].iter().all(|hour| hour.phase == Phase::Nominal));
        assert!(outcome.hours[6..54].iter().all(|hour| hour.phase == Phase::Crisis));
        assert!(outcome.hours[54..].iter().all(|hour| hour.phase == Phase::Recovery));
    }

    #[test]
    fn nominal_hours_climb_in_thermals() {
        let outcome = run(48, None);
        assert_abs_diff_eq!(outcome.hours[5].altitude_end.0, 3600.0);
    }

    #[test]
    fn crisis_starts_by_gliding_on_the_reserve() {
        let outcome = run(48, None);
        let first = &outcome.hours[6];
        assert_eq!(first.action, Action::Glide);
        assert_abs_diff_eq!(first.altitude_end.0, 3600.0 - 0.7 * 300.0, epsilon = 1e-9);
    }

    #[test]
    fn hydrogen_rescues_before_coal() {
        let outcome = run(48, None);
        let rescue = outcome.hours[6..54]
            .iter()
            .find(|hour| hour.action != Action::Glide)
            .unwrap();
        assert_eq!(rescue.action, Action::Hydrogen);
        assert!(rescue.altitude_start <= RESCUE_ALTITUDE);
        assert!(rescue.altitude_end > RESCUE_ALTITUDE);
        assert!(rescue.h2_burnt > Kilograms::ZERO);
        assert_eq!(rescue.coal_burnt, Kilograms::ZERO);
        assert!(rescue.cycles >= 1);
    }

    #[test]
    fn two_day_crisis_keeps_the_coal_sealed() {
        let outcome = run(48, None);
        assert!(outcome.survived);
        assert_eq!(outcome.coal_used, Kilograms::ZERO);
        assert_abs_diff_eq!(outcome.final_.coal.0, 12.0);
        assert!(outcome.min_altitude >= FLOOR);
    }

    #[test]
    fn three_day_crisis_survives() {
        let outcome = run(72, None);
        assert!(outcome.survived);
        assert!(outcome.h2_used > Kilograms::ZERO);
    }

    #[test]
    fn low_coal_survives_two_days() {
        let outcome = run(48, Some(5.0));
        assert!(outcome.survived);
        assert_abs_diff_eq!(outcome.final_.coal.0, 5.0);
    }

    #[test]
    fn long_crisis_opens_the_coal() {
        let outcome = run(200, None);
        assert!(outcome.coal_used > Kilograms::ZERO);
        assert!(outcome.hours.iter().any(|hour| hour.action == Action::Coal));
        assert!(outcome.final_.co2 >= outcome.initial.co2);
    }

    #[test]
    fn no_coal_fails_the_verdict() {
        let outcome = run(48, Some(0.0));
        assert!(!outcome.survived);
    }

    #[test]
    fn stranded_glider_stays_on_the_floor() {
        let outcome = run(400, Some(0.0));
        let stranded: Vec<_> =
            outcome.hours.iter().filter(|hour| hour.action == Action::Stranded).collect();
        assert!(!stranded.is_empty());
        assert!(stranded.iter().all(|hour| hour.altitude_end >= FLOOR));
        assert!(
            stranded.iter().all(|hour| hour.engine_energy == Joules::ZERO && hour.cycles == 0)
        );
    }

    #[test]
    fn recovery_regenerates_hydrogen() {
        let outcome = run(48, None);
        let recovery = &outcome.hours[54..];
        let before = outcome.hours[53].altitude_end;
        assert!(recovery.iter().all(|hour| hour.action == Action::Regenerate));
        assert!(recovery.last().unwrap().altitude_end > before);
    }
}
