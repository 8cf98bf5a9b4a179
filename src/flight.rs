//! Year-long hour-by-hour flight ledger.

mod balance;
mod mode;
mod state;
mod summary;
mod systems;

use bon::Builder;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::Serialize;

pub use self::{
    balance::{Alert, HourlyBalance},
    mode::FlightMode,
    state::{Snapshot, State},
    summary::Summary,
    systems::{Electrolyser, Systems},
};
use crate::{
    config::Glider,
    physics::{
        aero,
        atmosphere,
        constants::{GRAVITY, carbon, h2},
        solar,
        thermo::Cycle,
        wind,
    },
    prelude::*,
    quantity::{
        area::SquareMetres,
        energy::{Joules, WattHours},
        length::{Kilometres, Metres},
        mass::Kilograms,
        pressure::Pascals,
        speed::MetresPerSecond,
        temperature::Kelvin,
        time::{Hours, Seconds},
    },
    weather::Conditions,
};

const HOUR: Seconds = Seconds(3600.0);

/// Share of the updraft turned into climb while spiralling.
const THERMAL_EFFICIENCY: f64 = 0.7;
const CEILING: Metres = Metres(5000.0);
const CRUISE_FLOOR: Metres = Metres(1000.0);
const WATER_COLLECTION_SPEED: MetresPerSecond = MetresPerSecond(25.0);

const DIVE_ANGLE_DEGREES: f64 = 30.0;
const DIVE_SPEED: MetresPerSecond = MetresPerSecond(50.0);
const DIVE_DURATION: Seconds = Seconds(600.0);
const DIVE_FLOOR: Metres = Metres(1500.0);

const NIGHT_SPEED: MetresPerSecond = MetresPerSecond(80.0 / 3.6);
const SPARK_ENERGY: Joules = Joules(2.0);
const MAX_CYCLES_PER_HOUR: f64 = 10.0;
const H2_PER_CYCLE: Kilograms = Kilograms(0.0005);
const CYCLE_CO2: Kilograms = Kilograms(0.3);
const CYCLE_HEATING: f64 = 400.0;
const CYCLE_MECHANICAL_EFFICIENCY: f64 = 0.85;
const NIGHT_FLOOR: Metres = Metres(800.0);
const NIGHT_CEILING: Metres = Metres(4000.0);

const COAL_PER_HOUR: Kilograms = Kilograms(0.01);
const COAL_FLOOR: Metres = Metres(500.0);
/// A landing is one crossing from at least this altitude to below it.
pub const LANDING_ALTITUDE: Metres = Metres(100.0);

const FIRE_PROBABILITY: f64 = 0.001;
const FIRE_CO2_DROP: Kilograms = Kilograms(2.0);

/// Solar irradiance below which the night engine runs, W/m².
const NIGHT_IRRADIANCE: f64 = 50.0;

/// Solar irradiance above which the electrolyser runs, W/m².
const ELECTROLYSIS_IRRADIANCE: f64 = 100.0;
const ELECTROLYSIS_SHARE: f64 = 0.6;

const REPORT_EVERY_DAYS: u32 = 30;

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Simulator<'a> {
    glider: &'a Glider,
    rng: &'a mut Pcg64,

    #[builder(default = 360)]
    days: u32,
}

impl<S: simulator_builder::IsComplete> SimulatorBuilder<'_, S> {
    pub fn run(self) -> Flight {
        self.build().run()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Checkpoint {
    pub day: u32,
    pub snapshot: Snapshot,
}

#[derive(Clone, Debug, Serialize)]
pub struct Flight {
    pub balances: Vec<HourlyBalance>,
    pub checkpoints: Vec<Checkpoint>,
    pub summary: Summary,
}

impl Simulator<'_> {
    #[instrument(skip_all, fields(days = self.days))]
    fn run(self) -> Flight {
        let glider = self.glider;
        let systems = Systems::from(&glider.equipment);
        let mut state = State::from(&glider.initial);
        let initial = state.snapshot();
        info!(
            mass = %state.total_mass(glider.empty_mass()),
            altitude = %state.altitude,
            "taking off…"
        );

        let mut balances = Vec::with_capacity(self.days as usize * 24);
        let mut checkpoints = Vec::new();
        for day in 1..=self.days {
            for hour in 0..24 {
                let conditions = Conditions::generate(day, hour, &mut *self.rng);
                let flight_hour = Hour { glider, systems: &systems, state: &mut state, rng: &mut *self.rng };
                balances.push(flight_hour.fly(&conditions));
            }
            if day % REPORT_EVERY_DAYS == 0 {
                let snapshot = state.snapshot();
                info!(
                    day,
                    co2 = %snapshot.reservoirs.co2,
                    h2 = %snapshot.reservoirs.h2,
                    water = %snapshot.reservoirs.water,
                    coal = %snapshot.reservoirs.coal,
                    altitude = %snapshot.altitude,
                    "checkpoint"
                );
                checkpoints.push(Checkpoint { day, snapshot });
            }
        }

        let summary = Summary::new(initial, state.snapshot(), &balances);
        if summary.is_viable() {
            info!(distance = %summary.distance, "landed the ledger, all balances hold");
        } else {
            warn!(shortfalls = ?summary.shortfalls, "the ledger shows shortfalls");
        }
        Flight { balances, checkpoints, summary }
    }
}

/// One hour of flight, mutating the glider state.
struct Hour<'a> {
    glider: &'a Glider,
    systems: &'a Systems,
    state: &'a mut State,
    rng: &'a mut Pcg64,
}

impl Hour<'_> {
    fn fly(mut self, conditions: &Conditions) -> HourlyBalance {
        let mode = self.choose_mode(conditions);
        let mut balance = HourlyBalance::new(conditions.day, conditions.hour, mode, self.state.altitude);

        match mode {
            FlightMode::Thermal => self.thermal(conditions, &mut balance),
            FlightMode::Cruise => self.cruise(&mut balance),
            FlightMode::Dive => self.dive(&mut balance),
            FlightMode::Night | FlightMode::Emergency => self.night(conditions, &mut balance),
        }
        balance.altitude_end = self.state.altitude;
        balance.landed = balance.altitude_start >= LANDING_ALTITUDE && balance.altitude_end < LANDING_ALTITUDE;

        self.electrolyse(conditions, &mut balance);
        self.leak(&mut balance);
        if balance.mode.is_patrolling() {
            self.patrol(&mut balance);
        }
        balance
    }

    fn choose_mode(&self, conditions: &Conditions) -> FlightMode {
        if conditions.irradiance < NIGHT_IRRADIANCE {
            FlightMode::Night
        } else if conditions.thermal.is_some() && self.state.altitude < NIGHT_CEILING {
            FlightMode::Thermal
        } else if self.state.altitude > Metres(3500.0) && self.state.reservoirs.co2 < Kilograms(40.0) {
            FlightMode::Dive
        } else {
            FlightMode::Cruise
        }
    }

    /// Sink rate and glide ratio at the cruise lift coefficient.
    fn polar(&self) -> (MetresPerSecond, f64) {
        let aerodynamics = self.glider.aerodynamics;
        let drag_coefficient = aero::drag_coefficient(
            aerodynamics.parasitic_drag,
            aerodynamics.induced_drag_factor,
            aerodynamics.cruise_lift_coefficient,
        );
        let sink_rate = aero::sink_rate(
            self.state.total_mass(self.glider.empty_mass()),
            atmosphere::density(self.state.altitude),
            self.glider.geometry.wing_area,
            aerodynamics.cruise_lift_coefficient,
            drag_coefficient,
        );
        (sink_rate, aero::glide_ratio(aerodynamics.cruise_lift_coefficient, drag_coefficient))
    }

    fn store_water(&mut self, water: Kilograms, balance: &mut HourlyBalance) {
        let reservoirs = &mut self.state.reservoirs;
        let before = reservoirs.water;
        reservoirs.water = (reservoirs.water + water).min(self.glider.capacity.water);
        balance.deltas.water += reservoirs.water - before;
    }

    fn store_co2(&mut self, co2: Kilograms, balance: &mut HourlyBalance) {
        let reservoirs = &mut self.state.reservoirs;
        let before = reservoirs.co2;
        reservoirs.co2 = (reservoirs.co2 + co2).min(self.glider.capacity.co2);
        balance.deltas.co2 += reservoirs.co2 - before;
    }

    fn thermal(&mut self, conditions: &Conditions, balance: &mut HourlyBalance) {
        let strength = conditions.thermal.unwrap_or(MetresPerSecond::ZERO);
        let gain = Metres(strength.0 * HOUR.0 * THERMAL_EFFICIENCY);
        self.state.altitude = (self.state.altitude + gain).min(CEILING);
        balance.distance = Kilometres(20.0);

        let water = self.systems.collector.collect(self.state.speed, self.state.altitude, HOUR);
        self.store_water(water, balance);
    }

    fn cruise(&mut self, balance: &mut HourlyBalance) {
        let (sink_rate, glide_ratio) = self.polar();
        let loss = Metres(sink_rate.0 * HOUR.0);
        self.state.altitude = (self.state.altitude - loss).max(CRUISE_FLOOR);
        balance.distance = Kilometres::from(loss * glide_ratio);

        let water = self.systems.collector.collect(WATER_COLLECTION_SPEED, self.state.altitude, HOUR);
        self.store_water(water, balance);
    }

    fn dive(&mut self, balance: &mut HourlyBalance) {
        let loss = Metres(DIVE_SPEED.0 * DIVE_ANGLE_DEGREES.to_radians().sin() * DIVE_DURATION.0);
        let power = aero::dive_power(self.state.total_mass(self.glider.empty_mass()), DIVE_ANGLE_DEGREES, DIVE_SPEED);
        let co2 = self.systems.turbine.liquefy(power, DIVE_DURATION);
        self.store_co2(co2, balance);

        // Denser air halfway down.
        let sampling_altitude = (self.state.altitude - loss / 2.0).max(Metres::ZERO);
        let water = self.systems.collector.collect(DIVE_SPEED, sampling_altitude, DIVE_DURATION);
        self.store_water(water, balance);

        self.state.altitude = (self.state.altitude - loss).max(DIVE_FLOOR);
        balance.distance = Kilometres(50.0);
    }

    fn night(&mut self, conditions: &Conditions, balance: &mut HourlyBalance) {
        let density = atmosphere::density(self.state.altitude);
        let air_temperature = atmosphere::temperature(self.state.altitude, Some(conditions.ground_temperature));

        let spark_power = self.glider.teng.power(NIGHT_SPEED)
            + wind::turbine_power(
                density,
                SquareMetres::disc(self.glider.equipment.nose_turbine_radius),
                NIGHT_SPEED,
                self.glider.equipment.nose_turbine_power_coefficient,
            );
        let n_cycles = (spark_power.0 * HOUR.0 / SPARK_ENERGY.0).min(MAX_CYCLES_PER_HOUR);
        let burnt_h2 = H2_PER_CYCLE * n_cycles;

        let cycle = Cycle {
            mass: CYCLE_CO2,
            cold: air_temperature,
            hot: Kelvin(air_temperature.0 + CYCLE_HEATING),
            low_pressure: Pascals::from_bars(1.0),
            high_pressure: Pascals::from_bars(60.0),
            mechanical_efficiency: CYCLE_MECHANICAL_EFFICIENCY,
        }
        .compute();
        let work = cycle.real_work * n_cycles;

        let (sink_rate, _) = self.polar();
        let natural_loss = Metres(sink_rate.0 * HOUR.0);
        let weight = self.state.total_mass(self.glider.empty_mass()).0 * GRAVITY;
        let regained = Metres(work.0 / weight);

        if self.state.reservoirs.h2 >= burnt_h2 {
            self.state.reservoirs.h2 -= burnt_h2;
            balance.deltas.h2 -= burnt_h2;
            let water = self.systems.condenser.recover(burnt_h2);
            self.store_water(water, balance);

            self.state.altitude =
                (self.state.altitude + regained - natural_loss * 0.7).clamp(NIGHT_FLOOR, NIGHT_CEILING);
            balance.engine_energy = WattHours::from(work);
            balance.distance = Kilometres(NIGHT_SPEED.to_kilometres_per_hour());
            return;
        }

        balance.alerts.push(Alert::CoalBackup);
        if self.state.reservoirs.coal >= COAL_PER_HOUR {
            debug!(day = conditions.day, hour = conditions.hour, "burning the sealed coal");
            self.state.reservoirs.coal -= COAL_PER_HOUR;
            balance.deltas.coal -= COAL_PER_HOUR;
            self.store_co2(COAL_PER_HOUR * carbon::CO2_PER_CARBON, balance);
            self.state.altitude = (self.state.altitude - natural_loss * 0.3).max(COAL_FLOOR);
        } else {
            warn!(day = conditions.day, hour = conditions.hour, "nothing left to burn, descending");
            balance.alerts.push(Alert::EmergencyDescent);
            balance.mode = FlightMode::Emergency;
            self.state.altitude = (self.state.altitude - natural_loss).max(Metres::ZERO);
        }
    }

    fn electrolyse(&mut self, conditions: &Conditions, balance: &mut HourlyBalance) {
        if conditions.irradiance <= ELECTROLYSIS_IRRADIANCE {
            return;
        }
        let panels = self.glider.panels;
        let solar_power = solar::panel_output(conditions.irradiance, panels.area, panels.efficiency);
        balance.solar_energy = solar_power * Hours::ONE;

        let electrolysis =
            self.systems.electrolyser.run(solar_power * ELECTROLYSIS_SHARE, HOUR, self.state.reservoirs.water);
        let reservoirs = &mut self.state.reservoirs;
        let before = reservoirs.h2;
        reservoirs.h2 = (reservoirs.h2 + electrolysis.h2).min(self.glider.capacity.h2);
        reservoirs.water -= electrolysis.water;
        self.state.o2 += electrolysis.o2;

        balance.deltas.h2 += self.state.reservoirs.h2 - before;
        balance.deltas.water -= electrolysis.water;
        balance.deltas.o2 += electrolysis.o2;
    }

    fn leak(&mut self, balance: &mut HourlyBalance) {
        let leak = self.state.reservoirs.h2 * (h2::DAILY_LEAK_RATE / 24.0);
        self.state.reservoirs.h2 -= leak;
        balance.deltas.h2 -= leak;
    }

    fn patrol(&mut self, balance: &mut HourlyBalance) {
        if !self.rng.gen_bool(FIRE_PROBABILITY) {
            return;
        }
        balance.fire.detected = true;
        if self.state.reservoirs.co2 > FIRE_CO2_DROP {
            info!(day = balance.day, hour = balance.hour, "fire spotted, dropping CO2");
            self.state.reservoirs.co2 -= FIRE_CO2_DROP;
            balance.deltas.co2 -= FIRE_CO2_DROP;
            balance.co2_dropped = FIRE_CO2_DROP;
            balance.fire.extinguished = true;
        } else {
            warn!(day = balance.day, hour = balance.hour, "fire spotted, not enough CO2 to drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    use super::*;

    fn night() -> Conditions {
        Conditions { day: 1, hour: 2, irradiance: 0.0, ground_temperature: Kelvin(288.0), thermal: None }
    }

    fn fly_hour(glider: &Glider, state: &mut State, conditions: &Conditions) -> HourlyBalance {
        let systems = Systems::from(&glider.equipment);
        let mut rng = Pcg64::seed_from_u64(0);
        Hour { glider, systems: &systems, state, rng: &mut rng }.fly(conditions)
    }

    #[test]
    fn night_on_hydrogen() {
        let glider = Glider::default();
        let mut state = State::from(&glider.initial);
        let balance = fly_hour(&glider, &mut state, &night());

        assert_eq!(balance.mode, FlightMode::Night);
        assert!(balance.alerts.is_empty());
        let burnt = 0.0005 * MAX_CYCLES_PER_HOUR;
        let leak = (2.0 - burnt) * h2::DAILY_LEAK_RATE / 24.0;
        assert_abs_diff_eq!(balance.deltas.h2.0, -burnt - leak, epsilon = 1e-12);
        assert_abs_diff_eq!(balance.deltas.water.0, burnt * 9.0 * 0.95, epsilon = 1e-12);
        assert!(balance.engine_energy > WattHours::ZERO);
        assert!((NIGHT_FLOOR..=NIGHT_CEILING).contains(&state.altitude));
        assert_abs_diff_eq!(balance.distance.0, 80.0, epsilon = 1e-9);
    }

    #[test]
    fn night_falls_back_to_coal() {
        let glider = Glider::default();
        let mut state = State::from(&glider.initial);
        state.reservoirs.h2 = Kilograms::ZERO;
        let balance = fly_hour(&glider, &mut state, &night());

        assert_eq!(balance.alerts, vec![Alert::CoalBackup]);
        assert_abs_diff_eq!(balance.deltas.coal.0, -0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(balance.deltas.co2.0, 0.01 * 44.0 / 12.0, epsilon = 1e-12);
        assert!(state.altitude < glider.initial.altitude);
        assert!(state.altitude >= COAL_FLOOR);
    }

    #[test]
    fn emergency_descent_and_landing() {
        let glider = Glider::default();
        let mut state = State::from(&glider.initial);
        state.reservoirs.h2 = Kilograms::ZERO;
        state.reservoirs.coal = Kilograms::ZERO;
        state.altitude = Metres(150.0);
        let balance = fly_hour(&glider, &mut state, &night());

        assert_eq!(balance.mode, FlightMode::Emergency);
        assert_eq!(balance.alerts, vec![Alert::CoalBackup, Alert::EmergencyDescent]);
        assert_eq!(state.altitude, Metres::ZERO);
        assert!(balance.landed);
    }

    #[test]
    fn dive_refills_co2() {
        let glider = Glider::default();
        let mut state = State::from(&glider.initial);
        state.altitude = Metres(4000.0);
        state.reservoirs.co2 = Kilograms(30.0);
        let conditions =
            Conditions { day: 172, hour: 9, irradiance: 400.0, ground_temperature: Kelvin(300.0), thermal: None };
        let balance = fly_hour(&glider, &mut state, &conditions);

        assert_eq!(balance.mode, FlightMode::Dive);
        assert_eq!(state.altitude, DIVE_FLOOR);
        assert_eq!(state.reservoirs.co2, glider.capacity.co2);
        assert_abs_diff_eq!(balance.deltas.co2.0, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(balance.distance.0, 50.0);
    }

    #[test]
    fn thermal_climb_with_electrolysis() {
        let glider = Glider::default();
        let mut state = State::from(&glider.initial);
        let conditions = Conditions {
            day: 172,
            hour: 12,
            irradiance: 1000.0,
            ground_temperature: Kelvin(306.0),
            thermal: Some(MetresPerSecond(3.0)),
        };
        let balance = fly_hour(&glider, &mut state, &conditions);

        assert_eq!(balance.mode, FlightMode::Thermal);
        assert_eq!(state.altitude, CEILING);
        assert_abs_diff_eq!(balance.solar_energy.0, 1000.0 * 12.0 * 0.24, epsilon = 1e-9);
        assert!(balance.deltas.o2 > Kilograms::ZERO);
        assert!(state.reservoirs.h2 > glider.initial.h2 * 0.99);
    }

    #[test]
    fn full_year_is_reproducible() {
        let glider = Glider::default();
        let run = |seed| {
            let mut rng = Pcg64::seed_from_u64(seed);
            Simulator::builder().glider(&glider).rng(&mut rng).run()
        };
        let first = run(7);
        let second = run(7);

        assert_eq!(first.balances.len(), 360 * 24);
        assert_eq!(first.checkpoints.len(), 12);
        assert_eq!(
            serde_json::to_string(&first.summary).unwrap(),
            serde_json::to_string(&second.summary).unwrap(),
        );
        assert_eq!(first.summary.fires_detected, second.summary.fires_detected);
        assert_eq!(first.summary.mode_hours.iter().map(|(_, hours)| hours).sum::<usize>(), 360 * 24);
    }

    #[test]
    fn short_flight() {
        let glider = Glider::default();
        let mut rng = Pcg64::seed_from_u64(1);
        let flight = Simulator::builder().glider(&glider).rng(&mut rng).days(2).run();
        assert_eq!(flight.balances.len(), 48);
        assert!(flight.checkpoints.is_empty());
        assert_eq!(flight.summary.initial.altitude, glider.initial.altitude);
    }
}
