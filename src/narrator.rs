//! Energy-balance narrator: per-step flux folded into running totals.

mod flux;
mod step;
mod totals;
mod verdict;

use bon::Builder;
use rand::Rng;
use rand_pcg::Pcg64;
use serde::Serialize;

pub use self::{
    flux::{Consumption, Harvest, Tally},
    step::{StepIndex, TimeStep},
    totals::RunningTotals,
    verdict::{FloorCheck, Verdict},
};
use crate::{
    config::{Budget, ConfigError},
    physics::{aero, solar, wind},
    prelude::*,
    quantity::{
        area::SquareMetres,
        energy::{Joules, WattHours},
        mass::Kilograms,
        power::Watts,
        speed::MetresPerSecond,
    },
};

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Narrator<'a> {
    budget: &'a Budget,
    rng: &'a mut Pcg64,

    #[builder(default)]
    floor_check: FloorCheck,
}

impl<S: narrator_builder::IsComplete> NarratorBuilder<'_, S> {
    pub fn run(self) -> Result<Narration, ConfigError> {
        self.build().run()
    }
}

/// Step paired with the totals right after folding it.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct Record {
    #[serde(flatten)]
    pub step: TimeStep,

    pub totals: RunningTotals,
}

#[derive(Clone, Debug, Serialize)]
pub struct Narration {
    pub floor_check: FloorCheck,

    /// Turbine rotor speed at the nominal wind.
    pub rotor_rpm: f64,

    pub initial: RunningTotals,
    pub records: Vec<Record>,
    pub tally: Tally,
    pub verdict: Verdict,
}

impl Narration {
    pub fn final_totals(&self) -> RunningTotals {
        self.records.last().map_or(self.initial, |record| record.totals)
    }
}

impl Narrator<'_> {
    #[instrument(skip_all, fields(floor_check = ?self.floor_check))]
    fn run(mut self) -> Result<Narration, ConfigError> {
        let horizon = self.budget.horizon;
        let n_steps = horizon.n_steps()?;
        info!(days = horizon.days, steps_per_day = horizon.steps_per_day, "narrating…");

        let initial = RunningTotals {
            energy: self.budget.initial.energy,
            fuel: self.budget.initial.fuel,
            liquid_co2: self.budget.initial.liquid_co2,
        };
        let mut totals = initial;
        let mut tally = Tally::default();
        let mut records = Vec::with_capacity(n_steps as usize);

        for absolute in 0..n_steps {
            let step = self.evaluate(StepIndex::new(absolute, horizon.steps_per_day));
            totals = self.fold(totals, &step);
            tally += Tally { harvest: step.harvest * step.duration, consumption: step.consumption * step.duration };
            records.push(Record { step, totals });
        }

        let verdict = self.floor_check.judge(records.iter().map(|record| (record.step.index, &record.totals)));
        match verdict {
            Verdict::Viable => info!(%verdict, "done"),
            Verdict::Fails(breach) => {
                warn!(%verdict, day = breach.step.day, step = breach.step.step_of_day, accumulators = ?breach.accumulators, "done");
            }
        }
        Ok(Narration {
            floor_check: self.floor_check,
            rotor_rpm: self.budget.turbine.rotor_speed_rpm(),
            initial,
            records,
            tally,
            verdict,
        })
    }

    /// Evaluate the closed-form flux terms for the step.
    fn evaluate(&mut self, index: StepIndex) -> TimeStep {
        let budget = self.budget;
        let duration = budget.horizon.step_duration();
        let airframe = budget.airframe;

        let dive = aero::dive_power(airframe.mass, budget.dive.angle_degrees, budget.dive.speed)
            * budget.dive.compression_efficiency
            * budget.dive.duty_cycle;

        let wind_speed = {
            let jitter = budget.turbine.wind_jitter;
            let factor = if jitter > 0.0 { 1.0 + self.rng.gen_range(-jitter..=jitter) } else { 1.0 };
            MetresPerSecond((budget.turbine.wind_speed.0 * factor).max(0.0))
        };
        let turbine = wind::turbine_power(
            budget.air_density,
            SquareMetres::disc(budget.turbine.radius),
            wind_speed,
            budget.turbine.power_coefficient,
        ) * budget.turbine.generator_efficiency;
        let teng = budget.teng.power(wind_speed);

        let solar = {
            let irradiance = solar::irradiance(
                index.hour_of_day(duration),
                budget.solar.sunrise,
                budget.solar.sunset,
                budget.solar.peak_irradiance,
            );
            let jitter = budget.solar.cloud_jitter;
            let clearness = if jitter > 0.0 && irradiance > 0.0 { 1.0 - self.rng.gen_range(0.0..=jitter) } else { 1.0 };
            solar::panel_output(irradiance * clearness, budget.solar.panel_area, budget.solar.efficiency)
        };

        let combustion = Watts(
            budget.combustion.fuel_per_hour.0 * budget.combustion.heating_value.0 / 3600.0
                * budget.combustion.efficiency,
        );

        let drag = aero::level_flight_power(
            airframe.mass,
            budget.air_density,
            airframe.wing_area,
            airframe.lift_coefficient,
            aero::drag_coefficient(airframe.parasitic_drag, airframe.induced_drag_factor, airframe.lift_coefficient),
        );

        let step = TimeStep {
            index,
            duration,
            harvest: Harvest { dive, turbine, teng, solar, combustion },
            consumption: Consumption { drag, avionics: budget.loads.avionics, metabolism: budget.loads.metabolism },
        };
        trace!(day = index.day, step = index.step_of_day, harvest = ?step.harvest.total(), consumption = ?step.consumption.total());
        step
    }

    /// Integrate the step into the running totals.
    fn fold(&self, mut totals: RunningTotals, step: &TimeStep) -> RunningTotals {
        let budget = self.budget;
        let net_energy: WattHours = flux::net_power(&step.harvest, &step.consumption) * step.duration;

        totals.energy += net_energy;
        if let Some(capacity) = budget.capacity.energy {
            totals.energy = totals.energy.min(capacity);
        }

        totals.fuel -= budget.combustion.fuel_per_hour * step.duration.0;

        let dive_energy = Joules::from(step.harvest.dive * step.duration);
        totals.liquid_co2 += Kilograms(dive_energy / budget.dive.liquefaction_energy);
        totals.liquid_co2 -= budget.co2_expansion_per_hour * step.duration.0;
        if let Some(capacity) = budget.capacity.liquid_co2 {
            totals.liquid_co2 = totals.liquid_co2.min(capacity);
        }

        totals
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::{totals::Accumulator, *};
    use crate::{config::Horizon, quantity::time::Hours};

    fn narrate(budget: &Budget, seed: u64, floor_check: FloorCheck) -> Narration {
        let mut rng = Pcg64::seed_from_u64(seed);
        Narrator::builder().budget(budget).rng(&mut rng).floor_check(floor_check).run().unwrap()
    }

    #[test]
    fn default_budget_is_viable() {
        let narration = narrate(&Budget::default(), 0, FloorCheck::EveryStep);
        assert_eq!(narration.records.len(), 360 * 24);
        assert!(narration.verdict.is_viable());
        assert_eq!(narration.verdict.to_string(), "le système est viable");
    }

    #[test]
    fn overlong_horizon_is_an_error() {
        let mut budget = Budget::default();
        budget.horizon.days = 200_000_000;
        let mut rng = Pcg64::seed_from_u64(0);
        let result = Narrator::builder().budget(&budget).rng(&mut rng).run();
        assert!(matches!(result, Err(ConfigError::HorizonTooLong { .. })));
    }

    #[test]
    fn energy_is_clamped_to_capacity_only() {
        let narration = narrate(&Budget::default(), 0, FloorCheck::EveryStep);
        assert!(narration.records.iter().all(|record| record.totals.energy <= WattHours(20_000.0)));
    }

    #[test]
    fn heavy_loads_fail() {
        let mut budget = Budget::default();
        budget.loads.metabolism = Watts(10_000.0);
        let narration = narrate(&budget, 0, FloorCheck::EveryStep);
        assert_eq!(narration.verdict.to_string(), "le système échoue");
        let Verdict::Fails(breach) = narration.verdict else { panic!("expected a breach") };
        assert!(breach.accumulators.contains(Accumulator::Energy));
        assert_eq!(breach.step.day, 1);
    }

    #[test]
    fn fuel_exhaustion_fails() {
        let mut budget = Budget::default();
        budget.combustion.fuel_per_hour = Kilograms(1.0);
        let narration = narrate(&budget, 0, FloorCheck::FinalOnly);
        let Verdict::Fails(breach) = narration.verdict else { panic!("expected a breach") };
        assert!(breach.accumulators.contains(Accumulator::Fuel));
        assert_eq!(breach.step.absolute, 360 * 24 - 1);
    }

    #[test]
    fn deterministic_budget_ignores_the_seed() {
        let budget = Budget::default();
        let lhs = serde_json::to_string(&narrate(&budget, 1, FloorCheck::EveryStep)).unwrap();
        let rhs = serde_json::to_string(&narrate(&budget, 2, FloorCheck::EveryStep)).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn jitter_is_reproducible_for_a_seed() {
        let mut budget = Budget::default();
        budget.horizon.days = 10;
        budget.turbine.wind_jitter = 0.3;
        budget.solar.cloud_jitter = 0.5;
        let first = narrate(&budget, 42, FloorCheck::EveryStep);
        let second = narrate(&budget, 42, FloorCheck::EveryStep);
        let other = narrate(&budget, 43, FloorCheck::EveryStep);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
        assert_ne!(first.tally.harvest.turbine, other.tally.harvest.turbine);
    }

    #[test]
    fn jitter_stays_bounded() {
        let mut budget = Budget::default();
        budget.horizon.days = 5;
        budget.turbine.wind_jitter = 0.2;
        let narration = narrate(&budget, 9, FloorCheck::EveryStep);
        let nominal = wind::turbine_power(
            budget.air_density,
            SquareMetres::disc(budget.turbine.radius),
            budget.turbine.wind_speed * 1.2,
            budget.turbine.power_coefficient,
        ) * budget.turbine.generator_efficiency;
        assert!(narration.records.iter().all(|record| record.step.harvest.turbine <= nominal));
    }

    #[test]
    fn solar_only_by_day() {
        let mut budget = Budget::default();
        budget.horizon.days = 1;
        let narration = narrate(&budget, 0, FloorCheck::EveryStep);
        assert_eq!(narration.records[3].step.harvest.solar, Watts::ZERO);
        assert_abs_diff_eq!(narration.records[12].step.harvest.solar.0, 1000.0 * 12.0 * 0.24, epsilon = 1e-9);
    }

    #[test]
    fn liquid_co2_accounting() {
        let mut budget = Budget::default();
        budget.horizon = Horizon { days: 1, steps_per_day: 1 };
        budget.capacity.liquid_co2 = None;
        let narration = narrate(&budget, 0, FloorCheck::EveryStep);
        let record = narration.records[0];
        let dive_energy = Joules::from(record.step.harvest.dive * Hours(24.0));
        let expected = 50.0 + dive_energy.0 / 300_000.0 - 0.5 * 24.0;
        assert_relative_eq!(record.totals.liquid_co2.0, expected, max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn combustion_accumulates_linearly(
            days in 1..5_u32,
            steps_per_day in 1..48_u32,
            fuel_per_hour in 0.0..0.01_f64,
        ) {
            let mut budget = Budget::default();
            budget.horizon = Horizon { days, steps_per_day };
            budget.combustion.fuel_per_hour = Kilograms(fuel_per_hour);
            let narration = narrate(&budget, 0, FloorCheck::EveryStep);

            let n_steps = f64::from(days * steps_per_day);
            let duration = budget.horizon.step_duration();
            let expected = n_steps
                * (fuel_per_hour * budget.combustion.heating_value.0 * budget.combustion.efficiency / 3600.0)
                * duration.0;
            prop_assert!((narration.tally.harvest.combustion.0 - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
