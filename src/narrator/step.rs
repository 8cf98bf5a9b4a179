use serde::Serialize;

use crate::{
    narrator::flux::{Consumption, Harvest},
    quantity::{power::Watts, time::Hours},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct StepIndex {
    /// Zero-based position over the whole horizon.
    pub absolute: u32,

    /// 1-based day.
    pub day: u32,

    pub step_of_day: u32,
}

impl StepIndex {
    pub const fn new(absolute: u32, steps_per_day: u32) -> Self {
        Self { absolute, day: absolute / steps_per_day + 1, step_of_day: absolute % steps_per_day }
    }

    /// Hour of the day at which the step starts.
    pub fn hour_of_day(self, duration: Hours) -> f64 {
        f64::from(self.step_of_day) * duration.0
    }
}

/// Flux evaluated for one step, never mutated once created.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct TimeStep {
    pub index: StepIndex,
    pub duration: Hours,
    pub harvest: Harvest<Watts>,
    pub consumption: Consumption<Watts>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index() {
        assert_eq!(StepIndex::new(0, 24), StepIndex { absolute: 0, day: 1, step_of_day: 0 });
        assert_eq!(StepIndex::new(49, 24), StepIndex { absolute: 49, day: 3, step_of_day: 1 });
        assert!((StepIndex::new(13, 48).hour_of_day(Hours(0.5)) - 6.5).abs() < 1e-12);
    }
}
