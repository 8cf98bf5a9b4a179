use std::ops::Mul;

use derive_more::AddAssign;
use serde::Serialize;

use crate::quantity::{energy::WattHours, power::Watts};

/// Harvested terms, per source.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, AddAssign, Serialize)]
pub struct Harvest<T> {
    /// Gravity dive driving the CO2 compression turbine.
    pub dive: T,

    pub turbine: T,
    pub teng: T,
    pub solar: T,
    pub combustion: T,
}

/// Consumed terms, per sink.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, AddAssign, Serialize)]
pub struct Consumption<T> {
    /// Power needed to hold level flight.
    pub drag: T,

    pub avionics: T,
    pub metabolism: T,
}

impl<T: Copy + std::iter::Sum> Harvest<T> {
    pub fn total(&self) -> T {
        [self.dive, self.turbine, self.teng, self.solar, self.combustion].into_iter().sum()
    }

    pub const fn entries(&self) -> [(&'static str, T); 5] {
        [
            ("piqué", self.dive),
            ("éolienne", self.turbine),
            ("TENG", self.teng),
            ("solaire", self.solar),
            ("combustion", self.combustion),
        ]
    }
}

impl<T: Copy + std::iter::Sum> Consumption<T> {
    pub fn total(&self) -> T {
        [self.drag, self.avionics, self.metabolism].into_iter().sum()
    }

    pub const fn entries(&self) -> [(&'static str, T); 3] {
        [("traînée", self.drag), ("avionique", self.avionics), ("métabolisme", self.metabolism)]
    }
}

impl<T: Mul<Rhs>, Rhs: Copy> Mul<Rhs> for Harvest<T> {
    type Output = Harvest<<T as Mul<Rhs>>::Output>;

    fn mul(self, rhs: Rhs) -> Self::Output {
        Harvest {
            dive: self.dive * rhs,
            turbine: self.turbine * rhs,
            teng: self.teng * rhs,
            solar: self.solar * rhs,
            combustion: self.combustion * rhs,
        }
    }
}

impl<T: Mul<Rhs>, Rhs: Copy> Mul<Rhs> for Consumption<T> {
    type Output = Consumption<<T as Mul<Rhs>>::Output>;

    fn mul(self, rhs: Rhs) -> Self::Output {
        Consumption {
            drag: self.drag * rhs,
            avionics: self.avionics * rhs,
            metabolism: self.metabolism * rhs,
        }
    }
}

/// Energy tallies over the whole horizon.
#[derive(Copy, Clone, Debug, Default, AddAssign, Serialize)]
pub struct Tally {
    pub harvest: Harvest<WattHours>,
    pub consumption: Consumption<WattHours>,
}

impl Tally {
    pub fn net(&self) -> WattHours {
        self.harvest.total() - self.consumption.total()
    }
}

/// Net power of a step.
pub fn net_power(harvest: &Harvest<Watts>, consumption: &Consumption<Watts>) -> Watts {
    harvest.total() - consumption.total()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::time::Hours;

    #[test]
    fn totals_and_scaling() {
        let harvest = Harvest {
            dive: Watts(100.0),
            turbine: Watts(20.0),
            teng: Watts(1.0),
            solar: Watts(50.0),
            combustion: Watts(4.0),
        };
        let consumption = Consumption { drag: Watts(150.0), avionics: Watts(10.0), metabolism: Watts(5.0) };
        assert_abs_diff_eq!(net_power(&harvest, &consumption).0, 10.0);

        let mut tally = Tally::default();
        tally += Tally { harvest: harvest * Hours(0.5), consumption: consumption * Hours(0.5) };
        tally += Tally { harvest: harvest * Hours(0.5), consumption: consumption * Hours(0.5) };
        assert_abs_diff_eq!(tally.harvest.dive.0, 100.0);
        assert_abs_diff_eq!(tally.net().0, 10.0);
    }
}
