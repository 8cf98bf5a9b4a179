use serde::Serialize;

use crate::{
    config::{InitialState, Reservoirs},
    flight::balance::Deltas,
    quantity::{length::Metres, mass::Kilograms, speed::MetresPerSecond},
};

/// Instantaneous state of the glider.
#[derive(Copy, Clone, Debug, Serialize)]
pub struct State {
    pub altitude: Metres,
    pub speed: MetresPerSecond,
    pub reservoirs: Reservoirs,

    /// Oxygen released by the electrolyser and kept on board.
    pub o2: Kilograms,
}

impl From<&InitialState> for State {
    fn from(initial: &InitialState) -> Self {
        Self {
            altitude: initial.altitude,
            speed: initial.speed,
            reservoirs: initial.reservoirs(),
            o2: Kilograms::ZERO,
        }
    }
}

impl State {
    pub fn total_mass(&self, empty: Kilograms) -> Kilograms {
        empty + self.reservoirs.total() + self.o2
    }

    pub const fn snapshot(&self) -> Snapshot {
        Snapshot { altitude: self.altitude, reservoirs: self.reservoirs, o2: self.o2 }
    }
}

/// Resources and altitude at a point in time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub altitude: Metres,
    pub reservoirs: Reservoirs,
    pub o2: Kilograms,
}

impl Snapshot {
    pub fn deltas_since(&self, earlier: &Self) -> Deltas {
        Deltas {
            co2: self.reservoirs.co2 - earlier.reservoirs.co2,
            h2: self.reservoirs.h2 - earlier.reservoirs.h2,
            water: self.reservoirs.water - earlier.reservoirs.water,
            coal: self.reservoirs.coal - earlier.reservoirs.coal,
            o2: self.o2 - earlier.o2,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::config::Glider;

    #[test]
    fn initial_mass() {
        let glider = Glider::default();
        let state = State::from(&glider.initial);
        assert_abs_diff_eq!(state.total_mass(glider.empty_mass()).0, 328.0 + 50.0 + 2.0 + 5.0 + 12.0);
    }

    #[test]
    fn deltas() {
        let glider = Glider::default();
        let before = State::from(&glider.initial);
        let mut after = before;
        after.reservoirs.coal -= Kilograms(1.5);
        after.o2 += Kilograms(0.8);
        let deltas = after.snapshot().deltas_since(&before.snapshot());
        assert_abs_diff_eq!(deltas.coal.0, -1.5);
        assert_abs_diff_eq!(deltas.o2.0, 0.8);
        assert_abs_diff_eq!(deltas.h2.0, 0.0);
    }
}
