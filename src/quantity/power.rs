use std::ops::Mul;

use crate::quantity::{energy::WattHours, time::Hours};

quantity!(Watts, via: f64, suffix: "W", precision: 0);

impl Mul<Hours> for Watts {
    type Output = WattHours;

    fn mul(self, hours: Hours) -> Self::Output {
        WattHours(self.0 * hours.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_power_times_time() {
        assert_abs_diff_eq!((Watts(1200.0) * Hours(0.5)).0, 600.0);
    }
}
