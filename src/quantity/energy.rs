use std::ops::Div;

use crate::quantity::{power::Watts, time::Hours};

quantity!(WattHours, via: f64, suffix: "Wh", precision: 0);
quantity!(Joules, via: f64, suffix: "J", precision: 0);

impl WattHours {
    pub const fn to_kilowatt_hours(self) -> f64 {
        self.0 * 0.001
    }
}

impl From<Joules> for WattHours {
    fn from(joules: Joules) -> Self {
        Self(joules.0 / 3600.0)
    }
}

impl From<WattHours> for Joules {
    fn from(watt_hours: WattHours) -> Self {
        Self(watt_hours.0 * 3600.0)
    }
}

impl Div<Hours> for WattHours {
    type Output = Watts;

    fn div(self, hours: Hours) -> Self::Output {
        Watts(self.0 / hours.0)
    }
}
