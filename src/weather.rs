//! Hourly weather for the year-long flight.

use rand::Rng;
use serde::Serialize;

use crate::{
    physics::solar,
    quantity::{speed::MetresPerSecond, temperature::Kelvin},
};

#[derive(Copy, Clone, Debug, Serialize)]
pub struct Conditions {
    /// 1-based day of the year.
    pub day: u32,

    pub hour: u32,

    /// W/m².
    pub irradiance: f64,

    pub ground_temperature: Kelvin,

    /// Updraft strength, if a thermal is available.
    pub thermal: Option<MetresPerSecond>,
}

impl Conditions {
    pub fn generate(day: u32, hour: u32, rng: &mut impl Rng) -> Self {
        let factor = solar::seasonal_factor(day);
        let hour_f = f64::from(hour);

        let (sunrise, sunset) = (solar::sunrise(day), solar::sunset(day));
        let irradiance = solar::irradiance(hour_f, sunrise, sunset, 1000.0 * factor);

        let diurnal = if (6..=18).contains(&hour) {
            8.0 * (std::f64::consts::PI * (hour_f - 6.0) / 12.0).sin()
        } else {
            -5.0
        };
        let ground_temperature = Kelvin(283.0 + 15.0 * factor + diurnal);

        let thermal = if (10..=17).contains(&hour) && irradiance > 500.0 && rng.gen_bool(0.8) {
            Some(MetresPerSecond(rng.gen_range(2.0..5.0)))
        } else {
            None
        };

        Self { day, hour, irradiance, ground_temperature, thermal }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn midnight_is_dark_and_cold() {
        let mut rng = Pcg64::seed_from_u64(1);
        let conditions = Conditions::generate(172, 0, &mut rng);
        assert_eq!(conditions.irradiance, 0.0);
        assert!((conditions.ground_temperature.0 - 293.0).abs() < 1e-9);
        assert!(conditions.thermal.is_none());
    }

    #[test]
    fn summer_noon() {
        let mut rng = Pcg64::seed_from_u64(1);
        let conditions = Conditions::generate(172, 12, &mut rng);
        assert!((conditions.irradiance - 1000.0).abs() < 1e-9);
        assert!((conditions.ground_temperature.0 - 306.0).abs() < 1e-9);
    }

    #[test]
    fn thermals_are_bounded() {
        let mut rng = Pcg64::seed_from_u64(3);
        let strengths: Vec<_> =
            (0..200).filter_map(|_| Conditions::generate(172, 12, &mut rng).thermal).collect();
        assert!(!strengths.is_empty());
        assert!(strengths.len() < 200);
        assert!(strengths.iter().all(|strength| (2.0..5.0).contains(&strength.0)));
    }

    #[test]
    fn no_thermals_at_dawn() {
        let mut rng = Pcg64::seed_from_u64(3);
        assert!((0..50).all(|_| Conditions::generate(172, 9, &mut rng).thermal.is_none()));
    }
}
