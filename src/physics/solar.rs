//! Daylight curve and photovoltaic output.

use std::f64::consts::{PI, TAU};

use crate::quantity::{area::SquareMetres, power::Watts};

/// Seasonal modulation, peaking at 1.0 on the summer solstice (day 172).
pub fn seasonal_factor(day: u32) -> f64 {
    0.7 + 0.3 * season(day)
}

/// Sunrise hour for the given day of the year.
pub fn sunrise(day: u32) -> f64 {
    6.0 + 2.0 * season(day)
}

/// Sunset hour for the given day of the year.
pub fn sunset(day: u32) -> f64 {
    18.0 - 2.0 * season(day)
}

fn season(day: u32) -> f64 {
    (TAU * (f64::from(day) - 172.0) / 365.0).cos()
}

/// Irradiance in W/m² as a half-sine between sunrise and sunset, zero at night.
pub fn irradiance(hour: f64, sunrise: f64, sunset: f64, peak: f64) -> f64 {
    if hour <= sunrise || hour >= sunset || sunset <= sunrise {
        return 0.0;
    }
    peak * (PI * (hour - sunrise) / (sunset - sunrise)).sin()
}

/// Electrical output of a panel array.
pub fn panel_output(irradiance: f64, area: SquareMetres, efficiency: f64) -> Watts {
    Watts(irradiance.max(0.0) * area.0 * efficiency)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn solstice() {
        assert_abs_diff_eq!(seasonal_factor(172), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sunrise(172), 8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sunset(172), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn day_length_follows_season() {
        assert!(sunset(355) - sunrise(355) > sunset(172) - sunrise(172));
        assert!(seasonal_factor(355) < seasonal_factor(172));
    }

    #[test]
    fn noon_peak() {
        assert_abs_diff_eq!(irradiance(12.0, 6.0, 18.0, 1000.0), 1000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(irradiance(9.0, 6.0, 18.0, 1000.0), 707.107, epsilon = 1e-3);
    }

    #[test]
    fn night() {
        assert_eq!(irradiance(3.0, 6.0, 18.0, 1000.0), 0.0);
        assert_eq!(irradiance(18.0, 6.0, 18.0, 1000.0), 0.0);
    }

    #[test]
    fn panels() {
        assert_abs_diff_eq!(panel_output(1000.0, SquareMetres(12.0), 0.24).0, 2880.0, epsilon = 1e-9);
    }
}
