//! Wind and triboelectric harvesting.

use crate::quantity::{
    area::SquareMetres,
    density::KilogramsPerCubicMetre,
    length::Metres,
    power::Watts,
    speed::MetresPerSecond,
};

/// Upper bound on the power coefficient of any open rotor.
pub const BETZ_LIMIT: f64 = 16.0 / 27.0;

/// Kinetic power carried by the air through the swept area: `½·ρ·A·v³`.
pub fn wind_power(density: KilogramsPerCubicMetre, area: SquareMetres, speed: MetresPerSecond) -> Watts {
    Watts(0.5 * density.0 * area.0 * speed.0.powi(3))
}

/// Shaft power extracted by a rotor: `½·Cp·ρ·A·v³`.
///
/// The power coefficient is capped at the Betz limit, and a headwind below zero yields nothing.
pub fn turbine_power(
    density: KilogramsPerCubicMetre,
    area: SquareMetres,
    speed: MetresPerSecond,
    power_coefficient: f64,
) -> Watts {
    if speed.0 <= 0.0 {
        return Watts::ZERO;
    }
    wind_power(density, area, speed) * power_coefficient.clamp(0.0, BETZ_LIMIT)
}

/// Rotor speed in revolutions per minute for the given tip-speed ratio.
pub fn rotor_speed_rpm(tip_speed_ratio: f64, speed: MetresPerSecond, radius: Metres) -> f64 {
    tip_speed_ratio * speed.0 / radius.0 * 60.0 / std::f64::consts::TAU
}

/// Triboelectric nanogenerator film.
#[derive(Copy, Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Teng {
    pub area: SquareMetres,

    /// Power density at the reference speed, in W/m².
    pub reference_power_density: f64,

    pub reference_speed: MetresPerSecond,
    pub exponent: f64,
    pub active_fraction: f64,
    pub efficiency: f64,
    pub cut_in_speed: MetresPerSecond,
}

impl Default for Teng {
    fn default() -> Self {
        Self {
            area: SquareMetres(15.0),
            reference_power_density: 0.08,
            reference_speed: MetresPerSecond(20.0),
            exponent: 1.0,
            active_fraction: 1.0,
            efficiency: 1.0,
            cut_in_speed: MetresPerSecond(2.0),
        }
    }
}

impl Teng {
    /// `P_ref·(v/v_ref)^n·S·fraction·η`, zero below the cut-in speed.
    pub fn power(&self, speed: MetresPerSecond) -> Watts {
        if speed < self.cut_in_speed || speed.0 <= 0.0 {
            return Watts::ZERO;
        }
        Watts(
            self.reference_power_density
                * (speed / self.reference_speed).powf(self.exponent)
                * self.area.0
                * self.active_fraction
                * self.efficiency,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn reference_turbine() {
        let power =
            turbine_power(KilogramsPerCubicMetre(1.0), SquareMetres(6.0), MetresPerSecond(10.0), 0.40);
        assert_abs_diff_eq!(power.0, 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn power_coefficient_is_capped_at_betz() {
        let density = KilogramsPerCubicMetre(1.2);
        let area = SquareMetres(2.0);
        let speed = MetresPerSecond(8.0);
        assert_eq!(turbine_power(density, area, speed, 0.9), turbine_power(density, area, speed, BETZ_LIMIT));
        assert!(turbine_power(density, area, speed, 0.9) < wind_power(density, area, speed));
    }

    #[test]
    fn rotor_speed() {
        // λ = 6 at 10 m/s on a 0.5 m rotor: ω = 120 rad/s.
        assert_abs_diff_eq!(rotor_speed_rpm(6.0, MetresPerSecond(10.0), Metres(0.5)), 1145.916, epsilon = 1e-3);
    }

    #[test]
    fn teng_reference_point() {
        let teng = Teng::default();
        assert_abs_diff_eq!(teng.power(MetresPerSecond(20.0)).0, 1.2, epsilon = 1e-12);
        assert_abs_diff_eq!(teng.power(MetresPerSecond(40.0)).0, 2.4, epsilon = 1e-12);
    }

    #[test]
    fn teng_below_cut_in() {
        assert_eq!(Teng::default().power(MetresPerSecond(1.0)), Watts::ZERO);
    }

    proptest! {
        #[test]
        fn turbine_power_is_monotonic_in_speed(
            low in 0.0..60.0_f64,
            delta in 0.0..20.0_f64,
            cp in 0.0..0.6_f64,
            radius in 0.05..3.0_f64,
        ) {
            let density = KilogramsPerCubicMetre(1.0);
            let area = SquareMetres::disc(Metres(radius));
            let slow = turbine_power(density, area, MetresPerSecond(low), cp);
            let fast = turbine_power(density, area, MetresPerSecond(low + delta), cp);
            prop_assert!(fast >= slow);
        }
    }
}
