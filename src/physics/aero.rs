//! Glider aerodynamics with a parabolic drag polar.

use crate::{
    physics::constants::GRAVITY,
    quantity::{
        area::SquareMetres,
        density::KilogramsPerCubicMetre,
        mass::Kilograms,
        power::Watts,
        speed::MetresPerSecond,
    },
};

/// Aerodynamic force in newtons: `½·ρ·V²·S·C`.
fn force(density: KilogramsPerCubicMetre, speed: MetresPerSecond, area: SquareMetres, coefficient: f64) -> f64 {
    0.5 * density.0 * speed.0 * speed.0 * area.0 * coefficient
}

/// Lift in newtons.
pub fn lift(density: KilogramsPerCubicMetre, speed: MetresPerSecond, area: SquareMetres, lift_coefficient: f64) -> f64 {
    force(density, speed, area, lift_coefficient)
}

/// Drag in newtons.
pub fn drag(density: KilogramsPerCubicMetre, speed: MetresPerSecond, area: SquareMetres, drag_coefficient: f64) -> f64 {
    force(density, speed, area, drag_coefficient)
}

/// `Cx = Cx0 + k·Cz²`.
pub fn drag_coefficient(parasitic: f64, induced_factor: f64, lift_coefficient: f64) -> f64 {
    parasitic + induced_factor * lift_coefficient * lift_coefficient
}

/// Lift-to-drag ratio, zero for a drag-free polar.
pub fn glide_ratio(lift_coefficient: f64, drag_coefficient: f64) -> f64 {
    if drag_coefficient > 0.0 { lift_coefficient / drag_coefficient } else { 0.0 }
}

/// Speed at which lift balances weight: `√(2·m·g / (ρ·S·Cz))`.
pub fn equilibrium_speed(
    mass: Kilograms,
    density: KilogramsPerCubicMetre,
    area: SquareMetres,
    lift_coefficient: f64,
) -> MetresPerSecond {
    MetresPerSecond((2.0 * mass.0 * GRAVITY / (density.0 * area.0 * lift_coefficient)).sqrt())
}

/// Descent rate in still air, positive downwards.
pub fn sink_rate(
    mass: Kilograms,
    density: KilogramsPerCubicMetre,
    area: SquareMetres,
    lift_coefficient: f64,
    drag_coefficient: f64,
) -> MetresPerSecond {
    let speed = equilibrium_speed(mass, density, area, lift_coefficient);
    let ratio = glide_ratio(lift_coefficient, drag_coefficient);
    if ratio > 0.0 { speed / ratio } else { MetresPerSecond::ZERO }
}

/// Power needed to hold level flight: `m·g·V / f`.
pub fn level_flight_power(
    mass: Kilograms,
    density: KilogramsPerCubicMetre,
    area: SquareMetres,
    lift_coefficient: f64,
    drag_coefficient: f64,
) -> Watts {
    let speed = equilibrium_speed(mass, density, area, lift_coefficient);
    let ratio = glide_ratio(lift_coefficient, drag_coefficient);
    if ratio > 0.0 { Watts(mass.0 * GRAVITY * speed.0 / ratio) } else { Watts(f64::INFINITY) }
}

/// Potential power released in a dive: `m·g·V·sin θ`.
pub fn dive_power(mass: Kilograms, angle_degrees: f64, speed: MetresPerSecond) -> Watts {
    Watts(mass.0 * GRAVITY * speed.0 * angle_degrees.to_radians().sin())
}
