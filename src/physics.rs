//! Closed-form physics: every function maps constants to a single scalar.

pub mod aero;
pub mod atmosphere;
pub mod constants;
pub mod solar;
pub mod thermo;
pub mod wind;
