//! Run constants, loaded from an optional TOML file.

mod budget;
mod error;
mod glider;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub use self::{
    budget::{Budget, Horizon},
    error::ConfigError,
    glider::{Equipment, Glider, InitialState, Reservoirs},
};
use crate::prelude::*;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub budget: Budget,
    pub glider: Glider,
}

impl Config {
    /// Read the configuration file, falling back to the built-in defaults when there is none.
    #[instrument(skip_all)]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no configuration file, using the defaults");
            return Ok(Self::default());
        };
        info!(path = %path.display(), "loading the configuration…");
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        self.glider.validate()
    }
}

/// Field checks shared by the configuration sections.
pub(crate) mod check {
    use super::ConfigError;
    use crate::physics::{constants::SOLAR_CONSTANT, wind::BETZ_LIMIT};

    pub fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() { Ok(()) } else { Err(ConfigError::NotFinite { field, value }) }
    }

    pub fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
        finite(field, value)?;
        if value > 0.0 { Ok(()) } else { Err(ConfigError::NotPositive { field, value }) }
    }

    pub fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
        finite(field, value)?;
        if value >= 0.0 { Ok(()) } else { Err(ConfigError::Negative { field, value }) }
    }

    pub fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
        finite(field, value)?;
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::OutOfUnitRange { field, value })
        }
    }

    pub fn power_coefficient(field: &'static str, value: f64) -> Result<(), ConfigError> {
        non_negative(field, value)?;
        if value <= BETZ_LIMIT { Ok(()) } else { Err(ConfigError::AboveBetzLimit { field, value }) }
    }

    pub fn irradiance(field: &'static str, value: f64) -> Result<(), ConfigError> {
        non_negative(field, value)?;
        if value <= SOLAR_CONSTANT { Ok(()) } else { Err(ConfigError::AboveSolarConstant { field, value }) }
    }

    /// Drag coefficient of the polar at the flown lift coefficient.
    pub fn drag(field: &'static str, drag_coefficient: f64) -> Result<(), ConfigError> {
        if drag_coefficient > 0.0 { Ok(()) } else { Err(ConfigError::NoDrag { field }) }
    }

    pub fn within_capacity(field: &'static str, value: f64, capacity: f64) -> Result<(), ConfigError> {
        if value <= capacity { Ok(()) } else { Err(ConfigError::AboveCapacity { field, value, capacity }) }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::quantity::{area::SquareMetres, length::Metres};

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.budget.horizon.days, 360);
        assert_eq!(config.glider.geometry.wing_area, SquareMetres(15.0));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[budget.turbine]\nradius = 0.8\n\n[budget.horizon]\ndays = 30").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.budget.turbine.radius, Metres(0.8));
        assert_eq!(config.budget.horizon.days, 30);
        assert_eq!(config.budget.horizon.steps_per_day, 24);
        assert_eq!(config.budget.turbine.power_coefficient, 0.40);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rocket]\nthrust = 1").unwrap();
        assert!(matches!(Config::load(Some(file.path())), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unreadable_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("absent.toml");
        assert!(matches!(Config::load(Some(&path)), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn checks() {
        assert!(check::positive("x", 0.0).is_err());
        assert!(check::positive("x", f64::NAN).is_err());
        assert!(check::non_negative("x", 0.0).is_ok());
        assert!(check::fraction("x", 1.01).is_err());
        assert!(check::power_coefficient("x", 0.6).is_err());
        assert!(check::power_coefficient("x", 0.59).is_ok());
        assert!(check::irradiance("x", 1361.0).is_ok());
        assert!(check::irradiance("x", 1362.0).is_err());
        assert!(check::drag("x", 0.0).is_err());
        assert!(check::drag("x", 0.024).is_ok());
        assert!(check::within_capacity("x", 60.0, 60.0).is_ok());
        assert!(check::within_capacity("x", 60.5, 60.0).is_err());
    }
}
