use serde::{Deserialize, Serialize};

use crate::{
    config::{ConfigError, check},
    physics::{aero, wind::Teng},
    quantity::{
        area::SquareMetres,
        length::Metres,
        mass::Kilograms,
        power::Watts,
        speed::MetresPerSecond,
    },
};

/// Constants of the year-long flight ledger.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Glider {
    pub geometry: Geometry,
    pub aerodynamics: Aerodynamics,
    pub empty: EmptyMasses,

    /// Tank capacities.
    pub capacity: Reservoirs,

    pub panels: Panels,
    pub initial: InitialState,
    pub equipment: Equipment,

    /// Triboelectric film on the wings, powering the night-time sparks.
    pub teng: Teng,
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Geometry {
    pub span: Metres,
    pub wing_area: SquareMetres,
    pub aspect_ratio: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self { span: Metres(20.0), wing_area: SquareMetres(15.0), aspect_ratio: 26.7 }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Aerodynamics {
    pub max_lift_coefficient: f64,
    pub cruise_lift_coefficient: f64,
    pub parasitic_drag: f64,
    pub induced_drag_factor: f64,
}

impl Default for Aerodynamics {
    fn default() -> Self {
        Self {
            max_lift_coefficient: 1.5,
            cruise_lift_coefficient: 0.8,
            parasitic_drag: 0.008,
            induced_drag_factor: 0.025,
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmptyMasses {
    pub structure: Kilograms,
    pub engine: Kilograms,
    pub turbine: Kilograms,
    pub heat_exchanger: Kilograms,
    pub electrolyser: Kilograms,
    pub co2_tank: Kilograms,
    pub h2_tank: Kilograms,
    pub water_tank: Kilograms,
    pub solar_panels: Kilograms,
    pub batteries: Kilograms,
    pub avionics: Kilograms,
}

impl Default for EmptyMasses {
    fn default() -> Self {
        Self {
            structure: Kilograms(180.0),
            engine: Kilograms(25.0),
            turbine: Kilograms(8.0),
            heat_exchanger: Kilograms(12.0),
            electrolyser: Kilograms(15.0),
            co2_tank: Kilograms(20.0),
            h2_tank: Kilograms(25.0),
            water_tank: Kilograms(5.0),
            solar_panels: Kilograms(20.0),
            batteries: Kilograms(10.0),
            avionics: Kilograms(8.0),
        }
    }
}

impl EmptyMasses {
    const fn as_array(&self) -> [(&'static str, Kilograms); 11] {
        [
            ("glider.empty.structure", self.structure),
            ("glider.empty.engine", self.engine),
            ("glider.empty.turbine", self.turbine),
            ("glider.empty.heat_exchanger", self.heat_exchanger),
            ("glider.empty.electrolyser", self.electrolyser),
            ("glider.empty.co2_tank", self.co2_tank),
            ("glider.empty.h2_tank", self.h2_tank),
            ("glider.empty.water_tank", self.water_tank),
            ("glider.empty.solar_panels", self.solar_panels),
            ("glider.empty.batteries", self.batteries),
            ("glider.empty.avionics", self.avionics),
        ]
    }

    pub fn total(&self) -> Kilograms {
        self.as_array().into_iter().map(|(_, mass)| mass).sum()
    }
}

/// On-board resource masses.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Reservoirs {
    pub co2: Kilograms,
    pub h2: Kilograms,
    pub water: Kilograms,
    pub coal: Kilograms,
}

impl Default for Reservoirs {
    fn default() -> Self {
        Self { co2: Kilograms(60.0), h2: Kilograms(3.0), water: Kilograms(10.0), coal: Kilograms(15.0) }
    }
}

impl Reservoirs {
    pub fn total(&self) -> Kilograms {
        self.co2 + self.h2 + self.water + self.coal
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Panels {
    pub area: SquareMetres,
    pub efficiency: f64,
}

impl Default for Panels {
    fn default() -> Self {
        Self { area: SquareMetres(12.0), efficiency: 0.24 }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InitialState {
    pub altitude: Metres,
    pub speed: MetresPerSecond,
    pub co2: Kilograms,
    pub h2: Kilograms,
    pub water: Kilograms,
    pub coal: Kilograms,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            altitude: Metres(3000.0),
            speed: MetresPerSecond(25.0),
            co2: Kilograms(50.0),
            h2: Kilograms(2.0),
            water: Kilograms(5.0),
            coal: Kilograms(12.0),
        }
    }
}

impl InitialState {
    pub const fn reservoirs(&self) -> Reservoirs {
        Reservoirs { co2: self.co2, h2: self.h2, water: self.water, coal: self.coal }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Equipment {
    pub electrolyser_power: Watts,
    pub electrolyser_efficiency: f64,

    /// Air intake section of the atmospheric water collector.
    pub collector_section: SquareMetres,

    pub collector_efficiency: f64,
    pub condenser_efficiency: f64,
    pub compression_efficiency: f64,

    /// Nose turbine spinning in the relative wind.
    pub nose_turbine_radius: Metres,

    pub nose_turbine_power_coefficient: f64,
}

impl Default for Equipment {
    fn default() -> Self {
        Self {
            electrolyser_power: Watts(400.0),
            electrolyser_efficiency: 0.75,
            collector_section: SquareMetres(0.1),
            collector_efficiency: 0.12,
            condenser_efficiency: 0.95,
            compression_efficiency: 0.70,
            nose_turbine_radius: Metres(0.15),
            nose_turbine_power_coefficient: 0.35,
        }
    }
}

impl Glider {
    pub fn empty_mass(&self) -> Kilograms {
        self.empty.total()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check::positive("glider.geometry.span", self.geometry.span.0)?;
        check::positive("glider.geometry.wing_area", self.geometry.wing_area.0)?;
        check::positive("glider.geometry.aspect_ratio", self.geometry.aspect_ratio)?;

        check::positive("glider.aerodynamics.max_lift_coefficient", self.aerodynamics.max_lift_coefficient)?;
        check::positive(
            "glider.aerodynamics.cruise_lift_coefficient",
            self.aerodynamics.cruise_lift_coefficient,
        )?;
        check::non_negative("glider.aerodynamics.parasitic_drag", self.aerodynamics.parasitic_drag)?;
        check::non_negative(
            "glider.aerodynamics.induced_drag_factor",
            self.aerodynamics.induced_drag_factor,
        )?;
        check::drag(
            "glider.aerodynamics",
            aero::drag_coefficient(
                self.aerodynamics.parasitic_drag,
                self.aerodynamics.induced_drag_factor,
                self.aerodynamics.cruise_lift_coefficient,
            ),
        )?;

        for (field, mass) in self.empty.as_array() {
            check::non_negative(field, mass.0)?;
        }
        check::positive("glider.empty", self.empty_mass().0)?;

        check::positive("glider.capacity.co2", self.capacity.co2.0)?;
        check::positive("glider.capacity.h2", self.capacity.h2.0)?;
        check::positive("glider.capacity.water", self.capacity.water.0)?;
        check::positive("glider.capacity.coal", self.capacity.coal.0)?;

        check::positive("glider.panels.area", self.panels.area.0)?;
        check::fraction("glider.panels.efficiency", self.panels.efficiency)?;

        check::non_negative("glider.initial.altitude", self.initial.altitude.0)?;
        check::non_negative("glider.initial.speed", self.initial.speed.0)?;
        check::non_negative("glider.initial.co2", self.initial.co2.0)?;
        check::non_negative("glider.initial.h2", self.initial.h2.0)?;
        check::non_negative("glider.initial.water", self.initial.water.0)?;
        check::positive("glider.initial.coal", self.initial.coal.0)?;
        for (field, initial, capacity) in [
            ("glider.initial.co2", self.initial.co2, self.capacity.co2),
            ("glider.initial.h2", self.initial.h2, self.capacity.h2),
            ("glider.initial.water", self.initial.water, self.capacity.water),
            ("glider.initial.coal", self.initial.coal, self.capacity.coal),
        ] {
            check::within_capacity(field, initial.0, capacity.0)?;
        }

        check::non_negative("glider.equipment.electrolyser_power", self.equipment.electrolyser_power.0)?;
        check::fraction("glider.equipment.electrolyser_efficiency", self.equipment.electrolyser_efficiency)?;
        check::non_negative("glider.equipment.collector_section", self.equipment.collector_section.0)?;
        check::fraction("glider.equipment.collector_efficiency", self.equipment.collector_efficiency)?;
        check::fraction("glider.equipment.condenser_efficiency", self.equipment.condenser_efficiency)?;
        check::fraction("glider.equipment.compression_efficiency", self.equipment.compression_efficiency)?;
        check::positive("glider.equipment.nose_turbine_radius", self.equipment.nose_turbine_radius.0)?;
        check::power_coefficient(
            "glider.equipment.nose_turbine_power_coefficient",
            self.equipment.nose_turbine_power_coefficient,
        )?;

        check::non_negative("glider.teng.area", self.teng.area.0)?;
        check::positive("glider.teng.reference_speed", self.teng.reference_speed.0)?;
        check::fraction("glider.teng.active_fraction", self.teng.active_fraction)?;
        check::fraction("glider.teng.efficiency", self.teng.efficiency)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn empty_mass() {
        assert_abs_diff_eq!(Glider::default().empty_mass().0, 328.0);
    }

    #[test]
    fn negative_mass_is_rejected() {
        let mut glider = Glider::default();
        glider.empty.turbine = Kilograms(-8.0);
        assert!(matches!(
            glider.validate(),
            Err(ConfigError::Negative { field: "glider.empty.turbine", .. }),
        ));
    }

    #[test]
    fn zero_panel_area_is_rejected() {
        let mut glider = Glider::default();
        glider.panels.area = SquareMetres::ZERO;
        assert!(matches!(glider.validate(), Err(ConfigError::NotPositive { field: "glider.panels.area", .. })));
    }

    #[test]
    fn drag_free_polar_is_rejected() {
        let mut glider = Glider::default();
        glider.aerodynamics.parasitic_drag = 0.0;
        glider.aerodynamics.induced_drag_factor = 0.0;
        assert!(matches!(glider.validate(), Err(ConfigError::NoDrag { field: "glider.aerodynamics" })));
    }

    #[test]
    fn initial_coal_above_capacity() {
        let mut glider = Glider::default();
        glider.initial.coal = Kilograms(16.0);
        assert!(matches!(
            glider.validate(),
            Err(ConfigError::AboveCapacity { field: "glider.initial.coal", .. }),
        ));
    }

    #[test]
    fn partial_initial_state() {
        let glider: Glider = toml::from_str("[initial]\naltitude = 2500.0\nh2 = 1.5").unwrap();
        assert_eq!(glider.initial.altitude, Metres(2500.0));
        assert_eq!(glider.initial.reservoirs().h2, Kilograms(1.5));
        assert_eq!(glider.initial.reservoirs().coal, Kilograms(12.0));
    }
}
