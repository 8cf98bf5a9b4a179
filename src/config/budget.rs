use serde::{Deserialize, Serialize};

use crate::{
    config::{ConfigError, check},
    physics::{
        aero,
        constants::h2,
        wind::{self, Teng},
    },
    quantity::{
        area::SquareMetres,
        density::KilogramsPerCubicMetre,
        energy::{Joules, WattHours},
        length::Metres,
        mass::Kilograms,
        power::Watts,
        speed::MetresPerSecond,
        time::Hours,
    },
};

/// Constants of the energy-balance narrator.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Budget {
    pub horizon: Horizon,
    pub initial: Initial,
    pub capacity: Capacity,

    /// Altitude-adjusted air density.
    pub air_density: KilogramsPerCubicMetre,

    pub airframe: Airframe,
    pub turbine: Turbine,
    pub teng: Teng,
    pub solar: Solar,
    pub dive: Dive,
    pub combustion: Combustion,
    pub loads: Loads,

    /// Liquefied CO2 drawn by the expansion engine per hour.
    pub co2_expansion_per_hour: Kilograms,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            horizon: Horizon::default(),
            initial: Initial::default(),
            capacity: Capacity::default(),
            // ISA at 3000 m.
            air_density: KilogramsPerCubicMetre(0.909),
            airframe: Airframe::default(),
            turbine: Turbine::default(),
            teng: Teng::default(),
            solar: Solar::default(),
            dive: Dive::default(),
            combustion: Combustion::default(),
            loads: Loads::default(),
            co2_expansion_per_hour: Kilograms(0.5),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Horizon {
    pub days: u32,
    pub steps_per_day: u32,
}

impl Default for Horizon {
    fn default() -> Self {
        Self { days: 360, steps_per_day: 24 }
    }
}

/// Upper bound on the number of narrated steps, a little over a century of hourly steps.
pub const MAX_STEPS: u32 = 1_000_000;

impl Horizon {
    pub fn n_steps(self) -> Result<u32, ConfigError> {
        self.days
            .checked_mul(self.steps_per_day)
            .filter(|n_steps| *n_steps <= MAX_STEPS)
            .ok_or(ConfigError::HorizonTooLong { days: self.days, steps_per_day: self.steps_per_day, max: MAX_STEPS })
    }

    pub fn step_duration(self) -> Hours {
        Hours(24.0 / f64::from(self.steps_per_day))
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Initial {
    pub energy: WattHours,
    pub fuel: Kilograms,
    pub liquid_co2: Kilograms,
}

impl Default for Initial {
    fn default() -> Self {
        Self { energy: WattHours(2000.0), fuel: Kilograms(12.0), liquid_co2: Kilograms(50.0) }
    }
}

/// Upper bounds of the reservoirs, none meaning unbounded.
#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capacity {
    pub energy: Option<WattHours>,
    pub liquid_co2: Option<Kilograms>,
}

impl Default for Capacity {
    fn default() -> Self {
        Self { energy: Some(WattHours(20_000.0)), liquid_co2: Some(Kilograms(60.0)) }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Airframe {
    pub mass: Kilograms,
    pub wing_area: SquareMetres,
    pub lift_coefficient: f64,
    pub parasitic_drag: f64,
    pub induced_drag_factor: f64,
}

impl Default for Airframe {
    fn default() -> Self {
        Self {
            mass: Kilograms(400.0),
            wing_area: SquareMetres(15.0),
            lift_coefficient: 0.8,
            parasitic_drag: 0.008,
            induced_drag_factor: 0.025,
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Turbine {
    pub radius: Metres,
    pub power_coefficient: f64,
    pub generator_efficiency: f64,
    pub tip_speed_ratio: f64,
    pub wind_speed: MetresPerSecond,

    /// Relative wind speed perturbation, drawn uniformly from `±jitter`.
    pub wind_jitter: f64,
}

impl Default for Turbine {
    fn default() -> Self {
        Self {
            radius: Metres(0.6),
            power_coefficient: 0.40,
            generator_efficiency: 0.9,
            tip_speed_ratio: 6.0,
            wind_speed: MetresPerSecond(10.0),
            wind_jitter: 0.0,
        }
    }
}

impl Turbine {
    /// Rotor speed at the nominal wind.
    pub fn rotor_speed_rpm(&self) -> f64 {
        wind::rotor_speed_rpm(self.tip_speed_ratio, self.wind_speed, self.radius)
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Solar {
    pub panel_area: SquareMetres,
    pub efficiency: f64,

    /// W/m².
    pub peak_irradiance: f64,

    /// Hour of the day.
    pub sunrise: f64,

    /// Hour of the day.
    pub sunset: f64,

    /// Maximum fraction of the irradiance hidden by clouds.
    pub cloud_jitter: f64,
}

impl Default for Solar {
    fn default() -> Self {
        Self {
            panel_area: SquareMetres(12.0),
            efficiency: 0.24,
            peak_irradiance: 1000.0,
            sunrise: 6.0,
            sunset: 18.0,
            cloud_jitter: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Dive {
    /// Fraction of every step spent diving.
    pub duty_cycle: f64,

    pub speed: MetresPerSecond,
    pub angle_degrees: f64,
    pub compression_efficiency: f64,

    /// Energy needed to liquefy one kilogram of CO2.
    pub liquefaction_energy: Joules,
}

impl Default for Dive {
    fn default() -> Self {
        Self {
            duty_cycle: 0.05,
            speed: MetresPerSecond(50.0),
            angle_degrees: 30.0,
            compression_efficiency: 0.7,
            liquefaction_energy: Joules(300_000.0),
        }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Combustion {
    pub fuel_per_hour: Kilograms,

    /// Per kilogram of fuel.
    pub heating_value: Joules,

    pub efficiency: f64,
}

impl Default for Combustion {
    fn default() -> Self {
        Self { fuel_per_hour: Kilograms(0.001), heating_value: h2::LOWER_HEATING_VALUE, efficiency: 0.35 }
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Loads {
    pub avionics: Watts,
    pub metabolism: Watts,
}

impl Default for Loads {
    fn default() -> Self {
        Self { avionics: Watts(50.0), metabolism: Watts(100.0) }
    }
}

impl Budget {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon.days == 0 {
            return Err(ConfigError::Zero { field: "budget.horizon.days" });
        }
        if self.horizon.steps_per_day == 0 {
            return Err(ConfigError::Zero { field: "budget.horizon.steps_per_day" });
        }
        self.horizon.n_steps()?;

        check::non_negative("budget.initial.energy", self.initial.energy.0)?;
        check::non_negative("budget.initial.fuel", self.initial.fuel.0)?;
        check::non_negative("budget.initial.liquid_co2", self.initial.liquid_co2.0)?;
        if let Some(energy) = self.capacity.energy {
            check::positive("budget.capacity.energy", energy.0)?;
            check::within_capacity("budget.initial.energy", self.initial.energy.0, energy.0)?;
        }
        if let Some(liquid_co2) = self.capacity.liquid_co2 {
            check::positive("budget.capacity.liquid_co2", liquid_co2.0)?;
            check::within_capacity("budget.initial.liquid_co2", self.initial.liquid_co2.0, liquid_co2.0)?;
        }

        check::positive("budget.air_density", self.air_density.0)?;

        check::positive("budget.airframe.mass", self.airframe.mass.0)?;
        check::positive("budget.airframe.wing_area", self.airframe.wing_area.0)?;
        check::positive("budget.airframe.lift_coefficient", self.airframe.lift_coefficient)?;
        check::non_negative("budget.airframe.parasitic_drag", self.airframe.parasitic_drag)?;
        check::non_negative("budget.airframe.induced_drag_factor", self.airframe.induced_drag_factor)?;
        check::drag(
            "budget.airframe",
            aero::drag_coefficient(
                self.airframe.parasitic_drag,
                self.airframe.induced_drag_factor,
                self.airframe.lift_coefficient,
            ),
        )?;

        check::positive("budget.turbine.radius", self.turbine.radius.0)?;
        check::power_coefficient("budget.turbine.power_coefficient", self.turbine.power_coefficient)?;
        check::fraction("budget.turbine.generator_efficiency", self.turbine.generator_efficiency)?;
        check::non_negative("budget.turbine.tip_speed_ratio", self.turbine.tip_speed_ratio)?;
        check::non_negative("budget.turbine.wind_speed", self.turbine.wind_speed.0)?;
        check::fraction("budget.turbine.wind_jitter", self.turbine.wind_jitter)?;

        check::non_negative("budget.teng.area", self.teng.area.0)?;
        check::non_negative("budget.teng.reference_power_density", self.teng.reference_power_density)?;
        check::positive("budget.teng.reference_speed", self.teng.reference_speed.0)?;
        check::finite("budget.teng.exponent", self.teng.exponent)?;
        check::fraction("budget.teng.active_fraction", self.teng.active_fraction)?;
        check::fraction("budget.teng.efficiency", self.teng.efficiency)?;
        check::non_negative("budget.teng.cut_in_speed", self.teng.cut_in_speed.0)?;

        check::positive("budget.solar.panel_area", self.solar.panel_area.0)?;
        check::fraction("budget.solar.efficiency", self.solar.efficiency)?;
        check::irradiance("budget.solar.peak_irradiance", self.solar.peak_irradiance)?;
        check::finite("budget.solar.sunrise", self.solar.sunrise)?;
        check::finite("budget.solar.sunset", self.solar.sunset)?;
        if self.solar.sunset <= self.solar.sunrise {
            return Err(ConfigError::EmptyDaylight { sunrise: self.solar.sunrise, sunset: self.solar.sunset });
        }
        check::fraction("budget.solar.cloud_jitter", self.solar.cloud_jitter)?;

        check::fraction("budget.dive.duty_cycle", self.dive.duty_cycle)?;
        check::non_negative("budget.dive.speed", self.dive.speed.0)?;
        check::finite("budget.dive.angle_degrees", self.dive.angle_degrees)?;
        check::fraction("budget.dive.compression_efficiency", self.dive.compression_efficiency)?;
        check::positive("budget.dive.liquefaction_energy", self.dive.liquefaction_energy.0)?;

        check::non_negative("budget.combustion.fuel_per_hour", self.combustion.fuel_per_hour.0)?;
        check::non_negative("budget.combustion.heating_value", self.combustion.heating_value.0)?;
        check::fraction("budget.combustion.efficiency", self.combustion.efficiency)?;

        check::non_negative("budget.loads.avionics", self.loads.avionics.0)?;
        check::non_negative("budget.loads.metabolism", self.loads.metabolism.0)?;
        check::non_negative("budget.co2_expansion_per_hour", self.co2_expansion_per_hour.0)
    }
}
