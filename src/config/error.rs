use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,

        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{path}`")]
    Parse {
        path: PathBuf,

        #[source]
        source: toml::de::Error,
    },

    #[error("`{field}` must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("`{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("`{field}` must lie within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("`{field}` exceeds the Betz limit (16/27), got {value}")]
    AboveBetzLimit { field: &'static str, value: f64 },

    #[error("`{field}` exceeds the solar constant (1361 W/m²), got {value}")]
    AboveSolarConstant { field: &'static str, value: f64 },

    #[error("`budget.horizon` of {days} days × {steps_per_day} steps exceeds {max} steps")]
    HorizonTooLong { days: u32, steps_per_day: u32, max: u32 },

    #[error("`{field}` yields a drag-free polar")]
    NoDrag { field: &'static str },

    #[error("`{field}` ({value}) exceeds its capacity ({capacity})")]
    AboveCapacity { field: &'static str, value: f64, capacity: f64 },

    #[error("`{field}` must be at least one")]
    Zero { field: &'static str },

    #[error("sunset ({sunset} h) must come after sunrise ({sunrise} h)")]
    EmptyDaylight { sunrise: f64, sunset: f64 },
}
