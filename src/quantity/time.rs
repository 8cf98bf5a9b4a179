quantity!(Hours, via: f64, suffix: "h", precision: 1);
quantity!(Seconds, via: f64, suffix: "s", precision: 0);

impl Hours {
    pub const ONE: Self = Self(1.0);
}

impl From<Hours> for Seconds {
    fn from(hours: Hours) -> Self {
        Self(hours.0 * 3600.0)
    }
}
