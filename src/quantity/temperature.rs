quantity!(Kelvin, via: f64, suffix: "K", precision: 1);

impl Kelvin {
    pub const ZERO_CELSIUS: Self = Self(273.15);

    pub fn to_celsius(self) -> f64 {
        self.0 - Self::ZERO_CELSIUS.0
    }
}
