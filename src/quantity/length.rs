quantity!(Metres, via: f64, suffix: "m", precision: 0);
quantity!(Kilometres, via: f64, suffix: "km", precision: 0);

impl From<Metres> for Kilometres {
    fn from(metres: Metres) -> Self {
        Self(metres.0 / 1000.0)
    }
}
