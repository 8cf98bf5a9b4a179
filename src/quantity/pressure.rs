quantity!(Pascals, via: f64, suffix: "Pa", precision: 0);

impl Pascals {
    pub fn from_bars(bars: f64) -> Self {
        Self(bars * 1e5)
    }

    pub fn to_bars(self) -> f64 {
        self.0 / 1e5
    }
}
