quantity!(MetresPerSecond, via: f64, suffix: "m/s", precision: 1);

impl MetresPerSecond {
    pub const fn to_kilometres_per_hour(self) -> f64 {
        self.0 * 3.6
    }
}
