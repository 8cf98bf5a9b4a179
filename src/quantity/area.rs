use std::f64::consts::PI;

use crate::quantity::length::Metres;

quantity!(SquareMetres, via: f64, suffix: "m²", precision: 2);

impl SquareMetres {
    /// Area of a disc with the given radius.
    pub fn disc(radius: Metres) -> Self {
        Self(PI * radius.0 * radius.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_disc() {
        assert_abs_diff_eq!(SquareMetres::disc(Metres(0.25)).0, 0.196_349_5, epsilon = 1e-6);
    }
}
