use std::fmt::{Debug, Display, Formatter};

pub struct FormattedPercentage(pub f64);

impl Debug for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for FormattedPercentage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_decimal() {
        assert_eq!(FormattedPercentage(0.665).to_string(), "66.5%");
        assert_eq!(FormattedPercentage(0.0).to_string(), "0.0%");
    }
}
