#[macro_use]
pub mod macros;

pub mod area;
pub mod density;
pub mod energy;
pub mod length;
pub mod mass;
pub mod power;
pub mod pressure;
pub mod speed;
pub mod temperature;
pub mod time;

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{energy::WattHours, mass::Kilograms, power::Watts, time::Hours};

    #[test]
    fn test_min() {
        assert_eq!(Watts(1.0).min(Watts(2.0)), Watts(1.0));
        assert_eq!(Watts(2.0).min(Watts(1.0)), Watts(1.0));
    }

    #[test]
    fn test_max() {
        assert_eq!(Watts(1.0).max(Watts(2.0)), Watts(2.0));
        assert_eq!(Watts(2.0).max(Watts(1.0)), Watts(2.0));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(Kilograms(1.0).clamp(Kilograms(2.0), Kilograms(3.0)), Kilograms(2.0));
        assert_eq!(Kilograms(4.0).clamp(Kilograms(2.0), Kilograms(3.0)), Kilograms(3.0));
        assert_eq!(Kilograms(2.0).clamp(Kilograms(1.0), Kilograms(3.0)), Kilograms(2.0));
    }

    #[test]
    fn test_display_precision() {
        assert_eq!(Watts(1234.567).to_string(), "1235 W");
        assert_eq!(format!("{:.1}", Watts(1234.567)), "1234.6 W");
        assert_eq!(Kilograms(1.23456).to_string(), "1.235 kg");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("42.5".parse::<Watts>().unwrap(), Watts(42.5));
    }

    #[test]
    fn test_sum() {
        let total: WattHours = [WattHours(1.0), WattHours(2.5)].into_iter().sum();
        assert_abs_diff_eq!(total.0, 3.5);
    }

    #[test]
    fn test_ratio() {
        assert_abs_diff_eq!(Hours(3.0) / Hours(4.0), 0.75);
    }
}
