use crate::models::WeatherDay;

/// Growing degree days for one day, simple average method.
pub fn gdd_day(tmin: f64, tmax: f64, tb: f64) -> f64 {
    let gdd = (tmin + tmax) / 2.0 - tb;
    if gdd > 0.0 {
        gdd
    } else {
        0.0
    }
}

/// Temperature-only reference ET (mm) for days without a measured value.
/// Never below 2 mm.
pub fn estimate_et0(tmin: f64, tmax: f64) -> f64 {
    let mean = (tmin + tmax) / 2.0;
    (0.0023 * (tmax - tmin) * mean + 2.0).max(2.0)
}

/// Reference ET for the day, estimated when the forcing has none.
pub fn reference_et0(day: &WeatherDay) -> f64 {
    day.et0.unwrap_or_else(|| estimate_et0(day.tmin, day.tmax))
}

/// Potential crop evapotranspiration from ET0 and the stage coefficient.
pub fn etc_from_kc(et0: f64, kc: f64) -> f64 {
    (et0 * kc).max(0.0)
}

/// Fraction of ground covered by canopy for partitioning ET.
pub fn canopy_cover(lai: f64) -> f64 {
    (lai / 3.0).clamp(0.0, 1.0)
}

/// Fraction of incident radiation intercepted by the canopy (Beer-Lambert, k = 0.65).
pub fn intercepted_fraction(lai: f64) -> f64 {
    1.0 - (-0.65 * lai.max(0.0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn gdd_is_never_negative() {
        assert_eq!(gdd_day(2.0, 6.0, 8.0), 0.0);
        assert!((gdd_day(15.0, 28.0, 8.0) - 13.5).abs() < 1e-9);
    }

    #[test]
    fn et0_estimate_has_floor() {
        assert_eq!(estimate_et0(0.0, 0.0), 2.0);
        assert_eq!(estimate_et0(-10.0, -2.0), 2.0);
        let et0 = estimate_et0(20.0, 31.0);
        assert!((et0 - (0.0023 * 11.0 * 25.5 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn measured_et0_wins() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let day = WeatherDay::new(date, 15.0, 28.0, 0.0, 18.0);
        assert!((reference_et0(&day) - estimate_et0(15.0, 28.0)).abs() < 1e-12);
        assert_eq!(reference_et0(&day.with_et0(4.0)), 4.0);
    }

    #[test]
    fn etc_clamped_at_zero() {
        assert_eq!(etc_from_kc(-1.0, 1.2), 0.0);
        assert!((etc_from_kc(4.0, 1.05) - 4.2).abs() < 1e-9);
    }

    #[test]
    fn canopy_fractions() {
        assert_eq!(canopy_cover(6.0), 1.0);
        assert!((canopy_cover(1.5) - 0.5).abs() < 1e-9);
        assert_eq!(intercepted_fraction(0.0), 0.0);
        assert!(intercepted_fraction(5.0) > 0.95);
    }
}
