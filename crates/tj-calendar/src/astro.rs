//! Low-precision solar and lunar theory.
//!
//! Enough accuracy to place solar terms and new moons within a few minutes
//! for civil years 1900-2100: the sun's apparent longitude is good to about
//! 0.01°, new moons to well under a minute. Julian days here are UT unless
//! a name says `jde` (dynamical time).

use chrono::{DateTime, Utc};

/// Julian day of 2000-01-01 12:00.
pub(crate) const J2000: f64 = 2_451_545.0;

/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Mean tropical year in days.
pub(crate) const TROPICAL_YEAR: f64 = 365.242_19;

/// Mean synodic month in days.
pub(crate) const SYNODIC_MONTH: f64 = 29.530_588_861;

/// JDE of the mean new moon with lunation number 0 (2000-01-06).
const LUNATION_EPOCH_JDE: f64 = 2_451_550.097_66;

const MAX_ITERATIONS: usize = 30;
const CONVERGENCE_DAYS: f64 = 1e-7;

/// Julian day (UT) of an instant.
pub(crate) fn julian_day(at: &DateTime<Utc>) -> f64 {
    let seconds = at.timestamp() as f64 + f64::from(at.timestamp_subsec_nanos()) * 1e-9;
    seconds / 86_400.0 + UNIX_EPOCH_JD
}

/// The instant of a Julian day (UT), rounded to the millisecond.
pub(crate) fn from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}

/// TT − UT in seconds, from the Espenak-Meeus polynomial fits.
pub(crate) fn delta_t_seconds(jd: f64) -> f64 {
    let y = 2000.0 + (jd - J2000) / 365.25;
    let long_term = |y: f64| {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    };
    if y < 1900.0 {
        long_term(y)
    } else if y < 1920.0 {
        let t = y - 1900.0;
        -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3)
            - 0.000_197 * t.powi(4)
    } else if y < 1941.0 {
        let t = y - 1920.0;
        21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
            + 0.001_727_5 * t.powi(3)
            + 0.000_651_814 * t.powi(4)
            + 0.000_023_735_99 * t.powi(5)
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
    } else if y < 2150.0 {
        long_term(y) - 0.5628 * (2150.0 - y)
    } else {
        long_term(y)
    }
}

fn delta_t_days(jd: f64) -> f64 {
    delta_t_seconds(jd) / 86_400.0
}

/// Reduce an angle to [0, 360).
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// Reduce an angle to (-180, 180].
pub(crate) fn normalize_pm180(deg: f64) -> f64 {
    let d = normalize_degrees(deg);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Apparent geocentric ecliptic longitude of the sun at a JDE, in degrees.
fn sun_longitude_at_jde(jde: f64) -> f64 {
    let t = (jde - J2000) / 36_525.0;
    let mean_longitude = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let mean_anomaly = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * mean_anomaly.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * mean_anomaly).sin()
        + 0.000_289 * (3.0 * mean_anomaly).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    normalize_degrees(mean_longitude + center - 0.005_69 - 0.004_78 * omega.sin())
}

/// Apparent solar longitude at a Julian day (UT), in degrees.
pub(crate) fn sun_longitude(jd: f64) -> f64 {
    sun_longitude_at_jde(jd + delta_t_days(jd))
}

/// The instant (UT) the sun reaches `target_deg`, searching from `guess`.
///
/// Converges to the crossing within half a year of the guess.
pub(crate) fn solar_longitude_crossing(target_deg: f64, guess: f64) -> f64 {
    let mut jd = guess;
    for _ in 0..MAX_ITERATIONS {
        let lag = normalize_pm180(target_deg - sun_longitude(jd));
        let step = lag * TROPICAL_YEAR / 360.0;
        jd += step;
        if step.abs() < CONVERGENCE_DAYS {
            break;
        }
    }
    jd
}

/// The last instant (UT) at or before `jd` when the sun stood at `target_deg`.
pub(crate) fn previous_solar_longitude_crossing(target_deg: f64, jd: f64) -> f64 {
    let behind = normalize_degrees(sun_longitude(jd) - target_deg);
    let guess = jd - behind * TROPICAL_YEAR / 360.0;
    solar_longitude_crossing(target_deg, guess).min(jd)
}

/// Lunation number of the mean new moon closest before `jd`.
pub(crate) fn lunation_before(jd: f64) -> i64 {
    ((jd - LUNATION_EPOCH_JDE) / SYNODIC_MONTH).floor() as i64
}

/// Instant (UT) of the true new moon with lunation number `k`.
pub(crate) fn new_moon(k: i64) -> f64 {
    let jde = new_moon_jde(k);
    jde - delta_t_days(jde)
}

/// True new moon in dynamical time: mean phase plus periodic terms.
pub(crate) fn new_moon_jde(k: i64) -> f64 {
    let k = k as f64;
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let mean = LUNATION_EPOCH_JDE + SYNODIC_MONTH * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;

    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;
    let sun_m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let moon_m = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();

    let periodic = -0.407_20 * moon_m.sin()
        + 0.172_41 * e * sun_m.sin()
        + 0.016_08 * (2.0 * moon_m).sin()
        + 0.010_39 * (2.0 * f).sin()
        + 0.007_39 * e * (moon_m - sun_m).sin()
        - 0.005_14 * e * (moon_m + sun_m).sin()
        + 0.002_08 * e * e * (2.0 * sun_m).sin()
        - 0.001_11 * (moon_m - 2.0 * f).sin()
        - 0.000_57 * (moon_m + 2.0 * f).sin()
        + 0.000_56 * e * (2.0 * moon_m + sun_m).sin()
        - 0.000_42 * (3.0 * moon_m).sin()
        + 0.000_42 * e * (sun_m + 2.0 * f).sin()
        + 0.000_38 * e * (sun_m - 2.0 * f).sin()
        - 0.000_24 * e * (2.0 * moon_m - sun_m).sin()
        - 0.000_17 * omega.sin()
        - 0.000_07 * (moon_m + 2.0 * sun_m).sin()
        + 0.000_04 * (2.0 * moon_m - 2.0 * f).sin()
        + 0.000_04 * (3.0 * sun_m).sin()
        + 0.000_03 * (moon_m + sun_m - 2.0 * f).sin()
        + 0.000_03 * (2.0 * moon_m + 2.0 * f).sin()
        - 0.000_03 * (moon_m + sun_m + 2.0 * f).sin()
        + 0.000_03 * (moon_m - sun_m + 2.0 * f).sin()
        - 0.000_02 * (moon_m - sun_m - 2.0 * f).sin()
        - 0.000_02 * (3.0 * moon_m + sun_m).sin()
        + 0.000_02 * (4.0 * moon_m).sin();

    // Planetary arguments: (amplitude, phase at k = 0, rate per lunation).
    const PLANETARY: [(f64, f64, f64); 13] = [
        (0.000_165, 251.88, 0.016_321),
        (0.000_164, 251.83, 26.651_886),
        (0.000_126, 349.42, 36.412_478),
        (0.000_110, 84.66, 18.206_239),
        (0.000_062, 141.74, 53.303_771),
        (0.000_060, 207.14, 2.453_732),
        (0.000_056, 154.84, 7.306_860),
        (0.000_047, 34.52, 27.261_239),
        (0.000_042, 207.19, 0.121_824),
        (0.000_040, 291.34, 1.844_379),
        (0.000_037, 161.72, 24.198_154),
        (0.000_035, 239.56, 25.513_099),
        (0.000_023, 331.55, 3.592_518),
    ];
    let a1 = (299.77 + 0.107_408 * k - 0.009_173 * t2).to_radians();
    let planetary = 0.000_325 * a1.sin()
        + PLANETARY
            .iter()
            .map(|(amp, phase, rate)| amp * (phase + rate * k).to_radians().sin())
            .sum::<f64>();

    mean + periodic + planetary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn julian_day_of_j2000() {
        assert!((julian_day(&utc(2000, 1, 1, 12, 0)) - J2000).abs() < 1e-9);
        let back = from_julian_day(J2000).unwrap();
        assert_eq!(back, utc(2000, 1, 1, 12, 0));
    }

    #[test]
    fn delta_t_is_plausible() {
        let dt_2000 = delta_t_seconds(J2000);
        assert!((dt_2000 - 63.8).abs() < 1.0, "{dt_2000}");
        let dt_2020 = delta_t_seconds(J2000 + 20.0 * 365.25);
        assert!((60.0..80.0).contains(&dt_2020), "{dt_2020}");
    }

    #[test]
    fn sun_longitude_reference_value() {
        // 1992-10-13 00:00 TD: apparent longitude 199.909°.
        let lon = sun_longitude_at_jde(2_448_908.5);
        assert!((lon - 199.909).abs() < 0.01, "{lon}");
    }

    #[test]
    fn new_moon_reference_value() {
        // New moon of 1977-02-18 03:37:42 TD.
        let jde = new_moon_jde(-283);
        assert!((jde - 2_443_192.651_18).abs() < 1e-4, "{jde}");
    }

    #[test]
    fn winter_solstice_2023() {
        // 2023-12-22 03:27 UTC.
        let expected = julian_day(&utc(2023, 12, 22, 3, 27));
        let found = solar_longitude_crossing(270.0, expected - 3.0);
        assert!((found - expected).abs() < 15.0 / 1440.0, "{found} vs {expected}");
    }

    #[test]
    fn start_of_spring_2024() {
        // 2024-02-04 08:27 UTC.
        let expected = julian_day(&utc(2024, 2, 4, 8, 27));
        let found = previous_solar_longitude_crossing(315.0, expected + 10.0);
        assert!((found - expected).abs() < 15.0 / 1440.0, "{found} vs {expected}");
    }

    #[test]
    fn previous_crossing_never_after_query() {
        let jd = julian_day(&utc(2024, 6, 1, 0, 0));
        for target in [0.0, 45.0, 70.0, 300.0] {
            assert!(previous_solar_longitude_crossing(target, jd) <= jd);
        }
    }

    #[test]
    fn new_moon_2024_spring_festival() {
        // 2024-02-09 22:59 UTC (2024-02-10 06:59 in China).
        let expected = julian_day(&utc(2024, 2, 9, 22, 59));
        let k = lunation_before(expected + 1.0);
        let found = new_moon(k);
        assert!((found - expected).abs() < 5.0 / 1440.0, "{found} vs {expected}");
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_degrees(-30.0), 330.0);
        assert_eq!(normalize_degrees(720.0), 0.0);
        assert_eq!(normalize_pm180(190.0), -170.0);
        assert_eq!(normalize_pm180(180.0), 180.0);
    }
}
