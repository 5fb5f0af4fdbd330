//! True solar time from longitude.
//!
//! A linear correction only: each degree east of the reference meridian
//! moves local solar time four minutes ahead. The equation of time is not
//! modelled.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use tracing::debug;

use crate::config::CalendarConfig;
use crate::error::{CalendarError, CalendarResult};

/// Minutes of solar time per degree of longitude.
pub const MINUTES_PER_DEGREE: f64 = 4.0;

/// Offset of local solar time from zone time at `longitude`, rounded to the
/// millisecond.
pub fn solar_time_offset(longitude: f64, reference_meridian: f64) -> CalendarResult<TimeDelta> {
    if !longitude.is_finite() || longitude.abs() > 180.0 {
        return Err(CalendarError::InvalidInput(format!(
            "longitude must be within ±180°, got {longitude}"
        )));
    }
    let minutes = (longitude - reference_meridian) * MINUTES_PER_DEGREE;
    let millis = (minutes * 60_000.0).round() as i64;
    TimeDelta::try_milliseconds(millis).ok_or_else(|| {
        CalendarError::InvalidInput(format!("solar time offset out of range: {minutes} min"))
    })
}

/// Shifts civil timestamps to local true solar time.
#[derive(Debug, Clone, Default)]
pub struct TrueSolarTimeAdjuster {
    config: CalendarConfig,
}

impl TrueSolarTimeAdjuster {
    /// Create an adjuster using the given configuration's meridian and cities.
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Shift `at` by `(longitude − reference) × 4` minutes, keeping its offset.
    pub fn adjust(
        &self,
        at: DateTime<FixedOffset>,
        longitude: f64,
    ) -> CalendarResult<DateTime<FixedOffset>> {
        let offset = solar_time_offset(longitude, self.config.reference_meridian)?;
        let adjusted = at.checked_add_signed(offset).ok_or_else(|| {
            CalendarError::InvalidInput(format!("timestamp out of range after adjustment: {at}"))
        })?;
        debug!(%at, longitude, %adjusted, "applied true solar time");
        Ok(adjusted)
    }

    /// Shift a wall-clock reading with no zone attached.
    pub fn adjust_naive(
        &self,
        at: NaiveDateTime,
        longitude: f64,
    ) -> CalendarResult<NaiveDateTime> {
        let offset = solar_time_offset(longitude, self.config.reference_meridian)?;
        at.checked_add_signed(offset).ok_or_else(|| {
            CalendarError::InvalidInput(format!("timestamp out of range after adjustment: {at}"))
        })
    }

    /// Shift `at` using the longitude of a named city.
    pub fn adjust_for_city(
        &self,
        at: DateTime<FixedOffset>,
        city: &str,
    ) -> CalendarResult<DateTime<FixedOffset>> {
        let longitude = self.config.cities.longitude(city)?;
        self.adjust(at, longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn beijing(h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, h, m, 0)
            .unwrap()
    }

    #[test]
    fn reference_meridian_is_noop() {
        let adjuster = TrueSolarTimeAdjuster::default();
        let at = beijing(12, 0);
        assert_eq!(adjuster.adjust(at, 120.0).unwrap(), at);
    }

    #[test]
    fn west_is_earlier() {
        let adjuster = TrueSolarTimeAdjuster::default();
        // Urumqi: (87.62 - 120) * 4 = -129.52 min.
        let adjusted = adjuster.adjust_for_city(beijing(12, 0), "乌鲁木齐").unwrap();
        let expected = beijing(12, 0) - TimeDelta::milliseconds(7_771_200);
        assert_eq!(adjusted, expected);
        assert_eq!(adjusted.offset(), beijing(0, 0).offset());
    }

    #[test]
    fn east_is_later() {
        let adjuster = TrueSolarTimeAdjuster::default();
        let adjusted = adjuster.adjust(beijing(10, 0), 135.0).unwrap();
        assert_eq!(adjusted, beijing(11, 0));
    }

    #[test]
    fn naive_matches_zoned() {
        let adjuster = TrueSolarTimeAdjuster::default();
        let at = beijing(12, 0);
        let naive = adjuster.adjust_naive(at.naive_local(), 87.62).unwrap();
        assert_eq!(naive, adjuster.adjust(at, 87.62).unwrap().naive_local());
        assert_eq!(
            adjuster.adjust_naive(at.naive_local(), 120.0).unwrap(),
            at.naive_local()
        );
        assert!(matches!(
            adjuster.adjust_naive(at.naive_local(), f64::INFINITY),
            Err(CalendarError::InvalidInput(_))
        ));
    }

    #[test]
    fn custom_meridian() {
        let adjuster =
            TrueSolarTimeAdjuster::new(CalendarConfig::default().with_reference_meridian(135.0));
        assert_eq!(adjuster.adjust(beijing(9, 0), 135.0).unwrap(), beijing(9, 0));
        assert_eq!(adjuster.adjust(beijing(9, 0), 120.0).unwrap(), beijing(8, 0));
    }

    #[test]
    fn rejects_bad_longitude() {
        let adjuster = TrueSolarTimeAdjuster::default();
        assert!(matches!(
            adjuster.adjust(beijing(9, 0), f64::NAN),
            Err(CalendarError::InvalidInput(_))
        ));
        assert!(matches!(
            adjuster.adjust(beijing(9, 0), 200.0),
            Err(CalendarError::InvalidInput(_))
        ));
        assert!(matches!(
            adjuster.adjust_for_city(beijing(9, 0), "Atlantis"),
            Err(CalendarError::InvalidInput(_))
        ));
    }
}
