//! Calendar-conversion providers.
//!
//! [`CalendarProvider`] is the seam to whatever turns a timestamp into
//! pillars and lunar dates. [`AstronomicalCalendar`] is the built-in
//! provider: it places solar terms and new moons from solar and lunar
//! theory instead of a lookup table.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use tracing::debug;

use crate::astro;
use crate::config::{CalendarConfig, YearBoundary, ZiHour};
use crate::context::CalendricalContext;
use crate::error::{CalendarError, CalendarResult};
use crate::ganzhi::{Branch, StemBranch, hour_branch_index, hour_stem_for, month_stem_for};
use crate::lunar::{LocalDays, day_number};
use crate::solar_term::{SolarTerm, SolarTermEvent};

/// Converts a civil timestamp into a [`CalendricalContext`].
pub trait CalendarProvider {
    /// Resolve `at`, or fail with [`CalendarError::CalendarUnavailable`].
    fn to_calendrical_context(
        &self,
        at: &DateTime<FixedOffset>,
    ) -> CalendarResult<CalendricalContext>;
}

impl<P: CalendarProvider + ?Sized> CalendarProvider for &P {
    fn to_calendrical_context(
        &self,
        at: &DateTime<FixedOffset>,
    ) -> CalendarResult<CalendricalContext> {
        (**self).to_calendrical_context(at)
    }
}

impl<P: CalendarProvider + ?Sized> CalendarProvider for Box<P> {
    fn to_calendrical_context(
        &self,
        at: &DateTime<FixedOffset>,
    ) -> CalendarResult<CalendricalContext> {
        (**self).to_calendrical_context(at)
    }
}

/// Civil years the built-in provider answers for.
pub const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2100;

/// Built-in provider computing boundaries from the sun and moon.
#[derive(Debug, Clone, Default)]
pub struct AstronomicalCalendar {
    config: CalendarConfig,
}

impl AstronomicalCalendar {
    /// Create a provider with the given conventions and reference zone.
    pub fn new(config: CalendarConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }
}

fn unavailable(what: impl Into<String>) -> CalendarError {
    CalendarError::CalendarUnavailable(what.into())
}

impl CalendarProvider for AstronomicalCalendar {
    fn to_calendrical_context(
        &self,
        at: &DateTime<FixedOffset>,
    ) -> CalendarResult<CalendricalContext> {
        let zone = self.config.zone_offset()?;
        let local = at.with_timezone(&zone);
        if !SUPPORTED_YEARS.contains(&local.year()) {
            return Err(unavailable(format!(
                "year {} outside supported range {}-{}",
                local.year(),
                SUPPORTED_YEARS.start(),
                SUPPORTED_YEARS.end()
            )));
        }

        let jd = astro::julian_day(&local.with_timezone(&Utc));
        let longitude = astro::sun_longitude(jd);
        let term = SolarTerm::at_longitude(longitude);

        // Sectional terms open months: 立春 opens 寅, 惊蛰 opens 卯, ...
        let months_since_yin = (term.index() / 2) as i64;
        let month_branch = Branch::from_index(months_since_yin + 2);
        // January and February before 立春 still belong to last solar year.
        let solar_year = if local.month() <= 2 && months_since_yin >= 10 {
            local.year() - 1
        } else {
            local.year()
        };
        let solar_year_pillar = StemBranch::from_cycle_index(i64::from(solar_year) - 4);

        let days = LocalDays::new(self.config.utc_offset_seconds);
        let lunar = days
            .lunar_date(local.date_naive())
            .ok_or_else(|| unavailable(format!("no lunar date for {}", local.date_naive())))?;

        let year = match self.config.year_boundary {
            YearBoundary::StartOfSpring => solar_year_pillar,
            YearBoundary::LunarNewYear => StemBranch::from_cycle_index(i64::from(lunar.year) - 4),
        };

        let month_stem = month_stem_for(solar_year_pillar.stem(), month_branch);
        let month = StemBranch::new(month_stem, month_branch)
            .ok_or_else(|| unavailable("month stem and branch disagree"))?;

        let mut day_index = day_number(local.date_naive()) + 49;
        if self.config.zi_hour == ZiHour::Early && local.hour() == 23 {
            day_index += 1;
        }
        let day = StemBranch::from_cycle_index(day_index);

        let hour_index = hour_branch_index(local.hour());
        let hour_branch = Branch::from_index(i64::from(hour_index));
        let hour = StemBranch::new(hour_stem_for(day.stem(), hour_branch), hour_branch)
            .ok_or_else(|| unavailable("hour stem and branch disagree"))?;

        let term_jd = astro::previous_solar_longitude_crossing(term.longitude(), jd);
        let term_at = astro::from_julian_day(term_jd)
            .ok_or_else(|| unavailable(format!("cannot place {term}")))?
            .with_timezone(&zone);

        let context = CalendricalContext {
            timestamp: local,
            year,
            month,
            day,
            hour,
            lunar_month: lunar.month,
            lunar_day: lunar.day,
            hour_branch_index: hour_index,
            preceding_solar_term: Some(SolarTermEvent { term, at: term_at }),
        };
        debug!(
            at = %local,
            pillars = %context,
            lunar = %context.lunar_label(),
            term = %term,
            "resolved calendrical context"
        );
        Ok(context)
    }
}
