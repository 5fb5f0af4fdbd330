//! The resolved calendrical context for one instant.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::ganzhi::{Branch, Stem, StemBranch, hour_branch_index, hour_stem_for};
use crate::lunar::{LunarMonth, lunar_day_label};
use crate::solar_term::SolarTermEvent;

/// Four pillars, lunar date and solar term for one resolved instant.
///
/// Built fresh per request; nothing here is cached or shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendricalContext {
    /// The instant, expressed in the calendar's reference zone.
    pub timestamp: DateTime<FixedOffset>,
    /// Year pillar.
    pub year: StemBranch,
    /// Month pillar.
    pub month: StemBranch,
    /// Day pillar.
    pub day: StemBranch,
    /// Hour pillar.
    pub hour: StemBranch,
    /// Lunar month number and leap flag.
    pub lunar_month: LunarMonth,
    /// Lunar day, 1-30.
    pub lunar_day: u32,
    /// Double-hour index, 0 (子) to 11 (亥).
    pub hour_branch_index: u32,
    /// The last solar term reached at or before `timestamp`.
    pub preceding_solar_term: Option<SolarTermEvent>,
}

impl CalendricalContext {
    /// Year stem.
    pub fn year_stem(&self) -> Stem {
        self.year.stem()
    }

    /// Year branch.
    pub fn year_branch(&self) -> Branch {
        self.year.branch()
    }

    /// Month stem.
    pub fn month_stem(&self) -> Stem {
        self.month.stem()
    }

    /// Month branch.
    pub fn month_branch(&self) -> Branch {
        self.month.branch()
    }

    /// Day stem.
    pub fn day_stem(&self) -> Stem {
        self.day.stem()
    }

    /// Day branch.
    pub fn day_branch(&self) -> Branch {
        self.day.branch()
    }

    /// Hour stem.
    pub fn hour_stem(&self) -> Stem {
        self.hour.stem()
    }

    /// Hour branch.
    pub fn hour_branch(&self) -> Branch {
        self.hour.branch()
    }

    /// Lunar date label, e.g. `农历正月初一`.
    pub fn lunar_label(&self) -> String {
        format!("农历{}{}", self.lunar_month, lunar_day_label(self.lunar_day))
    }

    /// Name of the preceding solar term, or `"none"`.
    pub fn solar_term_name(&self) -> &'static str {
        self.preceding_solar_term
            .as_ref()
            .map_or("none", |e| e.term.name())
    }

    /// Check the invariants every context must hold.
    ///
    /// The hour branch follows from the wall-clock hour, the hour stem from
    /// the day stem (five-rat rule), and the lunar numbers are in range.
    pub fn validate(&self) -> CalendarResult<()> {
        let malformed = |what: String| Err(CalendarError::CalendarUnavailable(what));

        let expected_index = hour_branch_index(self.timestamp.hour());
        if self.hour_branch_index != expected_index {
            return malformed(format!(
                "hour branch index {} does not match hour {}",
                self.hour_branch_index,
                self.timestamp.hour()
            ));
        }
        if self.hour.branch().index() as u32 != expected_index {
            return malformed(format!(
                "hour pillar {} does not match hour {}",
                self.hour,
                self.timestamp.hour()
            ));
        }
        let expected_stem = hour_stem_for(self.day.stem(), self.hour.branch());
        if self.hour.stem() != expected_stem {
            return malformed(format!(
                "hour pillar {} breaks the five-rat rule for day {}",
                self.hour, self.day
            ));
        }
        if !(1..=12).contains(&self.lunar_month.number) {
            return malformed(format!("lunar month {} out of range", self.lunar_month.number));
        }
        if !(1..=30).contains(&self.lunar_day) {
            return malformed(format!("lunar day {} out of range", self.lunar_day));
        }
        Ok(())
    }
}

impl std::fmt::Display for CalendricalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}年 {}月 {}日 {}时",
            self.year, self.month, self.day, self.hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::solar_term::SolarTerm;

    fn sample() -> CalendricalContext {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        CalendricalContext {
            timestamp: tz.with_ymd_and_hms(2000, 1, 1, 0, 30, 0).unwrap(),
            year: StemBranch::parse("己卯").unwrap(),
            month: StemBranch::parse("丙子").unwrap(),
            day: StemBranch::parse("戊午").unwrap(),
            hour: StemBranch::parse("壬子").unwrap(),
            lunar_month: LunarMonth::new(11),
            lunar_day: 25,
            hour_branch_index: 0,
            preceding_solar_term: Some(SolarTermEvent {
                term: SolarTerm::WinterSolstice,
                at: tz.with_ymd_and_hms(1999, 12, 22, 15, 44, 0).unwrap(),
            }),
        }
    }

    #[test]
    fn display_and_labels() {
        let ctx = sample();
        assert_eq!(ctx.to_string(), "己卯年 丙子月 戊午日 壬子时");
        assert_eq!(ctx.lunar_label(), "农历冬月廿五");
        assert_eq!(ctx.solar_term_name(), "冬至");
        assert_eq!(ctx.day_stem(), Stem::Wu);
        assert_eq!(ctx.hour_branch(), Branch::Zi);
    }

    #[test]
    fn valid_sample_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn wrong_hour_index_rejected() {
        let mut ctx = sample();
        ctx.hour_branch_index = 1;
        assert!(matches!(
            ctx.validate(),
            Err(CalendarError::CalendarUnavailable(_))
        ));
    }

    #[test]
    fn five_rat_violation_rejected() {
        let mut ctx = sample();
        ctx.hour = StemBranch::parse("甲子").unwrap();
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn lunar_out_of_range_rejected() {
        let mut ctx = sample();
        ctx.lunar_day = 31;
        assert!(ctx.validate().is_err());
        let mut ctx = sample();
        ctx.lunar_month = LunarMonth::new(13);
        assert!(ctx.validate().is_err());
    }

    #[test]
    fn missing_term_reads_none() {
        let mut ctx = sample();
        ctx.preceding_solar_term = None;
        assert_eq!(ctx.solar_term_name(), "none");
    }

    #[test]
    fn serde_round_trip() {
        let ctx = sample();
        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"day\":\"戊午\""));
        let back: CalendricalContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
