//! Lunar month and day numbering.
//!
//! Months begin on the local date of a new moon. The month containing the
//! winter solstice is month 11. When thirteen new moons fall between two
//! such months, the first month without a principal term is the leap month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::astro;

/// A lunar month number with its leap flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarMonth {
    /// Month number, 1-12.
    pub number: u32,
    /// Whether this is the intercalary month repeating `number`.
    pub leap: bool,
}

impl LunarMonth {
    const NAMES: [&'static str; 12] = [
        "正", "二", "三", "四", "五", "六", "七", "八", "九", "十", "冬", "腊",
    ];

    /// A regular (non-leap) month.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            leap: false,
        }
    }

    /// Chinese month label, e.g. `正月` or `闰四月`.
    pub fn label(self) -> String {
        let name = Self::NAMES
            .get((self.number as usize).wrapping_sub(1))
            .copied()
            .unwrap_or("?");
        if self.leap {
            format!("闰{name}月")
        } else {
            format!("{name}月")
        }
    }
}

impl std::fmt::Display for LunarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Chinese label for a lunar day, e.g. `初一`, `十五`, `廿三`.
pub fn lunar_day_label(day: u32) -> String {
    const DIGITS: [&str; 10] = ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
    match day {
        1..=10 => format!("初{}", DIGITS[(day % 10) as usize]),
        11..=19 => format!("十{}", DIGITS[(day % 10) as usize]),
        20 => "二十".to_string(),
        21..=29 => format!("廿{}", DIGITS[(day % 10) as usize]),
        30 => "三十".to_string(),
        _ => "?".to_string(),
    }
}

/// A resolved lunar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LunarDate {
    pub year: i32,
    pub month: LunarMonth,
    pub day: u32,
}

/// Julian day number of a civil date.
pub(crate) fn day_number(date: NaiveDate) -> i64 {
    // 0001-01-01 (proleptic Gregorian) is JDN 1_721_426.
    i64::from(date.num_days_from_ce()) + 1_721_425
}

/// Converts instants to local civil days in a fixed zone.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LocalDays {
    offset_days: f64,
}

impl LocalDays {
    pub(crate) fn new(offset_seconds: i32) -> Self {
        Self {
            offset_days: f64::from(offset_seconds) / 86_400.0,
        }
    }

    /// Local day number on which a UT Julian day falls.
    fn day_of(self, jd: f64) -> i64 {
        (jd + self.offset_days + 0.5).floor() as i64
    }

    /// UT Julian day of local midnight starting `day`.
    fn midnight(self, day: i64) -> f64 {
        day as f64 - 0.5 - self.offset_days
    }

    fn new_moon_day(self, k: i64) -> i64 {
        self.day_of(astro::new_moon(k))
    }

    /// Lunation whose new moon falls on or before local `day`.
    fn lunation_on_or_before(self, day: i64) -> i64 {
        let mut k = astro::lunation_before(self.midnight(day + 1));
        while self.new_moon_day(k) > day {
            k -= 1;
        }
        while self.new_moon_day(k + 1) <= day {
            k += 1;
        }
        k
    }

    /// Local day of the winter solstice in civil year `year`.
    fn winter_solstice_day(self, year: i32) -> Option<i64> {
        let dec_21 = NaiveDate::from_ymd_opt(year, 12, 21)?;
        let guess = self.midnight(day_number(dec_21));
        Some(self.day_of(astro::solar_longitude_crossing(270.0, guess)))
    }

    /// Whether the month starting at lunation `k` contains a principal term.
    fn has_principal_term(self, k: i64) -> bool {
        let start = astro::sun_longitude(self.midnight(self.new_moon_day(k)));
        let end = astro::sun_longitude(self.midnight(self.new_moon_day(k + 1)));
        (start / 30.0).floor() != (end / 30.0).floor()
    }

    /// Resolve the lunar date of a local civil date.
    pub(crate) fn lunar_date(self, date: NaiveDate) -> Option<LunarDate> {
        let day = day_number(date);
        let this_solstice = self.winter_solstice_day(date.year())?;
        let (from_solstice, to_solstice) = if day >= this_solstice {
            (this_solstice, self.winter_solstice_day(date.year() + 1)?)
        } else {
            (self.winter_solstice_day(date.year() - 1)?, this_solstice)
        };

        let eleventh = self.lunation_on_or_before(from_solstice);
        let next_eleventh = self.lunation_on_or_before(to_solstice);
        let leap_offset = if next_eleventh - eleventh == 13 {
            (1..13).find(|m| !self.has_principal_term(eleventh + m))
        } else {
            None
        };

        let k = self.lunation_on_or_before(day);
        let offset = k - eleventh;
        let mut ordinal = 11 + offset;
        if leap_offset.is_some_and(|leap| offset >= leap) {
            ordinal -= 1;
        }
        let number = ((ordinal - 1).rem_euclid(12) + 1) as u32;
        let month = LunarMonth {
            number,
            leap: leap_offset == Some(offset),
        };
        let lunar_day = (day - self.new_moon_day(k) + 1) as u32;

        // Months 11 and 12 seen in January or February belong to last year.
        let year = if number >= 11 && date.month() <= 6 {
            date.year() - 1
        } else {
            date.year()
        };

        Some(LunarDate {
            year,
            month,
            day: lunar_day,
        })
    }
}
