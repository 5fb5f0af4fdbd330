//! The 24 solar terms.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One of the 24 solar terms, listed from 立春 (start of spring).
///
/// Even positions are sectional terms (节), which open a month pillar.
/// Odd positions are principal terms (中气), which decide leap months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolarTerm {
    /// 立春, 315°
    StartOfSpring,
    /// 雨水, 330°
    RainWater,
    /// 惊蛰, 345°
    AwakeningOfInsects,
    /// 春分, 0°
    SpringEquinox,
    /// 清明, 15°
    PureBrightness,
    /// 谷雨, 30°
    GrainRain,
    /// 立夏, 45°
    StartOfSummer,
    /// 小满, 60°
    GrainBuds,
    /// 芒种, 75°
    GrainInEar,
    /// 夏至, 90°
    SummerSolstice,
    /// 小暑, 105°
    MinorHeat,
    /// 大暑, 120°
    MajorHeat,
    /// 立秋, 135°
    StartOfAutumn,
    /// 处暑, 150°
    EndOfHeat,
    /// 白露, 165°
    WhiteDew,
    /// 秋分, 180°
    AutumnEquinox,
    /// 寒露, 195°
    ColdDew,
    /// 霜降, 210°
    FrostsDescent,
    /// 立冬, 225°
    StartOfWinter,
    /// 小雪, 240°
    MinorSnow,
    /// 大雪, 255°
    MajorSnow,
    /// 冬至, 270°
    WinterSolstice,
    /// 小寒, 285°
    MinorCold,
    /// 大寒, 300°
    MajorCold,
}

impl SolarTerm {
    /// All terms in order from 立春.
    pub const ALL: [Self; 24] = [
        Self::StartOfSpring,
        Self::RainWater,
        Self::AwakeningOfInsects,
        Self::SpringEquinox,
        Self::PureBrightness,
        Self::GrainRain,
        Self::StartOfSummer,
        Self::GrainBuds,
        Self::GrainInEar,
        Self::SummerSolstice,
        Self::MinorHeat,
        Self::MajorHeat,
        Self::StartOfAutumn,
        Self::EndOfHeat,
        Self::WhiteDew,
        Self::AutumnEquinox,
        Self::ColdDew,
        Self::FrostsDescent,
        Self::StartOfWinter,
        Self::MinorSnow,
        Self::MajorSnow,
        Self::WinterSolstice,
        Self::MinorCold,
        Self::MajorCold,
    ];

    const NAMES: [&'static str; 24] = [
        "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑",
        "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
        "小寒", "大寒",
    ];

    /// Solar longitude of 立春, where the list starts.
    const FIRST_LONGITUDE: f64 = 315.0;

    /// Position in the list (0 = 立春).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a term by any integer offset (reduced modulo 24).
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(24) as usize]
    }

    /// The term most recently reached at the given apparent solar longitude.
    pub fn at_longitude(longitude_deg: f64) -> Self {
        let since_first = (longitude_deg - Self::FIRST_LONGITUDE).rem_euclid(360.0);
        Self::from_index((since_first / 15.0).floor() as i64)
    }

    /// The apparent solar longitude at which this term begins, in degrees.
    pub fn longitude(self) -> f64 {
        (Self::FIRST_LONGITUDE + 15.0 * self.index() as f64) % 360.0
    }

    /// The Chinese name.
    pub fn name(self) -> &'static str {
        Self::NAMES[self.index()]
    }

    /// Whether this is a sectional term (节) that opens a month pillar.
    pub fn is_sectional(self) -> bool {
        self.index() % 2 == 0
    }

    /// Whether this is a principal term (中气).
    pub fn is_principal(self) -> bool {
        !self.is_sectional()
    }
}

impl std::fmt::Display for SolarTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A solar term together with the instant the sun reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarTermEvent {
    /// Which term.
    pub term: SolarTerm,
    /// When the sun crossed the term's longitude, in the calendar's zone.
    pub at: DateTime<FixedOffset>,
}

impl std::fmt::Display for SolarTermEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.term, self.at.format("%Y-%m-%d %H:%M"))
    }
}
