//! Heavenly stems, earthly branches, and the sexagenary cycle.
//!
//! Every index handed to this module is reduced with `rem_euclid` before
//! lookup, so offsets of any size or sign land inside the cycle.

use serde::{Deserialize, Serialize};

/// One of the five phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    /// 木
    Wood,
    /// 火
    Fire,
    /// 土
    Earth,
    /// 金
    Metal,
    /// 水
    Water,
}

impl Element {
    /// The Chinese glyph for this phase.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    /// The phase this one feeds (木生火, 火生土, ...).
    pub fn generates(self) -> Self {
        match self {
            Self::Wood => Self::Fire,
            Self::Fire => Self::Earth,
            Self::Earth => Self::Metal,
            Self::Metal => Self::Water,
            Self::Water => Self::Wood,
        }
    }

    /// The phase this one overcomes (木克土, 土克水, ...).
    pub fn overcomes(self) -> Self {
        match self {
            Self::Wood => Self::Earth,
            Self::Earth => Self::Water,
            Self::Water => Self::Fire,
            Self::Fire => Self::Metal,
            Self::Metal => Self::Wood,
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Yin/yang polarity of a stem or branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// 阳
    Yang,
    /// 阴
    Yin,
}

impl Polarity {
    fn from_index(index: usize) -> Self {
        if index % 2 == 0 { Self::Yang } else { Self::Yin }
    }

    /// 阳 or 阴.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Yang => "阳",
            Self::Yin => "阴",
        }
    }
}

/// One of the ten heavenly stems, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stem {
    /// 甲
    Jia,
    /// 乙
    Yi,
    /// 丙
    Bing,
    /// 丁
    Ding,
    /// 戊
    Wu,
    /// 己
    Ji,
    /// 庚
    Geng,
    /// 辛
    Xin,
    /// 壬
    Ren,
    /// 癸
    Gui,
}

impl Stem {
    /// All stems in cycle order.
    pub const ALL: [Self; 10] = [
        Self::Jia,
        Self::Yi,
        Self::Bing,
        Self::Ding,
        Self::Wu,
        Self::Ji,
        Self::Geng,
        Self::Xin,
        Self::Ren,
        Self::Gui,
    ];

    const GLYPHS: [&'static str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

    const PINYIN: [&'static str; 10] = [
        "jiǎ", "yǐ", "bǐng", "dīng", "wù", "jǐ", "gēng", "xīn", "rén", "guǐ",
    ];

    /// Look up a stem by any integer offset (reduced modulo 10).
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(10) as usize]
    }

    /// Position in the cycle (0 = 甲).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The Chinese glyph.
    pub fn glyph(self) -> &'static str {
        Self::GLYPHS[self.index()]
    }

    /// Romanized name with tone marks.
    pub fn pinyin(self) -> &'static str {
        Self::PINYIN[self.index()]
    }

    /// Parse a stem from its glyph.
    pub fn from_glyph(s: &str) -> Option<Self> {
        Self::GLYPHS
            .iter()
            .position(|g| *g == s)
            .map(|i| Self::ALL[i])
    }

    /// The five-phase element of this stem.
    pub fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    /// Yin/yang polarity (odd positions are yin).
    pub fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One of the twelve earthly branches, in cycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// 子
    Zi,
    /// 丑
    Chou,
    /// 寅
    Yin,
    /// 卯
    Mao,
    /// 辰
    Chen,
    /// 巳
    Si,
    /// 午
    Wu,
    /// 未
    Wei,
    /// 申
    Shen,
    /// 酉
    You,
    /// 戌
    Xu,
    /// 亥
    Hai,
}

impl Branch {
    /// All branches in cycle order.
    pub const ALL: [Self; 12] = [
        Self::Zi,
        Self::Chou,
        Self::Yin,
        Self::Mao,
        Self::Chen,
        Self::Si,
        Self::Wu,
        Self::Wei,
        Self::Shen,
        Self::You,
        Self::Xu,
        Self::Hai,
    ];

    const GLYPHS: [&'static str; 12] = [
        "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
    ];

    const PINYIN: [&'static str; 12] = [
        "zǐ", "chǒu", "yín", "mǎo", "chén", "sì", "wǔ", "wèi", "shēn", "yǒu", "xū", "hài",
    ];

    const ANIMALS: [&'static str; 12] = [
        "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
        "Dog", "Pig",
    ];

    /// Look up a branch by any integer offset (reduced modulo 12).
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(12) as usize]
    }

    /// The double-hour branch for a civil hour (0-23).
    ///
    /// 23:00-00:59 is 子, 01:00-02:59 is 丑, and so on.
    pub fn from_hour(hour: u32) -> Self {
        Self::ALL[hour_branch_index(hour) as usize]
    }

    /// Position in the cycle (0 = 子).
    pub fn index(self) -> usize {
        self as usize
    }

    /// The Chinese glyph.
    pub fn glyph(self) -> &'static str {
        Self::GLYPHS[self.index()]
    }

    /// Romanized name with tone marks.
    pub fn pinyin(self) -> &'static str {
        Self::PINYIN[self.index()]
    }

    /// Parse a branch from its glyph.
    pub fn from_glyph(s: &str) -> Option<Self> {
        Self::GLYPHS
            .iter()
            .position(|g| *g == s)
            .map(|i| Self::ALL[i])
    }

    /// The zodiac animal in English.
    pub fn animal(self) -> &'static str {
        Self::ANIMALS[self.index()]
    }

    /// The five-phase element of this branch.
    pub fn element(self) -> Element {
        match self {
            Self::Yin | Self::Mao => Element::Wood,
            Self::Si | Self::Wu => Element::Fire,
            Self::Shen | Self::You => Element::Metal,
            Self::Hai | Self::Zi => Element::Water,
            Self::Chou | Self::Chen | Self::Wei | Self::Xu => Element::Earth,
        }
    }

    /// Yin/yang polarity (odd positions are yin).
    pub fn polarity(self) -> Polarity {
        Polarity::from_index(self.index())
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// The 0-based double-hour index of a civil hour: `((hour + 1) / 2) % 12`.
pub fn hour_branch_index(hour: u32) -> u32 {
    ((hour + 1) / 2) % 12
}

/// Five-rat rule: the stem of a double hour given the day stem.
pub fn hour_stem_for(day_stem: Stem, hour_branch: Branch) -> Stem {
    let start = (day_stem.index() % 5) * 2;
    Stem::from_index((start + hour_branch.index()) as i64)
}

/// Five-tiger rule: the stem of a month given the (solar) year stem.
///
/// The 寅 month opens the year, so its stem is the anchor.
pub fn month_stem_for(year_stem: Stem, month_branch: Branch) -> Stem {
    let yin_month_stem = (year_stem.index() % 5) * 2 + 2;
    let months_since_yin = (month_branch.index() as i64 - 2).rem_euclid(12);
    Stem::from_index(yin_month_stem as i64 + months_since_yin)
}

/// One of the sixty stem-branch pairs.
///
/// Only pairs of matching polarity exist; the constructors enforce it.
/// Serializes as its two-glyph label, e.g. `"甲子"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StemBranch {
    stem: Stem,
    branch: Branch,
}

impl StemBranch {
    /// Look up a pair by any integer offset into the cycle (reduced modulo 60).
    pub fn from_cycle_index(index: i64) -> Self {
        let index = index.rem_euclid(60);
        Self {
            stem: Stem::from_index(index),
            branch: Branch::from_index(index),
        }
    }

    /// Build a pair from its parts, or `None` if their polarities differ.
    pub fn new(stem: Stem, branch: Branch) -> Option<Self> {
        (stem.index() % 2 == branch.index() % 2).then_some(Self { stem, branch })
    }

    /// Parse a two-glyph label such as `"甲子"`.
    pub fn parse(label: &str) -> Option<Self> {
        let mut chars = label.trim().chars();
        let stem = Stem::from_glyph(&chars.next()?.to_string())?;
        let branch = Branch::from_glyph(&chars.next()?.to_string())?;
        if chars.next().is_some() {
            return None;
        }
        Self::new(stem, branch)
    }

    /// The stem of this pair.
    pub fn stem(self) -> Stem {
        self.stem
    }

    /// The branch of this pair.
    pub fn branch(self) -> Branch {
        self.branch
    }

    /// Position in the sixty-cycle (0 = 甲子).
    pub fn cycle_index(self) -> usize {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        (6 * s - 5 * b).rem_euclid(60) as usize
    }
}

impl std::fmt::Display for StemBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl From<StemBranch> for String {
    fn from(value: StemBranch) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for StemBranch {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a sexagenary pair: {value}"))
    }
}
