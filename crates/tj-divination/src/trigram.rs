//! The eight trigrams in Former-Heaven order.

use serde::{Deserialize, Serialize};
use tj_calendar::Element;

/// One of the eight three-line figures.
///
/// Variants are listed in Former-Heaven (先天) order, which is also the
/// numbering the plum-blossom method counts in: 乾 is 1, 坤 is 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigram {
    /// 乾, heaven.
    Qian,
    /// 兑, lake.
    Dui,
    /// 离, fire.
    Li,
    /// 震, thunder.
    Zhen,
    /// 巽, wind.
    Xun,
    /// 坎, water.
    Kan,
    /// 艮, mountain.
    Gen,
    /// 坤, earth.
    Kun,
}

impl Trigram {
    /// All trigrams in Former-Heaven order.
    pub const ALL: [Self; 8] = [
        Self::Qian,
        Self::Dui,
        Self::Li,
        Self::Zhen,
        Self::Xun,
        Self::Kan,
        Self::Gen,
        Self::Kun,
    ];

    /// Look up a trigram by its Former-Heaven number (1-8).
    pub fn from_number(number: u64) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::ALL.get(index).copied()
    }

    /// Former-Heaven number, 1 (乾) to 8 (坤).
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// The trigram's glyph.
    pub fn name(self) -> &'static str {
        match self {
            Self::Qian => "乾",
            Self::Dui => "兑",
            Self::Li => "离",
            Self::Zhen => "震",
            Self::Xun => "巽",
            Self::Kan => "坎",
            Self::Gen => "艮",
            Self::Kun => "坤",
        }
    }

    /// The natural image: 天 泽 火 雷 风 水 山 地.
    pub fn nature(self) -> &'static str {
        match self {
            Self::Qian => "天",
            Self::Dui => "泽",
            Self::Li => "火",
            Self::Zhen => "雷",
            Self::Xun => "风",
            Self::Kan => "水",
            Self::Gen => "山",
            Self::Kun => "地",
        }
    }

    /// Five-phase element.
    pub fn element(self) -> Element {
        match self {
            Self::Qian | Self::Dui => Element::Metal,
            Self::Li => Element::Fire,
            Self::Zhen | Self::Xun => Element::Wood,
            Self::Kan => Element::Water,
            Self::Gen | Self::Kun => Element::Earth,
        }
    }

    /// Lines from bottom to top; `true` is a solid (yang) line.
    pub fn lines(self) -> [bool; 3] {
        match self {
            Self::Qian => [true, true, true],
            Self::Dui => [true, true, false],
            Self::Li => [true, false, true],
            Self::Zhen => [true, false, false],
            Self::Xun => [false, true, true],
            Self::Kan => [false, true, false],
            Self::Gen => [false, false, true],
            Self::Kun => [false, false, false],
        }
    }

    /// The trigram drawn by three lines, bottom to top.
    pub fn from_lines(lines: [bool; 3]) -> Self {
        match lines {
            [true, true, true] => Self::Qian,
            [true, true, false] => Self::Dui,
            [true, false, true] => Self::Li,
            [true, false, false] => Self::Zhen,
            [false, true, true] => Self::Xun,
            [false, true, false] => Self::Kan,
            [false, false, true] => Self::Gen,
            [false, false, false] => Self::Kun,
        }
    }

    /// The same trigram with one line (1-3, bottom first) flipped.
    pub fn with_line_flipped(self, position: usize) -> Self {
        let mut lines = self.lines();
        if let Some(line) = position.checked_sub(1).and_then(|i| lines.get_mut(i)) {
            *line = !*line;
        }
        Self::from_lines(lines)
    }
}

impl std::fmt::Display for Trigram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name(), self.nature())
    }
}
