//! Hexagram lines, hexagrams, and the King Wen numbering.

use serde::{Deserialize, Serialize};

use crate::trigram::Trigram;

/// One line of a cast hexagram.
///
/// The numeric value packs polarity into bit 0 (1 = yang) and change into
/// bit 1 (1 = changing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HexagramLine {
    /// 少阴, broken and stable.
    YoungYin = 0,
    /// 少阳, solid and stable.
    YoungYang = 1,
    /// 老阴, broken and changing.
    OldYin = 2,
    /// 老阳, solid and changing.
    OldYang = 3,
}

impl HexagramLine {
    /// Line for a count of heads among three coins.
    ///
    /// 0 heads is old yin, 1 young yang, 2 young yin, 3 old yang; any other
    /// count is `None`.
    pub fn from_heads(heads: u8) -> Option<Self> {
        match heads {
            0 => Some(Self::OldYin),
            1 => Some(Self::YoungYang),
            2 => Some(Self::YoungYin),
            3 => Some(Self::OldYang),
            _ => None,
        }
    }

    /// Line for a packed value 0-3.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::YoungYin),
            1 => Some(Self::YoungYang),
            2 => Some(Self::OldYin),
            3 => Some(Self::OldYang),
            _ => None,
        }
    }

    /// Packed value 0-3.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether the line is solid.
    pub fn is_yang(self) -> bool {
        self.value() & 1 == 1
    }

    /// Whether the line is about to turn into its opposite.
    pub fn is_changing(self) -> bool {
        self.value() & 2 == 2
    }

    /// A stable line of the given polarity.
    pub fn stable(yang: bool) -> Self {
        if yang { Self::YoungYang } else { Self::YoungYin }
    }

    /// The line after change: old lines flip to the young opposite, young
    /// lines stay.
    pub fn changed(self) -> Self {
        match self {
            Self::OldYin => Self::YoungYang,
            Self::OldYang => Self::YoungYin,
            stable => stable,
        }
    }

    /// Chinese name.
    pub fn name(self) -> &'static str {
        match self {
            Self::YoungYin => "少阴",
            Self::YoungYang => "少阳",
            Self::OldYin => "老阴",
            Self::OldYang => "老阳",
        }
    }

    /// Text rendering, with `×` and `○` marking changing lines.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::YoungYin => "▅▅  ▅▅",
            Self::YoungYang => "▅▅▅▅▅▅",
            Self::OldYin => "▅▅  ▅▅ ×",
            Self::OldYang => "▅▅▅▅▅▅ ○",
        }
    }
}

impl From<HexagramLine> for u8 {
    fn from(line: HexagramLine) -> Self {
        line.value()
    }
}

impl TryFrom<u8> for HexagramLine {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("line value out of range: {value}"))
    }
}

impl std::fmt::Display for HexagramLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// King Wen numbers indexed by `[upper][lower]` in [`king_wen_order`].
const KING_WEN: [[u8; 8]; 8] = [
    // lower: 乾  震  坎  艮  坤  巽  离  兑
    [1, 25, 6, 33, 12, 44, 13, 10],  // 乾
    [34, 51, 40, 62, 16, 32, 55, 54], // 震
    [5, 3, 29, 39, 8, 48, 63, 60],   // 坎
    [26, 27, 4, 52, 23, 18, 22, 41], // 艮
    [11, 24, 7, 15, 2, 46, 36, 19],  // 坤
    [9, 42, 59, 53, 20, 57, 37, 61], // 巽
    [14, 21, 64, 56, 35, 50, 30, 38], // 离
    [43, 17, 47, 31, 45, 28, 49, 58], // 兑
];

const NAMES: [&str; 64] = [
    "乾", "坤", "屯", "蒙", "需", "讼", "师", "比", "小畜", "履", "泰", "否", "同人", "大有", "谦",
    "豫", "随", "蛊", "临", "观", "噬嗑", "贲", "剥", "复", "无妄", "大畜", "颐", "大过", "坎",
    "离", "咸", "恒", "遯", "大壮", "晋", "明夷", "家人", "睽", "蹇", "解", "损", "益", "夬", "姤",
    "萃", "升", "困", "井", "革", "鼎", "震", "艮", "渐", "归妹", "丰", "旅", "巽", "兑", "涣",
    "节", "中孚", "小过", "既济", "未济",
];

fn king_wen_order(trigram: Trigram) -> usize {
    match trigram {
        Trigram::Qian => 0,
        Trigram::Zhen => 1,
        Trigram::Kan => 2,
        Trigram::Gen => 3,
        Trigram::Kun => 4,
        Trigram::Xun => 5,
        Trigram::Li => 6,
        Trigram::Dui => 7,
    }
}

/// Six lines, bottom (line 1) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hexagram {
    lines: [HexagramLine; 6],
}

impl Hexagram {
    /// Build from six lines, bottom first.
    pub fn new(lines: [HexagramLine; 6]) -> Self {
        Self { lines }
    }

    /// A stable hexagram stacking `upper` over `lower`.
    pub fn from_trigrams(upper: Trigram, lower: Trigram) -> Self {
        let [l1, l2, l3] = lower.lines();
        let [l4, l5, l6] = upper.lines();
        Self::new([l1, l2, l3, l4, l5, l6].map(HexagramLine::stable))
    }

    /// The six lines, bottom first.
    pub fn lines(&self) -> &[HexagramLine; 6] {
        &self.lines
    }

    /// Line at `position` (1 = bottom, 6 = top).
    pub fn line(&self, position: usize) -> Option<HexagramLine> {
        self.lines.get(position.checked_sub(1)?).copied()
    }

    fn polarities(&self) -> [bool; 6] {
        self.lines.map(HexagramLine::is_yang)
    }

    /// Lower trigram (lines 1-3).
    pub fn lower(&self) -> Trigram {
        let p = self.polarities();
        Trigram::from_lines([p[0], p[1], p[2]])
    }

    /// Upper trigram (lines 4-6).
    pub fn upper(&self) -> Trigram {
        let p = self.polarities();
        Trigram::from_lines([p[3], p[4], p[5]])
    }

    /// King Wen sequence number, 1-64.
    pub fn number(&self) -> u8 {
        KING_WEN[king_wen_order(self.upper())][king_wen_order(self.lower())]
    }

    /// Short Chinese name, e.g. `既济`.
    pub fn name(&self) -> &'static str {
        NAMES[usize::from(self.number() - 1)]
    }

    /// Positions (1-6) of changing lines.
    pub fn moving_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_changing())
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// The derived hexagram after every changing line flips, or `None` when
    /// nothing moves.
    pub fn changed(&self) -> Option<Self> {
        if self.lines.iter().any(|l| l.is_changing()) {
            Some(Self::new(self.lines.map(HexagramLine::changed)))
        } else {
            None
        }
    }

    /// The nuclear (互) hexagram: lines 2-4 below, 3-5 above.
    pub fn mutual(&self) -> Self {
        let p = self.polarities();
        Self::from_trigrams(
            Trigram::from_lines([p[2], p[3], p[4]]),
            Trigram::from_lines([p[1], p[2], p[3]]),
        )
    }

    /// The same figure with the line at `position` (1-6) turned over.
    pub fn with_line_flipped(&self, position: usize) -> Self {
        let mut lines = self.lines;
        if let Some(line) = position.checked_sub(1).and_then(|i| lines.get_mut(i)) {
            *line = HexagramLine::stable(!line.is_yang());
        }
        Self::new(lines)
    }

    /// Lines drawn top to bottom, one per row.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .rev()
            .map(|l| l.symbol())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl std::fmt::Display for Hexagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (upper, lower) = (self.upper(), self.lower());
        if upper == lower {
            write!(f, "{}为{}", self.name(), upper.nature())
        } else {
            write!(f, "{}{}{}", upper.nature(), lower.nature(), self.name())
        }
    }
}
