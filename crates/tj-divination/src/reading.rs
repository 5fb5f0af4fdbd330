//! Prompt text for handing a cast to a language model.
//!
//! The engine does no interpretation itself. A reading is the resolved
//! calendar, the querent's details and the cast, rendered as a system
//! prompt plus a user prompt.

use serde::{Deserialize, Serialize};
use tj_calendar::{CalendricalContext, StemBranch};

use crate::error::{DivinationError, DivinationResult};
use crate::hexagram::Hexagram;
use crate::meihua::TrigramPair;
use crate::xiaoliuren::OracleResult;

/// Divination method a reading is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// 六爻, coin-cast hexagram.
    Liuyao,
    /// 梅花易数, plum-blossom numerology.
    Meihua,
    /// 奇门遁甲.
    Qimen,
    /// 大六壬.
    Liuren,
    /// 太乙神数.
    Taiyi,
    /// 小六壬, quick oracle.
    Xiaoliuren,
}

impl Method {
    /// All methods.
    pub const ALL: [Self; 6] = [
        Self::Liuyao,
        Self::Meihua,
        Self::Qimen,
        Self::Liuren,
        Self::Taiyi,
        Self::Xiaoliuren,
    ];

    /// Parse from the Chinese name or the ASCII key.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s || m.key().eq_ignore_ascii_case(s))
    }

    /// Chinese name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Liuyao => "六爻",
            Self::Meihua => "梅花",
            Self::Qimen => "奇门",
            Self::Liuren => "大六壬",
            Self::Taiyi => "太乙",
            Self::Xiaoliuren => "小六壬",
        }
    }

    /// ASCII key, as used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Liuyao => "liuyao",
            Self::Meihua => "meihua",
            Self::Qimen => "qimen",
            Self::Liuren => "liuren",
            Self::Taiyi => "taiyi",
            Self::Xiaoliuren => "xiaoliuren",
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Liuyao => "装卦定世应与六亲；按所问取用神；详析动爻与变卦。",
            Self::Meihua => "分清体用；论体用五行生克；参合起卦时辰。",
            Self::Qimen => "以时家奇门排盘；寻用神落宫；析宫位格局并给出决策建议。",
            Self::Liuren => "定月将；排天地盘、四课、三传；据课传断事。",
            Self::Taiyi => "推积年定局数；分主客；定格局，论大势。",
            Self::Xiaoliuren => "依月日时推出三宫；阐释落宫之义。",
        }
    }

    fn board_instruction(self) -> &'static str {
        match self {
            Self::Qimen => "请以时家奇门排盘分析。",
            Self::Liuren => "请确定月将，推天地盘、四课、三传，然后断事。",
            Self::Taiyi => "请推太乙积年，定局数，分主客，论格局。",
            Self::Liuyao | Self::Meihua | Self::Xiaoliuren => "请据此排盘断事。",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Querent's gender, if given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    /// Not provided.
    #[default]
    Unspecified,
    /// 男
    Male,
    /// 女
    Female,
}

impl Gender {
    /// Parse from `male`/`female`/`男`/`女`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "男" => Some(Self::Male),
            "female" | "f" | "女" => Some(Self::Female),
            "" | "unspecified" | "none" => Some(Self::Unspecified),
            _ => None,
        }
    }

    /// Chinese label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unspecified => "未知",
            Self::Male => "男",
            Self::Female => "女",
        }
    }
}

/// What the querent chose to share about themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerentProfile {
    /// Gender.
    pub gender: Gender,
    /// Birth year, when the full chart is unknown.
    pub birth_year: Option<i32>,
    /// Birth chart: year, month, day and hour pillars.
    pub pillars: Option<[StemBranch; 4]>,
    /// Longitude used for true solar time.
    pub longitude: Option<f64>,
}

impl QuerentProfile {
    /// Set the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the birth year.
    pub fn with_birth_year(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    /// Set the birth chart.
    pub fn with_pillars(mut self, pillars: [StemBranch; 4]) -> Self {
        self.pillars = Some(pillars);
        self
    }

    /// Parse a birth chart written as four labels, e.g. `"庚午,戊寅,甲子,丙寅"`.
    ///
    /// Commas (ASCII or full-width) and whitespace both separate pillars.
    pub fn parse_pillars(text: &str) -> DivinationResult<[StemBranch; 4]> {
        let labels: Vec<&str> = text
            .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        let [y, m, d, h] = labels.as_slice() else {
            return Err(DivinationError::InvalidInput(format!(
                "birth chart needs four pillars, got {}",
                labels.len()
            )));
        };
        let parse = |label: &str| {
            StemBranch::parse(label)
                .ok_or_else(|| DivinationError::InvalidInput(format!("bad pillar '{label}'")))
        };
        Ok([parse(*y)?, parse(*m)?, parse(*d)?, parse(*h)?])
    }

    /// Set the longitude.
    pub fn with_longitude(mut self, longitude: f64) -> Self {
        self.longitude = Some(longitude);
        self
    }

    /// Birth chart if known, else birth year, else `未提供`.
    pub fn birth_description(&self) -> String {
        match (&self.pillars, self.birth_year) {
            (Some([y, m, d, h]), _) => format!("年柱{y} 月柱{m} 日柱{d} 时柱{h}"),
            (None, Some(year)) => format!("出生年份{year}"),
            (None, None) => "未提供".to_string(),
        }
    }

    fn longitude_description(&self) -> String {
        self.longitude
            .map_or_else(|| "未提供".to_string(), |lon| format!("{lon:.2}°"))
    }
}

/// Renders system and user prompts for one querent.
#[derive(Debug, Clone, Default)]
pub struct ReadingComposer {
    profile: QuerentProfile,
}

impl ReadingComposer {
    /// Compose readings for `profile`.
    pub fn new(profile: QuerentProfile) -> Self {
        Self { profile }
    }

    /// The querent.
    pub fn profile(&self) -> &QuerentProfile {
        &self.profile
    }

    /// The system prompt: role, calendar, querent and the method's directive.
    pub fn system_prompt(&self, method: Method, ctx: &CalendricalContext) -> String {
        [
            "你是一位精通中国传统术数的大师，请依据下列时空与命主信息推演。".to_string(),
            "【时空】".to_string(),
            format!("- 真太阳时四柱：{ctx}"),
            format!("- 农历：{}", ctx.lunar_label()),
            format!("- 节气：{}", ctx.solar_term_name()),
            "【命主】".to_string(),
            format!("- 性别：{}", self.profile.gender.label()),
            format!("- 八字/年命：{}", self.profile.birth_description()),
            format!("- 经度：{}", self.profile.longitude_description()),
            "【原则】".to_string(),
            "1. 依五行旺衰给出明确倾向，不作模棱两可之语。".to_string(),
            "2. 分析月令旺衰、日辰生克冲合、空亡与神煞。".to_string(),
            "3. 排盘以当地真太阳时为准，而非标准时间。".to_string(),
            format!("【{}要点】{}", method.name(), method.directive()),
        ]
        .join("\n")
    }

    /// User prompt for a coin-cast hexagram.
    pub fn coin_prompt(&self, question: &str, hexagram: &Hexagram) -> DivinationResult<String> {
        let lines = hexagram
            .lines()
            .iter()
            .map(|l| l.name())
            .collect::<Vec<_>>()
            .join("、");
        let changed = hexagram
            .changed()
            .map_or_else(|| "无动爻".to_string(), |c| format!("{c}（第{}卦）", c.number()));
        Ok([
            question_line(question)?,
            format!("卦象（自下而上）：{lines}"),
            format!("本卦：{hexagram}（第{}卦）", hexagram.number()),
            format!("变卦：{changed}"),
            "请装卦并断吉凶。".to_string(),
        ]
        .join("\n"))
    }

    /// User prompt for a plum-blossom cast.
    pub fn meihua_prompt(&self, question: &str, pair: &TrigramPair) -> DivinationResult<String> {
        Ok([
            question_line(question)?,
            format!("上卦：{}", pair.upper),
            format!("下卦：{}", pair.lower),
            format!("动爻：{}", pair.moving_line),
            format!(
                "本卦：{}　互卦：{}　变卦：{}",
                pair.main(),
                pair.mutual(),
                pair.changed()
            ),
            format!(
                "体用：体{}用{}，{}",
                pair.body(),
                pair.use_(),
                pair.relation()
            ),
            "请断吉凶。".to_string(),
        ]
        .join("\n"))
    }

    /// User prompt for a quick-oracle walk.
    pub fn oracle_prompt(&self, question: &str, result: &OracleResult) -> DivinationResult<String> {
        Ok([
            question_line(question)?,
            format!("推演路径：{result}"),
            format!(
                "最终落宫：{}（{}）",
                result.final_palace,
                result.final_palace.meaning()
            ),
            "请解释其含义。".to_string(),
        ]
        .join("\n"))
    }

    /// User prompt for methods that lay out their board from the time alone.
    pub fn context_prompt(
        &self,
        method: Method,
        question: &str,
        ctx: &CalendricalContext,
    ) -> DivinationResult<String> {
        Ok([
            question_line(question)?,
            format!("真太阳时四柱：{ctx}"),
            format!("节气：{}", ctx.solar_term_name()),
            method.board_instruction().to_string(),
        ]
        .join("\n"))
    }
}

fn question_line(question: &str) -> DivinationResult<String> {
    let question = question.trim();
    if question.is_empty() {
        return Err(DivinationError::InvalidInput(
            "question must not be empty".to_string(),
        ));
    }
    Ok(format!("问题：{question}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tj_calendar::{LunarMonth, SolarTerm, SolarTermEvent};

    use crate::hexagram::HexagramLine;
    use crate::trigram::Trigram;
    use crate::xiaoliuren::OracleSequencer;

    fn context() -> CalendricalContext {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        CalendricalContext {
            timestamp: tz.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(),
            year: StemBranch::parse("甲辰").unwrap(),
            month: StemBranch::parse("丙寅").unwrap(),
            day: StemBranch::parse("甲辰").unwrap(),
            hour: StemBranch::parse("己巳").unwrap(),
            lunar_month: LunarMonth::new(1),
            lunar_day: 1,
            hour_branch_index: 5,
            preceding_solar_term: Some(SolarTermEvent {
                term: SolarTerm::StartOfSpring,
                at: tz.with_ymd_and_hms(2024, 2, 4, 16, 27, 0).unwrap(),
            }),
        }
    }

    #[test]
    fn method_parsing() {
        assert_eq!(Method::parse("六爻"), Some(Method::Liuyao));
        assert_eq!(Method::parse("Meihua"), Some(Method::Meihua));
        assert_eq!(Method::parse(" 大六壬 "), Some(Method::Liuren));
        assert_eq!(Method::parse("tarot"), None);
        for m in Method::ALL {
            assert_eq!(Method::parse(m.key()), Some(m));
            assert_eq!(Method::parse(m.name()), Some(m));
        }
    }

    #[test]
    fn gender_parsing() {
        assert_eq!(Gender::parse("女"), Some(Gender::Female));
        assert_eq!(Gender::parse("MALE"), Some(Gender::Male));
        assert_eq!(Gender::parse(""), Some(Gender::Unspecified));
        assert_eq!(Gender::parse("x"), None);
    }

    #[test]
    fn birth_description_prefers_pillars() {
        let profile = QuerentProfile::default().with_birth_year(1990);
        assert_eq!(profile.birth_description(), "出生年份1990");
        let pillars = ["庚午", "戊寅", "甲子", "丙寅"].map(|p| StemBranch::parse(p).unwrap());
        let profile = profile.with_pillars(pillars);
        assert_eq!(
            profile.birth_description(),
            "年柱庚午 月柱戊寅 日柱甲子 时柱丙寅"
        );
        assert_eq!(QuerentProfile::default().birth_description(), "未提供");
    }

    #[test]
    fn pillar_chart_parsing() {
        let chart = QuerentProfile::parse_pillars("庚午, 戊寅，甲子 丙寅").unwrap();
        assert_eq!(chart.map(|p| p.to_string()), ["庚午", "戊寅", "甲子", "丙寅"]);
        assert!(matches!(
            QuerentProfile::parse_pillars("庚午,戊寅,甲子"),
            Err(DivinationError::InvalidInput(_))
        ));
        // 甲丑 mixes a yang stem with a yin branch.
        assert!(matches!(
            QuerentProfile::parse_pillars("庚午,戊寅,甲丑,丙寅"),
            Err(DivinationError::InvalidInput(_))
        ));
    }

    #[test]
    fn system_prompt_carries_context_and_directive() {
        let composer = ReadingComposer::new(
            QuerentProfile::default()
                .with_gender(Gender::Female)
                .with_longitude(116.4),
        );
        let prompt = composer.system_prompt(Method::Meihua, &context());
        assert!(prompt.contains("- 真太阳时四柱：甲辰年 丙寅月 甲辰日 己巳时"));
        assert!(prompt.contains("- 农历：农历正月初一"));
        assert!(prompt.contains("- 节气：立春"));
        assert!(prompt.contains("- 性别：女"));
        assert!(prompt.contains("- 经度：116.40°"));
        assert!(prompt.ends_with("【梅花要点】分清体用；论体用五行生克；参合起卦时辰。"));
    }

    #[test]
    fn every_method_has_its_own_directive() {
        let composer = ReadingComposer::default();
        let prompts: Vec<String> = Method::ALL
            .iter()
            .map(|m| composer.system_prompt(*m, &context()))
            .collect();
        for (i, a) in prompts.iter().enumerate() {
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn oracle_prompt_text() {
        let result = OracleSequencer::new().by_time(1, 1, 5).unwrap();
        let prompt = ReadingComposer::default()
            .oracle_prompt("这次面试能过吗", &result)
            .unwrap();
        insta::assert_snapshot!(prompt, @r"
        问题：这次面试能过吗
        推演路径：大安 → 大安 → 空亡
        最终落宫：空亡（音信稀时，属土勾陈，事难有成）
        请解释其含义。
        ");
    }

    #[test]
    fn coin_prompt_lists_lines_bottom_up() {
        use HexagramLine::*;
        let hex = Hexagram::new([OldYang, YoungYang, YoungYang, YoungYang, YoungYang, YoungYang]);
        let prompt = ReadingComposer::default().coin_prompt("问财运", &hex).unwrap();
        assert!(prompt.contains("卦象（自下而上）：老阳、少阳、少阳、少阳、少阳、少阳"));
        assert!(prompt.contains("本卦：乾为天（第1卦）"));
        assert!(prompt.contains("变卦：天风姤（第44卦）"));
    }

    #[test]
    fn meihua_prompt_names_body_and_use() {
        let pair = TrigramPair {
            upper: Trigram::Qian,
            lower: Trigram::Li,
            moving_line: 2,
        };
        let prompt = ReadingComposer::default().meihua_prompt("问事业", &pair).unwrap();
        assert!(prompt.contains("本卦：天火同人　互卦：天风姤　变卦：乾为天"));
        assert!(prompt.contains("体用：体乾天用离火，用克体"));
    }

    #[test]
    fn context_prompt_for_board_methods() {
        let prompt = ReadingComposer::default()
            .context_prompt(Method::Liuren, "何时搬家", &context())
            .unwrap();
        assert!(prompt.starts_with("问题：何时搬家\n真太阳时四柱：甲辰年"));
        assert!(prompt.ends_with("请确定月将，推天地盘、四课、三传，然后断事。"));
    }

    #[test]
    fn empty_question_rejected() {
        let result = OracleSequencer::new().by_numbers(1, 2, 3).unwrap();
        assert!(matches!(
            ReadingComposer::default().oracle_prompt("  ", &result),
            Err(DivinationError::InvalidInput(_))
        ));
    }
}
