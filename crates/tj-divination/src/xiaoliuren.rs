//! Quick oracle (小六壬).
//!
//! Counting starts on 大安 and walks the six palaces three times: by month,
//! then by day from where the month stopped, then by hour. Each count
//! includes the starting palace, so a count of 1 stays put.

use serde::{Deserialize, Serialize};
use tj_calendar::CalendricalContext;
use tracing::debug;

use crate::error::{DivinationError, DivinationResult};

/// One of the six palaces, in ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OraclePalace {
    /// 大安
    DaAn,
    /// 留连
    LiuLian,
    /// 速喜
    SuXi,
    /// 赤口
    ChiKou,
    /// 小吉
    XiaoJi,
    /// 空亡
    KongWang,
}

impl OraclePalace {
    /// The ring, starting at 大安.
    pub const ALL: [Self; 6] = [
        Self::DaAn,
        Self::LiuLian,
        Self::SuXi,
        Self::ChiKou,
        Self::XiaoJi,
        Self::KongWang,
    ];

    /// Palace at any offset around the ring.
    pub fn from_index(index: u64) -> Self {
        Self::ALL[(index % 6) as usize]
    }

    /// Position in the ring (0 = 大安).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Chinese name.
    pub fn name(self) -> &'static str {
        match self {
            Self::DaAn => "大安",
            Self::LiuLian => "留连",
            Self::SuXi => "速喜",
            Self::ChiKou => "赤口",
            Self::XiaoJi => "小吉",
            Self::KongWang => "空亡",
        }
    }

    /// Whether the palace is read as favourable.
    pub fn is_auspicious(self) -> bool {
        matches!(self, Self::DaAn | Self::SuXi | Self::XiaoJi)
    }

    /// Traditional one-line reading.
    pub fn meaning(self) -> &'static str {
        match self {
            Self::DaAn => "身未动时，属木青龙，凡事安稳",
            Self::LiuLian => "卒未归时，属水玄武，事多拖延",
            Self::SuXi => "人即至时，属火朱雀，喜事速来",
            Self::ChiKou => "官事凶时，属金白虎，防口舌是非",
            Self::XiaoJi => "人来喜时，属木六合，求谋多成",
            Self::KongWang => "音信稀时，属土勾陈，事难有成",
        }
    }
}

impl std::fmt::Display for OraclePalace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The three palaces visited and where the walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResult {
    /// Palaces reached after the month, day and hour counts.
    pub sequence: [OraclePalace; 3],
    /// The last palace of the sequence.
    pub final_palace: OraclePalace,
}

impl std::fmt::Display for OracleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.sequence;
        write!(f, "{a} → {b} → {c}")
    }
}

/// Walks the palace ring from calendar or free numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleSequencer;

impl OracleSequencer {
    /// Create a sequencer.
    pub fn new() -> Self {
        Self
    }

    /// Time mode: lunar `month` (1-12), `day` (1-31) and double-hour index
    /// (0 = 子 ... 11 = 亥).
    pub fn by_time(
        &self,
        month: u32,
        day: u32,
        hour_branch_index: u32,
    ) -> DivinationResult<OracleResult> {
        if !(1..=12).contains(&month) {
            return Err(invalid(format!("month must be 1-12, got {month}")));
        }
        if !(1..=31).contains(&day) {
            return Err(invalid(format!("day must be 1-31, got {day}")));
        }
        if hour_branch_index > 11 {
            return Err(invalid(format!(
                "hour branch index must be 0-11, got {hour_branch_index}"
            )));
        }
        Ok(self.walk(
            u64::from(month),
            u64::from(day),
            u64::from(hour_branch_index) + 1,
        ))
    }

    /// Numeric mode: three positive numbers standing for month, day and hour.
    pub fn by_numbers(&self, a: u64, b: u64, c: u64) -> DivinationResult<OracleResult> {
        if a == 0 || b == 0 || c == 0 {
            return Err(invalid(format!(
                "oracle numbers must be positive, got {a}, {b}, {c}"
            )));
        }
        Ok(self.walk(a, b, c))
    }

    /// Time mode from a resolved context, using the lunar month and day.
    pub fn from_context(&self, ctx: &CalendricalContext) -> DivinationResult<OracleResult> {
        self.by_time(ctx.lunar_month.number, ctx.lunar_day, ctx.hour_branch_index)
    }

    fn walk(&self, first: u64, second: u64, third: u64) -> OracleResult {
        let month = (first - 1) % 6;
        let day = (month + (second - 1) % 6) % 6;
        let hour = (day + (third - 1) % 6) % 6;
        let sequence = [month, day, hour].map(OraclePalace::from_index);
        let result = OracleResult {
            sequence,
            final_palace: sequence[2],
        };
        debug!(first, second, third, %result, "walked oracle palaces");
        result
    }
}

fn invalid(msg: String) -> DivinationError {
    DivinationError::InvalidInput(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use OraclePalace::*;
    use proptest::prelude::*;

    #[test]
    fn first_of_first_at_zi_stays_home() {
        let result = OracleSequencer::new().by_time(1, 1, 0).unwrap();
        assert_eq!(result.sequence, [DaAn, DaAn, DaAn]);
        assert_eq!(result.final_palace, DaAn);
    }

    #[test]
    fn numeric_ones_stay_home() {
        let result = OracleSequencer::new().by_numbers(1, 1, 1).unwrap();
        assert_eq!(result.sequence, [DaAn, DaAn, DaAn]);
    }

    #[test]
    fn worked_example() {
        // Third month lands on 速喜; day 5 counts on to 大安; the 辰 hour to 小吉.
        let result = OracleSequencer::new().by_time(3, 5, 4).unwrap();
        assert_eq!(result.sequence, [SuXi, DaAn, XiaoJi]);
        assert_eq!(result.to_string(), "速喜 → 大安 → 小吉");
    }

    #[test]
    fn wraps_around_the_ring() {
        let result = OracleSequencer::new().by_time(12, 30, 11).unwrap();
        // (12-1)%6 = 5; (5+29)%6 = 4; (4+11)%6 = 3.
        assert_eq!(result.sequence, [KongWang, XiaoJi, ChiKou]);
        assert!(!result.final_palace.is_auspicious());
    }

    #[test]
    fn rejects_out_of_range() {
        let seq = OracleSequencer::new();
        assert!(matches!(seq.by_time(0, 1, 0), Err(DivinationError::InvalidInput(_))));
        assert!(seq.by_time(13, 1, 0).is_err());
        assert!(seq.by_time(1, 0, 0).is_err());
        assert!(seq.by_time(1, 32, 0).is_err());
        assert!(seq.by_time(1, 1, 12).is_err());
        assert!(seq.by_numbers(0, 1, 1).is_err());
        assert!(seq.by_numbers(1, 1, 0).is_err());
    }

    #[test]
    fn huge_numbers_do_not_overflow() {
        let result = OracleSequencer::new()
            .by_numbers(u64::MAX, u64::MAX, u64::MAX)
            .unwrap();
        // (MAX - 1) % 6 = 2 each step.
        assert_eq!(result.sequence, [SuXi, XiaoJi, DaAn]);
    }

    #[test]
    fn auspicious_palaces() {
        let good: Vec<_> = OraclePalace::ALL
            .into_iter()
            .filter(|p| p.is_auspicious())
            .map(OraclePalace::name)
            .collect();
        assert_eq!(good, vec!["大安", "速喜", "小吉"]);
    }

    proptest! {
        #[test]
        fn time_and_numeric_modes_agree(month in 1u32..=12, day in 1u32..=30, hour in 0u32..=11) {
            let seq = OracleSequencer::new();
            prop_assert_eq!(
                seq.by_time(month, day, hour).unwrap(),
                seq.by_numbers(u64::from(month), u64::from(day), u64::from(hour) + 1).unwrap()
            );
        }
    }
}
