//! Plum-blossom numerology (梅花易数).
//!
//! Two numbers pick the upper and lower trigrams by their remainder mod 8,
//! and their sum plus a time number picks the moving line by remainder
//! mod 6. A remainder of zero counts as the last position (8 or 6).

use serde::{Deserialize, Serialize};
use tj_calendar::{CalendricalContext, Element};
use tracing::debug;

use crate::error::{DivinationError, DivinationResult};
use crate::hexagram::Hexagram;
use crate::trigram::Trigram;

/// Upper and lower trigram with the moving line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrigramPair {
    /// Upper trigram.
    pub upper: Trigram,
    /// Lower trigram.
    pub lower: Trigram,
    /// Moving line, 1 (bottom) to 6 (top).
    pub moving_line: u8,
}

impl TrigramPair {
    /// The primary (本) hexagram.
    pub fn main(&self) -> Hexagram {
        Hexagram::from_trigrams(self.upper, self.lower)
    }

    /// The nuclear (互) hexagram.
    pub fn mutual(&self) -> Hexagram {
        self.main().mutual()
    }

    /// The changed (变) hexagram, with the moving line flipped.
    pub fn changed(&self) -> Hexagram {
        self.main().with_line_flipped(usize::from(self.moving_line))
    }

    fn moving_in_lower(&self) -> bool {
        self.moving_line <= 3
    }

    /// The body (体) trigram: the one without the moving line.
    pub fn body(&self) -> Trigram {
        if self.moving_in_lower() {
            self.upper
        } else {
            self.lower
        }
    }

    /// The use (用) trigram: the one holding the moving line.
    pub fn use_(&self) -> Trigram {
        if self.moving_in_lower() {
            self.lower
        } else {
            self.upper
        }
    }

    /// How the use trigram's element bears on the body's.
    pub fn relation(&self) -> BodyUseRelation {
        BodyUseRelation::between(self.body().element(), self.use_().element())
    }
}

impl std::fmt::Display for TrigramPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "上{} 下{} 动爻{}",
            self.upper, self.lower, self.moving_line
        )
    }
}

/// Five-phase relation between body and use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyUseRelation {
    /// 比和: same element.
    Harmony,
    /// 用生体: use feeds body.
    UseFeedsBody,
    /// 体生用: body feeds use.
    BodyFeedsUse,
    /// 用克体: use overcomes body.
    UseOvercomesBody,
    /// 体克用: body overcomes use.
    BodyOvercomesUse,
}

impl BodyUseRelation {
    /// Relation between a body element and a use element.
    pub fn between(body: Element, use_: Element) -> Self {
        if body == use_ {
            Self::Harmony
        } else if use_.generates() == body {
            Self::UseFeedsBody
        } else if body.generates() == use_ {
            Self::BodyFeedsUse
        } else if use_.overcomes() == body {
            Self::UseOvercomesBody
        } else {
            Self::BodyOvercomesUse
        }
    }

    /// Chinese label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Harmony => "比和",
            Self::UseFeedsBody => "用生体",
            Self::BodyFeedsUse => "体生用",
            Self::UseOvercomesBody => "用克体",
            Self::BodyOvercomesUse => "体克用",
        }
    }
}

impl std::fmt::Display for BodyUseRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Casts trigram pairs from numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumerologicalCaster;

impl NumerologicalCaster {
    /// Create a caster.
    pub fn new() -> Self {
        Self
    }

    /// Cast from two positive numbers and a time number.
    ///
    /// Zero for `n1` or `n2` is rejected; callers wanting a random
    /// replacement must substitute it before calling.
    pub fn cast(&self, n1: u64, n2: u64, time_num: u64) -> DivinationResult<TrigramPair> {
        if n1 == 0 || n2 == 0 {
            return Err(DivinationError::InvalidInput(format!(
                "plum-blossom numbers must be positive, got {n1} and {n2}"
            )));
        }
        let upper = trigram_for(n1)?;
        let lower = trigram_for(n2)?;
        let sum = u128::from(n1) + u128::from(n2) + u128::from(time_num);
        let moving_line = match (sum % 6) as u8 {
            0 => 6,
            r => r,
        };
        let pair = TrigramPair {
            upper,
            lower,
            moving_line,
        };
        debug!(n1, n2, time_num, %pair, "cast plum-blossom pair");
        Ok(pair)
    }

    /// Cast using the double-hour of `ctx` (子 = 1 ... 亥 = 12) as time number.
    pub fn cast_at(
        &self,
        n1: u64,
        n2: u64,
        ctx: &CalendricalContext,
    ) -> DivinationResult<TrigramPair> {
        self.cast(n1, n2, u64::from(ctx.hour_branch_index) + 1)
    }
}

fn trigram_for(n: u64) -> DivinationResult<Trigram> {
    let number = match n % 8 {
        0 => 8,
        r => r,
    };
    Trigram::from_number(number)
        .ok_or_else(|| DivinationError::InvalidInput(format!("no trigram numbered {number}")))
}
