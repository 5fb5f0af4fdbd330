//! Divination casters for Tianji.
//!
//! Three casters turn numbers, coin tosses or a resolved calendar into
//! symbolic results: [`CoinHexagramCaster`] (六爻), [`NumerologicalCaster`]
//! (梅花易数) and [`OracleSequencer`] (小六壬). [`ReadingComposer`] renders
//! the results as prompt text.

pub mod coin;
pub mod config;
pub mod error;
pub mod hexagram;
pub mod meihua;
pub mod reading;
pub mod trigram;
pub mod xiaoliuren;

pub use coin::{CoinHexagramCaster, entropy_seed};
pub use config::DivinationConfig;
pub use error::{DivinationError, DivinationResult};
pub use hexagram::{Hexagram, HexagramLine};
pub use meihua::{BodyUseRelation, NumerologicalCaster, TrigramPair};
pub use reading::{Gender, Method, QuerentProfile, ReadingComposer};
pub use trigram::Trigram;
pub use xiaoliuren::{OraclePalace, OracleResult, OracleSequencer};
