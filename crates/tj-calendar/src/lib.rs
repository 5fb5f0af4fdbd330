//! Sexagenary calendar support for Tianji.
//!
//! Converts civil timestamps into four pillars, lunar dates and solar terms,
//! and corrects clock time to local true solar time. The divination casters
//! consume the resulting [`CalendricalContext`].

mod astro;
pub mod config;
pub mod context;
pub mod error;
pub mod ganzhi;
pub mod lunar;
pub mod provider;
pub mod resolver;
pub mod solar_term;
pub mod solar_time;

pub use config::{CalendarConfig, City, CityTable, YearBoundary, ZiHour};
pub use context::CalendricalContext;
pub use error::{CalendarError, CalendarResult};
pub use ganzhi::{Branch, Element, Polarity, Stem, StemBranch, hour_branch_index};
pub use lunar::LunarMonth;
pub use provider::{AstronomicalCalendar, CalendarProvider};
pub use resolver::CalendricalResolver;
pub use solar_term::{SolarTerm, SolarTermEvent};
pub use solar_time::TrueSolarTimeAdjuster;
