//! Timestamp to calendrical context, with validation of the provider's answer.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::context::CalendricalContext;
use crate::error::{CalendarError, CalendarResult};
use crate::provider::{AstronomicalCalendar, CalendarProvider};

/// Resolves timestamps through a [`CalendarProvider`] and rejects malformed
/// answers.
///
/// No fallback is attempted when the provider fails: an approximate pillar
/// would silently cross a solar-term boundary.
#[derive(Debug, Clone, Default)]
pub struct CalendricalResolver<P = AstronomicalCalendar> {
    provider: P,
}

impl<P: CalendarProvider> CalendricalResolver<P> {
    /// Wrap a provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolve `at` into a validated context.
    pub fn resolve(&self, at: &DateTime<FixedOffset>) -> CalendarResult<CalendricalContext> {
        let context = self.provider.to_calendrical_context(at)?;
        if let Err(e) = context.validate() {
            warn!(%at, error = %e, "calendar provider returned malformed context");
            return Err(e);
        }
        if context.timestamp != *at {
            // Same instant is required; the offset may differ.
            warn!(%at, returned = %context.timestamp, "calendar provider moved the timestamp");
            return Err(CalendarError::CalendarUnavailable(format!(
                "provider resolved {} instead of {at}",
                context.timestamp
            )));
        }
        debug!(%at, pillars = %context, "resolved");
        Ok(context)
    }
}
