pub mod calendar;
pub mod cities;
pub mod coin;
pub mod meihua;
pub mod oracle;
pub mod prompt;

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Utc};
use colored::Colorize;
use tj_calendar::{
    AstronomicalCalendar, CalendarConfig, CalendricalContext, CalendricalResolver,
    TrueSolarTimeAdjuster,
};
use tracing::debug;

/// Where true solar time is taken from.
pub enum Place {
    /// No correction: the civil clock is used as is.
    Civil,
    /// A longitude given directly.
    Longitude(f64),
    /// A city from the configured table.
    City(String),
}

/// Options shared by every subcommand.
pub struct Session {
    pub config: CalendarConfig,
    pub at: DateTime<FixedOffset>,
    pub place: Place,
    pub json: bool,
}

/// The moment a cast is made for, before and after solar-time correction.
pub struct Moment {
    pub civil: DateTime<FixedOffset>,
    pub solar: DateTime<FixedOffset>,
    pub longitude: Option<f64>,
    pub context: CalendricalContext,
}

impl Session {
    pub fn open(
        config_path: Option<&Path>,
        at: Option<&str>,
        longitude: Option<f64>,
        city: Option<String>,
        json: bool,
    ) -> Result<Self, String> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => CalendarConfig::default(),
        };
        let zone = config.zone_offset().map_err(|e| e.to_string())?;
        let at = match at {
            Some(text) => DateTime::parse_from_rfc3339(text)
                .map_err(|e| format!("invalid timestamp '{text}': {e}"))?,
            None => Utc::now().with_timezone(&zone),
        };
        let place = match (longitude, city) {
            (Some(lon), _) => Place::Longitude(lon),
            (None, Some(name)) => Place::City(name),
            (None, None) => Place::Civil,
        };
        Ok(Self {
            config,
            at,
            place,
            json,
        })
    }

    /// Correct the clock for longitude and resolve the calendar.
    pub fn moment(&self) -> Result<Moment, String> {
        let adjuster = TrueSolarTimeAdjuster::new(self.config.clone());
        let (solar, longitude) = match &self.place {
            Place::Civil => (self.at, None),
            Place::Longitude(lon) => (
                adjuster.adjust(self.at, *lon).map_err(|e| e.to_string())?,
                Some(*lon),
            ),
            Place::City(name) => {
                let solar = adjuster
                    .adjust_for_city(self.at, name)
                    .map_err(|e| e.to_string())?;
                // Shown next to the solar clock.
                let lon = adjuster
                    .config()
                    .cities
                    .longitude(name)
                    .map_err(|e| e.to_string())?;
                (solar, Some(lon))
            }
        };
        let resolver = CalendricalResolver::new(AstronomicalCalendar::new(self.config.clone()));
        let context = resolver.resolve(&solar).map_err(|e| e.to_string())?;
        debug!(civil = %self.at, %solar, "resolved moment");
        Ok(Moment {
            civil: self.at,
            solar,
            longitude,
            context,
        })
    }
}

fn load_config(path: &Path) -> Result<CalendarConfig, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read config {}: {e}", path.display()))?;
    CalendarConfig::from_toml_str(&text).map_err(|e| e.to_string())
}

/// Print a value as pretty JSON.
pub fn print_json(value: &serde_json::Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

/// The moment as a JSON object.
pub fn moment_json(moment: &Moment) -> serde_json::Value {
    serde_json::json!({
        "civil": moment.civil,
        "solar": moment.solar,
        "longitude": moment.longitude,
        "context": moment.context,
    })
}

/// The moment as text: clock lines and pillars.
pub fn print_moment(moment: &Moment) {
    println!(
        "  {} {}",
        "Civil time:".bold(),
        moment.civil.format("%Y-%m-%d %H:%M:%S %:z")
    );
    if let Some(lon) = moment.longitude {
        println!(
            "  {} {} ({lon:.2}°)",
            "Solar time:".bold(),
            moment.solar.format("%Y-%m-%d %H:%M:%S %:z")
        );
    }
    println!("  {} {}", "Pillars:".bold(), moment.context.to_string().cyan());
}
