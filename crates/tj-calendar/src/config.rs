//! Calendar configuration and the city longitude table.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

/// Where the year pillar turns over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearBoundary {
    /// At the instant of 立春 (the usual convention for pillars).
    #[default]
    StartOfSpring,
    /// At 00:00 on the first day of the first lunar month.
    LunarNewYear,
}

/// How the 子 double hour (23:00-00:59) is split across days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZiHour {
    /// The day pillar changes at midnight.
    #[default]
    Midnight,
    /// The day pillar changes at 23:00.
    Early,
}

/// A named place and its longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name.
    pub name: String,
    /// Alternative spelling accepted on lookup (e.g. pinyin).
    #[serde(default)]
    pub alias: Option<String>,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
}

/// Lookup table from city names to longitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityTable {
    cities: Vec<City>,
}

const BUILTIN_CITIES: [(&str, &str, f64); 35] = [
    ("北京", "Beijing", 116.40),
    ("上海", "Shanghai", 121.47),
    ("广州", "Guangzhou", 113.26),
    ("深圳", "Shenzhen", 114.05),
    ("武汉", "Wuhan", 114.30),
    ("成都", "Chengdu", 104.06),
    ("西安", "Xi'an", 108.93),
    ("沈阳", "Shenyang", 123.43),
    ("重庆", "Chongqing", 106.55),
    ("天津", "Tianjin", 117.20),
    ("杭州", "Hangzhou", 120.15),
    ("南京", "Nanjing", 118.79),
    ("郑州", "Zhengzhou", 113.62),
    ("长沙", "Changsha", 112.93),
    ("福州", "Fuzhou", 119.30),
    ("昆明", "Kunming", 102.71),
    ("贵阳", "Guiyang", 106.63),
    ("兰州", "Lanzhou", 103.82),
    ("南宁", "Nanning", 108.32),
    ("哈尔滨", "Harbin", 126.63),
    ("长春", "Changchun", 125.32),
    ("石家庄", "Shijiazhuang", 114.48),
    ("太原", "Taiyuan", 112.53),
    ("呼和浩特", "Hohhot", 111.65),
    ("合肥", "Hefei", 117.28),
    ("南昌", "Nanchang", 115.89),
    ("济南", "Jinan", 117.00),
    ("海口", "Haikou", 110.35),
    ("拉萨", "Lhasa", 91.11),
    ("西宁", "Xining", 101.74),
    ("银川", "Yinchuan", 106.27),
    ("乌鲁木齐", "Urumqi", 87.62),
    ("台北", "Taipei", 121.50),
    ("香港", "Hong Kong", 114.17),
    ("澳门", "Macau", 113.54),
];

impl CityTable {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self { cities: Vec::new() }
    }

    /// The built-in table of Chinese provincial capitals and major cities.
    pub fn builtin() -> Self {
        let cities = BUILTIN_CITIES
            .iter()
            .map(|(name, alias, longitude)| City {
                name: (*name).to_string(),
                alias: Some((*alias).to_string()),
                longitude: *longitude,
            })
            .collect();
        Self { cities }
    }

    /// Add or replace a city (matched by name).
    pub fn with_city(mut self, city: City) -> Self {
        self.cities.retain(|c| c.name != city.name);
        self.cities.push(city);
        self
    }

    /// Find a city by name or alias, ignoring ASCII case and surrounding space.
    pub fn get(&self, name: &str) -> Option<&City> {
        let needle = name.trim();
        self.cities.iter().find(|c| {
            c.name.eq_ignore_ascii_case(needle)
                || c.alias
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(needle))
        })
    }

    /// Longitude of a city, or `InvalidInput` if it is not in the table.
    pub fn longitude(&self, name: &str) -> CalendarResult<f64> {
        self.get(name)
            .map(|c| c.longitude)
            .ok_or_else(|| CalendarError::InvalidInput(format!("unknown city: {name}")))
    }

    /// All cities in table order.
    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Configuration shared by the solar-time adjuster and the calendar.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Longitude of the civil zone's standard meridian, in degrees.
    pub reference_meridian: f64,
    /// Offset of the calendar's reference zone from UTC, in seconds.
    pub utc_offset_seconds: i32,
    /// Where the year pillar turns over.
    pub year_boundary: YearBoundary,
    /// How the 子 hour is split across days.
    pub zi_hour: ZiHour,
    /// Known city longitudes.
    pub cities: CityTable,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            reference_meridian: 120.0,
            utc_offset_seconds: 8 * 3600,
            year_boundary: YearBoundary::default(),
            zi_hour: ZiHour::default(),
            cities: CityTable::builtin(),
        }
    }
}

impl CalendarConfig {
    /// Set the reference meridian.
    pub fn with_reference_meridian(mut self, degrees: f64) -> Self {
        self.reference_meridian = degrees;
        self
    }

    /// Set the reference zone offset in seconds east of UTC.
    pub fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }

    /// Set the year boundary convention.
    pub fn with_year_boundary(mut self, boundary: YearBoundary) -> Self {
        self.year_boundary = boundary;
        self
    }

    /// Set the 子 hour convention.
    pub fn with_zi_hour(mut self, zi_hour: ZiHour) -> Self {
        self.zi_hour = zi_hour;
        self
    }

    /// Replace the city table.
    pub fn with_cities(mut self, cities: CityTable) -> Self {
        self.cities = cities;
        self
    }

    /// The reference zone as a chrono offset.
    pub fn zone_offset(&self) -> CalendarResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or_else(|| {
            CalendarError::InvalidInput(format!(
                "utc offset out of range: {}s",
                self.utc_offset_seconds
            ))
        })
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CalendarResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| CalendarError::InvalidInput(format!("invalid calendar config: {e}")))?;
        config.zone_offset()?;
        if !config.reference_meridian.is_finite() {
            return Err(CalendarError::InvalidInput(
                "reference meridian must be finite".to_string(),
            ));
        }
        Ok(config)
    }
}
