use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

/// Body of `POST /create-weather/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWeatherRequest {
    pub location: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    pub start_date: String,
    pub end_date: String,
}

/// Body of `PUT /weather/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWeatherRequest {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl UpdateWeatherRequest {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.lat.is_none()
            && self.lon.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

/// Coordinates as reported by the provider; either half may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Current-conditions snapshot. The payload is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    pub coord: Coordinates,
    pub payload: Value,
}

impl CurrentWeather {
    /// Wrap a raw current-conditions document, pulling out `coord` if present.
    pub fn from_payload(payload: Value) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct CoordOnly {
            #[serde(default)]
            coord: Option<Coordinates>,
        }

        let parsed = CoordOnly::deserialize(&payload)?;

        Ok(Self {
            coord: parsed.coord.unwrap_or_default(),
            payload,
        })
    }
}

/// 5-day forecast snapshot, stored verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastWeather {
    pub payload: Value,
}

/// The `weather_data` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current: Value,
    #[serde(default)]
    pub forecast: Option<Value>,
}

impl WeatherData {
    pub fn new(current: CurrentWeather, forecast: Option<ForecastWeather>) -> Self {
        Self {
            current: current.payload,
            forecast: forecast.map(|f| f.payload),
        }
    }

    /// Replace the current snapshot, keeping whatever forecast was stored.
    pub fn with_current(self, current: CurrentWeather) -> Self {
        Self {
            current: current.payload,
            forecast: self.forecast,
        }
    }
}

/// A persisted row of the weather records table.
///
/// `created_at` may come back as `timestamptz` or as a zone-less `timestamp`,
/// which is read as UTC. Columns not named here are kept in `extra` and
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weather_data: WeatherData,
    #[serde(deserialize_with = "timestamp_with_or_without_zone")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields sent to the store on insert. `id` and `created_at` are assigned there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewWeatherRecord {
    pub location: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weather_data: WeatherData,
}

/// Partial update; only `Some` fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<WeatherData>,
}

impl WeatherPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// Stores differ on whether the primary key is a uuid or a bigint.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn timestamp_with_or_without_zone<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    if let Ok(with_zone) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(with_zone.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| de::Error::custom(format!("invalid created_at timestamp: {raw}")))
}
