//! Weather readings as delivered by the station backend
//!
//! - `Reading`: a validated point-in-time sensor record
//! - `RawReading`: an unvalidated history element, checked on demand
//! - `ComfortIndex` and `PressureTrend`: the label vocabularies

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

use super::error::ValidationError;

/// Numeric fields every reading must carry
const REQUIRED_NUMERIC_FIELDS: [&str; 3] = ["temp_f", "humidity", "pressure"];

/// Accepted layouts for timestamps that carry no UTC offset
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A single weather-station sample plus derived and daily rolling fields
///
/// Labels (`comfort_index`, `pressure_trend_label`) stay as the backend sent
/// them; interpretation happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// ISO-8601 sample time
    pub ts: String,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub temp_c: Option<f64>,
    pub temp_f: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Barometric pressure, hPa
    pub pressure: f64,

    /// Temperature estimated from the humidity sensor, °C
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub temp_from_humidity: Option<f64>,
    /// Temperature estimated from the pressure sensor, °C
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub temp_from_pressure: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub cpu_temp: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub dew_point_c: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub dew_point_f: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub comfort_index: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub pressure_trend_3h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub pressure_trend_6h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub pressure_trend_label: Option<String>,

    // Rolling aggregates since local midnight
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub daily_temp_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub daily_temp_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub daily_temp_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub daily_humidity_avg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub daily_pressure_avg: Option<f64>,
}

impl Reading {
    /// Create a reading with only the required fields set
    pub fn new(ts: impl Into<String>, temp_f: f64, humidity: f64, pressure: f64) -> Self {
        Self {
            ts: ts.into(),
            temp_c: None,
            temp_f,
            humidity,
            pressure,
            temp_from_humidity: None,
            temp_from_pressure: None,
            cpu_temp: None,
            dew_point_c: None,
            dew_point_f: None,
            comfort_index: None,
            pressure_trend_3h: None,
            pressure_trend_6h: None,
            pressure_trend_label: None,
            daily_temp_min: None,
            daily_temp_max: None,
            daily_temp_avg: None,
            daily_humidity_avg: None,
            daily_pressure_avg: None,
        }
    }

    /// Builder method: set the Celsius temperature
    pub fn temp_c(mut self, temp_c: f64) -> Self {
        self.temp_c = Some(temp_c);
        self
    }

    /// Builder method: set the comfort label
    pub fn comfort(mut self, label: impl Into<String>) -> Self {
        self.comfort_index = Some(label.into());
        self
    }

    /// Builder method: set the pressure trend label and deltas
    pub fn trend(mut self, label: impl Into<String>, delta_3h: Option<f64>, delta_6h: Option<f64>) -> Self {
        self.pressure_trend_label = Some(label.into());
        self.pressure_trend_3h = delta_3h;
        self.pressure_trend_6h = delta_6h;
        self
    }

    /// Validate a JSON payload and decode it into a reading
    ///
    /// Checks that `ts` is a non-empty string and that `temp_f`, `humidity`
    /// and `pressure` are numbers. Optional fields of the wrong type are
    /// dropped, never rejected.
    /// The timestamp itself is not parsed here; see [`Reading::is_renderable`].
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

        match object.get("ts") {
            None | Some(Value::Null) => return Err(ValidationError::MissingField("ts")),
            Some(Value::String(ts)) if ts.is_empty() => {
                return Err(ValidationError::MissingField("ts"))
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ValidationError::WrongType {
                    field: "ts",
                    expected: "string",
                })
            }
        }

        for field in REQUIRED_NUMERIC_FIELDS {
            match object.get(field) {
                None | Some(Value::Null) => return Err(ValidationError::MissingField(field)),
                Some(v) if v.is_number() => {}
                Some(_) => {
                    return Err(ValidationError::WrongType {
                        field,
                        expected: "number",
                    })
                }
            }
        }

        Ok(Reading::deserialize(value)?)
    }

    /// Parsed sample time, if the timestamp is valid
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.ts)
    }

    /// A reading may be drawn only when its timestamp parses
    pub fn is_renderable(&self) -> bool {
        self.timestamp().is_some()
    }

    /// Celsius temperature, derived from °F when the backend omitted it
    pub fn celsius(&self) -> f64 {
        self.temp_c.unwrap_or_else(|| fahrenheit_to_celsius(self.temp_f))
    }

    /// Parsed comfort label
    pub fn comfort_level(&self) -> Option<ComfortIndex> {
        self.comfort_index.as_deref().and_then(|s| s.parse().ok())
    }

    /// Parsed pressure trend label
    pub fn trend_label(&self) -> Option<PressureTrend> {
        self.pressure_trend_label.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Optional numbers of the wrong JSON type read as absent
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

/// Optional labels of the wrong JSON type read as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|v| v.as_str().map(String::from)))
}

/// An element of a history window exactly as the backend sent it
///
/// History elements are not validated by the client; consumers call
/// [`RawReading::renderable`] and drop anything that fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawReading(Value);

impl RawReading {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Shape validation only
    pub fn validate(&self) -> Result<Reading, ValidationError> {
        Reading::from_value(&self.0)
    }

    /// Shape validation plus a parseable timestamp
    pub fn renderable(&self) -> Result<Reading, ValidationError> {
        let reading = self.validate()?;
        if reading.is_renderable() {
            Ok(reading)
        } else {
            Err(ValidationError::InvalidTimestamp(reading.ts))
        }
    }
}

/// Parse an ISO-8601 timestamp
///
/// RFC 3339 with an offset is preferred; timestamps without an offset are
/// read as UTC, which is what the station backend emits.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(ts, format).ok())
        .map(|naive| naive.and_utc())
}

/// °F = °C × 1.8 + 32
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8
}

/// Comfort classification computed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComfortIndex {
    Comfortable,
    TooHot,
    TooCold,
    TooHumid,
    TooDry,
}

impl FromStr for ComfortIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comfortable" => Ok(ComfortIndex::Comfortable),
            "too_hot" => Ok(ComfortIndex::TooHot),
            "too_cold" => Ok(ComfortIndex::TooCold),
            "too_humid" => Ok(ComfortIndex::TooHumid),
            "too_dry" => Ok(ComfortIndex::TooDry),
            other => Err(format!("Unknown comfort index: {}", other)),
        }
    }
}

/// Direction of barometric pressure over the last hours
///
/// `steady` is a real trend; `unknown` and `calculating` are not and do not
/// parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressureTrend {
    RapidlyRising,
    Rising,
    Steady,
    Falling,
    RapidlyFalling,
}

impl FromStr for PressureTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rapidly_rising" => Ok(PressureTrend::RapidlyRising),
            "rising" => Ok(PressureTrend::Rising),
            "steady" => Ok(PressureTrend::Steady),
            "falling" => Ok(PressureTrend::Falling),
            "rapidly_falling" => Ok(PressureTrend::RapidlyFalling),
            other => Err(format!("Unknown pressure trend: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "ts": "2024-01-01T00:00:00Z",
            "temp_c": 20,
            "temp_f": 68,
            "humidity": 55,
            "pressure": 1013
        })
    }

    #[test]
    fn test_from_value_accepts_minimal_reading() {
        let reading = Reading::from_value(&valid_body()).unwrap();
        assert_eq!(reading, Reading::new("2024-01-01T00:00:00Z", 68.0, 55.0, 1013.0).temp_c(20.0));
        assert!(reading.is_renderable());
    }

    #[test]
    fn test_from_value_accepts_nulls_in_optional_fields() {
        let mut body = valid_body();
        body["cpu_temp"] = Value::Null;
        body["pressure_trend_3h"] = Value::Null;
        body["daily_temp_min"] = json!(61.2);
        body["comfort_index"] = json!("comfortable");

        let reading = Reading::from_value(&body).unwrap();
        assert_eq!(reading.cpu_temp, None);
        assert_eq!(reading.daily_temp_min, Some(61.2));
        assert_eq!(reading.comfort_level(), Some(ComfortIndex::Comfortable));
    }

    #[test]
    fn test_from_value_missing_required_fields() {
        for field in ["ts", "temp_f", "humidity", "pressure"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(
                Reading::from_value(&body),
                Err(ValidationError::MissingField(field)),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_from_value_wrong_types() {
        let mut body = valid_body();
        body["humidity"] = json!("55");
        assert_eq!(
            Reading::from_value(&body),
            Err(ValidationError::WrongType {
                field: "humidity",
                expected: "number"
            })
        );

        let mut body = valid_body();
        body["ts"] = json!(1704067200);
        assert!(matches!(
            Reading::from_value(&body),
            Err(ValidationError::WrongType { field: "ts", .. })
        ));
    }

    #[test]
    fn test_from_value_empty_timestamp_is_missing() {
        let mut body = valid_body();
        body["ts"] = json!("");
        assert_eq!(Reading::from_value(&body), Err(ValidationError::MissingField("ts")));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert_eq!(Reading::from_value(&json!([1, 2])), Err(ValidationError::NotAnObject));
        assert_eq!(Reading::from_value(&json!({})), Err(ValidationError::MissingField("ts")));
    }

    #[test]
    fn test_from_value_bad_optional_field() {
        let mut body = valid_body();
        body["dew_point_f"] = json!("humid");
        body["cpu_temp"] = json!("n/a");
        body["comfort_index"] = json!(3);
        body["daily_temp_min"] = json!([1, 2]);
        body["pressure_trend_3h"] = json!(-0.4);

        let reading = Reading::from_value(&body).unwrap();
        assert_eq!(reading.dew_point_f, None);
        assert_eq!(reading.cpu_temp, None);
        assert_eq!(reading.comfort_index, None);
        assert_eq!(reading.daily_temp_min, None);
        assert_eq!(reading.pressure_trend_3h, Some(-0.4));
        assert_eq!(reading.temp_c, Some(20.0));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let utc = parse_timestamp("2024-03-05T10:15:30Z").unwrap();
        assert_eq!((utc.month(), utc.day(), utc.hour()), (3, 5, 10));

        let offset = parse_timestamp("2024-03-05T10:15:30+02:00").unwrap();
        assert_eq!(offset.hour(), 8);

        let naive = parse_timestamp("2024-03-05T10:15:30.123456").unwrap();
        assert_eq!(naive.hour(), 10);

        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_raw_reading_renderable() {
        let good = RawReading::new(valid_body());
        assert!(good.renderable().is_ok());

        let mut body = valid_body();
        body["ts"] = json!("not-a-date");
        let bad = RawReading::new(body);
        assert!(bad.validate().is_ok());
        assert_eq!(
            bad.renderable(),
            Err(ValidationError::InvalidTimestamp("not-a-date".to_string()))
        );
    }

    #[test]
    fn test_celsius_fallback() {
        let reading = Reading::new("2024-01-01T00:00:00Z", 212.0, 40.0, 1000.0);
        assert!((reading.celsius() - 100.0).abs() < 1e-9);
        assert_eq!(reading.clone().temp_c(99.0).celsius(), 99.0);
        assert!((celsius_to_fahrenheit(20.0) - 68.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!("too_humid".parse::<ComfortIndex>(), Ok(ComfortIndex::TooHumid));
        assert!("balmy".parse::<ComfortIndex>().is_err());

        assert_eq!("rapidly_falling".parse::<PressureTrend>(), Ok(PressureTrend::RapidlyFalling));
        assert!("calculating".parse::<PressureTrend>().is_err());
        assert!("unknown".parse::<PressureTrend>().is_err());

        let reading = Reading::new("2024-01-01T00:00:00Z", 70.0, 50.0, 1010.0)
            .trend("rising", Some(1.4), None);
        assert_eq!(reading.trend_label(), Some(PressureTrend::Rising));
    }
}
