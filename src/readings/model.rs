use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// A document as returned by the store; unknown fields are carried but ignored.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

const LOCAL_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp_utc: DateTime<Utc>,
    pub local_time: DateTime<Tz>,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp_utc: DateTime<Utc>, temperature: f64, humidity: f64, timezone: Tz) -> Self {
        Self {
            timestamp_utc,
            local_time: timestamp_utc.with_timezone(&timezone),
            temperature,
            humidity,
        }
    }

    pub fn local_display(&self) -> String {
        self.local_time.format(LOCAL_DISPLAY_FORMAT).to_string()
    }
}

/// Time-ordered, never-empty readings for one report run.
#[derive(Debug, Clone)]
pub struct ReadingSet {
    readings: Vec<Reading>,
    timezone: Tz,
}

impl ReadingSet {
    /// Sorts by UTC timestamp; equal timestamps keep their input order.
    pub fn from_readings(mut readings: Vec<Reading>, timezone: Tz) -> Option<Self> {
        if readings.is_empty() {
            return None;
        }

        readings.sort_by_key(|reading| reading.timestamp_utc);
        Some(Self { readings, timezone })
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn first(&self) -> &Reading {
        &self.readings[0]
    }

    pub fn last(&self) -> &Reading {
        &self.readings[self.readings.len() - 1]
    }

    pub fn time_span(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.first().timestamp_utc, self.last().timestamp_utc)
    }

    /// Lowest and highest value across both series.
    pub fn value_bounds(&self) -> (f64, f64) {
        self.readings.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(low, high), reading| {
                (
                    low.min(reading.temperature).min(reading.humidity),
                    high.max(reading.temperature).max(reading.humidity),
                )
            },
        )
    }
}
