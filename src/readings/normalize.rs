use chrono_tz::Tz;
use serde_json::Value;

use super::error::{NormalizeError, RecordRejection};
use super::model::{RawRecord, Reading, ReadingSet};
use super::timestamp::parse_utc_timestamp;

const TIMESTAMP_FIELDS: &[&str] = &["dataHoraUTC", "timestampUtc", "timestamp"];
const TEMPERATURE_FIELDS: &[&str] = &["temperatura", "temperature"];
const HUMIDITY_FIELDS: &[&str] = &["umidade", "humidity"];

/// Turns raw store records into a sorted reading set in `timezone`.
///
/// Records without a parseable timestamp or numeric measurements are dropped
/// with a warning; the batch only fails when nothing usable is left.
pub fn normalize(records: Vec<RawRecord>, timezone: Tz) -> Result<ReadingSet, NormalizeError> {
    let received = records.len();
    let mut readings = Vec::with_capacity(received);

    for (index, record) in records.iter().enumerate() {
        match reading_from_record(record, timezone) {
            Ok(reading) => readings.push(reading),
            Err(rejection) => log::warn!(
                "reading_dropped index={} id={} reason={}",
                index,
                record_id(record),
                rejection
            ),
        }
    }

    let dropped = received - readings.len();
    if dropped > 0 {
        log::info!(
            "readings_filtered received={} kept={} dropped={}",
            received,
            readings.len(),
            dropped
        );
    }

    ReadingSet::from_readings(readings, timezone)
        .ok_or(NormalizeError::NoValidReadings { received })
}

fn reading_from_record(record: &RawRecord, timezone: Tz) -> Result<Reading, RecordRejection> {
    let (timestamp_field, raw_timestamp) = field(record, TIMESTAMP_FIELDS)?;
    let timestamp_utc = raw_timestamp
        .as_str()
        .and_then(parse_utc_timestamp)
        .ok_or_else(|| {
            RecordRejection::UnparseableTimestamp(format!("{}={}", timestamp_field, raw_timestamp))
        })?;

    let temperature = measurement(record, TEMPERATURE_FIELDS)?;
    let humidity = measurement(record, HUMIDITY_FIELDS)?;

    Ok(Reading::new(timestamp_utc, temperature, humidity, timezone))
}

fn field<'a>(
    record: &'a RawRecord,
    names: &[&'static str],
) -> Result<(&'static str, &'a Value), RecordRejection> {
    names
        .iter()
        .find_map(|name| {
            record
                .get(*name)
                .filter(|value| !value.is_null())
                .map(|value| (*name, value))
        })
        .ok_or(RecordRejection::MissingField(names[0]))
}

fn measurement(record: &RawRecord, names: &[&'static str]) -> Result<f64, RecordRejection> {
    let (name, value) = field(record, names)?;
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(RecordRejection::NotNumeric(name))?;

    if !number.is_finite() {
        return Err(RecordRejection::NonFinite(name));
    }

    Ok(number)
}

fn record_id(record: &RawRecord) -> &str {
    record.get("id").and_then(Value::as_str).unwrap_or("-")
}
