use crate::error::{Result, SonifyError};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ALTITUDE_COLUMN: &str = "metres";
const SPEED_COLUMN: &str = "mph";

/// One telemetry row: altitude in metres and ground speed in mph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlightSample {
    pub altitude: u32,
    pub speed: u32,
}

/// Integer prefix of `field`, like a lenient `parseInt`. `None` if there is no digit.
pub fn parse_leading_int(field: &str) -> Option<i64> {
    let trimmed = field.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

fn field_value(record: &csv::StringRecord, column: Option<usize>, name: &str, row: usize) -> u32 {
    let Some(field) = column.and_then(|i| record.get(i)) else {
        return 0;
    };
    if field.trim().is_empty() {
        return 0;
    }

    match parse_leading_int(field) {
        Some(value) => u32::try_from(value.max(0)).unwrap_or(u32::MAX),
        None => {
            warn!("Row {}: unparsable {} value '{}', using 0", row, name, field);
            0
        }
    }
}

/// Reads semicolon-delimited telemetry with a header row.
///
/// Missing columns or empty fields read as 0.
pub fn read_telemetry<R: Read>(reader: R) -> std::result::Result<Vec<FlightSample>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let altitude_column = headers.iter().position(|h| h == ALTITUDE_COLUMN);
    let speed_column = headers.iter().position(|h| h == SPEED_COLUMN);
    if altitude_column.is_none() || speed_column.is_none() {
        warn!(
            "Telemetry header {:?} lacks '{}' or '{}', missing values read as 0",
            headers, ALTITUDE_COLUMN, SPEED_COLUMN
        );
    }

    let mut samples = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        samples.push(FlightSample {
            altitude: field_value(&record, altitude_column, ALTITUDE_COLUMN, row + 1),
            speed: field_value(&record, speed_column, SPEED_COLUMN, row + 1),
        });
    }
    debug!("Parsed {} telemetry rows", samples.len());
    Ok(samples)
}

pub fn load_telemetry(path: &Path) -> Result<Vec<FlightSample>> {
    info!("Loading telemetry from {}", path.display());
    let to_error = |source| SonifyError::TelemetryRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| to_error(csv::Error::from(e)))?;
    let samples = read_telemetry(file).map_err(to_error)?;
    if samples.is_empty() {
        return Err(SonifyError::EmptyTelemetry(path.to_path_buf()));
    }

    info!("Loaded {} telemetry samples", samples.len());
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_int() {
        assert_eq!(parse_leading_int("123"), Some(123));
        assert_eq!(parse_leading_int(" 42.9 "), Some(42));
        assert_eq!(parse_leading_int("-7m"), Some(-7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
    }

    #[test]
    fn test_reads_semicolon_table() {
        let data = "time;metres;mph\n10:00;1200;310\n10:01;;305\n10:02;1250.5;n/a\n";
        let samples = read_telemetry(data.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![
                FlightSample {
                    altitude: 1200,
                    speed: 310
                },
                FlightSample {
                    altitude: 0,
                    speed: 305
                },
                FlightSample {
                    altitude: 1250,
                    speed: 0
                },
            ]
        );
    }

    #[test]
    fn test_missing_columns_default_to_zero() {
        let data = "time;mph\n10:00;12\n10:01\n";
        let samples = read_telemetry(data.as_bytes()).unwrap();
        assert_eq!(samples[0], FlightSample { altitude: 0, speed: 12 });
        assert_eq!(samples[1], FlightSample::default());
    }

    #[test]
    fn test_negative_values_clamp_to_zero() {
        let data = "metres;mph\n-20;5\n";
        let samples = read_telemetry(data.as_bytes()).unwrap();
        assert_eq!(samples[0], FlightSample { altitude: 0, speed: 5 });
    }
}
