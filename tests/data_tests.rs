use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonisyncrs::data::{
        fetch_weather, load_telemetry, load_weather_file, FlightSample, WeatherRequest,
    };
    use sonisyncrs::SonifyError;
    use std::path::Path;

    #[test]
    fn test_load_telemetry_file() {
        let file = temp_file(
            "time;metres;mph;heading\n\
             12:00:01;1000;30;270\n\
             12:00:02;1000;31;271\n\
             12:00:03;1200;31;272\n",
        );
        let samples = load_telemetry(file.path()).unwrap();
        assert_eq!(
            samples,
            vec![
                FlightSample {
                    altitude: 1000,
                    speed: 30
                },
                FlightSample {
                    altitude: 1000,
                    speed: 31
                },
                FlightSample {
                    altitude: 1200,
                    speed: 31
                },
            ]
        );
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let file = temp_file("mph;metres\n12;3400\n");
        let samples = load_telemetry(file.path()).unwrap();
        assert_eq!(
            samples,
            vec![FlightSample {
                altitude: 3400,
                speed: 12
            }]
        );
    }

    #[test]
    fn test_short_rows_read_as_zero() {
        let file = temp_file("metres;mph\n500\n;\n");
        let samples = load_telemetry(file.path()).unwrap();
        assert_eq!(
            samples,
            vec![
                FlightSample {
                    altitude: 500,
                    speed: 0
                },
                FlightSample::default(),
            ]
        );
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = temp_file("metres;mph\n");
        assert!(matches!(
            load_telemetry(file.path()),
            Err(SonifyError::EmptyTelemetry(_))
        ));
    }

    #[test]
    fn test_missing_telemetry_file() {
        let result = load_telemetry(Path::new("/nonexistent/flight.csv"));
        match result {
            Err(err @ SonifyError::TelemetryRead { .. }) => {
                assert!(err.to_string().contains("/nonexistent/flight.csv"));
            }
            other => panic!("expected a read error, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_load_weather_file() {
        let file = temp_file(
            r#"{
                "current": {"temp": 21.4},
                "hourly": [{"temp": 21.0}, {"temp": 19.5}, {"temp": 18.25}],
                "daily": [{"temp": {"day": 22.0}}, {"temp": {"day": 17.0}}]
            }"#,
        );
        let sample = load_weather_file(file.path()).unwrap();
        assert_eq!(sample.current, 21.4);
        assert_eq!(sample.hourly.len(), 3);
        assert_eq!(sample.daily, vec![22.0, 17.0]);
    }

    #[test]
    fn test_weather_file_without_series() {
        let file = temp_file(r#"{"current": {"temp": 5.0}}"#);
        let sample = load_weather_file(file.path()).unwrap();
        assert!(sample.hourly.is_empty());
        assert!(sample.daily.is_empty());
    }

    #[test]
    fn test_weather_file_errors() {
        assert!(matches!(
            load_weather_file(Path::new("/nonexistent/weather.json")),
            Err(SonifyError::WeatherFile { .. })
        ));

        let file = temp_file("not json");
        assert!(matches!(
            load_weather_file(file.path()),
            Err(SonifyError::WeatherDecode(_))
        ));
    }

    #[test]
    fn test_unreachable_weather_service_is_an_error() {
        // Nothing listens on port 1, so the connection is refused
        let request = WeatherRequest {
            url: "http://127.0.0.1:1/onecall".to_string(),
            api_key: "secret".to_string(),
            latitude: 59.43,
            longitude: 24.75,
        };
        let result = fetch_weather(&request);
        assert!(
            matches!(result, Err(SonifyError::WeatherFetch(_))),
            "expected a fetch error, got {:?}",
            result.map(|sample| sample.current)
        );
    }
}
