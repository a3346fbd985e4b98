use crate::error::{Result, SonifyError};
use log::{error, info};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Temperatures used by the weather run, in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub current: f64,
    pub hourly: Vec<f64>,
    pub daily: Vec<f64>,
}

#[derive(Deserialize)]
struct OneCallResponse {
    current: CurrentConditions,
    #[serde(default)]
    hourly: Vec<HourlyConditions>,
    #[serde(default)]
    daily: Vec<DailyConditions>,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temp: f64,
}

#[derive(Deserialize)]
struct HourlyConditions {
    temp: f64,
}

#[derive(Deserialize)]
struct DailyConditions {
    temp: DailyTemperature,
}

#[derive(Deserialize)]
struct DailyTemperature {
    day: f64,
}

impl From<OneCallResponse> for WeatherSample {
    fn from(response: OneCallResponse) -> Self {
        WeatherSample {
            current: response.current.temp,
            hourly: response.hourly.into_iter().map(|h| h.temp).collect(),
            daily: response.daily.into_iter().map(|d| d.temp.day).collect(),
        }
    }
}

/// Decodes a One Call response body.
pub fn parse_weather(body: &str) -> Result<WeatherSample> {
    serde_json::from_str::<OneCallResponse>(body)
        .map(WeatherSample::from)
        .map_err(|e| SonifyError::WeatherDecode(e.to_string()))
}

pub fn load_weather_file(path: &Path) -> Result<WeatherSample> {
    info!("Loading weather sample from {}", path.display());
    let body = fs::read_to_string(path).map_err(|source| SonifyError::WeatherFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_weather(&body)
}

/// Everything needed to ask the weather service for a forecast.
#[derive(Debug, Clone)]
pub struct WeatherRequest {
    pub url: String,
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fetches the forecast. Any transport, status or decoding problem is an error.
pub fn fetch_weather(request: &WeatherRequest) -> Result<WeatherSample> {
    info!(
        "Fetching weather for lat={} lon={} from {}",
        request.latitude, request.longitude, request.url
    );

    let response = ureq::get(&request.url)
        .query("lat", &request.latitude.to_string())
        .query("lon", &request.longitude.to_string())
        .query("appid", &request.api_key)
        .query("units", "metric")
        .call()
        .map_err(|e| {
            error!("Weather request failed: {}", e);
            SonifyError::WeatherFetch(Box::new(e))
        })?;

    let body = response.into_string().map_err(|e| {
        error!("Weather response unreadable: {}", e);
        SonifyError::WeatherDecode(e.to_string())
    })?;

    let sample = parse_weather(&body)?;
    info!(
        "Weather received: current {}°C, {} hourly, {} daily",
        sample.current,
        sample.hourly.len(),
        sample.daily.len()
    );
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_one_call_body() {
        let body = r#"{
            "lat": 59.43, "lon": 24.75,
            "current": {"temp": -3.5, "humidity": 80},
            "hourly": [{"temp": -3.0}, {"temp": -2.25}],
            "daily": [{"temp": {"day": -1.0, "night": -6.0}}]
        }"#;
        let sample = parse_weather(body).unwrap();
        assert_eq!(sample.current, -3.5);
        assert_eq!(sample.hourly, vec![-3.0, -2.25]);
        assert_eq!(sample.daily, vec![-1.0]);
    }

    #[test]
    fn test_missing_current_temperature_is_an_error() {
        let body = r#"{"hourly": [{"temp": 1.0}]}"#;
        assert!(matches!(
            parse_weather(body),
            Err(SonifyError::WeatherDecode(_))
        ));
    }

    #[test]
    fn test_error_body_is_an_error() {
        let body = r#"{"cod": 401, "message": "Invalid API key"}"#;
        assert!(parse_weather(body).is_err());
    }
}
