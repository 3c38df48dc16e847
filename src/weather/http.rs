use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    CurrentWeather, ForecastDay, WeatherApi, WeatherError, WeatherResult, CURRENT_ENDPOINT,
    FORECAST_ENDPOINT,
};

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    base_url: String,
    client: Client,
}

impl HttpWeatherClient {
    pub fn new(base_url: impl Into<String>) -> WeatherResult<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .build()
            .map_err(|source| WeatherError::Request {
                endpoint: base_url.clone(),
                source,
            })?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> WeatherResult<T> {
        let request_error = |source: reqwest::Error| WeatherError::Request {
            endpoint: endpoint.to_string(),
            source,
        };
        tracing::debug!(endpoint, city, "fetching weather");
        let response = self
            .client
            .get(format!("{}{endpoint}", self.base_url))
            .query(&[("city", city)])
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        let body = response.text().map_err(request_error)?;
        decode(endpoint, &body)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> WeatherResult<T> {
    let decode_error = |err: serde_json::Error| WeatherError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    };
    let value: Value = serde_json::from_str(body).map_err(decode_error)?;
    if let Some(message) = value.get("error").and_then(reported_error) {
        return Err(WeatherError::Server { message });
    }
    serde_json::from_value(value).map_err(decode_error)
}

/// Only a truthy `error` field fails the reply; `""`, `0`, `false` and
/// `null` are ignored.
fn reported_error(error: &Value) -> Option<String> {
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl WeatherApi for HttpWeatherClient {
    fn fetch_current(&self, city: &str) -> WeatherResult<CurrentWeather> {
        self.get(CURRENT_ENDPOINT, city)
    }

    fn fetch_forecast(&self, city: &str) -> WeatherResult<Vec<ForecastDay>> {
        self.get(FORECAST_ENDPOINT, city)
    }
}
