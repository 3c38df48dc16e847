use serde::Deserialize;
use thiserror::Error;

mod cities;
mod http;
mod poller;

pub use cities::{city_query, CITY_PRESETS, DEFAULT_CITY};
pub use http::HttpWeatherClient;
pub use poller::{PollTrigger, WeatherPoller, DEFAULT_REFRESH_INTERVAL};

pub const CURRENT_ENDPOINT: &str = "/api/weather/current";
pub const FORECAST_ENDPOINT: &str = "/api/weather/forecast";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request to {endpoint} failed")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("unexpected reply from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{message}")]
    Server { message: String },
    #[error("weather fetch worker panicked")]
    WorkerPanicked,
}

pub type WeatherResult<T> = std::result::Result<T, WeatherError>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    pub description: String,
    pub icon: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: i64,
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_direction: Option<f64>,
    pub pressure: i64,
    pub visibility: f64,
    pub datetime: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub day: String,
    pub icon: String,
    pub description: String,
    pub temperature: f64,
}

/// Both halves of one refresh. Never built from a partial fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// Weekday labels for forecast cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNames {
    #[default]
    En,
    Ja,
}

impl DayNames {
    pub fn label(self, day: &str) -> &str {
        match self {
            Self::En => day,
            Self::Ja => match day {
                "Mon" => "月",
                "Tue" => "火",
                "Wed" => "水",
                "Thu" => "木",
                "Fri" => "金",
                "Sat" => "土",
                "Sun" => "日",
                other => other,
            },
        }
    }
}

pub trait WeatherApi: Sync {
    fn fetch_current(&self, city: &str) -> WeatherResult<CurrentWeather>;
    fn fetch_forecast(&self, city: &str) -> WeatherResult<Vec<ForecastDay>>;
}

/// Where a refresh lands. Implemented by front ends.
pub trait WeatherDisplay {
    fn show_loading(&mut self, city: &str);
    fn show_current(&mut self, current: &CurrentWeather);
    fn show_forecast(&mut self, forecast: &[ForecastDay]);
    fn show_error(&mut self, message: &str);
}

/// Fetches current conditions and the forecast concurrently. Either failure
/// fails the whole report.
pub fn fetch_report<A: WeatherApi + ?Sized>(api: &A, city: &str) -> WeatherResult<WeatherReport> {
    let (current, forecast) = std::thread::scope(|scope| {
        let forecast = scope.spawn(|| api.fetch_forecast(city));
        let current = api.fetch_current(city);
        (current, forecast.join())
    });
    let forecast = forecast.map_err(|_| WeatherError::WorkerPanicked)?;

    Ok(WeatherReport {
        current: current?,
        forecast: forecast?,
    })
}

/// One dashboard refresh: loading, then either both cards or the error.
pub fn refresh<A, D>(api: &A, display: &mut D, city: &str) -> WeatherResult<WeatherReport>
where
    A: WeatherApi + ?Sized,
    D: WeatherDisplay + ?Sized,
{
    display.show_loading(city);
    match fetch_report(api, city) {
        Ok(report) => {
            tracing::info!(
                city,
                forecast_days = report.forecast.len(),
                "weather refreshed"
            );
            display.show_current(&report.current);
            display.show_forecast(&report.forecast);
            Ok(report)
        }
        Err(err) => {
            tracing::warn!(city, %err, "weather refresh failed");
            display.show_error(&err.to_string());
            Err(err)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    pub(crate) fn sample_current(city: &str) -> CurrentWeather {
        CurrentWeather {
            city: city.to_string(),
            country: Some("JP".to_string()),
            description: "clear sky".to_string(),
            icon: "01d".to_string(),
            temperature: 21.0,
            feels_like: 20.0,
            humidity: 40,
            wind_speed: 3.6,
            wind_direction: Some(90.0),
            pressure: 1013,
            visibility: 10.0,
            datetime: "2026-10-19 09:00".to_string(),
        }
    }

    pub(crate) fn sample_forecast() -> Vec<ForecastDay> {
        vec![ForecastDay {
            date: "10/19".to_string(),
            day: "Mon".to_string(),
            icon: "02d".to_string(),
            description: "few clouds".to_string(),
            temperature: 19.0,
        }]
    }

    #[derive(Default)]
    pub(crate) struct FakeWeatherApi {
        pub(crate) fail_current: bool,
        pub(crate) fail_forecast: bool,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl FakeWeatherApi {
        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl WeatherApi for FakeWeatherApi {
        fn fetch_current(&self, city: &str) -> WeatherResult<CurrentWeather> {
            self.calls.lock().unwrap().push(format!("current:{city}"));
            if self.fail_current {
                return Err(WeatherError::Server {
                    message: "current unavailable".to_string(),
                });
            }
            Ok(sample_current(city))
        }

        fn fetch_forecast(&self, city: &str) -> WeatherResult<Vec<ForecastDay>> {
            self.calls.lock().unwrap().push(format!("forecast:{city}"));
            if self.fail_forecast {
                return Err(WeatherError::Status {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                });
            }
            Ok(sample_forecast())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingDisplay {
        pub(crate) events: Vec<String>,
    }

    impl WeatherDisplay for RecordingDisplay {
        fn show_loading(&mut self, city: &str) {
            self.events.push(format!("loading:{city}"));
        }

        fn show_current(&mut self, current: &CurrentWeather) {
            self.events.push(format!("current:{}", current.city));
        }

        fn show_forecast(&mut self, forecast: &[ForecastDay]) {
            self.events.push(format!("forecast:{}", forecast.len()));
        }

        fn show_error(&mut self, message: &str) {
            self.events.push(format!("error:{message}"));
        }
    }
}
