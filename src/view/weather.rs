use std::io::Write;

use crate::weather::{CurrentWeather, DayNames, ForecastDay, WeatherDisplay};

const ICON_URL_PREFIX: &str = "http://openweathermap.org/img/wn/";

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_URL_PREFIX}{icon}@2x.png")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    pub city: String,
    pub description: String,
    pub icon_url: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub visibility: String,
    pub updated: String,
}

impl From<&CurrentWeather> for CurrentCard {
    fn from(current: &CurrentWeather) -> Self {
        Self {
            city: current.city.clone(),
            description: current.description.clone(),
            icon_url: icon_url(&current.icon),
            temperature: format!("{}°C", current.temperature),
            feels_like: format!("{}°C", current.feels_like),
            humidity: format!("{}%", current.humidity),
            wind_speed: format!("{} m/s", current.wind_speed),
            pressure: format!("{} hPa", current.pressure),
            visibility: format!("{} km", current.visibility),
            updated: current.datetime.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub date: String,
    pub day: String,
    pub icon_url: String,
    pub temperature: String,
    pub description: String,
}

impl ForecastCard {
    pub fn new(day: &ForecastDay, day_names: DayNames) -> Self {
        Self {
            date: day.date.clone(),
            day: day_names.label(&day.day).to_string(),
            icon_url: icon_url(&day.icon),
            temperature: format!("{}°C", day.temperature),
            description: day.description.clone(),
        }
    }
}

/// Writes dashboard updates as plain text lines.
pub struct TextWeatherDisplay<W> {
    out: W,
    day_names: DayNames,
}

impl<W: Write> TextWeatherDisplay<W> {
    pub fn new(out: W, day_names: DayNames) -> Self {
        Self { out, day_names }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}") {
            tracing::warn!(?err, "failed to write weather output");
        }
    }
}

impl<W: Write> WeatherDisplay for TextWeatherDisplay<W> {
    fn show_loading(&mut self, city: &str) {
        self.emit(&format!("Updating weather for {city}..."));
    }

    fn show_current(&mut self, current: &CurrentWeather) {
        let card = CurrentCard::from(current);
        self.emit(&format!(
            "{} | {} | {} (feels like {})\n  humidity {}  wind {}  pressure {}  visibility {}\n  updated {}",
            card.city,
            card.description,
            card.temperature,
            card.feels_like,
            card.humidity,
            card.wind_speed,
            card.pressure,
            card.visibility,
            card.updated,
        ));
    }

    fn show_forecast(&mut self, forecast: &[ForecastDay]) {
        for day in forecast {
            let card = ForecastCard::new(day, self.day_names);
            self.emit(&format!(
                "  {} {:<3} {:>6}  {}",
                card.date, card.day, card.temperature, card.description
            ));
        }
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("Weather unavailable: {message}"));
    }
}
