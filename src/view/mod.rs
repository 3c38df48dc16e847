//! Pure projections of state into what a front end draws.

mod session;
mod weather;

pub use session::{processing_message, SessionView};
pub use weather::{icon_url, CurrentCard, ForecastCard, TextWeatherDisplay};
