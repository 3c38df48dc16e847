use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{refresh, WeatherApi, WeatherDisplay};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTrigger {
    /// The dashboard was hidden or shown again. Showing refreshes.
    Visibility { hidden: bool },
    /// Switch city and refresh.
    City(String),
    RefreshNow,
    Shutdown,
}

/// Background refresh loop: once at start, then on every interval tick and
/// on triggers sent through [`WeatherPoller::sender`].
pub struct WeatherPoller<D> {
    tx: Sender<PollTrigger>,
    handle: JoinHandle<D>,
}

impl<D> WeatherPoller<D>
where
    D: WeatherDisplay + Send + 'static,
{
    pub fn spawn<A>(api: A, display: D, city: impl Into<String>, interval: Duration) -> Self
    where
        A: WeatherApi + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let city = city.into();
        let handle = thread::spawn(move || {
            let mut display = display;
            let mut city = city;
            refresh_logged(&api, &mut display, &city);
            // Fixed schedule: triggers never move the next tick.
            let mut next_tick = Instant::now() + interval;
            loop {
                let wait = next_tick.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Err(RecvTimeoutError::Timeout) => {
                        next_tick = advance_tick(next_tick, interval, Instant::now());
                    }
                    Ok(PollTrigger::RefreshNow) => {}
                    Ok(PollTrigger::Visibility { hidden: true }) => continue,
                    Ok(PollTrigger::Visibility { hidden: false }) => {}
                    Ok(PollTrigger::City(next)) => {
                        tracing::debug!(from = %city, to = %next, "weather city changed");
                        city = next;
                    }
                    Ok(PollTrigger::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                }
                refresh_logged(&api, &mut display, &city);
            }
            tracing::debug!("weather poller stopped");
            display
        });
        Self { tx, handle }
    }

    pub fn sender(&self) -> Sender<PollTrigger> {
        self.tx.clone()
    }

    /// Returns `false` once the loop has stopped.
    pub fn trigger(&self, trigger: PollTrigger) -> bool {
        self.tx.send(trigger).is_ok()
    }

    /// Stops the loop and hands back the display.
    pub fn shutdown(self) -> thread::Result<D> {
        let _ = self.tx.send(PollTrigger::Shutdown);
        self.handle.join()
    }
}

/// Next deadline after `tick` fired. Ticks missed while a refresh ran are
/// skipped rather than fired back to back.
fn advance_tick(tick: Instant, interval: Duration, now: Instant) -> Instant {
    let mut next = tick + interval;
    while next <= now && !interval.is_zero() {
        next += interval;
    }
    next
}

fn refresh_logged<A: WeatherApi, D: WeatherDisplay>(api: &A, display: &mut D, city: &str) {
    // Failures are already on the display; the next tick retries.
    let _ = refresh(api, display, city);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::testing::{FakeWeatherApi, RecordingDisplay};

    const NEVER: Duration = Duration::from_secs(60 * 60);

    fn loading_events(display: &RecordingDisplay) -> Vec<&str> {
        display
            .events
            .iter()
            .filter(|event| event.starts_with("loading:"))
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn refreshes_at_start_and_when_shown_again() {
        let poller = WeatherPoller::spawn(
            FakeWeatherApi::default(),
            RecordingDisplay::default(),
            "Tokyo,JP",
            NEVER,
        );
        assert!(poller.trigger(PollTrigger::Visibility { hidden: true }));
        assert!(poller.trigger(PollTrigger::Visibility { hidden: false }));

        let display = poller.shutdown().unwrap();
        assert_eq!(loading_events(&display), vec!["loading:Tokyo,JP"; 2]);
    }

    #[test]
    fn city_change_refreshes_with_new_city() {
        let poller = WeatherPoller::spawn(
            FakeWeatherApi::default(),
            RecordingDisplay::default(),
            "Tokyo,JP",
            NEVER,
        );
        poller.trigger(PollTrigger::City("Sapporo,JP".to_string()));
        poller.trigger(PollTrigger::RefreshNow);

        let display = poller.shutdown().unwrap();
        assert_eq!(
            loading_events(&display),
            vec!["loading:Tokyo,JP", "loading:Sapporo,JP", "loading:Sapporo,JP"]
        );
    }

    #[test]
    fn interval_tick_refreshes() {
        let poller = WeatherPoller::spawn(
            FakeWeatherApi::default(),
            RecordingDisplay::default(),
            "Tokyo,JP",
            Duration::from_millis(10),
        );
        thread::sleep(Duration::from_millis(200));

        let display = poller.shutdown().unwrap();
        assert!(loading_events(&display).len() >= 2);
    }

    #[test]
    fn hidden_triggers_do_not_delay_interval_ticks() {
        let poller = WeatherPoller::spawn(
            FakeWeatherApi::default(),
            RecordingDisplay::default(),
            "Tokyo,JP",
            Duration::from_millis(150),
        );
        for _ in 0..12 {
            poller.trigger(PollTrigger::Visibility { hidden: true });
            thread::sleep(Duration::from_millis(50));
        }

        let display = poller.shutdown().unwrap();
        // start + about four ticks in 600ms
        assert!(
            loading_events(&display).len() >= 3,
            "interval refreshes were skipped: {:?}",
            display.events
        );
    }

    #[test]
    fn advance_tick_skips_missed_deadlines() {
        let start = Instant::now();
        let interval = Duration::from_millis(100);

        assert_eq!(advance_tick(start, interval, start), start + interval);
        assert_eq!(
            advance_tick(start, interval, start + Duration::from_millis(250)),
            start + Duration::from_millis(300)
        );
    }

    #[test]
    fn failed_refresh_keeps_polling() {
        let api = FakeWeatherApi {
            fail_forecast: true,
            ..FakeWeatherApi::default()
        };
        let poller = WeatherPoller::spawn(api, RecordingDisplay::default(), "Tokyo,JP", NEVER);
        poller.trigger(PollTrigger::RefreshNow);

        let display = poller.shutdown().unwrap();
        let errors = display
            .events
            .iter()
            .filter(|event| event.starts_with("error:"))
            .count();
        assert_eq!(errors, 2);
    }
}
