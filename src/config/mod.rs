use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::upload::{UploadPolicy, UploadProfile};
use crate::weather::{DayNames, DEFAULT_CITY, DEFAULT_REFRESH_INTERVAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "editdesk";
const APP_CONFIG_FILE: &str = "config.json";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Settings from `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server_url: Option<String>,
    #[serde(default)]
    pub upload_profile: Option<UploadProfile>,
    #[serde(default)]
    pub max_upload_bytes: Option<u64>,
    #[serde(default)]
    pub weather_city: Option<String>,
    #[serde(default)]
    pub weather_refresh_secs: Option<u64>,
    #[serde(default)]
    pub day_names: Option<DayNames>,
}

impl AppConfig {
    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        let policy = UploadPolicy::for_profile(self.upload_profile.unwrap_or_default());
        match self.max_upload_bytes {
            Some(max_bytes) => policy.with_max_bytes(max_bytes),
            None => policy,
        }
    }

    pub fn weather_city(&self) -> &str {
        self.weather_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn weather_refresh_interval(&self) -> Duration {
        self.weather_refresh_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_REFRESH_INTERVAL, Duration::from_secs)
    }

    pub fn day_names(&self) -> DayNames {
        self.day_names.unwrap_or_default()
    }
}

pub fn load_app_config() -> AppConfig {
    let xdg_config_home = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from);
    let home = std::env::var_os("HOME").map(PathBuf::from);
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    config_file_path(xdg_config_home, home)
        .ok()
        .filter(|path| path.is_file())
        .and_then(|path| read_app_config(&path))
        .unwrap_or_default()
}

/// `None` (with a warning) when the file cannot be read or parsed.
fn read_app_config(path: &Path) -> Option<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .inspect_err(|err| {
            tracing::warn!(?err, path = %path.display(), "failed to read config; using defaults");
        })
        .ok()?;
    serde_json::from_str(&contents)
        .inspect_err(|err| {
            tracing::warn!(?err, path = %path.display(), "failed to parse config; using defaults");
        })
        .ok()
}

/// `$XDG_CONFIG_HOME/editdesk/config.json`, else `$HOME/.config/editdesk/config.json`.
fn config_file_path(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let root = match xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        Some(xdg) => xdg.to_path_buf(),
        None => home
            .ok_or(ConfigPathError::MissingHomeDirectory)?
            .join(".config"),
    };
    Ok(root.join(APP_DIR).join(APP_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{CandidateFile, MAX_UPLOAD_BYTES};

    #[test]
    fn config_file_lives_under_xdg_config_home_when_set() {
        let path = config_file_path(
            Some(Path::new("/srv/xdg")),
            Some(Path::new("/home/photographer")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/srv/xdg/editdesk/config.json"));
    }

    #[test]
    fn empty_xdg_config_home_falls_back_to_home() {
        let path = config_file_path(Some(Path::new("")), Some(Path::new("/home/photographer")))
            .expect("path should resolve");

        assert_eq!(
            path,
            PathBuf::from("/home/photographer/.config/editdesk/config.json")
        );
    }

    #[test]
    fn config_file_path_needs_some_root() {
        assert_eq!(
            config_file_path(None, None).unwrap_err(),
            ConfigPathError::MissingHomeDirectory
        );
    }

    #[test]
    fn config_directory_named_like_the_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(APP_DIR).join(APP_CONFIG_FILE)).unwrap();

        let config = load_app_config_with(Some(dir.path()), None);
        assert!(config.server_url.is_none());
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_app_config_with(Some(dir.path()), None);

        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.weather_city(), DEFAULT_CITY);
        assert_eq!(config.weather_refresh_interval(), DEFAULT_REFRESH_INTERVAL);
        assert_eq!(config.upload_policy().max_bytes(), MAX_UPLOAD_BYTES);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join(APP_DIR);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(
            app_dir.join(APP_CONFIG_FILE),
            r#"{"server_url":"http://photos.local:8080","upload_profile":"gallery",
                "weather_city":"Sendai,JP","weather_refresh_secs":60,"day_names":"ja"}"#,
        )
        .unwrap();

        let config = load_app_config_with(Some(dir.path()), None);
        assert_eq!(config.server_url(), "http://photos.local:8080");
        assert_eq!(config.weather_city(), "Sendai,JP");
        assert_eq!(config.weather_refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.day_names(), DayNames::Ja);

        let webp = CandidateFile::new("/tmp/a.webp", 10, "image/webp");
        assert!(config.upload_policy().validate(&webp).is_err());
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join(APP_DIR);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join(APP_CONFIG_FILE), "{ not json").unwrap();

        let config = load_app_config_with(Some(dir.path()), None);
        assert!(config.server_url.is_none());
    }
}
