use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use url::Url;

const BASE_CONFIGURATION_FILE: &str = "configuration/base.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub listing: ListingSettings,
    pub timeouts: TimeoutSettings,
    pub pacing: PacingSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    /// Used for both http and ssl traffic when set.
    pub proxy: Option<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_ms: u64,
}

impl BrowserSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingSettings {
    pub start_url: Url,
    pub region: RegionSettings,
    pub selectors: SelectorSettings,
    /// Substring of the next control's class attribute that marks it disabled.
    pub disabled_marker: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionSettings {
    /// Text whose presence in the page source means the country picker is up.
    pub interstitial_marker: String,
    pub selector: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSettings {
    pub item: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub next_page: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeoutSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub region_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub load_secs: u64,
}

impl TimeoutSettings {
    pub fn region(&self) -> Duration {
        Duration::from_secs(self.region_secs)
    }

    pub fn load(&self) -> Duration {
        Duration::from_secs(self.load_secs)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PacingSettings {
    pub page_load: DelayRange,
    pub region_settle: DelayRange,
    pub between_pages: DelayRange,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DelayRange {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub min_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub path: PathBuf,
    pub debug_dir: PathBuf,
}

/// Reads `configuration/base.yaml` relative to the working directory, then
/// applies `APP_` environment overrides, e.g. `APP_BROWSER__WEBDRIVER_URL`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    load_configuration("APP")
}

fn load_configuration(env_prefix: &str) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(
            BASE_CONFIGURATION_FILE,
            config::FileFormat::Yaml,
        ))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

impl Settings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?
            .try_deserialize::<Settings>()
    }
}
