// File: src/config.rs
// Purpose: Configuration parsing from pagewire.toml

use anyhow::{Context, Result};
use pagewire_router::RouterOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::scroll::{Axis, EdgePolicy, ScrollOptions};

/// Id of the element shown while the wasm bundle loads
pub const DEFAULT_PRELOADER_ID: &str = "pagewire-preload-container";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PagewireConfig {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application shell settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Selector of the root node; empty mounts on `<body>`
    #[serde(default)]
    pub root_selector: String,

    /// Document title set at startup
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default = "default_preloader_id")]
    pub preloader_id: String,
}

/// Router settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// Treat `/about/` like `/about` (default: true)
    #[serde(default = "default_true")]
    pub skip_trailing_slash: bool,

    #[serde(default = "default_false")]
    pub case_insensitive: bool,

    /// Use the route name as document title (default: true)
    #[serde(default = "default_true")]
    pub name_to_title: bool,
}

/// Scrollable pages settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrollConfig {
    #[serde(default)]
    pub axis: Axis,

    #[serde(default = "default_class_prefix")]
    pub class_prefix: String,

    /// Wrap around at the first and last page instead of stopping
    #[serde(default = "default_false")]
    pub wrap: bool,

    /// Minimum wheel delta that turns a page
    #[serde(default = "default_wheel_threshold")]
    pub wheel_threshold: f64,

    #[serde(default = "default_wheel_debounce_ms")]
    pub wheel_debounce_ms: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `pagewire=debug`
    #[serde(default = "default_level")]
    pub level: String,
}

// Default values
fn default_preloader_id() -> String {
    DEFAULT_PRELOADER_ID.to_string()
}

fn default_class_prefix() -> String {
    crate::scroll::DEFAULT_CLASS_PREFIX.to_string()
}

fn default_wheel_threshold() -> f64 {
    crate::scroll::DEFAULT_WHEEL_THRESHOLD
}

fn default_wheel_debounce_ms() -> u64 {
    crate::scroll::DEFAULT_WHEEL_DEBOUNCE.as_millis() as u64
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

// Default implementations
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_selector: String::new(),
            title: None,
            preloader_id: default_preloader_id(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            skip_trailing_slash: true,
            case_insensitive: false,
            name_to_title: true,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            axis: Axis::default(),
            class_prefix: default_class_prefix(),
            wrap: false,
            wheel_threshold: default_wheel_threshold(),
            wheel_debounce_ms: default_wheel_debounce_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl From<&RouterConfig> for RouterOptions {
    fn from(config: &RouterConfig) -> Self {
        RouterOptions {
            skip_trailing_slash: config.skip_trailing_slash,
            case_insensitive: config.case_insensitive,
            name_to_title: config.name_to_title,
        }
    }
}

impl From<&ScrollConfig> for ScrollOptions {
    fn from(config: &ScrollConfig) -> Self {
        ScrollOptions {
            axis: config.axis,
            class_prefix: config.class_prefix.clone(),
            edge_policy: if config.wrap {
                EdgePolicy::Wrap
            } else {
                EdgePolicy::Clamp
            },
            wheel_threshold: config.wheel_threshold,
            wheel_debounce: Duration::from_millis(config.wheel_debounce_ms),
        }
    }
}

impl PagewireConfig {
    /// Parses configuration from TOML text; empty text gives the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        toml::from_str(content).context("Failed to parse pagewire configuration")
    }

    /// Load configuration from pagewire.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./pagewire.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("pagewire.toml")
    }

    pub fn router_options(&self) -> RouterOptions {
        RouterOptions::from(&self.router)
    }

    pub fn scroll_options(&self) -> ScrollOptions {
        ScrollOptions::from(&self.scroll)
    }
}
