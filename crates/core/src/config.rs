//! Viewer configuration.
//!
//! Settings can be created programmatically, read from `PAGEMARK_*`
//! environment variables, or loaded from a flat `key = value` file.

use doc_model::{Color, DEFAULT_MAX_HISTORY};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use viewer_core::DEFAULT_PRELOAD_MARGIN;

/// Tunables of the interactive viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// On-screen width of every page, in content pixels
    pub page_width: f32,
    /// Vertical space between consecutive pages, in content pixels
    pub page_gap: f32,
    /// Pages kept loaded on each side of the visible range
    pub preload_margin: usize,
    /// Quiet period after the last scroll before pages are loaded/released
    pub scroll_debounce: Duration,
    /// Number of retained undo states
    pub history_max_size: usize,
    /// Fill of new rectangle annotations
    pub fill_color: Color,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_width: 800.0,
            page_gap: 0.0,
            preload_margin: DEFAULT_PRELOAD_MARGIN,
            scroll_debounce: Duration::from_millis(150),
            history_max_size: DEFAULT_MAX_HISTORY,
            fill_color: Color::SELECTION_GRAY,
        }
    }
}

impl ViewerConfig {
    pub fn with_page_width(mut self, width: f32) -> Self {
        self.page_width = width;
        self
    }

    pub fn with_page_gap(mut self, gap: f32) -> Self {
        self.page_gap = gap;
        self
    }

    pub fn with_preload_margin(mut self, pages: usize) -> Self {
        self.preload_margin = pages;
        self
    }

    pub fn with_scroll_debounce(mut self, delay: Duration) -> Self {
        self.scroll_debounce = delay;
        self
    }

    pub fn with_history_max_size(mut self, states: usize) -> Self {
        self.history_max_size = states;
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = color;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PAGEMARK_PAGE_WIDTH`: page width in pixels (default: 800)
    /// - `PAGEMARK_PAGE_GAP`: gap between pages in pixels (default: 0)
    /// - `PAGEMARK_PRELOAD_MARGIN`: pages preloaded around the view (default: 1)
    /// - `PAGEMARK_SCROLL_DEBOUNCE_MS`: scroll debounce in ms (default: 150)
    /// - `PAGEMARK_HISTORY_MAX_SIZE`: retained undo states (default: 100)
    /// - `PAGEMARK_FILL_COLOR`: rectangle fill as `#rrggbb` (default: #cccccc)
    ///
    /// # Errors
    /// Returns an error if a variable holds an unparsable or invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (var, key) in [
            ("PAGEMARK_PAGE_WIDTH", "page_width"),
            ("PAGEMARK_PAGE_GAP", "page_gap"),
            ("PAGEMARK_PRELOAD_MARGIN", "preload_margin"),
            ("PAGEMARK_SCROLL_DEBOUNCE_MS", "scroll_debounce_ms"),
            ("PAGEMARK_HISTORY_MAX_SIZE", "history_max_size"),
            ("PAGEMARK_FILL_COLOR", "fill_color"),
        ] {
            if let Ok(value) = std::env::var(var) {
                config
                    .set(key, value.trim())
                    .map_err(|_| ConfigError::InvalidValue(var.to_string()))?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file.
    ///
    /// Expected file format:
    /// ```toml
    /// page_width = 800
    /// page_gap = 0
    /// preload_margin = 1
    /// scroll_debounce_ms = 150
    /// history_max_size = 100
    /// fill_color = "#cccccc"
    /// ```
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or holds an invalid value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in toml_str.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                config.set(key.trim(), value.trim().trim_matches('"'))?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration in the format read by [`ViewerConfig::from_file`].
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path.as_ref(), self.to_toml())?;
        Ok(())
    }

    fn to_toml(&self) -> String {
        format!(
            "# Pagemark viewer configuration\n\
             page_width = {}\n\
             page_gap = {}\n\
             preload_margin = {}\n\
             scroll_debounce_ms = {}\n\
             history_max_size = {}\n\
             fill_color = \"{}\"\n",
            self.page_width,
            self.page_gap,
            self.preload_margin,
            self.scroll_debounce.as_millis(),
            self.history_max_size,
            self.fill_color.to_hex(),
        )
    }

    /// Checks values that would break layout or history.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.page_width.is_finite() && self.page_width > 0.0) {
            return Err(ConfigError::InvalidValue("page_width".to_string()));
        }
        if !(self.page_gap.is_finite() && self.page_gap >= 0.0) {
            return Err(ConfigError::InvalidValue("page_gap".to_string()));
        }
        if self.history_max_size == 0 {
            return Err(ConfigError::InvalidValue("history_max_size".to_string()));
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "page_width" => self.page_width = parse(key, value)?,
            "page_gap" => self.page_gap = parse(key, value)?,
            "preload_margin" => self.preload_margin = parse(key, value)?,
            "scroll_debounce_ms" => self.scroll_debounce = Duration::from_millis(parse(key, value)?),
            "history_max_size" => self.history_max_size = parse(key, value)?,
            "fill_color" => self.fill_color = parse(key, value)?,
            _ => {} // Ignore unknown keys
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue(key.to_string()))
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for configuration key: {0}")]
    InvalidValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
