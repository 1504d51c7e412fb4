//! Optional TOML configuration, overridden by command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use multisel_engine::hotkey::HotkeyError;
use multisel_engine::{Hotkey, HotkeyAction, MAX_CAPACITY, Options};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::{Cli, DeliveryMode};

/// Core font used when none is configured.
pub const DEFAULT_FONT: &str = "-*-*-medium-r-*-*-18-*-*-*-m-*-iso10646-1";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("invalid configuration: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid hotkey `{spec}`: {error}")]
	InvalidKey { spec: String, error: HotkeyError },

	#[error("invalid value for `{field}`: {reason}")]
	InvalidValue { field: &'static str, reason: String },
}

/// Hotkey bindings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Keys {
	pub capture: String,
	pub open: Option<String>,
}

impl Default for Keys {
	fn default() -> Self {
		Self {
			capture: "ctrl+shift+z".to_owned(),
			open: None,
		}
	}
}

/// Settings merged from the config file and the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub capacity: usize,
	pub short_window_ms: u64,
	pub clock_ceiling_ms: u64,
	pub delivery: DeliveryMode,
	pub relay_timeout_ms: u64,
	pub finalize_on_move: bool,
	pub flash_hold_ms: u64,
	pub flash_fallback_ms: u64,
	pub font: String,
	pub separator: Option<char>,
	pub delegate: Option<PathBuf>,
	pub keys: Keys,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			capacity: MAX_CAPACITY,
			short_window_ms: 50,
			clock_ceiling_ms: 2000,
			delivery: DeliveryMode::Direct,
			relay_timeout_ms: 1000,
			finalize_on_move: false,
			flash_hold_ms: 500,
			flash_fallback_ms: 1000,
			font: DEFAULT_FONT.to_owned(),
			separator: None,
			delegate: None,
			keys: Keys::default(),
		}
	}
}

impl Config {
	/// Default location of the config file.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("multisel").join("config.toml"))
	}

	/// Loads `explicit`, or the default file if it exists, or the defaults.
	pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		let path = match explicit {
			Some(path) => path.to_owned(),
			None => match Self::default_path().filter(|p| p.is_file()) {
				Some(path) => path,
				None => {
					tracing::debug!("No configuration file; using defaults");
					return Ok(Self::default());
				}
			},
		};
		let text = std::fs::read_to_string(&path).map_err(|error| ConfigError::Io { path: path.clone(), error })?;
		let config = Self::parse(&text)?;
		tracing::debug!(path = %path.display(), "Loaded configuration");
		Ok(config)
	}

	/// Parses and validates TOML text.
	pub fn parse(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if !(1..=MAX_CAPACITY).contains(&self.capacity) {
			return Err(ConfigError::InvalidValue {
				field: "capacity",
				reason: format!("must be between 1 and {MAX_CAPACITY}"),
			});
		}
		if self.short_window_ms > self.clock_ceiling_ms {
			return Err(ConfigError::InvalidValue {
				field: "short_window_ms",
				reason: "must not exceed clock_ceiling_ms".to_owned(),
			});
		}
		self.hotkeys().map(drop)
	}

	/// Applies command-line overrides.
	pub fn merge_cli(&mut self, cli: &Cli) {
		if let Some(separator) = cli.separator {
			self.separator = Some(separator);
		}
		if let Some(delivery) = cli.delivery {
			self.delivery = delivery;
		}
		if let Some(delegate) = &cli.delegate {
			self.delegate = Some(delegate.clone());
		}
		if let Some(capture) = cli.capture_key {
			self.keys.capture = capture.to_string();
		}
		if let Some(open) = cli.open_key {
			self.keys.open = Some(open.to_string());
		}
	}

	/// Parsed hotkey bindings.
	pub fn hotkeys(&self) -> Result<Vec<(Hotkey, HotkeyAction)>, ConfigError> {
		let parse = |spec: &str| Hotkey::parse(spec).map_err(|error| ConfigError::InvalidKey { spec: spec.to_owned(), error });
		let mut hotkeys = vec![(parse(&self.keys.capture)?, HotkeyAction::Capture)];
		if let Some(open) = &self.keys.open {
			hotkeys.push((parse(open)?, HotkeyAction::Open));
		}
		Ok(hotkeys)
	}

	/// Engine options for this run.
	pub fn options(&self, daemon: bool, daemon_present: bool) -> Options {
		Options {
			daemon,
			daemon_present,
			capacity: self.capacity,
			short_window: Duration::from_millis(self.short_window_ms),
			clock_ceiling: Duration::from_millis(self.clock_ceiling_ms),
			delivery: self.delivery.into(),
			relay_timeout: Duration::from_millis(self.relay_timeout_ms),
			finalize_on_move: self.finalize_on_move,
			flash_hold: Duration::from_millis(self.flash_hold_ms),
			flash_fallback: Duration::from_millis(self.flash_fallback_ms),
			separator: self.separator,
		}
	}
}
