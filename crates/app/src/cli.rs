use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use multisel_engine::{Delivery, Hotkey};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "multisel")]
#[command(about = "Offer several strings for the next middle-click paste")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Strings to offer (`-` reads one per line from stdin)
	pub seeds: Vec<String>,

	/// Keep running with an empty list and capture selections made elsewhere
	#[arg(short, long)]
	pub daemon: bool,

	/// Split each string into `label<SEP>value`
	#[arg(short = 't', long, value_name = "SEP")]
	pub separator: Option<char>,

	/// How a choice reaches the pasting client
	#[arg(long, value_enum)]
	pub delivery: Option<DeliveryMode>,

	/// Hotkey adding the current selection to the list (e.g. `ctrl+shift+z`)
	#[arg(long, value_name = "KEY")]
	pub capture_key: Option<Hotkey>,

	/// Hotkey opening the chooser without a paste (e.g. `F9`)
	#[arg(long, value_name = "KEY")]
	pub open_key: Option<Hotkey>,

	/// Program asked whether a window accepts a relayed paste
	#[arg(long, value_name = "PATH")]
	pub delegate: Option<PathBuf>,

	/// Configuration file (defaults to `$XDG_CONFIG_HOME/multisel/config.toml`)
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Increase log verbosity (`-v` debug, `-vv` trace)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

/// Delivery mode as written on the command line and in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
	/// Answer the waiting request directly
	#[default]
	Direct,
	/// Refuse it and re-trigger the paste with a synthetic middle-click
	Relay,
}

impl From<DeliveryMode> for Delivery {
	fn from(mode: DeliveryMode) -> Self {
		match mode {
			DeliveryMode::Direct => Self::Direct,
			DeliveryMode::Relay => Self::Relay,
		}
	}
}
