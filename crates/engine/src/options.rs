//! Runtime options consumed by the engine.

use std::time::Duration;

use crate::store::MAX_CAPACITY;

/// How a chosen value reaches the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delivery {
	/// Answer the deferred request directly.
	#[default]
	Direct,
	/// Refuse the deferred request and provoke a fresh one with a synthetic middle-click.
	Relay,
}

/// Engine behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
	/// Long-lived mode: keeps running with an empty list and captures on ownership loss.
	pub daemon: bool,
	/// Another daemon instance was running at startup.
	pub daemon_present: bool,
	pub capacity: usize,
	/// Requests this close to the last served answer replay it.
	pub short_window: Duration,
	/// Maximum age the recorded "last served" time may lag behind now.
	pub clock_ceiling: Duration,
	pub delivery: Delivery,
	/// How long an armed relay waits for the fresh request.
	pub relay_timeout: Duration,
	/// Up/Down finalize the choice instead of only moving the highlight.
	pub finalize_on_move: bool,
	/// Flash stays visible this long after it is painted.
	pub flash_hold: Duration,
	/// Flash closes this long after being shown, painted or not.
	pub flash_fallback: Duration,
	/// Label/value separator for candidates.
	pub separator: Option<char>,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			daemon: false,
			daemon_present: false,
			capacity: MAX_CAPACITY,
			short_window: Duration::from_millis(50),
			clock_ceiling: Duration::from_secs(2),
			delivery: Delivery::Direct,
			relay_timeout: Duration::from_secs(1),
			finalize_on_move: false,
			flash_hold: Duration::from_millis(500),
			flash_fallback: Duration::from_millis(1000),
			separator: None,
		}
	}
}
