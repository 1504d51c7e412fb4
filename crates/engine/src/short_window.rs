//! Short-time window deduplicating rapid repeated requests.
//!
//! Some requesters ask twice in a row for no reason, others re-ask with a
//! different target right after a refusal. A request arriving within the window
//! of the last answer served to the same requestor gets that answer again
//! instead of reopening the chooser.

use std::time::{Duration, Instant};

use crate::protocol::{Outcome, WindowId};

#[derive(Debug, Clone)]
struct Served {
	requestor: WindowId,
	at: Instant,
	outcome: Outcome,
}

/// Last served outcome per requestor.
#[derive(Debug, Clone)]
pub struct ShortTimeWindow {
	interval: Duration,
	ceiling: Duration,
	served: Vec<Served>,
}

impl ShortTimeWindow {
	/// Creates a window; `ceiling` bounds how far a recorded time may lag behind now.
	pub fn new(interval: Duration, ceiling: Duration) -> Self {
		Self {
			interval,
			ceiling: ceiling.max(interval),
			served: Vec::new(),
		}
	}

	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Records that `outcome` was served to `requestor` at `at`.
	pub fn record(&mut self, requestor: WindowId, at: Instant, outcome: Outcome) {
		self.prune(at);
		match self.served.iter_mut().find(|s| s.requestor == requestor) {
			Some(entry) => {
				entry.at = at;
				entry.outcome = outcome;
			}
			None => self.served.push(Served { requestor, at, outcome }),
		}
	}

	/// Returns the outcome to replay if `requestor` was served within the window.
	///
	/// A replay refreshes the entry, so a burst of repeated asks keeps matching.
	pub fn replay(&mut self, requestor: WindowId, now: Instant) -> Option<Outcome> {
		self.prune(now);
		let entry = self.served.iter_mut().find(|s| s.requestor == requestor)?;
		let elapsed = now.saturating_duration_since(entry.at);
		if elapsed > self.interval {
			return None;
		}
		entry.at = now.max(entry.at);
		Some(entry.outcome.clone())
	}

	/// Clamps recorded times to `now - ceiling` and forgets entries at the ceiling.
	pub fn prune(&mut self, now: Instant) {
		let ceiling = self.ceiling;
		if let Some(floor) = now.checked_sub(ceiling) {
			for entry in &mut self.served {
				if entry.at < floor {
					entry.at = floor;
				}
			}
		}
		self.served.retain(|s| now.saturating_duration_since(s.at) < ceiling);
	}

	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.served.len()
	}
}
