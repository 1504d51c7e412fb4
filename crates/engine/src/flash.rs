use std::time::{Duration, Instant};

/// Visibility of the confirmation popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashState {
	#[default]
	Hidden,
	Shown {
		since: Instant,
		painted: Option<Instant>,
	},
}

/// Two-state popup independent of the chooser.
///
/// Closing is driven by the paint: the popup stays up for `hold` after it was
/// drawn. `fallback` closes it anyway if the paint signal never arrives.
#[derive(Debug, Clone)]
pub struct Flash {
	state: FlashState,
	hold: Duration,
	fallback: Duration,
}

impl Flash {
	pub fn new(hold: Duration, fallback: Duration) -> Self {
		Self {
			state: FlashState::Hidden,
			hold,
			fallback,
		}
	}

	pub fn state(&self) -> FlashState {
		self.state
	}

	pub fn is_shown(&self) -> bool {
		matches!(self.state, FlashState::Shown { .. })
	}

	/// Marks the popup shown; a re-show restarts both timers.
	pub fn show(&mut self, now: Instant) {
		self.state = FlashState::Shown { since: now, painted: None };
	}

	/// Records a completed paint. Returns false when hidden.
	pub fn painted(&mut self, now: Instant) -> bool {
		match &mut self.state {
			FlashState::Shown { painted, .. } => {
				painted.get_or_insert(now);
				true
			}
			FlashState::Hidden => false,
		}
	}

	/// When the popup must close.
	pub fn deadline(&self) -> Option<Instant> {
		match self.state {
			FlashState::Hidden => None,
			FlashState::Shown { since, painted } => Some(painted.map_or(since + self.fallback, |at| at + self.hold)),
		}
	}

	/// Returns true if the popup is shown and past its deadline.
	pub fn expired(&self, now: Instant) -> bool {
		self.deadline().is_some_and(|deadline| now >= deadline)
	}

	pub fn hide(&mut self) {
		self.state = FlashState::Hidden;
	}
}
