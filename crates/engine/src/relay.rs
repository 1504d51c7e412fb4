//! Paste relay: delivering a choice through a synthetic middle-click.
//!
//! Some requesters only accept data that answers a request they issued in
//! reaction to real input. For those, the deferred request is refused, the
//! pointer is put back where the user clicked, and a middle-click provokes a
//! fresh request which the arbiter answers from the armed outcome. If no fresh
//! request arrives the value is simply not delivered.

use crate::error::Result;
use crate::options::Delivery;
use crate::protocol::{Outcome, Point, WindowId};
use crate::surface::Surface;

/// Decides whether a destination is an eligible paste target.
pub trait PasteDelegate {
	/// Dry-run check for delivering `value` to `destination` through a synthetic paste.
	fn is_eligible(&self, value: &str, destination: WindowId) -> bool;
}

/// Returns true if `outcome` should go through the relay instead of a direct answer.
pub fn should_relay(delivery: Delivery, outcome: &Outcome, pointer: Option<Point>, delegate: Option<&dyn PasteDelegate>, destination: WindowId) -> bool {
	if delivery != Delivery::Relay || pointer.is_none() {
		return false;
	}
	let Some(value) = outcome.value() else {
		return false;
	};
	delegate.is_none_or(|d| d.is_eligible(value, destination))
}

/// Click scheduled for after the chooser has unmapped.
#[derive(Debug, Default, Clone)]
pub struct Relay {
	click_at: Option<Point>,
}

impl Relay {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn schedule(&mut self, at: Point) {
		self.click_at = Some(at);
	}

	pub fn is_scheduled(&self) -> bool {
		self.click_at.is_some()
	}

	pub fn cancel(&mut self) {
		self.click_at = None;
	}

	/// Restores the pointer and clicks. Returns false if nothing was scheduled.
	pub fn fire<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<bool> {
		let Some(at) = self.click_at.take() else {
			return Ok(false);
		};
		surface.warp_pointer(at)?;
		surface.middle_click()?;
		tracing::debug!(x = at.x, y = at.y, "Relayed middle-click");
		Ok(true)
	}
}
