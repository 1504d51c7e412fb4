use std::time::Instant;

use super::Mediator;
use crate::arbiter::RefuseReason;
use crate::error::{Error, Result};
use crate::interaction::InteractionState;
use crate::store::Candidate;
use crate::surface::{ChooserView, Surface};

impl<S: Surface> Mediator<S> {
	/// Asks the current selection holder for its text.
	pub(super) fn capture(&mut self) -> Result<()> {
		if self.store.is_full() {
			tracing::info!(capacity = self.store.capacity(), "Candidate list full; capture skipped");
			return Ok(());
		}
		let target = self.surface.atoms().utf8_string;
		self.surface.request_conversion(target)?;
		Ok(())
	}

	/// Appends captured text, reclaims the selection and flashes the list.
	pub(super) fn on_captured(&mut self, text: Option<String>, now: Instant) -> Result<()> {
		let Some(text) = text.filter(|t| !t.is_empty()) else {
			tracing::debug!("Capture yielded no text");
			return Ok(());
		};

		match self.store.append(Candidate::new(text)) {
			Ok(()) => tracing::info!(count = self.store.len(), "Captured candidate"),
			Err(Error::CapacityExceeded { capacity }) => {
				tracing::info!(capacity, "Candidate list full; captured text dropped");
				return Ok(());
			}
			Err(err) => return Err(err),
		}

		if self.options.daemon || self.store.len() >= 2 {
			match self.ownership.acquire(&mut self.surface) {
				Ok(_) => {}
				Err(Error::OwnershipDenied { owner }) => {
					tracing::warn!(?owner, "Could not reclaim the selection after capture");
					self.abort_interaction(RefuseReason::NotOwner)?;
				}
				Err(err) => return Err(err),
			}
		}

		if self.interaction.state() == InteractionState::Showing {
			self.redraw_chooser()?;
		}
		self.show_flash(now)
	}

	/// Another client took the selection.
	pub(super) fn on_selection_clear(&mut self) -> Result<()> {
		self.ownership.lost();
		tracing::info!("Selection ownership lost");
		if self.interaction.exit_after_unmap {
			return Ok(());
		}

		if self.interaction.is_idle() {
			self.surface.ungrab_pointer()?;
		} else {
			self.abort_interaction(RefuseReason::NotOwner)?;
		}

		if self.options.daemon {
			self.capture()?;
		} else if self.options.daemon_present {
			tracing::info!("Daemon instance present; exiting");
			self.should_quit = true;
		}
		Ok(())
	}

	pub(super) fn on_flash_exposed(&mut self, now: Instant) -> Result<()> {
		if self.flash.painted(now) {
			let view = self.flash_view();
			self.surface.draw_flash(&view)?;
		}
		Ok(())
	}

	pub(super) fn show_flash(&mut self, now: Instant) -> Result<()> {
		let view = self.flash_view();
		self.surface.show_flash(&view)?;
		self.flash.show(now);
		Ok(())
	}

	fn flash_view(&self) -> ChooserView {
		ChooserView {
			highlighted: None,
			..self.store.view(0)
		}
	}
}
