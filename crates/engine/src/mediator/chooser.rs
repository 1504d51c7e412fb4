use std::time::Instant;

use super::Mediator;
use crate::arbiter::RefuseReason;
use crate::error::Result;
use crate::interaction::{ChooserInput, InteractionState, PendingRequest, Resolution};
use crate::protocol::{Outcome, RevertTo, SavedFocus, WindowId};
use crate::relay::should_relay;
use crate::surface::Surface;

impl<S: Surface> Mediator<S> {
	/// Idle → Pending. Shared by deferred requests and the open hotkey.
	///
	/// A request arriving while another interaction runs is refused, so
	/// every requester still gets a completion.
	pub(super) fn open_chooser(&mut self, pending: Option<PendingRequest>) -> Result<()> {
		if !self.interaction.is_idle() {
			if let Some(pending) = pending {
				self.refuse(&pending.request, RefuseReason::Busy)?;
			}
			return Ok(());
		}

		let own = self.surface.window();
		let focus = self.surface.input_focus()?;
		self.interaction.save_focus(focus, own);
		self.interaction.pointer = Some(self.surface.pointer_position()?);
		self.interaction.highlighted = 0;
		self.interaction.pending = pending;
		self.interaction.set_state(InteractionState::Pending);

		let view = self.store.view(0);
		self.surface.show_chooser(&view)?;
		Ok(())
	}

	/// Pending → Showing on first paint; later paints just redraw.
	pub(super) fn on_chooser_exposed(&mut self) -> Result<()> {
		match self.interaction.state() {
			InteractionState::Pending => {
				self.redraw_chooser()?;
				self.surface.set_input_focus(SavedFocus {
					window: self.surface.window(),
					revert_to: RevertTo::None,
				})?;
				self.surface.grab_pointer()?;
				self.interaction.set_state(InteractionState::Showing);
			}
			InteractionState::Showing => self.redraw_chooser()?,
			InteractionState::Idle | InteractionState::Answering => {}
		}
		Ok(())
	}

	pub(super) fn on_input(&mut self, input: ChooserInput, now: Instant) -> Result<()> {
		if self.interaction.state() != InteractionState::Showing {
			tracing::trace!(?input, "Chooser input outside an interaction");
			return Ok(());
		}

		let resolution = self.interaction.interpret(input, self.store.len(), self.options.finalize_on_move);
		tracing::debug!(?input, ?resolution, "Chooser input");
		match resolution {
			Resolution::Choose(index) => {
				let outcome = self.store.value(index).map_or(Outcome::Declined, |v| Outcome::Value(v.to_owned()));
				self.finalize(outcome, now)
			}
			Resolution::Moved => self.redraw_chooser(),
			Resolution::DeleteHighlighted => {
				let index = self.interaction.highlighted.min(self.store.len().saturating_sub(1));
				self.store.delete_at(index);
				self.interaction.list_changed = true;
				if self.store.is_empty() && !self.options.daemon {
					self.ownership.release(&mut self.surface)?;
					self.finalize(Outcome::Declined, now)
				} else {
					self.interaction.highlighted = index.min(self.store.len().saturating_sub(1));
					self.redraw_chooser()
				}
			}
			Resolution::DeleteLast => {
				self.store.delete_last();
				self.interaction.list_changed = true;
				if self.store.is_empty() {
					self.ownership.release(&mut self.surface)?;
				}
				self.finalize(Outcome::Declined, now)
			}
			Resolution::ClearAll => {
				self.store.clear();
				self.interaction.list_changed = true;
				self.ownership.release(&mut self.surface)?;
				self.finalize(Outcome::Declined, now)
			}
			Resolution::Quit => {
				self.store.clear();
				self.ownership.release(&mut self.surface)?;
				self.interaction.exit_after_unmap = true;
				self.finalize(Outcome::Declined, now)
			}
			Resolution::Cancel => self.finalize(Outcome::Declined, now),
		}
	}

	/// Showing → Answering: answer (or relay) the pending request and unmap.
	pub(super) fn finalize(&mut self, outcome: Outcome, now: Instant) -> Result<()> {
		self.arbiter.record_choice(outcome.clone());

		if let Some(PendingRequest { request, .. }) = self.interaction.pending.take() {
			let pointer = self.interaction.pointer;
			if should_relay(self.options.delivery, &outcome, pointer, self.delegate.as_deref(), request.requestor) {
				self.refuse(&request, RefuseReason::Relayed)?;
				// Re-asks before the click get the refusal again.
				self.arbiter.record_served(request.requestor, now, Outcome::Declined);
				self.arbiter.arm_relay(outcome);
				if let Some(at) = pointer {
					self.relay.schedule(at);
				}
			} else {
				self.deliver(&request, &outcome)?;
				self.arbiter.record_served(request.requestor, now, outcome);
			}
		}

		self.interaction.set_state(InteractionState::Answering);
		self.surface.hide_chooser()?;
		Ok(())
	}

	/// Answering → Idle once our own chooser confirms it is gone.
	pub(super) fn on_unmapped(&mut self, window: WindowId, now: Instant) -> Result<()> {
		if window != self.surface.window() {
			tracing::trace!(?window, "Ignoring unmap of foreign window");
			return Ok(());
		}
		match self.interaction.state() {
			InteractionState::Idle => return Ok(()),
			// Unmapped underneath us; treat as a cancel.
			InteractionState::Pending | InteractionState::Showing => self.finalize(Outcome::Declined, now)?,
			InteractionState::Answering => {}
		}

		if let Some(focus) = self.interaction.saved_focus.take() {
			self.surface.set_input_focus(focus)?;
		}
		self.surface.ungrab_pointer()?;
		if self.relay.fire(&mut self.surface)? {
			self.arbiter.relay_fired(now + self.options.relay_timeout);
		} else {
			self.arbiter.disarm_relay();
		}
		self.interaction.pointer = None;
		self.interaction.set_state(InteractionState::Idle);

		if self.interaction.exit_after_unmap {
			tracing::info!("Exit requested from chooser");
			self.should_quit = true;
		} else if std::mem::take(&mut self.interaction.list_changed) {
			self.show_flash(now)?;
		}
		Ok(())
	}

	/// Drops an interaction that can no longer be answered.
	pub(super) fn abort_interaction(&mut self, reason: RefuseReason) -> Result<()> {
		if !matches!(self.interaction.state(), InteractionState::Pending | InteractionState::Showing) {
			return Ok(());
		}
		if let Some(pending) = self.interaction.pending.take() {
			self.refuse(&pending.request, reason)?;
		}
		self.interaction.set_state(InteractionState::Answering);
		self.surface.hide_chooser()?;
		Ok(())
	}

	pub(super) fn redraw_chooser(&mut self) -> Result<()> {
		let view = self.store.view(self.interaction.highlighted);
		self.surface.draw_chooser(&view)?;
		Ok(())
	}
}
