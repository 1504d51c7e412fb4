//! The context object threading all process-wide state.
//!
//! A [`Mediator`] owns the surface, the candidate list, ownership bookkeeping,
//! the arbiter and the chooser state. The backend feeds it one [`Event`] at a
//! time through [`Mediator::on_event`], which always finishes with a
//! [`Mediator::pump`] pass that expires deadlines and reports how long the
//! event loop may block.

mod capture;
mod chooser;
mod requests;

#[cfg(test)]
mod invariants;

use std::time::{Duration, Instant};

use crate::arbiter::Arbiter;
use crate::error::{Error, Result};
use crate::flash::Flash;
use crate::hotkey::HotkeyAction;
use crate::interaction::{ChooserInput, Interaction, InteractionState};
use crate::options::Options;
use crate::ownership::Ownership;
use crate::protocol::{SelectionRequest, WindowId};
use crate::relay::{PasteDelegate, Relay};
use crate::store::{Candidate, CandidateStore};
use crate::surface::Surface;

/// Backend events the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// Another client asks for the selection.
	SelectionRequest(SelectionRequest),
	/// Another client took the selection from us.
	SelectionClear,
	/// Our own conversion request finished; `None` when it was refused.
	Captured(Option<String>),
	/// The chooser needs painting.
	ChooserExposed,
	/// The flash popup needs painting.
	FlashExposed,
	/// A window was unmapped.
	Unmapped(WindowId),
	/// Input while the chooser has focus.
	Input(ChooserInput),
	/// A global hotkey fired.
	Hotkey(HotkeyAction),
}

/// What the event loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopDirective {
	/// Maximum time to block waiting for the next event.
	pub poll_timeout: Option<Duration>,
	pub should_quit: bool,
}

/// Selection mediator over a windowing [`Surface`].
pub struct Mediator<S: Surface> {
	surface: S,
	options: Options,
	store: CandidateStore,
	ownership: Ownership,
	arbiter: Arbiter,
	interaction: Interaction,
	flash: Flash,
	relay: Relay,
	delegate: Option<Box<dyn PasteDelegate>>,
	should_quit: bool,
}

impl<S: Surface> Mediator<S> {
	/// Creates a mediator seeded with `seeds`; seeds beyond capacity are dropped.
	pub fn new(surface: S, options: Options, seeds: impl IntoIterator<Item = String>) -> Self {
		let mut store = CandidateStore::new(options.capacity);
		for seed in seeds {
			if let Err(err) = store.append(Candidate::with_separator(seed, options.separator)) {
				tracing::warn!(error = %err, "Dropping seed string");
			}
		}

		Self {
			surface,
			arbiter: Arbiter::new(options.short_window, options.clock_ceiling),
			flash: Flash::new(options.flash_hold, options.flash_fallback),
			options,
			store,
			ownership: Ownership::new(),
			interaction: Interaction::new(),
			relay: Relay::new(),
			delegate: None,
			should_quit: false,
		}
	}

	/// Installs the external paste-eligibility delegate.
	pub fn with_delegate(mut self, delegate: Box<dyn PasteDelegate>) -> Self {
		self.delegate = Some(delegate);
		self
	}

	/// Claims the selection at startup.
	///
	/// Fatal outside daemon mode; a daemon keeps running and waits for captures.
	pub fn start(&mut self) -> Result<()> {
		match self.ownership.acquire(&mut self.surface) {
			Ok(_) => Ok(()),
			Err(Error::OwnershipDenied { owner }) if self.options.daemon => {
				tracing::warn!(?owner, "Could not acquire the selection at startup; waiting for captures");
				Ok(())
			}
			Err(err) => Err(err),
		}
	}

	/// Handles one event and runs [`Self::pump`].
	pub fn on_event(&mut self, event: Event, now: Instant) -> Result<LoopDirective> {
		tracing::trace!(?event, "Event");
		match event {
			Event::SelectionRequest(request) => self.handle_request(request, now)?,
			Event::SelectionClear => self.on_selection_clear()?,
			Event::Captured(text) => self.on_captured(text, now)?,
			Event::ChooserExposed => self.on_chooser_exposed()?,
			Event::FlashExposed => self.on_flash_exposed(now)?,
			Event::Unmapped(window) => self.on_unmapped(window, now)?,
			Event::Input(input) => self.on_input(input, now)?,
			Event::Hotkey(HotkeyAction::Capture) => self.capture()?,
			Event::Hotkey(HotkeyAction::Open) => {
				if self.interaction.is_idle() {
					self.open_chooser(None)?;
				} else {
					tracing::debug!("Chooser already active; open hotkey ignored");
				}
			}
		}
		self.pump(now)
	}

	/// Expires the flash popup and the relay, and computes the next wake-up.
	pub fn pump(&mut self, now: Instant) -> Result<LoopDirective> {
		if self.flash.expired(now) {
			self.flash.hide();
			self.surface.hide_flash()?;
		}
		if self.arbiter.expire_relay(now) {
			self.relay.cancel();
		}

		let deadline = [self.flash.deadline(), self.arbiter.relay_deadline()].into_iter().flatten().min();
		Ok(LoopDirective {
			poll_timeout: deadline.map(|at| at.saturating_duration_since(now)),
			should_quit: self.should_quit,
		})
	}

	/// Refuses anything still owed and gives the selection back.
	pub fn shutdown(&mut self) -> Result<()> {
		if let Some(pending) = self.interaction.pending.take() {
			self.refuse(&pending.request, crate::arbiter::RefuseReason::Declined)?;
		}
		if self.ownership.is_held() {
			self.ownership.release(&mut self.surface)?;
		}
		tracing::info!("Shut down");
		Ok(())
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn surface_mut(&mut self) -> &mut S {
		&mut self.surface
	}

	pub fn store(&self) -> &CandidateStore {
		&self.store
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	pub fn ownership(&self) -> &Ownership {
		&self.ownership
	}

	pub fn interaction(&self) -> &Interaction {
		&self.interaction
	}

	pub fn state(&self) -> InteractionState {
		self.interaction.state()
	}

	pub fn flash(&self) -> &Flash {
		&self.flash
	}

	pub fn should_quit(&self) -> bool {
		self.should_quit
	}
}
