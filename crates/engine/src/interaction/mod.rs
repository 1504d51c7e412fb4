//! Modal chooser state.
//!
//! ```text
//! Idle ──open──► Pending ──exposed──► Showing ──resolved──► Answering ──unmapped──► Idle
//! ```
//!
//! The state here is plain data; [`Mediator`](crate::Mediator) drives the
//! transitions and performs the surface calls. [`Interaction::interpret`]
//! turns raw chooser input into a [`Resolution`] without side effects.

use std::time::Instant;

use crate::protocol::{Point, SavedFocus, SelectionRequest};
use crate::store::index_for_key;

/// Chooser lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
	#[default]
	Idle,
	/// Chooser mapped, waiting for it to become visible.
	Pending,
	/// Chooser visible, pointer grabbed, focus captured.
	Showing,
	/// Outcome delivered, waiting for the chooser to unmap.
	Answering,
}

/// A request deferred until the user decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
	pub request: SelectionRequest,
	pub received_at: Instant,
}

/// Key input while the chooser has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserKey {
	Char(char),
	Up,
	Down,
	Enter,
	/// Delete or BackSpace.
	Delete,
	Escape,
	Other,
}

/// Input delivered to the chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserInput {
	Key(ChooserKey),
	/// Pointer click; `row` is the candidate row under the pointer.
	Click { row: Option<usize> },
}

/// What a piece of chooser input means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Deliver the candidate at this index.
	Choose(usize),
	/// Highlight moved; redraw and keep waiting.
	Moved,
	/// Remove the highlighted candidate and keep the chooser open if possible.
	DeleteHighlighted,
	/// Remove the last candidate and close.
	DeleteLast,
	/// Remove every candidate and close.
	ClearAll,
	/// Remove every candidate, close, then exit.
	Quit,
	/// Decline.
	Cancel,
}

/// Chooser state shared across one Idle→Answering cycle.
#[derive(Debug, Default, Clone)]
pub struct Interaction {
	state: InteractionState,
	pub(crate) pending: Option<PendingRequest>,
	/// Focus to restore once the chooser unmaps.
	pub(crate) saved_focus: Option<SavedFocus>,
	/// Pointer position when the chooser opened.
	pub(crate) pointer: Option<Point>,
	pub(crate) highlighted: usize,
	pub(crate) exit_after_unmap: bool,
	/// The list was edited from the chooser; flash it once the chooser is gone.
	pub(crate) list_changed: bool,
}

impl Interaction {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> InteractionState {
		self.state
	}

	pub(crate) fn set_state(&mut self, state: InteractionState) {
		if self.state != state {
			tracing::debug!(from = ?self.state, to = ?state, "Chooser state");
		}
		self.state = state;
	}

	/// A request is pending or the chooser is on its way up.
	pub fn is_busy(&self) -> bool {
		self.pending.is_some() || matches!(self.state, InteractionState::Pending | InteractionState::Showing)
	}

	pub fn is_idle(&self) -> bool {
		self.state == InteractionState::Idle
	}

	pub fn pending(&self) -> Option<&PendingRequest> {
		self.pending.as_ref()
	}

	pub fn highlighted(&self) -> usize {
		self.highlighted
	}

	pub fn saved_focus(&self) -> Option<SavedFocus> {
		self.saved_focus
	}

	pub fn exit_scheduled(&self) -> bool {
		self.exit_after_unmap
	}

	/// Saves `focus` unless it is our own window or a save is already in place.
	pub(crate) fn save_focus(&mut self, focus: SavedFocus, own: crate::protocol::WindowId) {
		if self.saved_focus.is_none() && focus.window != own {
			tracing::debug!(window = ?focus.window, "Saved previous focus");
			self.saved_focus = Some(focus);
		}
	}

	/// Maps `input` to a resolution, moving the highlight for Up/Down.
	pub fn interpret(&mut self, input: ChooserInput, len: usize, finalize_on_move: bool) -> Resolution {
		match input {
			ChooserInput::Click { row: Some(row) } if row < len => Resolution::Choose(row),
			ChooserInput::Click { .. } => Resolution::Cancel,
			ChooserInput::Key(key) => self.interpret_key(key, len, finalize_on_move),
		}
	}

	fn interpret_key(&mut self, key: ChooserKey, len: usize, finalize_on_move: bool) -> Resolution {
		match key {
			ChooserKey::Char(ch) => match index_for_key(ch) {
				Some(index) if index < len => Resolution::Choose(index),
				Some(_) => Resolution::Cancel,
				None => match ch {
					's' => Resolution::DeleteLast,
					'd' => Resolution::ClearAll,
					'q' => Resolution::Quit,
					_ => Resolution::Cancel,
				},
			},
			ChooserKey::Up | ChooserKey::Down if len == 0 => Resolution::Cancel,
			ChooserKey::Up => {
				self.highlighted = self.highlighted.min(len - 1).checked_sub(1).unwrap_or(len - 1);
				self.moved(finalize_on_move)
			}
			ChooserKey::Down => {
				self.highlighted = (self.highlighted.min(len - 1) + 1) % len;
				self.moved(finalize_on_move)
			}
			ChooserKey::Enter if len > 0 => Resolution::Choose(self.highlighted.min(len - 1)),
			ChooserKey::Delete if len > 0 => Resolution::DeleteHighlighted,
			ChooserKey::Enter | ChooserKey::Delete | ChooserKey::Escape | ChooserKey::Other => Resolution::Cancel,
		}
	}

	fn moved(&self, finalize_on_move: bool) -> Resolution {
		if finalize_on_move {
			Resolution::Choose(self.highlighted)
		} else {
			Resolution::Moved
		}
	}
}
