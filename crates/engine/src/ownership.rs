//! Ownership of the shared selection.

use crate::error::{Error, Result};
use crate::protocol::Timestamp;
use crate::surface::Surface;

/// Tracks whether this process holds the selection and since when.
#[derive(Debug, Default, Clone)]
pub struct Ownership {
	held: bool,
	/// Server time of the latest successful acquisition. Survives release so
	/// late requests against superseded ownership are still recognised.
	acquired_at: Option<Timestamp>,
}

impl Ownership {
	pub fn new() -> Self {
		Self::default()
	}

	/// Claims the selection for the surface's window.
	///
	/// Reads the holder back to detect a lost race, then stamps the acquisition
	/// with a server-generated timestamp and erases the legacy cut buffer so a
	/// refused requester cannot fall back to stale content.
	pub fn acquire<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<Timestamp> {
		let own = surface.window();
		surface.set_selection_owner(Some(own))?;
		let owner = surface.selection_owner()?;
		if owner != Some(own) {
			self.held = false;
			return Err(Error::OwnershipDenied { owner });
		}

		let now = surface.server_time()?;
		surface.erase_cut_buffer()?;
		self.held = true;
		self.acquired_at = Some(now);
		tracing::info!(time = now.0, "Acquired selection ownership");
		Ok(now)
	}

	/// Relinquishes the selection.
	pub fn release<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
		surface.set_selection_owner(None)?;
		if self.held {
			tracing::debug!("Released selection ownership");
		}
		self.held = false;
		Ok(())
	}

	/// Records that another client superseded us.
	pub fn lost(&mut self) {
		self.held = false;
	}

	pub fn is_held(&self) -> bool {
		self.held
	}

	pub fn acquired_at(&self) -> Option<Timestamp> {
		self.acquired_at
	}

	/// Returns true when `time` precedes the latest acquisition.
	pub fn is_stale(&self, time: Timestamp) -> bool {
		!time.is_current() && self.acquired_at.is_some_and(|at| time < at)
	}
}
