//! Error types for the mediation engine.
//!
//! Requester-side problems are not errors: they become protocol refusals
//! carrying a [`RefuseReason`](crate::RefuseReason). The variants here cover
//! conditions the process itself has to react to.

use crate::protocol::WindowId;

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Another client holds the selection after we claimed it.
	#[error("selection ownership denied (current owner: {owner:?})")]
	OwnershipDenied {
		/// Window that won the race, if any.
		owner: Option<WindowId>,
	},
	/// The candidate store is full.
	#[error("candidate store is full ({capacity} entries)")]
	CapacityExceeded {
		/// Configured ceiling.
		capacity: usize,
	},
	/// The windowing backend failed.
	#[error(transparent)]
	Surface(#[from] SurfaceError),
}

/// Failures reported by a [`Surface`](crate::Surface) implementation.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
	/// The connection to the windowing server is gone.
	#[error("connection to the display was lost")]
	Disconnected,
	/// Backend-specific failure.
	#[error(transparent)]
	Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl SurfaceError {
	/// Wraps a backend error.
	pub fn backend(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Self::Backend(error.into())
	}
}
