use multisel_engine::SurfaceError;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

/// X11 backend failure.
#[derive(Debug, thiserror::Error)]
pub enum X11Error {
	#[error("cannot connect to the X server: {0}")]
	Connect(#[from] ConnectError),
	#[error("X connection failed: {0}")]
	Connection(#[from] ConnectionError),
	#[error("X request failed: {0}")]
	Reply(#[from] ReplyError),
	#[error("X resource allocation failed: {0}")]
	ReplyOrId(#[from] ReplyOrIdError),
	#[error("cannot open font `{name}`: {source}")]
	Font {
		name: String,
		#[source]
		source: ReplyError,
	},
	#[error("waiting for X events failed: {0}")]
	Poll(#[from] nix::errno::Errno),
}

impl From<X11Error> for SurfaceError {
	fn from(err: X11Error) -> Self {
		match err {
			X11Error::Connection(ConnectionError::IoError(_)) => Self::Disconnected,
			other => Self::backend(other),
		}
	}
}
