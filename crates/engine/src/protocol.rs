//! Backend-neutral protocol values.
//!
//! These mirror the handful of X11 selection-protocol fields the engine needs,
//! without tying the engine to a particular client library. The backend owns
//! the translation to and from its own wire types.

/// Identifier of a top-level surface (a window).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// Interned protocol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom(pub u32);

/// Server timestamp in milliseconds.
///
/// Compared as plain integers; [`Timestamp::CURRENT`] is the protocol's "now"
/// sentinel and is always accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(pub u32);

impl Timestamp {
	/// The `CurrentTime` sentinel.
	pub const CURRENT: Self = Self(0);

	/// Returns true for the "now" sentinel.
	pub const fn is_current(self) -> bool {
		self.0 == 0
	}
}

/// Root-relative pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
	pub x: i16,
	pub y: i16,
}

/// How input focus reverts when the focused window disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevertTo {
	#[default]
	None,
	PointerRoot,
	Parent,
}

/// Focus owner captured before the chooser takes focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedFocus {
	pub window: WindowId,
	pub revert_to: RevertTo,
}

/// An inbound request for the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
	pub requestor: WindowId,
	pub selection: Atom,
	pub target: Atom,
	/// Destination slot. `None` comes from obsolete clients.
	pub property: Option<Atom>,
	pub time: Timestamp,
}

/// Outbound completion notification, optionally preceded by a property write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
	pub requestor: WindowId,
	pub selection: Atom,
	pub target: Atom,
	/// Resolved destination slot; `None` signals refusal.
	pub property: Option<Atom>,
	pub time: Timestamp,
	/// Bytes to store in `property` before notifying.
	pub data: Option<ReplyData>,
}

impl Reply {
	/// Builds the refusal for `request`.
	pub fn refusal(request: &SelectionRequest) -> Self {
		Self {
			requestor: request.requestor,
			selection: request.selection,
			target: request.target,
			property: None,
			time: request.time,
			data: None,
		}
	}

	/// Returns true if this reply refuses the request.
	pub fn is_refusal(&self) -> bool {
		self.property.is_none()
	}
}

/// Payload written into the requestor's destination slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyData {
	/// 8-bit text of the given type (`STRING` or `UTF8_STRING`).
	Text { kind: Atom, bytes: Vec<u8> },
	/// 32-bit list of atoms of type `ATOM`.
	Atoms { kind: Atom, atoms: Vec<Atom> },
}

/// Atoms the engine distinguishes, interned once by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownAtoms {
	pub primary: Atom,
	pub targets: Atom,
	pub string: Atom,
	pub utf8_string: Atom,
	pub atom: Atom,
	/// Target asked for by a requester that already gave up on a previous request.
	pub timeout_probe: Atom,
}

/// Classification of a request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
	/// Capability enumeration.
	Targets,
	/// Latin-1 text.
	String,
	/// UTF-8 text.
	Utf8String,
	/// Follow-up probe sent by a requester whose own timeout expired.
	TimeoutProbe,
	/// Anything else.
	Unsupported,
}

impl TargetKind {
	/// Returns true for the text representations the engine can deliver.
	pub const fn is_text(self) -> bool {
		matches!(self, Self::String | Self::Utf8String)
	}
}

impl KnownAtoms {
	/// Classifies a request target.
	pub fn classify(&self, target: Atom) -> TargetKind {
		if target == self.targets {
			TargetKind::Targets
		} else if target == self.string {
			TargetKind::String
		} else if target == self.utf8_string {
			TargetKind::Utf8String
		} else if target == self.timeout_probe {
			TargetKind::TimeoutProbe
		} else {
			TargetKind::Unsupported
		}
	}

	/// Formats listed in the enumeration reply.
	pub fn supported_targets(&self) -> Vec<Atom> {
		vec![self.targets, self.string, self.utf8_string]
	}
}

/// Result of one interaction, replayed to repeated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// A candidate value was chosen.
	Value(String),
	/// The user declined (cancel, delete, clear, quit).
	Declined,
}

impl Outcome {
	/// Returns the chosen value, if any.
	pub fn value(&self) -> Option<&str> {
		match self {
			Self::Value(value) => Some(value),
			Self::Declined => None,
		}
	}
}

/// Encodes `text` as Latin-1, replacing unrepresentable characters with `?`.
pub fn latin1_lossy(text: &str) -> Vec<u8> {
	text.chars().map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?')).collect()
}
