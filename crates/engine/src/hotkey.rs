//! Global hotkey specifications (`ctrl+shift+z`, `F9`).

use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
	/// Modifier keys held with a hotkey.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Modifiers: u8 {
		const CTRL = 1 << 0;
		const SHIFT = 1 << 1;
		const ALT = 1 << 2;
		const SUPER = 1 << 3;
	}
}

/// The non-modifier key of a hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
	/// A printable character, stored lowercase.
	Char(char),
	/// Function key `F1`..`F24`.
	Function(u8),
}

/// What a global hotkey does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
	/// Fetch the current selection and add it as a candidate.
	Capture,
	/// Open the chooser without a requester.
	Open,
}

/// A parsed hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
	pub modifiers: Modifiers,
	pub key: KeyName,
}

/// Hotkey parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
	#[error("empty hotkey")]
	Empty,
	#[error("unknown modifier `{0}`")]
	UnknownModifier(String),
	#[error("unknown key `{0}`")]
	UnknownKey(String),
}

impl Hotkey {
	/// Parses `mod+mod+key`. Modifier names are case-insensitive.
	pub fn parse(spec: &str) -> Result<Self, HotkeyError> {
		let spec = spec.trim();
		if spec.is_empty() {
			return Err(HotkeyError::Empty);
		}
		let mut parts = spec.split('+').map(str::trim).collect::<Vec<_>>();
		let key = parts.pop().filter(|k| !k.is_empty()).ok_or(HotkeyError::Empty)?;

		let mut modifiers = Modifiers::empty();
		for part in parts {
			modifiers |= match part.to_ascii_lowercase().as_str() {
				"ctrl" | "control" | "c" => Modifiers::CTRL,
				"shift" | "s" => Modifiers::SHIFT,
				"alt" | "meta" | "a" => Modifiers::ALT,
				"super" | "mod4" | "win" => Modifiers::SUPER,
				_ => return Err(HotkeyError::UnknownModifier(part.to_owned())),
			};
		}

		Ok(Self {
			modifiers,
			key: parse_key(key)?,
		})
	}
}

fn parse_key(key: &str) -> Result<KeyName, HotkeyError> {
	let mut chars = key.chars();
	if let (Some(ch), None) = (chars.next(), chars.next()) {
		if ch.is_ascii_graphic() {
			return Ok(KeyName::Char(ch.to_ascii_lowercase()));
		}
		return Err(HotkeyError::UnknownKey(key.to_owned()));
	}

	key.strip_prefix('F')
		.or_else(|| key.strip_prefix('f'))
		.and_then(|n| n.parse::<u8>().ok())
		.filter(|n| (1..=24).contains(n))
		.map(KeyName::Function)
		.ok_or_else(|| HotkeyError::UnknownKey(key.to_owned()))
}

impl FromStr for Hotkey {
	type Err = HotkeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Hotkey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (flag, name) in [
			(Modifiers::CTRL, "ctrl"),
			(Modifiers::SHIFT, "shift"),
			(Modifiers::ALT, "alt"),
			(Modifiers::SUPER, "super"),
		] {
			if self.modifiers.contains(flag) {
				write!(f, "{name}+")?;
			}
		}
		match self.key {
			KeyName::Char(ch) => write!(f, "{ch}"),
			KeyName::Function(n) => write!(f, "F{n}"),
		}
	}
}
