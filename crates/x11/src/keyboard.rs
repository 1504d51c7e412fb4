//! Keycode to keysym translation.

use multisel_engine::{ChooserKey, KeyName};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, Keycode, Keysym};

use crate::error::X11Error;

pub mod keysym {
	use x11rb::protocol::xproto::Keysym;

	pub const BACKSPACE: Keysym = 0xff08;
	pub const RETURN: Keysym = 0xff0d;
	pub const ESCAPE: Keysym = 0xff1b;
	pub const UP: Keysym = 0xff52;
	pub const DOWN: Keysym = 0xff54;
	pub const KP_ENTER: Keysym = 0xff8d;
	pub const F1: Keysym = 0xffbe;
	pub const SHIFT_L: Keysym = 0xffe1;
	pub const HYPER_R: Keysym = 0xffee;
	pub const ISO_LEVEL3_SHIFT: Keysym = 0xfe03;
	pub const MODE_SWITCH: Keysym = 0xff7e;
	pub const DELETE: Keysym = 0xffff;
}

/// Snapshot of the server's keyboard mapping.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMap {
	min_keycode: Keycode,
	per_keycode: usize,
	keysyms: Vec<Keysym>,
}

impl KeyboardMap {
	/// Fetches the full mapping.
	pub fn load(conn: &impl Connection) -> Result<Self, X11Error> {
		let setup = conn.setup();
		let (min, max) = (setup.min_keycode, setup.max_keycode);
		let reply = conn.get_keyboard_mapping(min, max - min + 1)?.reply()?;
		Ok(Self::from_raw(min, reply.keysyms_per_keycode, reply.keysyms))
	}

	pub fn from_raw(min_keycode: Keycode, per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
		Self {
			min_keycode,
			per_keycode: usize::from(per_keycode),
			keysyms,
		}
	}

	/// Keysym of `keycode`, from the shifted column when `shifted` and it is bound.
	pub fn keysym(&self, keycode: Keycode, shifted: bool) -> Option<Keysym> {
		let base = usize::from(keycode.checked_sub(self.min_keycode)?) * self.per_keycode;
		let column = |i: usize| (i < self.per_keycode).then(|| self.keysyms.get(base + i).copied()).flatten().filter(|&k| k != 0);
		if shifted { column(1).or_else(|| column(0)) } else { column(0) }
	}

	/// All keycodes producing `keysym` in either of the first two columns.
	pub fn keycodes_for(&self, keysym: Keysym) -> Vec<Keycode> {
		if self.per_keycode == 0 {
			return Vec::new();
		}
		self.keysyms
			.chunks(self.per_keycode)
			.enumerate()
			.filter(|(_, syms)| syms.iter().take(2).any(|&k| k == keysym))
			.filter_map(|(i, _)| Keycode::try_from(i).ok()?.checked_add(self.min_keycode))
			.collect()
	}
}

/// Keysym a hotkey key name is bound to.
pub fn keysym_for(key: KeyName) -> Keysym {
	match key {
		KeyName::Char(ch) => u32::from(ch),
		KeyName::Function(n) => keysym::F1 + u32::from(n) - 1,
	}
}

/// Maps a keysym pressed in the chooser. Modifier keys map to `None`.
pub fn chooser_key(sym: Keysym) -> Option<ChooserKey> {
	Some(match sym {
		keysym::UP => ChooserKey::Up,
		keysym::DOWN => ChooserKey::Down,
		keysym::RETURN | keysym::KP_ENTER => ChooserKey::Enter,
		keysym::DELETE | keysym::BACKSPACE => ChooserKey::Delete,
		keysym::ESCAPE => ChooserKey::Escape,
		keysym::SHIFT_L..=keysym::HYPER_R | keysym::ISO_LEVEL3_SHIFT | keysym::MODE_SWITCH => return None,
		0x20..=0x7e => ChooserKey::Char(char::from(sym as u8).to_ascii_lowercase()),
		_ => ChooserKey::Other,
	})
}
