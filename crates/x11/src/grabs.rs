//! Global hotkey grabs on the root window.

use multisel_engine::{Hotkey, HotkeyAction, Modifiers};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, GrabMode, Keycode, ModMask, Window};

use crate::error::X11Error;
use crate::keyboard::{KeyboardMap, keysym_for};

/// Modifier bits a hotkey is matched on. Lock and NumLock are ignored.
const RELEVANT: u16 = 0x0004 | 0x0001 | 0x0008 | 0x0040;
const LOCK: u16 = 0x0002;
const NUM_LOCK: u16 = 0x0010;

/// Core-protocol modifier mask for `modifiers`.
pub fn modifier_mask(modifiers: Modifiers) -> u16 {
	[
		(Modifiers::CTRL, u16::from(ModMask::CONTROL)),
		(Modifiers::SHIFT, u16::from(ModMask::SHIFT)),
		(Modifiers::ALT, u16::from(ModMask::M1)),
		(Modifiers::SUPER, u16::from(ModMask::M4)),
	]
	.into_iter()
	.filter(|(flag, _)| modifiers.contains(*flag))
	.fold(0, |mask, (_, bit)| mask | bit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
	keycode: Keycode,
	mask: u16,
	action: HotkeyAction,
}

/// Active hotkey grabs.
#[derive(Debug, Clone, Default)]
pub struct HotkeyTable {
	bindings: Vec<Binding>,
}

impl HotkeyTable {
	/// Grabs every keycode producing each hotkey, in all Lock/NumLock combinations.
	///
	/// A hotkey already grabbed by another client is logged and skipped.
	pub fn grab(conn: &impl Connection, root: Window, keyboard: &KeyboardMap, hotkeys: &[(Hotkey, HotkeyAction)]) -> Result<Self, X11Error> {
		let mut table = Self::default();
		for &(hotkey, action) in hotkeys {
			let keycodes = keyboard.keycodes_for(keysym_for(hotkey.key));
			if keycodes.is_empty() {
				tracing::warn!(%hotkey, "Hotkey key is not on the keyboard");
				continue;
			}
			let mask = modifier_mask(hotkey.modifiers);
			for keycode in keycodes {
				for extra in [0, LOCK, NUM_LOCK, LOCK | NUM_LOCK] {
					let grabbed = conn
						.grab_key(false, root, ModMask::from(mask | extra), keycode, GrabMode::ASYNC, GrabMode::ASYNC)?
						.check();
					if let Err(err) = grabbed {
						tracing::warn!(%hotkey, keycode, error = %err, "Hotkey grab refused");
					}
				}
				table.bindings.push(Binding { keycode, mask, action });
			}
			tracing::info!(%hotkey, ?action, "Grabbed hotkey");
		}
		Ok(table)
	}

	/// Action bound to a key press with modifier `state`.
	pub fn lookup(&self, keycode: Keycode, state: u16) -> Option<HotkeyAction> {
		let state = state & RELEVANT;
		self.bindings.iter().find(|b| b.keycode == keycode && b.mask == state).map(|b| b.action)
	}
}
