//! Waiting for X events with a timeout and translating them for the engine.

use std::os::fd::AsFd;
use std::time::{Duration, Instant};

use multisel_engine::{Atom, ChooserInput, Event, SelectionRequest, Surface as _, Timestamp, WindowId};
use nix::errno::Errno;
use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
use x11rb::NONE;
use x11rb::connection::Connection;
use x11rb::protocol::Event as XEvent;
use x11rb::protocol::xproto::{AtomEnum, ButtonPressEvent, ConnectionExt as _, KeyButMask, KeyPressEvent};

use crate::encode::decode_property;
use crate::error::X11Error;
use crate::keyboard::{KeyboardMap, chooser_key};
use crate::layout::row_at;
use crate::surface::X11Surface;

/// Upper bound on captured selection data, in 32-bit units.
const MAX_CAPTURE_WORDS: u32 = 16 * 1024;

impl X11Surface {
	/// Returns the next engine event, or `None` once `timeout` elapses.
	///
	/// `None` for `timeout` blocks until an event arrives.
	pub fn next_event(&mut self, timeout: Option<Duration>) -> Result<Option<Event>, X11Error> {
		let deadline = timeout.map(|t| Instant::now() + t);
		loop {
			let raw = match self.deferred.pop_front() {
				Some(event) => Some(event),
				None => self.conn.poll_for_event()?,
			};
			if let Some(raw) = raw {
				if let Some(event) = self.translate(raw)? {
					return Ok(Some(event));
				}
				continue;
			}

			self.conn.flush()?;
			let remaining = match deadline {
				Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
					Some(left) if !left.is_zero() => Some(left),
					_ => return Ok(None),
				},
				None => None,
			};
			self.wait_readable(remaining)?;
		}
	}

	fn wait_readable(&self, timeout: Option<Duration>) -> Result<(), X11Error> {
		let timeout = match timeout {
			// Round up so a sub-millisecond remainder does not spin.
			Some(t) => PollTimeout::from(u16::try_from((t + Duration::from_micros(999)).as_millis()).unwrap_or(u16::MAX)),
			None => PollTimeout::NONE,
		};
		let mut fds = [PollFd::new(self.conn.stream().as_fd(), PollFlags::POLLIN)];
		match poll(&mut fds, timeout) {
			Ok(_) | Err(Errno::EINTR) => Ok(()),
			Err(err) => Err(err.into()),
		}
	}

	fn translate(&mut self, raw: XEvent) -> Result<Option<Event>, X11Error> {
		let own = self.chooser.window;
		Ok(match raw {
			XEvent::SelectionRequest(e) => Some(Event::SelectionRequest(SelectionRequest {
				requestor: WindowId(e.requestor),
				selection: Atom(e.selection),
				target: Atom(e.target),
				property: (e.property != NONE).then_some(Atom(e.property)),
				time: Timestamp(e.time),
			})),
			XEvent::SelectionClear(e) if e.owner == own => Some(Event::SelectionClear),
			XEvent::SelectionNotify(e) if e.requestor == own => Some(Event::Captured(self.read_capture(e.property)?)),
			XEvent::Expose(e) if e.count == 0 && e.window == own => Some(Event::ChooserExposed),
			XEvent::Expose(e) if e.count == 0 && e.window == self.flash.window => Some(Event::FlashExposed),
			XEvent::UnmapNotify(e) => Some(Event::Unmapped(WindowId(e.window))),
			XEvent::KeyPress(e) => self.translate_key(&e),
			XEvent::ButtonPress(e) if e.event == own => Some(self.translate_click(&e)),
			XEvent::MappingNotify(_) => {
				self.keyboard = KeyboardMap::load(&self.conn)?;
				tracing::debug!("Reloaded keyboard mapping");
				None
			}
			XEvent::Error(err) => {
				tracing::warn!(?err, "X protocol error");
				None
			}
			other => {
				tracing::trace!(?other, "Ignoring X event");
				None
			}
		})
	}

	fn translate_key(&self, e: &KeyPressEvent) -> Option<Event> {
		let state = u16::from(e.state);
		if let Some(action) = self.hotkeys.lookup(e.detail, state) {
			return Some(Event::Hotkey(action));
		}
		if e.event != self.chooser.window {
			return None;
		}
		let shifted = state & u16::from(KeyButMask::SHIFT) != 0;
		let sym = self.keyboard.keysym(e.detail, shifted)?;
		chooser_key(sym).map(|key| Event::Input(ChooserInput::Key(key)))
	}

	fn translate_click(&self, e: &ButtonPressEvent) -> Event {
		let row = row_at(e.event_x, e.event_y, self.chooser.size, self.chooser.rows, self.renderer.metrics());
		Event::Input(ChooserInput::Click { row })
	}

	/// Reads and deletes the capture property; `None` when the holder refused.
	fn read_capture(&self, property: u32) -> Result<Option<String>, X11Error> {
		if property == NONE {
			return Ok(None);
		}
		let reply = self
			.conn
			.get_property(true, self.chooser.window, property, AtomEnum::ANY, 0, MAX_CAPTURE_WORDS)?
			.reply()?;
		if reply.bytes_after > 0 {
			tracing::warn!(kept = reply.value.len(), dropped = reply.bytes_after, "Captured selection truncated");
		}
		Ok(decode_property(Atom(reply.type_), &reply.value, self.atoms()))
	}
}
