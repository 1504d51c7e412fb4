//! [`Surface`] over an x11rb connection.

use std::collections::VecDeque;

use multisel_engine::{Atom, ChooserView, Hotkey, HotkeyAction, KnownAtoms, Point, Reply, ReplyData, SavedFocus, Surface, SurfaceError, Timestamp, WindowId};
use multisel_engine::protocol::RevertTo;
use x11rb::connection::Connection;
use x11rb::protocol::Event as XEvent;
use x11rb::protocol::xproto::{
	AtomEnum, ConfigureWindowAux, ConnectionExt as _, CreateWindowAux, EventMask, GrabMode, GrabStatus, InputFocus, PropMode, SELECTION_NOTIFY_EVENT,
	SelectionNotifyEvent, StackMode, Window, WindowClass,
};
use x11rb::protocol::xtest::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::{CURRENT_TIME, NONE};

use crate::atoms::Atoms;
use crate::error::X11Error;
use crate::grabs::HotkeyTable;
use crate::instance;
use crate::keyboard::KeyboardMap;
use crate::layout::{Position, Size, chooser_size, place_at_pointer};
use crate::render::Renderer;

/// Middle pointer button.
const MIDDLE_BUTTON: u8 = 2;
/// XTest fake-input event codes.
const FAKE_BUTTON_PRESS: u8 = 4;
const FAKE_BUTTON_RELEASE: u8 = 5;

/// Backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct X11Options {
	/// Core font name, preferably an `iso10646-1` font.
	pub font: String,
}

/// One popup window and its current geometry.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Popup {
	pub(crate) window: Window,
	pub(crate) size: Size,
	pub(crate) rows: usize,
}

/// X11 connection, the chooser window (which also owns the selection) and the flash popup.
pub struct X11Surface {
	pub(crate) conn: RustConnection,
	pub(crate) root: Window,
	pub(crate) screen: Size,
	pub(crate) atoms: Atoms,
	known: KnownAtoms,
	pub(crate) chooser: Popup,
	pub(crate) flash: Popup,
	pub(crate) renderer: Renderer,
	pub(crate) keyboard: KeyboardMap,
	pub(crate) hotkeys: HotkeyTable,
	/// Events read while waiting for a server timestamp.
	pub(crate) deferred: VecDeque<XEvent>,
}

impl X11Surface {
	/// Connects to `$DISPLAY` and creates the (unmapped, unnamed) windows.
	pub fn connect(options: &X11Options) -> Result<Self, X11Error> {
		let (conn, screen_num) = x11rb::connect(None)?;
		let screen = conn.setup().roots[screen_num].clone();
		let atoms = Atoms::new(&conn)?.reply()?;
		let renderer = Renderer::new(&conn, &screen, &options.font)?;
		let keyboard = KeyboardMap::load(&conn)?;

		let chooser = create_popup(
			&conn,
			&screen,
			EventMask::EXPOSURE | EventMask::KEY_PRESS | EventMask::BUTTON_PRESS | EventMask::STRUCTURE_NOTIFY | EventMask::PROPERTY_CHANGE,
		)?;
		let flash = create_popup(&conn, &screen, EventMask::EXPOSURE | EventMask::STRUCTURE_NOTIFY)?;
		conn.flush()?;
		tracing::info!(window = chooser, screen = screen_num, "Connected to X server");

		Ok(Self {
			root: screen.root,
			screen: Size {
				width: screen.width_in_pixels,
				height: screen.height_in_pixels,
			},
			known: atoms.known(),
			atoms,
			chooser: Popup {
				window: chooser,
				size: Size::default(),
				rows: 0,
			},
			flash: Popup {
				window: flash,
				size: Size::default(),
				rows: 0,
			},
			renderer,
			keyboard,
			hotkeys: HotkeyTable::default(),
			deferred: VecDeque::new(),
			conn,
		})
	}

	/// Returns true if another top-level window is named `name`.
	pub fn instance_exists(&self, name: &str) -> Result<bool, X11Error> {
		instance::window_name_exists(&self.conn, self.root, self.chooser.window, name)
	}

	/// Names the chooser window so later instances can find it.
	pub fn set_name(&self, name: &str) -> Result<(), X11Error> {
		self.conn
			.change_property8(PropMode::REPLACE, self.chooser.window, AtomEnum::WM_NAME, AtomEnum::STRING, name.as_bytes())?;
		self.conn.flush()?;
		Ok(())
	}

	/// Grabs the global hotkeys on the root window.
	pub fn grab_hotkeys(&mut self, hotkeys: &[(Hotkey, HotkeyAction)]) -> Result<(), X11Error> {
		self.hotkeys = HotkeyTable::grab(&self.conn, self.root, &self.keyboard, hotkeys)?;
		self.conn.flush()?;
		Ok(())
	}

	fn write_reply(&self, reply: &Reply, property: u32) -> Result<(), X11Error> {
		match &reply.data {
			Some(ReplyData::Text { kind, bytes }) => {
				self.conn.change_property8(PropMode::REPLACE, reply.requestor.0, property, kind.0, bytes)?;
			}
			Some(ReplyData::Atoms { kind, atoms }) => {
				let atoms = atoms.iter().map(|a| a.0).collect::<Vec<_>>();
				self.conn.change_property32(PropMode::REPLACE, reply.requestor.0, property, kind.0, &atoms)?;
			}
			None => {}
		}
		Ok(())
	}

	fn reply(&mut self, reply: &Reply) -> Result<(), X11Error> {
		let property = match (&reply.data, reply.property) {
			(Some(_), Some(property)) => {
				self.write_reply(reply, property.0)?;
				property.0
			}
			_ => NONE,
		};
		let notify = SelectionNotifyEvent {
			response_type: SELECTION_NOTIFY_EVENT,
			sequence: 0,
			time: reply.time.0,
			requestor: reply.requestor.0,
			selection: reply.selection.0,
			target: reply.target.0,
			property,
		};
		self.conn.send_event(false, reply.requestor.0, EventMask::NO_EVENT, notify)?;
		self.conn.flush()?;
		Ok(())
	}

	/// Appends nothing to a property on our window and waits for the resulting
	/// notification, queueing every other event for the loop.
	fn fetch_server_time(&mut self) -> Result<Timestamp, X11Error> {
		let property = self.atoms.MULTISEL_TIMESTAMP;
		self.conn
			.change_property8(PropMode::APPEND, self.chooser.window, property, AtomEnum::STRING, &[])?;
		self.conn.flush()?;
		loop {
			match self.conn.wait_for_event()? {
				XEvent::PropertyNotify(e) if e.window == self.chooser.window && e.atom == property => {
					return Ok(Timestamp(e.time));
				}
				other => self.deferred.push_back(other),
			}
		}
	}

	fn show_popup(&mut self, which: PopupKind, view: &ChooserView) -> Result<(), X11Error> {
		let pointer = self.query_pointer()?;
		let size = chooser_size(view, self.renderer.metrics(), self.screen);
		let Position { x, y } = place_at_pointer(pointer, size, self.screen);
		let popup = self.popup_mut(which);
		popup.size = size;
		popup.rows = view.rows.len();
		let window = popup.window;

		self.conn.configure_window(
			window,
			&ConfigureWindowAux::new()
				.x(i32::from(x))
				.y(i32::from(y))
				.width(u32::from(size.width))
				.height(u32::from(size.height))
				.stack_mode(StackMode::ABOVE),
		)?;
		self.conn.map_window(window)?;
		self.conn.flush()?;
		Ok(())
	}

	fn draw_popup(&mut self, which: PopupKind, view: &ChooserView) -> Result<(), X11Error> {
		let popup = *self.popup_mut(which);
		let size = if popup.rows == view.rows.len() {
			popup.size
		} else {
			let size = chooser_size(view, self.renderer.metrics(), self.screen);
			self.conn.configure_window(
				popup.window,
				&ConfigureWindowAux::new()
					.width(u32::from(size.width))
					.height(u32::from(size.height)),
			)?;
			let popup = self.popup_mut(which);
			popup.size = size;
			popup.rows = view.rows.len();
			size
		};
		self.renderer.draw(&self.conn, popup.window, view, size)?;
		self.conn.flush()?;
		Ok(())
	}

	fn hide_popup(&mut self, which: PopupKind) -> Result<(), X11Error> {
		let window = self.popup_mut(which).window;
		self.conn.unmap_window(window)?;
		self.conn.flush()?;
		Ok(())
	}

	fn popup_mut(&mut self, which: PopupKind) -> &mut Popup {
		match which {
			PopupKind::Chooser => &mut self.chooser,
			PopupKind::Flash => &mut self.flash,
		}
	}

	fn query_pointer(&self) -> Result<Point, X11Error> {
		let reply = self.conn.query_pointer(self.root)?.reply()?;
		Ok(Point {
			x: reply.root_x,
			y: reply.root_y,
		})
	}

	fn claim(&self, owner: Option<WindowId>) -> Result<(), X11Error> {
		let owner = owner.map_or(NONE, |w| w.0);
		self.conn.set_selection_owner(owner, AtomEnum::PRIMARY.into(), CURRENT_TIME)?;
		self.conn.flush()?;
		Ok(())
	}

	fn fake_click(&self) -> Result<(), X11Error> {
		for kind in [FAKE_BUTTON_PRESS, FAKE_BUTTON_RELEASE] {
			self.conn.xtest_fake_input(kind, MIDDLE_BUTTON, CURRENT_TIME, self.root, 0, 0, 0)?;
		}
		self.conn.flush()?;
		Ok(())
	}

	fn grab(&self) -> Result<(), X11Error> {
		let reply = self
			.conn
			.grab_pointer(
				false,
				self.chooser.window,
				EventMask::BUTTON_PRESS,
				GrabMode::ASYNC,
				GrabMode::ASYNC,
				NONE,
				NONE,
				CURRENT_TIME,
			)?
			.reply()?;
		if reply.status != GrabStatus::SUCCESS {
			tracing::warn!(status = ?reply.status, "Pointer grab failed; clicks outside the chooser will not cancel it");
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Copy)]
enum PopupKind {
	Chooser,
	Flash,
}

fn create_popup(conn: &RustConnection, screen: &x11rb::protocol::xproto::Screen, events: EventMask) -> Result<Window, X11Error> {
	let window = conn.generate_id()?;
	conn.create_window(
		x11rb::COPY_DEPTH_FROM_PARENT,
		window,
		screen.root,
		0,
		0,
		1,
		1,
		1,
		WindowClass::INPUT_OUTPUT,
		screen.root_visual,
		&CreateWindowAux::new()
			.background_pixel(screen.white_pixel)
			.border_pixel(screen.black_pixel)
			.override_redirect(1)
			.event_mask(events),
	)?;
	Ok(window)
}

fn revert_to_x(revert_to: RevertTo) -> InputFocus {
	match revert_to {
		RevertTo::None => InputFocus::NONE,
		RevertTo::PointerRoot => InputFocus::POINTER_ROOT,
		RevertTo::Parent => InputFocus::PARENT,
	}
}

fn revert_from_x(focus: InputFocus) -> RevertTo {
	match focus {
		InputFocus::POINTER_ROOT => RevertTo::PointerRoot,
		InputFocus::PARENT => RevertTo::Parent,
		_ => RevertTo::None,
	}
}

impl Surface for X11Surface {
	fn window(&self) -> WindowId {
		WindowId(self.chooser.window)
	}

	fn atoms(&self) -> &KnownAtoms {
		&self.known
	}

	fn set_selection_owner(&mut self, owner: Option<WindowId>) -> Result<(), SurfaceError> {
		Ok(self.claim(owner)?)
	}

	fn selection_owner(&mut self) -> Result<Option<WindowId>, SurfaceError> {
		let owner = self
			.conn
			.get_selection_owner(AtomEnum::PRIMARY.into())
			.map_err(X11Error::from)?
			.reply()
			.map_err(X11Error::from)?
			.owner;
		Ok((owner != NONE).then_some(WindowId(owner)))
	}

	fn server_time(&mut self) -> Result<Timestamp, SurfaceError> {
		Ok(self.fetch_server_time()?)
	}

	fn erase_cut_buffer(&mut self) -> Result<(), SurfaceError> {
		let cut_buffer = self.atoms.CUT_BUFFER0;
		self.conn.delete_property(self.root, cut_buffer).map_err(X11Error::from)?;
		Ok(())
	}

	fn send_reply(&mut self, reply: &Reply) -> Result<(), SurfaceError> {
		Ok(self.reply(reply)?)
	}

	fn request_conversion(&mut self, target: Atom) -> Result<(), SurfaceError> {
		let property = self.atoms.MULTISEL_CAPTURE;
		self.conn
			.convert_selection(self.chooser.window, AtomEnum::PRIMARY.into(), target.0, property, CURRENT_TIME)
			.map_err(X11Error::from)?;
		self.conn.flush().map_err(X11Error::from)?;
		Ok(())
	}

	fn input_focus(&mut self) -> Result<SavedFocus, SurfaceError> {
		let reply = self.conn.get_input_focus().map_err(X11Error::from)?.reply().map_err(X11Error::from)?;
		Ok(SavedFocus {
			window: WindowId(reply.focus),
			revert_to: revert_from_x(reply.revert_to),
		})
	}

	fn set_input_focus(&mut self, focus: SavedFocus) -> Result<(), SurfaceError> {
		self.conn
			.set_input_focus(revert_to_x(focus.revert_to), focus.window.0, CURRENT_TIME)
			.map_err(X11Error::from)?;
		self.conn.flush().map_err(X11Error::from)?;
		Ok(())
	}

	fn pointer_position(&mut self) -> Result<Point, SurfaceError> {
		Ok(self.query_pointer()?)
	}

	fn warp_pointer(&mut self, to: Point) -> Result<(), SurfaceError> {
		self.conn
			.warp_pointer(NONE, self.root, 0, 0, 0, 0, to.x, to.y)
			.map_err(X11Error::from)?;
		self.conn.flush().map_err(X11Error::from)?;
		Ok(())
	}

	fn grab_pointer(&mut self) -> Result<(), SurfaceError> {
		Ok(self.grab()?)
	}

	fn ungrab_pointer(&mut self) -> Result<(), SurfaceError> {
		self.conn.ungrab_pointer(CURRENT_TIME).map_err(X11Error::from)?;
		self.conn.flush().map_err(X11Error::from)?;
		Ok(())
	}

	fn show_chooser(&mut self, view: &ChooserView) -> Result<(), SurfaceError> {
		Ok(self.show_popup(PopupKind::Chooser, view)?)
	}

	fn draw_chooser(&mut self, view: &ChooserView) -> Result<(), SurfaceError> {
		Ok(self.draw_popup(PopupKind::Chooser, view)?)
	}

	fn hide_chooser(&mut self) -> Result<(), SurfaceError> {
		Ok(self.hide_popup(PopupKind::Chooser)?)
	}

	fn show_flash(&mut self, view: &ChooserView) -> Result<(), SurfaceError> {
		Ok(self.show_popup(PopupKind::Flash, view)?)
	}

	fn draw_flash(&mut self, view: &ChooserView) -> Result<(), SurfaceError> {
		Ok(self.draw_popup(PopupKind::Flash, view)?)
	}

	fn hide_flash(&mut self) -> Result<(), SurfaceError> {
		Ok(self.hide_popup(PopupKind::Flash)?)
	}

	fn middle_click(&mut self) -> Result<(), SurfaceError> {
		Ok(self.fake_click()?)
	}
}
