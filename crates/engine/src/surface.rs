//! The seam between the engine and the windowing backend.

use crate::error::SurfaceError;
use crate::protocol::{Atom, KnownAtoms, Point, Reply, SavedFocus, Timestamp, WindowId};

/// Title drawn in the first row of the chooser and the flash popup.
pub const CHOOSER_TITLE: &str = "multisel";

/// One candidate row as the backend draws it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserRow {
	/// Key that selects this row.
	pub key: char,
	/// Display label.
	pub label: String,
}

/// Data-only description of the chooser contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserView {
	pub title: &'static str,
	pub rows: Vec<ChooserRow>,
	/// Row drawn highlighted, if the list is not empty.
	pub highlighted: Option<usize>,
}

/// Operations the engine needs from the windowing server.
///
/// Every call may round-trip to the server. Implementations must not block on
/// user input; the only synchronous wait allowed is [`Surface::server_time`].
pub trait Surface {
	/// This process's own window, which owns the selection and hosts the chooser.
	fn window(&self) -> WindowId;

	/// Atoms interned at startup.
	fn atoms(&self) -> &KnownAtoms;

	/// Claims (`Some(own window)`) or relinquishes (`None`) the selection.
	fn set_selection_owner(&mut self, owner: Option<WindowId>) -> Result<(), SurfaceError>;

	/// Reads the current selection holder back.
	fn selection_owner(&mut self) -> Result<Option<WindowId>, SurfaceError>;

	/// Obtains a server timestamp for "now" through a no-op property change.
	fn server_time(&mut self) -> Result<Timestamp, SurfaceError>;

	/// Erases the legacy cut buffer left behind by earlier holders.
	fn erase_cut_buffer(&mut self) -> Result<(), SurfaceError>;

	/// Writes reply data (if any) and sends the completion notification.
	fn send_reply(&mut self, reply: &Reply) -> Result<(), SurfaceError>;

	/// Asks the current holder of the selection to convert it into `property` on our window.
	fn request_conversion(&mut self, target: Atom) -> Result<(), SurfaceError>;

	/// Returns the window currently holding input focus.
	fn input_focus(&mut self) -> Result<SavedFocus, SurfaceError>;

	/// Gives input focus to `focus`.
	fn set_input_focus(&mut self, focus: SavedFocus) -> Result<(), SurfaceError>;

	/// Root-relative pointer position.
	fn pointer_position(&mut self) -> Result<Point, SurfaceError>;

	/// Moves the pointer to root-relative coordinates.
	fn warp_pointer(&mut self, to: Point) -> Result<(), SurfaceError>;

	/// Grabs the pointer for the chooser window.
	fn grab_pointer(&mut self) -> Result<(), SurfaceError>;

	/// Releases a pointer grab.
	fn ungrab_pointer(&mut self) -> Result<(), SurfaceError>;

	/// Sizes, positions and maps the chooser. Drawing happens on expose.
	fn show_chooser(&mut self, view: &ChooserView) -> Result<(), SurfaceError>;

	/// Resizes and repaints a visible chooser.
	fn draw_chooser(&mut self, view: &ChooserView) -> Result<(), SurfaceError>;

	/// Unmaps the chooser.
	fn hide_chooser(&mut self) -> Result<(), SurfaceError>;

	/// Maps the flash popup near the pointer.
	fn show_flash(&mut self, view: &ChooserView) -> Result<(), SurfaceError>;

	/// Paints the flash popup.
	fn draw_flash(&mut self, view: &ChooserView) -> Result<(), SurfaceError>;

	/// Unmaps the flash popup.
	fn hide_flash(&mut self) -> Result<(), SurfaceError>;

	/// Synthesizes a middle-button press and release at the current pointer position.
	fn middle_click(&mut self) -> Result<(), SurfaceError>;
}
