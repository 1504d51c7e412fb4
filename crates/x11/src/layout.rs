//! Chooser geometry: sizing, placement near the pointer, and row hit-testing.

use multisel_engine::{ChooserView, Point};

/// Gap between the pointer and the chooser edge.
pub const POINTER_GAP: i32 = 10;
/// Horizontal text padding inside the chooser.
pub const PADDING: u16 = 4;

/// Font cell metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
	pub ascent: u16,
	pub descent: u16,
	pub char_width: u16,
}

impl Metrics {
	pub fn line_height(&self) -> u16 {
		(self.ascent + self.descent).max(1)
	}
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
	pub width: u16,
	pub height: u16,
}

/// Root-relative top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
	pub x: i16,
	pub y: i16,
}

/// Text of the row at `index`, prefixed with its selection key.
pub fn row_text(view: &ChooserView, index: usize) -> Option<String> {
	view.rows.get(index).map(|row| format!("{}: {}", row.key, row.label))
}

/// One title row plus one row per candidate, wide enough for the longest line.
pub fn chooser_size(view: &ChooserView, metrics: Metrics, screen: Size) -> Size {
	let columns = (0..view.rows.len())
		.filter_map(|i| row_text(view, i))
		.map(|text| text.chars().count())
		.chain([view.title.chars().count()])
		.max()
		.unwrap_or(0);
	let width = (columns as u32 * u32::from(metrics.char_width) + 2 * u32::from(PADDING)).min(u32::from(screen.width.max(1)));
	let height = ((view.rows.len() as u32 + 1) * u32::from(metrics.line_height())).min(u32::from(screen.height.max(1)));
	Size {
		width: width as u16,
		height: height as u16,
	}
}

/// Centres `size` horizontally on the pointer, below it unless that overflows
/// the screen bottom, and keeps it inside the screen.
pub fn place_at_pointer(pointer: Point, size: Size, screen: Size) -> Position {
	let (w, h) = (i32::from(size.width), i32::from(size.height));
	let (sw, sh) = (i32::from(screen.width), i32::from(screen.height));
	let (px, py) = (i32::from(pointer.x), i32::from(pointer.y));

	let x = (px - w / 2).clamp(0, (sw - w).max(0));
	let below = py + POINTER_GAP;
	let y = if below + h > sh { (py - POINTER_GAP - h).max(0) } else { below };

	Position {
		x: x as i16,
		y: y as i16,
	}
}

/// Candidate index under window-relative coordinates. The title row and
/// anything outside the window map to `None`.
pub fn row_at(x: i16, y: i16, size: Size, rows: usize, metrics: Metrics) -> Option<usize> {
	if x < 0 || y < 0 || x as u16 >= size.width || y as u16 >= size.height {
		return None;
	}
	let line = usize::from(y as u16 / metrics.line_height());
	line.checked_sub(1).filter(|&row| row < rows)
}
