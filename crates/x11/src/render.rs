//! Core-font rendering of the chooser and flash popup.

use multisel_engine::ChooserView;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{Char2b, ConnectionExt as _, CreateGCAux, Font, Gcontext, Rectangle, Screen, Window};

use crate::error::X11Error;
use crate::layout::{Metrics, PADDING, Size, row_text};

/// Longest string a single `ImageText16` request carries.
const MAX_TEXT: usize = 255;

/// Font and graphics contexts shared by both popups.
#[derive(Debug)]
pub struct Renderer {
	normal: Gcontext,
	inverse: Gcontext,
	metrics: Metrics,
}

impl Renderer {
	/// Opens `font_name` and creates black-on-white and white-on-black contexts.
	pub fn new(conn: &impl Connection, screen: &Screen, font_name: &str) -> Result<Self, X11Error> {
		let font: Font = conn.generate_id()?;
		conn.open_font(font, font_name.as_bytes())?.check().map_err(|source| X11Error::Font {
			name: font_name.to_owned(),
			source,
		})?;
		let info = conn.query_font(font)?.reply()?;
		let metrics = Metrics {
			ascent: info.font_ascent.max(0) as u16,
			descent: info.font_descent.max(0) as u16,
			char_width: info.max_bounds.character_width.max(1) as u16,
		};

		let normal = conn.generate_id()?;
		conn.create_gc(
			normal,
			screen.root,
			&CreateGCAux::new().foreground(screen.black_pixel).background(screen.white_pixel).font(font),
		)?;
		let inverse = conn.generate_id()?;
		conn.create_gc(
			inverse,
			screen.root,
			&CreateGCAux::new().foreground(screen.white_pixel).background(screen.black_pixel).font(font),
		)?;
		tracing::debug!(font = font_name, ?metrics, "Opened font");

		Ok(Self { normal, inverse, metrics })
	}

	pub fn metrics(&self) -> Metrics {
		self.metrics
	}

	/// Paints the title row and one row per candidate, inverting the highlighted one.
	pub fn draw(&self, conn: &impl Connection, window: Window, view: &ChooserView, size: Size) -> Result<(), X11Error> {
		let line = self.metrics.line_height() as i16;
		let ascent = self.metrics.ascent as i16;
		let x = PADDING as i16;

		conn.clear_area(false, window, 0, 0, size.width, size.height)?;
		conn.image_text16(window, self.normal, x, ascent, &to_char2b(view.title))?;

		for index in 0..view.rows.len() {
			let Some(text) = row_text(view, index) else {
				continue;
			};
			let top = (index as i16 + 1) * line;
			let gc = if view.highlighted == Some(index) {
				let band = Rectangle {
					x: 0,
					y: top,
					width: size.width,
					height: line as u16,
				};
				conn.poly_fill_rectangle(window, self.normal, &[band])?;
				self.inverse
			} else {
				self.normal
			};
			conn.image_text16(window, gc, x, top + ascent, &to_char2b(&text))?;
		}
		Ok(())
	}
}

/// Encodes `text` as 16-bit font indices. Characters outside the BMP become `?`.
pub fn to_char2b(text: &str) -> Vec<Char2b> {
	text.chars()
		.take(MAX_TEXT)
		.map(|ch| {
			let code = u16::try_from(u32::from(ch)).unwrap_or(u16::from(b'?'));
			let [byte1, byte2] = code.to_be_bytes();
			Char2b { byte1, byte2 }
		})
		.collect()
}
