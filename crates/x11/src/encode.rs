//! Text conversions between candidate strings and X11 property data.

use multisel_engine::{Atom, KnownAtoms};

/// Decodes captured selection data of type `kind`.
///
/// `UTF8_STRING` is read as UTF-8 (invalid sequences replaced), `STRING` as
/// Latin-1. One trailing newline is dropped. Other types and empty results
/// yield `None`.
pub fn decode_property(kind: Atom, value: &[u8], atoms: &KnownAtoms) -> Option<String> {
	let mut text = if kind == atoms.utf8_string {
		String::from_utf8_lossy(value).into_owned()
	} else if kind == atoms.string {
		value.iter().copied().map(char::from).collect()
	} else {
		tracing::debug!(kind = kind.0, "Unsupported captured property type");
		return None;
	};

	if text.ends_with('\n') {
		text.pop();
	}
	(!text.is_empty()).then_some(text)
}
