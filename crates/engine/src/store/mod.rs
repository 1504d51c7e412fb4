//! Ordered, capacity-bounded list of candidate strings.

use crate::error::{Error, Result};
use crate::surface::{CHOOSER_TITLE, ChooserRow, ChooserView};

/// Hard ceiling on the number of candidates, one per selection key.
pub const MAX_CAPACITY: usize = SELECTION_KEYS.len();

/// Keys that select candidates, in index order.
///
/// `d`, `q` and `s` are missing on purpose: they are chooser actions.
pub const SELECTION_KEYS: [char; 20] = [
	'1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
];

/// Returns the selection key for `index`.
pub fn key_for_index(index: usize) -> Option<char> {
	SELECTION_KEYS.get(index).copied()
}

/// Returns the index selected by `key`.
pub fn index_for_key(key: char) -> Option<usize> {
	SELECTION_KEYS.iter().position(|k| *k == key.to_ascii_lowercase())
}

/// A stored string, optionally split into a display label and a delivered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
	text: String,
	/// Byte offset of the separator in `text`.
	split: Option<usize>,
}

impl Candidate {
	/// Creates a candidate whose label and value are the whole string.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			split: None,
		}
	}

	/// Creates a candidate split at the first `separator`.
	pub fn with_separator(text: impl Into<String>, separator: Option<char>) -> Self {
		let text = text.into();
		let split = separator.and_then(|sep| text.find(sep));
		Self { text, split }
	}

	/// Full text as entered.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Text shown in the chooser.
	pub fn label(&self) -> &str {
		match self.split {
			Some(at) => &self.text[..at],
			None => &self.text,
		}
	}

	/// Text delivered to requesters.
	pub fn value(&self) -> &str {
		match self.split {
			Some(at) => {
				let sep_len = self.text[at..].chars().next().map_or(0, char::len_utf8);
				&self.text[at + sep_len..]
			}
			None => &self.text,
		}
	}
}

/// Ordered candidate list.
///
/// Indices are stable between mutations; [`CandidateStore::delete_at`] shifts
/// later entries down by one and keeps their relative order.
#[derive(Debug, Clone)]
pub struct CandidateStore {
	entries: Vec<Candidate>,
	capacity: usize,
}

impl Default for CandidateStore {
	fn default() -> Self {
		Self::new(MAX_CAPACITY)
	}
}

impl CandidateStore {
	/// Creates an empty store. `capacity` is clamped to `1..=MAX_CAPACITY`.
	pub fn new(capacity: usize) -> Self {
		let capacity = capacity.clamp(1, MAX_CAPACITY);
		Self {
			entries: Vec::with_capacity(capacity),
			capacity,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn is_full(&self) -> bool {
		self.entries.len() >= self.capacity
	}

	/// Appends a candidate; leaves the store unchanged when full.
	pub fn append(&mut self, candidate: Candidate) -> Result<()> {
		if self.is_full() {
			return Err(Error::CapacityExceeded {
				capacity: self.capacity,
			});
		}
		self.entries.push(candidate);
		Ok(())
	}

	/// Removes the candidate at `index`, compacting the rest.
	pub fn delete_at(&mut self, index: usize) -> Option<Candidate> {
		(index < self.entries.len()).then(|| self.entries.remove(index))
	}

	/// Removes the most recently appended candidate.
	pub fn delete_last(&mut self) -> Option<Candidate> {
		self.entries.pop()
	}

	/// Removes every candidate.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn get(&self, index: usize) -> Option<&Candidate> {
		self.entries.get(index)
	}

	/// Value delivered for the candidate at `index`.
	pub fn value(&self, index: usize) -> Option<&str> {
		self.get(index).map(Candidate::value)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
		self.entries.iter()
	}

	/// Builds the chooser contents with `highlighted` clamped to the list.
	pub fn view(&self, highlighted: usize) -> ChooserView {
		let rows = self
			.entries
			.iter()
			.zip(SELECTION_KEYS)
			.map(|(candidate, key)| ChooserRow {
				key,
				label: candidate.label().to_owned(),
			})
			.collect::<Vec<_>>();
		let highlighted = (!rows.is_empty()).then(|| highlighted.min(rows.len() - 1));
		ChooserView {
			title: CHOOSER_TITLE,
			rows,
			highlighted,
		}
	}
}
