//! Initial candidate strings.

use std::io::{self, BufRead};

/// Returns the seed strings: `args` as given, or up to `capacity` lines of
/// `stdin` when the only argument is `-`.
pub fn read_seeds(args: &[String], capacity: usize, stdin: impl BufRead) -> io::Result<Vec<String>> {
	let mut seeds = match args {
		[only] if only == "-" => stdin.lines().take(capacity).collect::<io::Result<Vec<_>>>()?,
		_ => args.to_vec(),
	};
	if seeds.len() > capacity {
		tracing::warn!(given = seeds.len(), capacity, "Too many strings; extra ones dropped");
		seeds.truncate(capacity);
	}
	Ok(seeds)
}
