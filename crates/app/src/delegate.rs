//! External program deciding whether a window accepts a relayed paste.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use multisel_engine::{PasteDelegate, WindowId};

/// Runs `<program> --dry-run <window>` with the value on stdin; exit status 0
/// means the window is eligible. A delegate that cannot be run vetoes the relay.
#[derive(Debug, Clone)]
pub struct CommandDelegate {
	program: PathBuf,
}

impl CommandDelegate {
	/// Resolves `program` through `PATH` unless it is already a path.
	pub fn resolve(program: &Path) -> Result<Self, which::Error> {
		let program = which::which(program)?;
		tracing::debug!(program = %program.display(), "Using paste delegate");
		Ok(Self { program })
	}

	fn run(&self, value: &str, destination: WindowId) -> std::io::Result<bool> {
		let mut child = Command::new(&self.program)
			.arg("--dry-run")
			.arg(format!("{:#x}", destination.0))
			.stdin(Stdio::piped())
			.stdout(Stdio::null())
			.spawn()?;
		if let Some(mut stdin) = child.stdin.take() {
			// The delegate may exit without reading the value.
			match stdin.write_all(value.as_bytes()) {
				Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
				other => other?,
			}
		}
		Ok(child.wait()?.success())
	}
}

impl PasteDelegate for CommandDelegate {
	fn is_eligible(&self, value: &str, destination: WindowId) -> bool {
		match self.run(value, destination) {
			Ok(eligible) => {
				tracing::debug!(?destination, eligible, "Paste delegate answered");
				eligible
			}
			Err(error) => {
				tracing::warn!(program = %self.program.display(), %error, "Paste delegate failed; answering directly");
				false
			}
		}
	}
}
