//! Detection of other running instances by top-level window name.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt as _, Window};

use crate::error::X11Error;

/// Window name of a one-shot instance.
pub const INSTANCE_NAME: &str = "multisel";
/// Window name of a daemon instance.
pub const DAEMON_NAME: &str = "multiseld";

/// Returns true if a child of `root` other than `skip` is named `name`.
pub fn window_name_exists(conn: &impl Connection, root: Window, skip: Window, name: &str) -> Result<bool, X11Error> {
	let children = conn.query_tree(root)?.reply()?.children;
	for child in children.into_iter().filter(|&w| w != skip) {
		// Windows can vanish between the tree query and the property read.
		let Ok(reply) = conn
			.get_property(false, child, AtomEnum::WM_NAME, AtomEnum::STRING, 0, 64)?
			.reply()
		else {
			continue;
		};
		if reply.value == name.as_bytes() {
			tracing::debug!(window = child, name, "Found running instance");
			return Ok(true);
		}
	}
	Ok(false)
}
