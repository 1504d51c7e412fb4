#![cfg_attr(test, allow(unused_crate_dependencies))]
//! X11 backend for the selection mediator.
//!
//! [`X11Surface`] implements the engine's [`Surface`](multisel_engine::Surface)
//! seam over an `x11rb` connection: the chooser window doubles as the PRIMARY
//! selection owner, a second override-redirect window carries the flash
//! popup, and synthetic clicks go through XTest. [`X11Surface::next_event`]
//! blocks on the connection with a deadline and hands back engine events.

mod atoms;
pub mod encode;
mod error;
mod events;
pub mod grabs;
pub mod instance;
pub mod keyboard;
pub mod layout;
mod render;
mod surface;

pub use error::X11Error;
pub use instance::{DAEMON_NAME, INSTANCE_NAME};
pub use surface::{X11Options, X11Surface};
