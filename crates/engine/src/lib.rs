#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Selection mediation engine.
//!
//! Holds a small list of candidate strings and answers requests for the shared
//! selection by letting the user pick one of them. Everything that talks to the
//! windowing server goes through the [`Surface`] trait, so the whole state
//! machine runs against a recording fake in tests.
//!
//! # Architecture
//!
//! ```text
//! Event ──► Mediator::on_event
//!             ├── Arbiter::decide        answer / refuse / defer
//!             ├── Interaction            Idle → Pending → Showing → Answering
//!             ├── Ownership              acquire / release / stale checks
//!             ├── CandidateStore         append / delete / clear
//!             ├── Flash                  confirmation popup deadlines
//!             └── Relay                  synthetic middle-click delivery
//! ```

pub mod arbiter;
pub mod error;
/// Confirmation popup shown after the list changes.
pub mod flash;
pub mod hotkey;
pub mod interaction;
pub mod mediator;
pub mod options;
pub mod ownership;
pub mod protocol;
pub mod relay;
pub mod short_window;
pub mod store;
pub mod surface;

pub use arbiter::{Arbiter, Decision, RefuseReason};
pub use error::{Error, Result, SurfaceError};
pub use hotkey::{Hotkey, HotkeyAction, KeyName, Modifiers};
pub use interaction::{ChooserInput, ChooserKey, InteractionState, Resolution};
pub use mediator::{Event, LoopDirective, Mediator};
pub use options::{Delivery, Options};
pub use protocol::{Atom, KnownAtoms, Outcome, Point, Reply, ReplyData, SavedFocus, SelectionRequest, TargetKind, Timestamp, WindowId};
pub use relay::PasteDelegate;
pub use store::{Candidate, CandidateStore, MAX_CAPACITY};
pub use surface::{ChooserRow, ChooserView, Surface};
