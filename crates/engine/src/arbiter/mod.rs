//! Classification of inbound selection requests.
//!
//! [`Arbiter::decide`] applies the checks in a fixed order; the first that
//! matches wins:
//!
//! 1. requests from our own window are refused;
//! 2. `TARGETS` is answered at once, bypassing everything below;
//! 3. unsupported targets are refused (a timeout probe arms the replay first);
//! 4. while the chooser is in flight, new requests are refused;
//! 5. after a timeout probe, the last choice is replayed once;
//! 6. a relay whose click has fired, or an answer served to the same requestor within the
//!    short-time window, is replayed;
//! 7. requests older than the current ownership are refused;
//! 8. otherwise the request is deferred to the chooser.

use std::time::{Duration, Instant};

use crate::protocol::{KnownAtoms, Outcome, SelectionRequest, TargetKind, WindowId};
use crate::short_window::ShortTimeWindow;

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefuseReason {
	/// The request came from our own window.
	OwnRequest,
	/// The target is not a supported text format.
	UnsupportedTarget,
	/// Another request is already being handled.
	Busy,
	/// The request predates the current ownership.
	Stale,
	/// We do not hold the selection.
	NotOwner,
	/// The user declined.
	Declined,
	/// The value will be delivered to a fresh request provoked by a synthetic click.
	Relayed,
}

/// What to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
	/// Answer with the supported format list.
	Targets,
	/// Answer with an already-resolved outcome.
	Answer(Outcome),
	/// Refuse.
	Refuse(RefuseReason),
	/// Store as pending and open the chooser.
	Defer,
}

/// Read-only facts the arbiter consults.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
	pub own_window: WindowId,
	pub atoms: &'a KnownAtoms,
	/// A request is pending or the chooser is on screen.
	pub busy: bool,
	/// The chooser is not idle (it may still be unmapping).
	pub chooser_active: bool,
	pub held: bool,
	pub stale: bool,
	pub now: Instant,
}

/// An outcome waiting for the fresh request provoked by a synthetic click.
///
/// `expires` stays unset until the click has fired; before that the outcome
/// cannot be taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArmedRelay {
	pub(crate) outcome: Outcome,
	pub(crate) expires: Option<Instant>,
}

/// Decision state that survives across requests.
#[derive(Debug, Clone)]
pub struct Arbiter {
	window: ShortTimeWindow,
	/// A requester gave up on a request and will ask again.
	timeout_probe_seen: bool,
	last_choice: Option<Outcome>,
	relay: Option<ArmedRelay>,
}

impl Arbiter {
	pub fn new(short_window: Duration, clock_ceiling: Duration) -> Self {
		Self {
			window: ShortTimeWindow::new(short_window, clock_ceiling),
			timeout_probe_seen: false,
			last_choice: None,
			relay: None,
		}
	}

	/// Classifies `request`.
	pub fn decide(&mut self, request: &SelectionRequest, cx: &RequestContext<'_>) -> Decision {
		if request.requestor == cx.own_window {
			return Decision::Refuse(RefuseReason::OwnRequest);
		}

		let kind = cx.atoms.classify(request.target);
		if kind == TargetKind::Targets {
			return Decision::Targets;
		}
		if kind == TargetKind::TimeoutProbe {
			tracing::warn!(
				requestor = ?request.requestor,
				"Requester timed out waiting for the chooser; the next request replays the last choice"
			);
			self.timeout_probe_seen = true;
		}
		if !kind.is_text() {
			return Decision::Refuse(RefuseReason::UnsupportedTarget);
		}

		if cx.busy {
			return Decision::Refuse(RefuseReason::Busy);
		}

		if self.timeout_probe_seen {
			self.timeout_probe_seen = false;
			let outcome = self.last_choice.clone().unwrap_or(Outcome::Declined);
			self.window.record(request.requestor, cx.now, outcome.clone());
			return Decision::Answer(outcome);
		}

		if let Some(outcome) = self.take_relay(cx.now) {
			self.window.record(request.requestor, cx.now, outcome.clone());
			return Decision::Answer(outcome);
		}
		if let Some(outcome) = self.window.replay(request.requestor, cx.now) {
			return Decision::Answer(outcome);
		}

		if cx.stale {
			return Decision::Refuse(RefuseReason::Stale);
		}
		if !cx.held {
			return Decision::Refuse(RefuseReason::NotOwner);
		}
		if cx.chooser_active {
			return Decision::Refuse(RefuseReason::Busy);
		}

		Decision::Defer
	}

	/// Records the outcome of a finished interaction.
	pub fn record_choice(&mut self, outcome: Outcome) {
		self.last_choice = Some(outcome);
	}

	/// Records an answer served to `requestor`, opening the short-time window.
	pub fn record_served(&mut self, requestor: WindowId, at: Instant, outcome: Outcome) {
		self.window.record(requestor, at, outcome);
	}

	pub fn last_choice(&self) -> Option<&Outcome> {
		self.last_choice.as_ref()
	}

	/// Holds `outcome` for the request a synthetic click will provoke.
	///
	/// Nothing is answered from it until [`Self::relay_fired`].
	pub fn arm_relay(&mut self, outcome: Outcome) {
		self.relay = Some(ArmedRelay { outcome, expires: None });
	}

	/// The click went out: the next text request until `expires` receives the outcome.
	pub fn relay_fired(&mut self, expires: Instant) {
		if let Some(relay) = &mut self.relay {
			relay.expires = Some(expires);
		}
	}

	/// Drops an armed outcome whose click never went out.
	pub fn disarm_relay(&mut self) {
		if self.relay.as_ref().is_some_and(|r| r.expires.is_none()) {
			self.relay = None;
			tracing::debug!("Relay disarmed before the click");
		}
	}

	pub fn relay_deadline(&self) -> Option<Instant> {
		self.relay.as_ref().and_then(|r| r.expires)
	}

	/// Drops a fired relay whose fresh request never arrived.
	pub fn expire_relay(&mut self, now: Instant) -> bool {
		if self.relay_deadline().is_some_and(|expires| now >= expires) {
			self.relay = None;
			tracing::debug!("Relay expired without a fresh request; value not delivered");
			return true;
		}
		false
	}

	fn take_relay(&mut self, now: Instant) -> Option<Outcome> {
		let expires = self.relay_deadline()?;
		let relay = self.relay.take()?;
		(now < expires).then_some(relay.outcome)
	}
}
