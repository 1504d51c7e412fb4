use std::time::Instant;

use super::Mediator;
use crate::arbiter::{Decision, RefuseReason, RequestContext};
use crate::error::Result;
use crate::interaction::PendingRequest;
use crate::protocol::{Atom, Outcome, Reply, ReplyData, SelectionRequest, TargetKind, latin1_lossy};
use crate::surface::Surface;

impl<S: Surface> Mediator<S> {
	pub(super) fn handle_request(&mut self, request: SelectionRequest, now: Instant) -> Result<()> {
		let atoms = *self.surface.atoms();
		let cx = RequestContext {
			own_window: self.surface.window(),
			atoms: &atoms,
			busy: self.interaction.is_busy(),
			chooser_active: !self.interaction.is_idle(),
			held: self.ownership.is_held(),
			stale: self.ownership.is_stale(request.time),
			now,
		};
		let decision = self.arbiter.decide(&request, &cx);
		tracing::debug!(
			requestor = ?request.requestor,
			target = ?atoms.classify(request.target),
			time = request.time.0,
			?decision,
			"Selection request"
		);

		match decision {
			Decision::Targets => self.reply_targets(&request),
			Decision::Answer(outcome) => self.deliver(&request, &outcome),
			Decision::Refuse(reason) => self.refuse(&request, reason),
			Decision::Defer => self.open_chooser(Some(PendingRequest {
				request,
				received_at: now,
			})),
		}
	}

	/// Answers `request` with `outcome`, degrading to a refusal when the
	/// outcome is a decline, the request is stale, or the target is not text.
	pub(super) fn deliver(&mut self, request: &SelectionRequest, outcome: &Outcome) -> Result<()> {
		let Some(value) = outcome.value() else {
			return self.refuse(request, RefuseReason::Declined);
		};
		if self.ownership.is_stale(request.time) {
			return self.refuse(request, RefuseReason::Stale);
		}

		let bytes = match self.surface.atoms().classify(request.target) {
			TargetKind::String => latin1_lossy(value),
			TargetKind::Utf8String => value.as_bytes().to_vec(),
			_ => return self.refuse(request, RefuseReason::UnsupportedTarget),
		};
		let property = self.destination(request);
		tracing::debug!(requestor = ?request.requestor, len = bytes.len(), "Sending selection");
		self.surface.send_reply(&Reply {
			requestor: request.requestor,
			selection: request.selection,
			target: request.target,
			property: Some(property),
			time: request.time,
			data: Some(ReplyData::Text {
				kind: request.target,
				bytes,
			}),
		})?;
		Ok(())
	}

	pub(super) fn reply_targets(&mut self, request: &SelectionRequest) -> Result<()> {
		let atoms = *self.surface.atoms();
		let property = self.destination(request);
		self.surface.send_reply(&Reply {
			requestor: request.requestor,
			selection: request.selection,
			target: request.target,
			property: Some(property),
			time: request.time,
			data: Some(ReplyData::Atoms {
				kind: atoms.atom,
				atoms: atoms.supported_targets(),
			}),
		})?;
		Ok(())
	}

	pub(super) fn refuse(&mut self, request: &SelectionRequest, reason: RefuseReason) -> Result<()> {
		tracing::debug!(requestor = ?request.requestor, ?reason, "Refusing selection request");
		self.surface.send_reply(&Reply::refusal(request))?;
		Ok(())
	}

	/// Resolves the destination slot; obsolete clients send none and get the target atom.
	fn destination(&self, request: &SelectionRequest) -> Atom {
		request.property.unwrap_or_else(|| {
			tracing::warn!(
				requestor = ?request.requestor,
				"Request without destination property; answering into the target atom, which the requestor may not read"
			);
			request.target
		})
	}
}
