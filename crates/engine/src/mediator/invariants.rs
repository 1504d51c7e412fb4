use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use super::{Event, Mediator};
use crate::hotkey::HotkeyAction;
use crate::interaction::{ChooserInput, ChooserKey, InteractionState};
use crate::options::{Delivery, Options};
use crate::protocol::{Atom, Reply, ReplyData, SelectionRequest, Timestamp, WindowId};
use crate::relay::PasteDelegate;
use crate::test_support::{FakeSurface, SurfaceCall, test_atoms};

const PROPERTY: Atom = Atom(900);
const FIREFOX: WindowId = WindowId(0x80_0011);
const TERMINAL: WindowId = WindowId(0x90_0022);

fn mediator_with(options: Options, seeds: &[&str]) -> Mediator<FakeSurface> {
	let mut mediator = Mediator::new(FakeSurface::new(), options, seeds.iter().map(|s| (*s).to_owned()));
	mediator.start().unwrap();
	mediator.surface_mut().calls.clear();
	mediator
}

fn mediator(seeds: &[&str]) -> Mediator<FakeSurface> {
	mediator_with(Options::default(), seeds)
}

fn request(requestor: WindowId, target: Atom) -> SelectionRequest {
	SelectionRequest {
		requestor,
		selection: test_atoms().primary,
		target,
		property: Some(PROPERTY),
		time: Timestamp(2_000),
	}
}

fn text_request(requestor: WindowId) -> SelectionRequest {
	request(requestor, test_atoms().utf8_string)
}

fn key(ch: char) -> Event {
	Event::Input(ChooserInput::Key(ChooserKey::Char(ch)))
}

fn text_of(reply: &Reply) -> Option<&[u8]> {
	match &reply.data {
		Some(ReplyData::Text { bytes, .. }) => Some(bytes),
		_ => None,
	}
}

/// Drives a deferred request through expose, one input and unmap.
fn run_interaction(m: &mut Mediator<FakeSurface>, req: SelectionRequest, input: Event, now: Instant) {
	m.on_event(Event::SelectionRequest(req), now).unwrap();
	assert_eq!(m.state(), InteractionState::Pending);
	m.on_event(Event::ChooserExposed, now).unwrap();
	assert_eq!(m.state(), InteractionState::Showing);
	m.on_event(input, now).unwrap();
	assert_eq!(m.state(), InteractionState::Answering);
	let own = m.surface().window;
	m.on_event(Event::Unmapped(own), now).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
}

/// Must answer enumeration immediately and deliver the chosen candidate to the deferred request.
///
/// * Enforced in: `Arbiter::decide`, `Mediator::finalize`
/// * Failure symptom: requesters hang waiting for a format list or receive the wrong candidate.
#[test]
fn test_enumeration_then_choice_delivers_selected_candidate() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);
	let atoms = test_atoms();

	m.on_event(Event::SelectionRequest(request(TERMINAL, atoms.targets)), t0).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
	assert_eq!(
		m.surface().replies()[0].data,
		Some(ReplyData::Atoms {
			kind: atoms.atom,
			atoms: vec![atoms.targets, atoms.string, atoms.utf8_string],
		})
	);

	run_interaction(&mut m, text_request(TERMINAL), key('2'), t0);

	let replies = m.surface().replies();
	assert_eq!(replies.len(), 2);
	assert_eq!(text_of(replies[1]), Some(&b"beta"[..]));
	assert_eq!(replies[1].property, Some(PROPERTY));
}

/// Must replay a refusal inside the short window and reopen the chooser outside it.
///
/// * Enforced in: `ShortTimeWindow::replay`, `Arbiter::decide`
/// * Failure symptom: one paste gesture pops the chooser up several times.
#[test]
fn test_short_window_replays_refusal_then_reopens() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);

	run_interaction(&mut m, text_request(TERMINAL), key('z'), t0);
	assert!(m.surface().replies()[0].is_refusal());
	m.surface_mut().calls.clear();

	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0 + Duration::from_millis(5)).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
	assert_eq!(m.surface().replies().len(), 1);
	assert!(m.surface().replies()[0].is_refusal());

	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0 + Duration::from_millis(205)).unwrap();
	assert_eq!(m.state(), InteractionState::Pending);
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::ShowChooser(_))));
}

/// Must skip captures when the list is full and leave the list untouched.
///
/// * Enforced in: `Mediator::capture`, `CandidateStore::append`
/// * Failure symptom: the oldest or newest candidate is silently replaced.
#[test]
fn test_capture_at_capacity_leaves_store_unchanged() {
	let t0 = Instant::now();
	let options = Options {
		capacity: 2,
		..Options::default()
	};
	let mut m = mediator_with(options, &["one", "two"]);

	m.on_event(Event::Hotkey(HotkeyAction::Capture), t0).unwrap();
	assert!(m.surface().calls.is_empty());

	m.on_event(Event::Captured(Some("three".into())), t0).unwrap();
	let values = m.store().iter().map(|c| c.value()).collect::<Vec<_>>();
	assert_eq!(values, vec!["one", "two"]);
}

/// Must answer enumeration even while a request is pending.
///
/// * Enforced in: `Arbiter::decide`
/// * Failure symptom: format negotiation stalls behind an open chooser.
#[test]
fn test_enumeration_answered_while_pending() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.surface_mut().calls.clear();

	m.on_event(Event::SelectionRequest(request(FIREFOX, test_atoms().targets)), t0).unwrap();

	let replies = m.surface().replies();
	assert_eq!(replies.len(), 1);
	assert!(matches!(replies[0].data, Some(ReplyData::Atoms { .. })));
	assert_eq!(m.interaction().pending().map(|p| p.request.requestor), Some(TERMINAL));
}

/// Must refuse a second concurrent request with a completion instead of queueing it.
///
/// * Enforced in: `Arbiter::decide`, `Mediator::open_chooser`
/// * Failure symptom: the second requester blocks until its own timeout.
#[test]
fn test_concurrent_request_refused_not_queued() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();
	m.surface_mut().calls.clear();

	m.on_event(Event::SelectionRequest(text_request(FIREFOX)), t0).unwrap();

	let replies = m.surface().replies();
	assert_eq!(replies.len(), 1);
	assert_eq!(replies[0].requestor, FIREFOX);
	assert!(replies[0].is_refusal());
	assert_eq!(m.interaction().pending().map(|p| p.request.requestor), Some(TERMINAL));
}

/// Must refuse requests stamped before the latest acquisition, except the "now" sentinel.
///
/// * Enforced in: `Ownership::is_stale`, `Arbiter::decide`
/// * Failure symptom: a late request from a previous ownership period gets current data.
#[test]
fn test_stale_requests_refused_current_time_accepted() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);

	let mut stale = text_request(TERMINAL);
	stale.time = Timestamp(999);
	m.on_event(Event::SelectionRequest(stale), t0).unwrap();
	assert!(m.surface().replies()[0].is_refusal());
	assert_eq!(m.state(), InteractionState::Idle);

	let mut current = text_request(TERMINAL);
	current.time = Timestamp::CURRENT;
	m.on_event(Event::SelectionRequest(current), t0).unwrap();
	assert_eq!(m.state(), InteractionState::Pending);
}

/// Must restore focus only when our own chooser reports it is unmapped.
///
/// * Enforced in: `Mediator::on_unmapped`
/// * Failure symptom: focus jumps back while the chooser is still on screen.
#[test]
fn test_focus_restored_on_own_unmap_only() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	let saved = m.surface().focus;
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();
	m.on_event(key('1'), t0).unwrap();
	m.surface_mut().calls.clear();

	m.on_event(Event::Unmapped(WindowId(0x12_3456)), t0).unwrap();
	assert_eq!(m.state(), InteractionState::Answering);
	assert!(m.surface().calls.is_empty());

	let own = m.surface().window;
	m.on_event(Event::Unmapped(own), t0).unwrap();
	assert_eq!(m.surface().calls, vec![SurfaceCall::SetFocus(saved), SurfaceCall::UngrabPointer]);
	assert_eq!(m.interaction().saved_focus(), None);
}

/// Must refuse the deferred request, click after unmap and answer the fresh request from the armed outcome.
///
/// * Enforced in: `Mediator::finalize`, `Relay::fire`, `Arbiter::decide`
/// * Failure symptom: requesters that ignore late answers never receive the choice.
#[test]
fn test_relay_answers_fresh_request_after_click() {
	let t0 = Instant::now();
	let options = Options {
		delivery: Delivery::Relay,
		..Options::default()
	};
	let mut m = mediator_with(options, &["alpha", "beta"]);
	let pointer = m.surface().pointer;

	run_interaction(&mut m, text_request(FIREFOX), key('1'), t0);

	let calls = m.surface_mut().take_calls();
	let replies = calls.iter().filter(|c| matches!(c, SurfaceCall::Reply(_))).count();
	assert_eq!(replies, 1);
	assert!(calls.iter().any(|c| matches!(c, SurfaceCall::Reply(r) if r.is_refusal())));
	assert_eq!(&calls[calls.len() - 2..], &[SurfaceCall::WarpPointer(pointer), SurfaceCall::MiddleClick]);

	let directive = m.pump(t0 + Duration::from_millis(10)).unwrap();
	assert_eq!(directive.poll_timeout, Some(Duration::from_millis(990)));

	m.on_event(Event::SelectionRequest(text_request(FIREFOX)), t0 + Duration::from_millis(30)).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
	assert_eq!(text_of(m.surface().replies()[0]), Some(&b"alpha"[..]));
}

/// Must fall back to a direct answer when the delegate rejects the destination.
///
/// * Enforced in: `should_relay`
/// * Failure symptom: a relay click lands in a window that cannot paste.
#[test]
fn test_delegate_veto_answers_directly() {
	struct Never;
	impl PasteDelegate for Never {
		fn is_eligible(&self, _value: &str, _destination: WindowId) -> bool {
			false
		}
	}

	let t0 = Instant::now();
	let options = Options {
		delivery: Delivery::Relay,
		..Options::default()
	};
	let mut m = mediator_with(options, &["alpha"]).with_delegate(Box::new(Never));

	run_interaction(&mut m, text_request(TERMINAL), key('1'), t0);

	assert_eq!(text_of(m.surface().replies()[0]), Some(&b"alpha"[..]));
	assert!(!m.surface().calls.contains(&SurfaceCall::MiddleClick));
}

/// Must answer every text request with the last choice once the timeout probe was seen.
///
/// * Enforced in: `Arbiter::decide`
/// * Failure symptom: the browser re-requests and the chooser pops up a second time.
#[test]
fn test_timeout_probe_switches_to_last_choice() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);
	run_interaction(&mut m, text_request(FIREFOX), key('2'), t0);
	m.surface_mut().calls.clear();

	let probe = request(FIREFOX, test_atoms().timeout_probe);
	m.on_event(Event::SelectionRequest(probe), t0).unwrap();
	assert!(m.surface().replies()[0].is_refusal());

	m.on_event(Event::SelectionRequest(text_request(FIREFOX)), t0 + Duration::from_secs(5)).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
	assert_eq!(text_of(m.surface().replies()[1]), Some(&b"beta"[..]));
}

/// Must clear the list, release ownership and exit only after the chooser unmaps.
///
/// * Enforced in: `Mediator::on_input`, `Mediator::on_unmapped`
/// * Failure symptom: the process exits with the chooser still grabbed.
#[test]
fn test_quit_exits_after_unmap() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();

	let directive = m.on_event(key('q'), t0).unwrap();
	assert!(!directive.should_quit);
	assert!(m.store().is_empty());
	assert!(!m.ownership().is_held());
	assert!(m.surface().calls.contains(&SurfaceCall::SetOwner(None)));
	assert!(m.surface().replies()[0].is_refusal());

	let own = m.surface().window;
	let directive = m.on_event(Event::Unmapped(own), t0).unwrap();
	assert!(directive.should_quit);
}

/// Must keep the chooser open after deleting one of several candidates.
///
/// * Enforced in: `Mediator::on_input`
/// * Failure symptom: deleting a stale entry also cancels the pending paste.
#[test]
fn test_delete_highlighted_keeps_chooser_open() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta", "gamma"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();

	m.on_event(Event::Input(ChooserInput::Key(ChooserKey::Down)), t0).unwrap();
	m.on_event(Event::Input(ChooserInput::Key(ChooserKey::Delete)), t0).unwrap();

	assert_eq!(m.state(), InteractionState::Showing);
	let values = m.store().iter().map(|c| c.value()).collect::<Vec<_>>();
	assert_eq!(values, vec!["alpha", "gamma"]);

	m.on_event(Event::Input(ChooserInput::Key(ChooserKey::Enter)), t0).unwrap();
	assert_eq!(text_of(m.surface().replies()[0]), Some(&b"gamma"[..]));
}

/// Must request a conversion, append the text, reclaim ownership at two entries and flash.
///
/// * Enforced in: `Mediator::capture`, `Mediator::on_captured`
/// * Failure symptom: captured text is not offered on the next paste.
#[test]
fn test_capture_appends_reacquires_and_flashes() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionClear, t0).unwrap();
	assert!(!m.ownership().is_held());

	m.on_event(Event::Hotkey(HotkeyAction::Capture), t0).unwrap();
	assert!(m.surface().calls.contains(&SurfaceCall::RequestConversion(test_atoms().utf8_string)));

	let directive = m.on_event(Event::Captured(Some("beta".into())), t0).unwrap();
	assert_eq!(m.store().len(), 2);
	assert!(m.ownership().is_held());
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::ShowFlash(view)) if view.rows.len() == 2));
	assert_eq!(directive.poll_timeout, Some(Duration::from_millis(1000)));

	m.on_event(Event::FlashExposed, t0 + Duration::from_millis(100)).unwrap();
	let directive = m.pump(t0 + Duration::from_millis(200)).unwrap();
	assert_eq!(directive.poll_timeout, Some(Duration::from_millis(400)));

	let directive = m.pump(t0 + Duration::from_millis(600)).unwrap();
	assert_eq!(directive.poll_timeout, None);
	assert_eq!(m.surface().calls.last(), Some(&SurfaceCall::HideFlash));
}

/// Must ignore empty or refused captures.
///
/// * Enforced in: `Mediator::on_captured`
/// * Failure symptom: blank rows appear in the chooser.
#[test]
fn test_empty_capture_ignored() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::Captured(None), t0).unwrap();
	m.on_event(Event::Captured(Some(String::new())), t0).unwrap();
	assert_eq!(m.store().len(), 1);
	assert!(m.surface().calls.is_empty());
}

/// Must exit on ownership loss only when a daemon instance takes over.
///
/// * Enforced in: `Mediator::on_selection_clear`
/// * Failure symptom: stray one-shot instances pile up or the only instance vanishes.
#[test]
fn test_selection_clear_exits_only_with_daemon_present() {
	let t0 = Instant::now();
	let mut alone = mediator(&["alpha"]);
	assert!(!alone.on_event(Event::SelectionClear, t0).unwrap().should_quit);

	let options = Options {
		daemon_present: true,
		..Options::default()
	};
	let mut deferring = mediator_with(options, &["alpha"]);
	assert!(deferring.on_event(Event::SelectionClear, t0).unwrap().should_quit);
}

/// Must capture the new selection when a daemon loses ownership.
///
/// * Enforced in: `Mediator::on_selection_clear`
/// * Failure symptom: the daemon misses selections made in other clients.
#[test]
fn test_daemon_captures_on_selection_clear() {
	let t0 = Instant::now();
	let options = Options {
		daemon: true,
		..Options::default()
	};
	let mut m = mediator_with(options, &[]);
	m.on_event(Event::SelectionClear, t0).unwrap();
	assert!(m.surface().calls.contains(&SurfaceCall::RequestConversion(test_atoms().utf8_string)));

	m.on_event(Event::Captured(Some("fresh".into())), t0).unwrap();
	assert!(m.ownership().is_held());
	assert_eq!(m.store().value(0), Some("fresh"));
}

/// Must refuse the pending request when ownership is lost mid-interaction.
///
/// * Enforced in: `Mediator::abort_interaction`
/// * Failure symptom: a requester waits forever on a chooser we no longer back.
#[test]
fn test_selection_clear_refuses_pending_request() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();

	m.on_event(Event::SelectionClear, t0).unwrap();

	assert_eq!(m.state(), InteractionState::Answering);
	assert!(m.surface().replies()[0].is_refusal());
	assert!(m.interaction().pending().is_none());
}

/// Must record a user-invoked choice without sending any reply.
///
/// * Enforced in: `Mediator::finalize`
/// * Failure symptom: an unsolicited completion reaches a random client.
#[test]
fn test_open_hotkey_chooses_without_reply() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);
	m.on_event(Event::Hotkey(HotkeyAction::Open), t0).unwrap();
	assert_eq!(m.state(), InteractionState::Pending);
	m.on_event(Event::ChooserExposed, t0).unwrap();
	m.on_event(key('2'), t0).unwrap();

	assert!(m.surface().replies().is_empty());
	assert_eq!(m.state(), InteractionState::Answering);
}

/// Must send a completion for every request still owed at shutdown.
///
/// * Enforced in: `Mediator::shutdown`
/// * Failure symptom: the requester blocks after we exit.
#[test]
fn test_shutdown_refuses_pending_and_releases() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();

	m.shutdown().unwrap();

	assert!(m.surface().replies()[0].is_refusal());
	assert_eq!(m.surface().calls.last(), Some(&SurfaceCall::SetOwner(None)));
	assert!(!m.ownership().is_held());
}

/// Must keep refusing a requester that re-asks before the relay click, then answer the click's request.
///
/// * Enforced in: `Mediator::finalize`, `Mediator::on_unmapped`, `Arbiter::relay_fired`
/// * Failure symptom: the requester's own retry swallows the relayed value and the click reopens the chooser.
#[test]
fn test_relay_reask_before_click_is_refused() {
	let t0 = Instant::now();
	let options = Options {
		delivery: Delivery::Relay,
		..Options::default()
	};
	let mut m = mediator_with(options, &["alpha", "beta"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();
	m.on_event(key('1'), t0).unwrap();

	let retry = request(TERMINAL, test_atoms().string);
	m.on_event(Event::SelectionRequest(retry), t0 + Duration::from_millis(1)).unwrap();
	assert_eq!(m.surface().replies().len(), 2);
	assert!(m.surface().replies().iter().all(|r| r.is_refusal()));

	let own = m.surface().window;
	m.on_event(Event::Unmapped(own), t0 + Duration::from_millis(2)).unwrap();
	assert!(m.surface().calls.contains(&SurfaceCall::MiddleClick));
	m.surface_mut().calls.clear();

	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0 + Duration::from_millis(120)).unwrap();
	assert_eq!(m.state(), InteractionState::Idle);
	assert_eq!(text_of(m.surface().replies()[0]), Some(&b"alpha"[..]));
}

/// Must keep the chooser open when a daemon deletes its last candidate.
///
/// * Enforced in: `Mediator::on_input`
/// * Failure symptom: a daemon drops the selection and the pending paste on an empty list.
#[test]
fn test_daemon_delete_of_last_candidate_keeps_chooser_open() {
	let t0 = Instant::now();
	let options = Options {
		daemon: true,
		..Options::default()
	};
	let mut m = mediator_with(options, &["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();

	m.on_event(Event::Input(ChooserInput::Key(ChooserKey::Delete)), t0).unwrap();

	assert_eq!(m.state(), InteractionState::Showing);
	assert!(m.store().is_empty());
	assert!(m.ownership().is_held());
	assert!(m.surface().replies().is_empty());
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::DrawChooser(view)) if view.rows.is_empty()));
}

/// Must release ownership and flash after deleting the only candidate outside daemon mode.
///
/// * Enforced in: `Mediator::on_input`, `Mediator::on_unmapped`
/// * Failure symptom: an empty list keeps the selection, or the user gets no feedback.
#[test]
fn test_delete_of_last_candidate_releases_and_flashes() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	run_interaction(&mut m, text_request(TERMINAL), Event::Input(ChooserInput::Key(ChooserKey::Delete)), t0);

	assert!(m.store().is_empty());
	assert!(!m.ownership().is_held());
	assert!(m.surface().replies()[0].is_refusal());
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::ShowFlash(view)) if view.rows.is_empty()));
}

/// Must drop the last candidate on `s`, refuse the request and flash the shorter list.
///
/// * Enforced in: `Mediator::on_input`, `Mediator::on_unmapped`
/// * Failure symptom: the removed entry keeps being offered or the list change goes unnoticed.
#[test]
fn test_delete_last_refuses_and_flashes() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta", "gamma"]);
	run_interaction(&mut m, text_request(TERMINAL), key('s'), t0);

	let values = m.store().iter().map(|c| c.value()).collect::<Vec<_>>();
	assert_eq!(values, vec!["alpha", "beta"]);
	assert!(m.ownership().is_held());
	assert!(m.surface().replies()[0].is_refusal());
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::ShowFlash(view)) if view.rows.len() == 2));
}

/// Must release ownership when `s` removes the only candidate.
///
/// * Enforced in: `Mediator::on_input`
/// * Failure symptom: later pastes pop up an empty chooser.
#[test]
fn test_delete_last_of_single_candidate_releases() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	run_interaction(&mut m, text_request(TERMINAL), key('s'), t0);

	assert!(m.store().is_empty());
	assert!(!m.ownership().is_held());
	assert!(m.surface().calls.contains(&SurfaceCall::SetOwner(None)));
}

/// Must clear the list on `d`, release ownership, refuse the request and flash.
///
/// * Enforced in: `Mediator::on_input`, `Mediator::on_unmapped`
/// * Failure symptom: cleared entries are still served, or the requester hangs.
#[test]
fn test_clear_all_releases_refuses_and_flashes() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);
	run_interaction(&mut m, text_request(TERMINAL), key('d'), t0);

	assert!(m.store().is_empty());
	assert!(!m.ownership().is_held());
	assert!(m.surface().calls.contains(&SurfaceCall::SetOwner(None)));
	assert_eq!(m.surface().replies().len(), 1);
	assert!(m.surface().replies()[0].is_refusal());
	assert!(matches!(m.surface().calls.last(), Some(SurfaceCall::ShowFlash(_))));
	assert!(!m.should_quit());
}

/// Must refuse the pending request when reclaiming the selection after a capture fails.
///
/// * Enforced in: `Mediator::on_captured`
/// * Failure symptom: a value is later sent for a selection we no longer own.
#[test]
fn test_capture_reclaim_denied_refuses_pending_request() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	m.on_event(Event::SelectionRequest(text_request(TERMINAL)), t0).unwrap();
	m.on_event(Event::ChooserExposed, t0).unwrap();
	m.surface_mut().steal_ownership = Some(FIREFOX);

	m.on_event(Event::Captured(Some("gamma".into())), t0).unwrap();

	assert!(!m.ownership().is_held());
	assert!(m.interaction().pending().is_none());
	assert_eq!(m.state(), InteractionState::Answering);
	assert_eq!(m.surface().replies().len(), 1);
	assert!(m.surface().replies()[0].is_refusal());
}

/// Must answer a request without a destination property into its target atom.
///
/// * Enforced in: `Mediator::deliver`
/// * Failure symptom: obsolete clients never get a completion.
#[test]
fn test_missing_destination_answers_into_target() {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha"]);
	let mut req = text_request(TERMINAL);
	req.property = None;

	run_interaction(&mut m, req, key('1'), t0);

	let reply = m.surface().replies()[0];
	assert_eq!(reply.property, Some(test_atoms().utf8_string));
	assert_eq!(text_of(reply), Some(&b"alpha"[..]));
}

/// Must refuse the request on Escape or a click outside every row.
///
/// * Enforced in: `Interaction::interpret`, `Mediator::finalize`
/// * Failure symptom: dismissing the chooser pastes a candidate anyway.
#[rstest::rstest]
#[case::escape(Event::Input(ChooserInput::Key(ChooserKey::Escape)))]
#[case::click_outside(Event::Input(ChooserInput::Click { row: None }))]
fn test_dismissal_refuses(#[case] input: Event) {
	let t0 = Instant::now();
	let mut m = mediator(&["alpha", "beta"]);
	run_interaction(&mut m, text_request(TERMINAL), input, t0);

	assert_eq!(m.surface().replies().len(), 1);
	assert!(m.surface().replies()[0].is_refusal());
	assert_eq!(m.store().len(), 2);
	assert!(m.ownership().is_held());
	assert!(!m.surface().calls.iter().any(|c| matches!(c, SurfaceCall::ShowFlash(_))));
}
