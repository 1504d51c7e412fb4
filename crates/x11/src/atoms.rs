use multisel_engine::{Atom, KnownAtoms};
use x11rb::protocol::xproto::AtomEnum;

// `_MULTISEL_TIMESTAMP` is appended to on our own window to obtain a server
// timestamp; `_MULTISEL_CAPTURE` receives capture conversions.
x11rb::atom_manager! {
	pub Atoms: AtomsCookie {
		TARGETS,
		UTF8_STRING,
		CUT_BUFFER0,
		TIMEOUT_PROBE: b"text/x-moz-text-internal",
		MULTISEL_TIMESTAMP: b"_MULTISEL_TIMESTAMP",
		MULTISEL_CAPTURE: b"_MULTISEL_CAPTURE",
	}
}

impl Atoms {
	pub fn known(&self) -> KnownAtoms {
		KnownAtoms {
			primary: Atom(AtomEnum::PRIMARY.into()),
			targets: Atom(self.TARGETS),
			string: Atom(AtomEnum::STRING.into()),
			utf8_string: Atom(self.UTF8_STRING),
			atom: Atom(AtomEnum::ATOM.into()),
			timeout_probe: Atom(self.TIMEOUT_PROBE),
		}
	}
}
