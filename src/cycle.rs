//! Reference driver for the per-request lifecycle.
//!
//! The hosting framework owns the real call order; this module pins it down in
//! executable form and keeps the tests honest about it: restore the previous
//! cycle's payload, activate tracking, run user mutations, save exactly once.

use crate::error::MalformedPayload;
use crate::node::Stateful;
use crate::value::State;
use tracing::instrument;

/// Ambient request data, passed explicitly to the mutation callback instead of
/// living in process-wide state.
#[derive(Debug)]
pub struct CycleCx {
	replayed: bool,
}

impl CycleCx {
	/// Whether a previous cycle's payload was applied before tracking, i.e.
	/// whether this is a follow-up cycle rather than a first one.
	#[must_use]
	pub fn replayed(&self) -> bool {
		self.replayed
	}
}

/// Runs one full cycle over `subject`: restore `incoming` (when present), track,
/// mutate, save. Returns the payload to hand to the transport, `None` when
/// nothing needs persisting.
///
/// # Errors
///
/// [`MalformedPayload`] from the restore step; the subject should then be
/// discarded, which is also the correct handling for an abandoned cycle.
#[instrument(skip_all)]
pub fn run<S, F>(
	subject: &mut S,
	incoming: Option<&State>,
	mutate: F,
) -> Result<Option<State>, MalformedPayload>
where
	S: Stateful,
	F: FnOnce(&CycleCx, &mut S),
{
	if let Some(state) = incoming {
		subject.restore(state)?;
	}
	subject.track();
	let cx = CycleCx {
		replayed: incoming.is_some(),
	};
	mutate(&cx, subject);
	Ok(subject.save())
}
