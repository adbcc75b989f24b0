use crate::error::MalformedPayload;
use crate::value::State;
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifies one live [`DiffCollection`](crate::collection::DiffCollection)
/// for the duration of a request cycle.
///
/// Ids are process-unique and never reused, so a stale [`Anchor`] can be detected
/// by whoever resolves it. The id is not persisted; it dies with the cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CollectionId(NonZeroU64);

impl CollectionId {
	pub(crate) fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(1);
		let raw = NEXT.fetch_add(1, Ordering::Relaxed);
		Self(NonZeroU64::new(raw).expect("collection id counter wrapped"))
	}
}

/// Non-owning back-link from a node to the collection holding it.
///
/// Deliberately just a handle and an index: lookups like "find my containing
/// collection" resolve through whoever owns the collections, never through an
/// owning pointer, so node and owner cannot form an ownership cycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Anchor {
	pub owner: CollectionId,
	pub index: usize,
}

/// The state-manager seam: anything that can be told to start tracking, save
/// itself, or restore itself from a previously saved snapshot.
///
/// `save` takes `&mut self` because the full-save path dirties state as it walks.
pub trait Stateful {
	/// One-way, idempotent activation of change tracking.
	fn track(&mut self);

	fn is_tracking(&self) -> bool;

	/// Marks all currently stored state dirty, so the next [`Stateful::save`]
	/// re-emits it in full. Recurses into nested collections.
	fn mark_dirty(&mut self);

	/// `None` when there is nothing to persist.
	fn save(&mut self) -> Option<State>;

	/// Applies a snapshot previously produced by [`Stateful::save`] on a value of
	/// the same kind.
	///
	/// # Errors
	///
	/// [`MalformedPayload`] if the payload's shape does not match what `save`
	/// would have produced.
	fn restore(&mut self, state: &State) -> Result<(), MalformedPayload>;
}

/// A [`Stateful`] unit that can live inside a
/// [`DiffCollection`](crate::collection::DiffCollection).
pub trait Node: Stateful + Sized {
	/// Builds a node of the kind encoded in `state` and restores it, for the
	/// structural restore path that reconstructs a collection from scratch.
	///
	/// A [null](crate::value::State::null) payload denotes a node that had nothing
	/// to persist; kinds whose `save` can return `None` must rebuild a default
	/// node from it. Polymorphic kinds lead their payload with a
	/// [`Value::Tag`](crate::value::Value::Tag) and dispatch on it here.
	///
	/// # Errors
	///
	/// [`MalformedPayload`] on shape mismatch or an unknown kind tag.
	fn rebuild(state: &State) -> Result<Self, MalformedPayload>;

	/// The node's current back-link, `None` while detached.
	fn anchor(&self) -> Option<Anchor>;

	/// Called by the owning collection whenever the node is attached, detached or
	/// renumbered. Not meant to be called by anything else.
	fn set_anchor(&mut self, anchor: Option<Anchor>);

	/// Current index within the owning collection, `None` while detached.
	fn position(&self) -> Option<usize> {
		self.anchor().map(|anchor| anchor.index)
	}
}
