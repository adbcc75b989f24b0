use crate::decode;
use crate::error::MalformedPayload;
use crate::node::{Anchor, CollectionId, Node, Stateful};
use crate::value::{State, Value};
use core::ops::Index;
use core::slice;
use tracing::{instrument, trace, warn};

/// An ordered sequence of trackable nodes that persists itself either as a full
/// snapshot or, when no structural edit occurred since tracking was activated, as
/// a sparse set of `(baseline index, node delta)` pairs layered on a remembered
/// baseline.
///
/// # Correct use
///
/// One instance lives exactly one request cycle: restore it from the previous
/// cycle's payload (if any), [`track`](DiffCollection::track) it, mutate it freely,
/// [`save`](DiffCollection::save) it once, then discard it. The next cycle builds a
/// fresh instance from the new payload. Nothing is shared across cycles except the
/// payload itself, which must be treated as immutable data.
///
/// The rendering side only ever needs the plain read surface (iteration and
/// indexing); baseline and dirty flags stay hidden.
#[derive(Debug)]
pub struct DiffCollection<T> {
	id: CollectionId,
	nodes: Vec<T>,
	/// Identity of each node in `nodes`, index-parallel. Assigned on attach,
	/// never reused within the collection.
	ids: Vec<u64>,
	next_id: u64,
	tracking: bool,
	/// Node identities captured the moment tracking was activated.
	baseline: Vec<u64>,
	structural_dirty: bool,
	/// Whether the collection held any node at any point this cycle.
	ever_populated: bool,
}

impl<T: Node> DiffCollection<T> {
	#[must_use]
	pub fn new() -> Self {
		Self {
			id: CollectionId::next(),
			nodes: Vec::new(),
			ids: Vec::new(),
			next_id: 0,
			tracking: false,
			baseline: Vec::new(),
			structural_dirty: false,
			ever_populated: false,
		}
	}

	/// Handle other components may keep as a non-owning back-reference.
	#[must_use]
	pub fn id(&self) -> CollectionId {
		self.id
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&T> {
		self.nodes.get(index)
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		self.nodes.get_mut(index)
	}

	pub fn iter(&self) -> slice::Iter<'_, T> {
		self.nodes.iter()
	}

	pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
		self.nodes.iter_mut()
	}

	#[must_use]
	pub fn is_tracking(&self) -> bool {
		self.tracking
	}

	/// Activates tracking: captures the baseline from the current nodes (by
	/// identity, not by value) and recursively activates tracking on each of them.
	/// Calling it again within the same cycle is a no-op; the baseline is captured
	/// only the first time.
	pub fn track(&mut self) {
		if self.tracking {
			return;
		}
		self.tracking = true;
		self.baseline = self.ids.clone();
		if !self.nodes.is_empty() {
			self.ever_populated = true;
		}
		for node in &mut self.nodes {
			node.track();
		}
	}

	/// Appends `node`. A structural edit while tracking.
	pub fn add(&mut self, node: T) {
		self.insert(self.nodes.len(), node);
	}

	/// Inserts `node` at `index`, renumbering the anchors of every node at or
	/// behind it atomically with the edit. While tracking, this flips the
	/// collection into the dirty state for the rest of the cycle and activates
	/// tracking on the new node, so its own saved state is well-defined.
	///
	/// # Panics
	///
	/// If `index > len`.
	pub fn insert(&mut self, index: usize, node: T) {
		self.nodes.insert(index, node);
		let id = self.next_id;
		self.next_id += 1;
		self.ids.insert(index, id);
		self.ever_populated = true;
		self.reanchor_from(index);
		if self.tracking {
			self.structural_dirty = true;
			self.nodes[index].track();
		}
	}

	/// Removes and returns the node at `index`, renumbering the rest. A node
	/// removed in the same cycle it was added is still a structural edit, not a
	/// no-op.
	///
	/// # Panics
	///
	/// If `index >= len`.
	pub fn remove(&mut self, index: usize) -> T {
		let mut node = self.nodes.remove(index);
		self.ids.remove(index);
		node.set_anchor(None);
		self.reanchor_from(index);
		if self.tracking {
			self.structural_dirty = true;
		}
		node
	}

	/// Moves the node at `from` so it ends up at index `to`, keeping its identity.
	/// A structural edit while tracking.
	///
	/// # Panics
	///
	/// If `from >= len` or `to >= len`.
	pub fn move_item(&mut self, from: usize, to: usize) {
		// Transient detach: the node does not outlive the move.
		let node = self.nodes.remove(from);
		let id = self.ids.remove(from);
		self.nodes.insert(to, node);
		self.ids.insert(to, id);
		self.reanchor_from(from.min(to));
		if self.tracking {
			self.structural_dirty = true;
		}
	}

	/// Detaches every node. A structural edit while tracking.
	pub fn clear(&mut self) {
		for node in &mut self.nodes {
			node.set_anchor(None);
		}
		self.nodes.clear();
		self.ids.clear();
		if self.tracking {
			self.structural_dirty = true;
		}
	}

	/// Forces the full-snapshot path for the rest of the cycle, as if a structural
	/// edit had happened.
	pub fn set_dirty(&mut self) {
		self.structural_dirty = true;
	}

	fn reanchor_from(&mut self, start: usize) {
		let owner = self.id;
		for (offset, node) in self.nodes[start..].iter_mut().enumerate() {
			node.set_anchor(Some(Anchor {
				owner,
				index: start + offset,
			}));
		}
	}

	/// Produces this cycle's payload.
	///
	/// After a structural edit the whole list is re-sent in current order, each
	/// node in full, behind a `true` marker; per-node identity correlation to the
	/// baseline is unreliable once structure changed. Otherwise only nodes with
	/// dirty state contribute, each paired with its baseline index behind a `false`
	/// marker, and the node's whole dirty state is re-sent rather than a per-field
	/// diff against the baseline value.
	///
	/// Returns `None` when there is nothing to persist: the collection was never
	/// tracked, no node changed on the clean path, or the collection is empty and
	/// was never non-empty this cycle.
	#[instrument(skip(self))]
	pub fn save(&mut self) -> Option<State> {
		if !self.tracking {
			trace!("never tracked this cycle; nothing to persist");
			return None;
		}
		if self.structural_dirty {
			self.save_all()
		} else {
			self.save_deltas()
		}
	}

	fn save_all(&mut self) -> Option<State> {
		if self.nodes.is_empty() && !self.ever_populated {
			return None;
		}
		let mut payload = Vec::with_capacity(self.nodes.len() + 1);
		payload.push(State::scalar(true));
		for node in &mut self.nodes {
			node.mark_dirty();
			payload.push(node.save().unwrap_or_else(State::null));
		}
		trace!(nodes = self.nodes.len(), "full snapshot");
		Some(State::List(payload))
	}

	fn save_deltas(&mut self) -> Option<State> {
		// Clean means no structural edit, so current order equals baseline order
		// and each node's baseline index is its current index.
		debug_assert_eq!(
			self.ids, self.baseline,
			"clean collection diverged from its baseline"
		);
		let mut payload = vec![State::scalar(false)];
		for (index, node) in self.nodes.iter_mut().enumerate() {
			if let Some(delta) = node.save() {
				payload.push(State::List(vec![
					State::Value(Value::Uint(index as u64)),
					delta,
				]));
			}
		}
		if payload.len() == 1 {
			return None;
		}
		trace!(deltas = payload.len() - 1, "differential snapshot");
		Some(State::List(payload))
	}

	/// Applies a payload previously produced by [`DiffCollection::save`], before
	/// tracking is activated for the new cycle.
	///
	/// A `true` structural marker fully rebuilds the collection from the payload.
	/// A `false` marker restores each mentioned node in place, located by its
	/// baseline index; nodes not mentioned are left untouched.
	///
	/// # Errors
	///
	/// [`MalformedPayload`] on any shape mismatch, unexpected marker value or
	/// baseline index outside the current node range. The framework boundary is
	/// expected to treat this as fatal for the request.
	#[instrument(skip(self, state))]
	pub fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		let items = decode::list_at_least(state, 1)?;
		let structural = decode::marker(&items[0])?;
		if structural {
			let mut fresh = Vec::with_capacity(items.len() - 1);
			for entry in &items[1..] {
				fresh.push(T::rebuild(entry)?);
			}
			self.clear();
			for node in fresh {
				self.add(node);
			}
			trace!(nodes = self.nodes.len(), "rebuilt from full snapshot");
		} else {
			for entry in &items[1..] {
				let (index, delta) = decode::pair(entry)?;
				let raw = decode::uint(index)?;
				let len = self.nodes.len();
				let node = usize::try_from(raw)
					.ok()
					.and_then(|index| self.nodes.get_mut(index))
					.ok_or_else(|| {
						warn!(index = raw, len, "delta entry targets a node that is not present");
						MalformedPayload::IndexOutOfRange { index: raw, len }
					})?;
				node.restore(delta)?;
			}
			trace!(deltas = items.len() - 1, "applied differential snapshot");
		}
		Ok(())
	}
}

impl<T: Node> Default for DiffCollection<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Node> Stateful for DiffCollection<T> {
	fn track(&mut self) {
		DiffCollection::track(self);
	}

	fn is_tracking(&self) -> bool {
		DiffCollection::is_tracking(self)
	}

	fn mark_dirty(&mut self) {
		self.set_dirty();
		for node in &mut self.nodes {
			node.mark_dirty();
		}
	}

	fn save(&mut self) -> Option<State> {
		DiffCollection::save(self)
	}

	fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		DiffCollection::restore(self, state)
	}
}

impl<T: Node> FromIterator<T> for DiffCollection<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut collection = Self::new();
		for node in iter {
			collection.add(node);
		}
		collection
	}
}

impl<T: Node> Index<usize> for DiffCollection<T> {
	type Output = T;

	fn index(&self, index: usize) -> &T {
		&self.nodes[index]
	}
}

impl<'a, T: Node> IntoIterator for &'a DiffCollection<T> {
	type Item = &'a T;
	type IntoIter = slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.nodes.iter()
	}
}

impl<'a, T: Node> IntoIterator for &'a mut DiffCollection<T> {
	type Item = &'a mut T;
	type IntoIter = slice::IterMut<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.nodes.iter_mut()
	}
}

/// Node-for-node comparison; identity bookkeeping, baseline and flags are ignored.
impl<T: Node + PartialEq> PartialEq for DiffCollection<T> {
	fn eq(&self, other: &Self) -> bool {
		self.nodes == other.nodes
	}
}
