use crate::collection::DiffCollection;
use crate::decode;
use crate::error::MalformedPayload;
use crate::ledger::FieldLedger;
use crate::node::{Anchor, Node, Stateful};
use crate::value::State;

const TEXT: &str = "text";
const EXPANDED: &str = "expanded";

/// Hierarchical collection node: a tree node owning a nested
/// [`DiffCollection`] of children.
///
/// Tracking, dirtying, saving and restoring all recurse through the child
/// collection, so a whole subtree round-trips as one payload. The child
/// collection diffs independently of its parent: an untouched subtree under an
/// edited sibling contributes nothing to the payload.
#[derive(Debug)]
pub struct Branch {
	ledger: FieldLedger,
	children: DiffCollection<Branch>,
	anchor: Option<Anchor>,
}

impl Branch {
	#[must_use]
	pub fn new() -> Self {
		Self {
			ledger: FieldLedger::new(),
			children: DiffCollection::new(),
			anchor: None,
		}
	}

	#[must_use]
	pub fn with_text(text: &str) -> Self {
		let mut branch = Self::new();
		branch.set_text(text);
		branch
	}

	#[must_use]
	pub fn text(&self) -> &str {
		self.ledger.text_or_empty(TEXT)
	}

	pub fn set_text(&mut self, text: impl Into<String>) {
		self.ledger.set(TEXT, text.into());
	}

	/// Defaults to `false`.
	#[must_use]
	pub fn expanded(&self) -> bool {
		self.ledger.flag(EXPANDED)
	}

	pub fn set_expanded(&mut self, expanded: bool) {
		self.ledger.set(EXPANDED, expanded);
	}

	#[must_use]
	pub fn children(&self) -> &DiffCollection<Branch> {
		&self.children
	}

	pub fn children_mut(&mut self) -> &mut DiffCollection<Branch> {
		&mut self.children
	}

	#[must_use]
	pub fn ledger(&self) -> &FieldLedger {
		&self.ledger
	}

	pub fn ledger_mut(&mut self) -> &mut FieldLedger {
		&mut self.ledger
	}
}

impl Default for Branch {
	fn default() -> Self {
		Self::new()
	}
}

/// Field-for-field and child-for-child comparison; anchors are ignored.
impl PartialEq for Branch {
	fn eq(&self, other: &Self) -> bool {
		self.ledger == other.ledger && self.children == other.children
	}
}

impl Stateful for Branch {
	fn track(&mut self) {
		self.ledger.track();
		self.children.track();
	}

	fn is_tracking(&self) -> bool {
		self.ledger.is_tracking()
	}

	fn mark_dirty(&mut self) {
		self.ledger.mark_dirty();
		Stateful::mark_dirty(&mut self.children);
	}

	fn save(&mut self) -> Option<State> {
		let fields = self.ledger.snapshot();
		let children = self.children.save();
		if fields.is_none() && children.is_none() {
			return None;
		}
		Some(State::List(vec![
			fields.unwrap_or_else(State::null),
			children.unwrap_or_else(State::null),
		]))
	}

	fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		let (fields, children) = decode::pair(state)?;
		if let Some(fields) = decode::optional(fields) {
			self.ledger.restore(fields)?;
		}
		if let Some(children) = decode::optional(children) {
			self.children.restore(children)?;
		}
		Ok(())
	}
}

impl Node for Branch {
	fn rebuild(state: &State) -> Result<Self, MalformedPayload> {
		let mut branch = Self::new();
		if let Some(state) = decode::optional(state) {
			branch.restore(state)?;
		}
		Ok(branch)
	}

	fn anchor(&self) -> Option<Anchor> {
		self.anchor
	}

	fn set_anchor(&mut self, anchor: Option<Anchor>) {
		self.anchor = anchor;
	}
}
