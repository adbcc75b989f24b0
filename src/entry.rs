use crate::decode;
use crate::error::MalformedPayload;
use crate::ledger::FieldLedger;
use crate::node::{Anchor, Node, Stateful};
use crate::value::{State, Value};

const TEXT: &str = "text";
const VALUE: &str = "value";
const ENABLED: &str = "enabled";
const SELECTED: &str = "selected";
const TOOLTIP: &str = "tooltip";

/// Flat collection node: one menu entry, list item or similar leaf.
///
/// All state lives in a [`FieldLedger`], so only touched fields are persisted.
#[derive(Debug, Default)]
pub struct Entry {
	ledger: FieldLedger,
	anchor: Option<Anchor>,
}

/// Field-for-field comparison; the anchor is positional bookkeeping, not state,
/// and is ignored.
impl PartialEq for Entry {
	fn eq(&self, other: &Self) -> bool {
		self.ledger == other.ledger
	}
}

impl Entry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_text(text: &str) -> Self {
		let mut entry = Self::new();
		entry.set_text(text);
		entry
	}

	#[must_use]
	pub fn text(&self) -> &str {
		self.ledger.text_or_empty(TEXT)
	}

	pub fn set_text(&mut self, text: impl Into<String>) {
		self.ledger.set(TEXT, text.into());
	}

	/// The entry's non-display value, e.g. a command name. Defaults to `""`.
	#[must_use]
	pub fn value(&self) -> &str {
		self.ledger.text_or_empty(VALUE)
	}

	pub fn set_value(&mut self, value: impl Into<String>) {
		self.ledger.set(VALUE, value.into());
	}

	/// Defaults to `true`.
	#[must_use]
	pub fn enabled(&self) -> bool {
		match self.ledger.get(ENABLED) {
			Some(Value::Bool(enabled)) => *enabled,
			_ => true,
		}
	}

	pub fn set_enabled(&mut self, enabled: bool) {
		self.ledger.set(ENABLED, enabled);
	}

	/// Defaults to `false`.
	#[must_use]
	pub fn selected(&self) -> bool {
		self.ledger.flag(SELECTED)
	}

	pub fn set_selected(&mut self, selected: bool) {
		self.ledger.set(SELECTED, selected);
	}

	#[must_use]
	pub fn tooltip(&self) -> &str {
		self.ledger.text_or_empty(TOOLTIP)
	}

	pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
		self.ledger.set(TOOLTIP, tooltip.into());
	}

	/// Direct access for fields this type does not name.
	#[must_use]
	pub fn ledger(&self) -> &FieldLedger {
		&self.ledger
	}

	pub fn ledger_mut(&mut self) -> &mut FieldLedger {
		&mut self.ledger
	}
}

impl Stateful for Entry {
	fn track(&mut self) {
		self.ledger.track();
	}

	fn is_tracking(&self) -> bool {
		self.ledger.is_tracking()
	}

	fn mark_dirty(&mut self) {
		self.ledger.mark_dirty();
	}

	fn save(&mut self) -> Option<State> {
		self.ledger.snapshot()
	}

	fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		self.ledger.restore(state)
	}
}

impl Node for Entry {
	fn rebuild(state: &State) -> Result<Self, MalformedPayload> {
		let mut entry = Self::new();
		if let Some(state) = decode::optional(state) {
			entry.restore(state)?;
		}
		Ok(entry)
	}

	fn anchor(&self) -> Option<Anchor> {
		self.anchor
	}

	fn set_anchor(&mut self, anchor: Option<Anchor>) {
		self.anchor = anchor;
	}
}
