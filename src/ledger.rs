use crate::decode;
use crate::error::MalformedPayload;
use crate::value::{State, Value};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

/// Per-node key/value store that remembers which fields were explicitly set while
/// tracking was active, so that only touched fields end up in a snapshot.
///
/// Reading a field that was never set yields the documented default for the
/// accessor's type, never an error. Writes made before [`FieldLedger::track`] are
/// stored but stay clean, so they are absent from every later [`FieldLedger::snapshot`];
/// that loss is intentional and must not be compensated for by callers.
#[derive(Debug)]
pub struct FieldLedger {
	slots: HashMap<String, FieldSlot>,
	tracking: bool,
}

#[derive(Debug)]
struct FieldSlot {
	value: Value,
	dirty: bool,
}

impl Default for FieldLedger {
	fn default() -> Self {
		Self::new()
	}
}

impl FieldLedger {
	#[must_use]
	pub fn new() -> Self {
		Self {
			slots: HashMap::new(),
			tracking: false,
		}
	}

	#[must_use]
	pub fn is_tracking(&self) -> bool {
		self.tracking
	}

	/// One-way transition into tracking. Calling it again is a no-op.
	pub fn track(&mut self) {
		self.tracking = true;
	}

	/// Number of stored fields, dirty or not.
	#[must_use]
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.slots.get(name).map(|slot| &slot.value)
	}

	/// Defaults to `""` when the field is unset or not text.
	#[must_use]
	pub fn text_or_empty(&self, name: &str) -> &str {
		match self.get(name) {
			Some(Value::Text(text)) => text,
			_ => "",
		}
	}

	/// Defaults to `false`.
	#[must_use]
	pub fn flag(&self, name: &str) -> bool {
		matches!(self.get(name), Some(Value::Bool(true)))
	}

	/// Defaults to `0`.
	#[must_use]
	pub fn int(&self, name: &str) -> i64 {
		match self.get(name) {
			Some(Value::Int(raw)) => *raw,
			_ => 0,
		}
	}

	/// Defaults to `0`.
	#[must_use]
	pub fn uint(&self, name: &str) -> u64 {
		match self.get(name) {
			Some(Value::Uint(raw)) => *raw,
			_ => 0,
		}
	}

	/// Defaults to `0.0`.
	#[must_use]
	pub fn float(&self, name: &str) -> f64 {
		match self.get(name) {
			Some(Value::Float(raw)) => *raw,
			_ => 0.0,
		}
	}

	/// Defaults to `0`.
	#[must_use]
	pub fn tag(&self, name: &str) -> u32 {
		match self.get(name) {
			Some(Value::Tag(raw)) => *raw,
			_ => 0,
		}
	}

	/// Stores `value` under `name` and, while tracking, marks the slot dirty.
	///
	/// There is deliberately no value-equality short-circuit: overwriting a field
	/// with an equal value still dirties it. Callers relying on "no-op set leaves
	/// state clean" are wrong.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
		let dirty = self.tracking;
		match self.slots.entry(name.into()) {
			Entry::Occupied(occupied) => {
				let slot = occupied.into_mut();
				slot.value = value.into();
				slot.dirty |= dirty;
			}
			Entry::Vacant(vacant) => {
				vacant.insert(FieldSlot {
					value: value.into(),
					dirty,
				});
			}
		}
	}

	/// Marks every stored slot dirty, so the next [`FieldLedger::snapshot`] carries
	/// the ledger's full contents. Fields that were never stored stay at default on
	/// both ends, so nothing is lost by not mentioning them.
	pub fn mark_dirty(&mut self) {
		for slot in self.slots.values_mut() {
			slot.dirty = true;
		}
	}

	/// `None` when no slot is dirty; otherwise a list of `(name, value)` pairs for
	/// the dirty slots only, ordered by field name so payloads are deterministic.
	#[must_use]
	pub fn snapshot(&self) -> Option<State> {
		let mut dirty: Vec<(&str, &Value)> = self
			.slots
			.iter()
			.filter(|(_, slot)| slot.dirty)
			.map(|(name, slot)| (name.as_str(), &slot.value))
			.collect();
		if dirty.is_empty() {
			return None;
		}
		dirty.sort_unstable_by(|left, right| left.0.cmp(right.0));
		Some(State::List(
			dirty
				.into_iter()
				.map(|(name, value)| {
					State::List(vec![State::scalar(name), State::Value(value.clone())])
				})
				.collect(),
		))
	}

	/// Applies a snapshot previously produced by [`FieldLedger::snapshot`].
	///
	/// Entries are applied through [`FieldLedger::set`], so a restore that happens
	/// after tracking re-dirties the restored fields, while the usual
	/// restore-before-tracking leaves them clean. Fields absent from the payload
	/// are left at default.
	///
	/// # Errors
	///
	/// [`MalformedPayload`] if any entry is not a `(text, scalar)` pair.
	pub fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		for entry in decode::list(state)? {
			let (name, value) = decode::pair(entry)?;
			let name = decode::text(name)?;
			let value = decode::value(value)?;
			self.set(name, value.clone());
		}
		Ok(())
	}
}

/// Field-for-field value comparison; dirtiness and tracking state are ignored.
impl PartialEq for FieldLedger {
	fn eq(&self, other: &Self) -> bool {
		self.slots.len() == other.slots.len()
			&& self
				.slots
				.iter()
				.all(|(name, slot)| other.get(name) == Some(&slot.value))
	}
}
