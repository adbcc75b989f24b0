use crate::decode;
use crate::error::{ConfigurationError, MalformedPayload};
use crate::value::{State, Value};
use smallvec::SmallVec;

// Most row identities are one or two columns wide.
type Columns = SmallVec<[String; 2]>;
type Values = SmallVec<[Value; 2]>;

/// A row that can hand out scalar fields by column name.
///
/// This is the explicit seam through which key extraction reads row data; there
/// is no ambient "current row" anywhere.
pub trait KeyedRow {
	fn field(&self, column: &str) -> Option<Value>;
}

/// The identity of one logical data row: an ordered mapping from key column (by
/// name, or by position when no names were supplied) to value.
///
/// Persisting a key emits just the value list; the restoring side already knows
/// the names, so they are never re-sent.
#[derive(Clone, Debug)]
pub struct RowKey {
	names: Option<Columns>,
	values: Values,
}

impl RowKey {
	/// A positional key: column positions are the key, no names involved.
	#[must_use]
	pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
		Self {
			names: None,
			values: values.into_iter().collect(),
		}
	}

	/// A named key from ordered `(column, value)` pairs.
	#[must_use]
	pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
	where
		N: Into<String>,
		V: Into<Value>,
	{
		let mut names = Columns::new();
		let mut values = Values::new();
		for (name, value) in pairs {
			names.push(name.into());
			values.push(value.into());
		}
		Self {
			names: Some(names),
			values,
		}
	}

	/// Reads the declared key columns out of `row`, in order.
	///
	/// # Errors
	///
	/// [`ConfigurationError::MissingKeyColumn`] when the row cannot supply one of
	/// the declared columns.
	pub fn extract<R: KeyedRow>(
		row: &R,
		columns: &[impl AsRef<str>],
	) -> Result<Self, ConfigurationError> {
		let mut names = Columns::new();
		let mut values = Values::new();
		for column in columns {
			let column = column.as_ref();
			let value = row
				.field(column)
				.ok_or_else(|| ConfigurationError::MissingKeyColumn(column.to_owned()))?;
			names.push(column.to_owned());
			values.push(value);
		}
		Ok(Self {
			names: Some(names),
			values,
		})
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// The ordered column names, `None` for a positional key.
	#[must_use]
	pub fn names(&self) -> Option<&[String]> {
		self.names.as_deref()
	}

	#[must_use]
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// Value at `index`; lookups by position and by name agree.
	#[must_use]
	pub fn value(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Value under `column`, `None` for positional keys or unknown columns.
	#[must_use]
	pub fn named(&self, column: &str) -> Option<&Value> {
		let names = self.names.as_ref()?;
		let index = names.iter().position(|name| name == column)?;
		self.values.get(index)
	}

	/// `None` for an empty key; otherwise the values-only list, in column order.
	#[must_use]
	pub fn save(&self) -> Option<State> {
		if self.values.is_empty() {
			return None;
		}
		Some(State::List(
			self.values
				.iter()
				.map(|value| State::Value(value.clone()))
				.collect(),
		))
	}

	/// Zips the remembered names (or ordinal positions) back onto the decoded
	/// values.
	///
	/// # Errors
	///
	/// [`MalformedPayload::WrongArity`] when the payload's width disagrees with
	/// the remembered column names; [`MalformedPayload`] on any non-scalar slot.
	pub fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		let items = decode::list(state)?;
		if let Some(names) = &self.names {
			if items.len() != names.len() {
				return Err(MalformedPayload::WrongArity {
					expected: names.len(),
					found: items.len(),
				});
			}
		}
		self.values = items
			.iter()
			.map(|item| decode::value(item).map(Value::clone))
			.collect::<Result<Values, MalformedPayload>>()?;
		Ok(())
	}
}

/// Two named keys are equal iff they hold the same column-to-value associations,
/// regardless of column order. When either side is positional, values compared in
/// order decide. Named against named is therefore stricter than value-only
/// equality, while a positional key can still equal a named one carrying the same
/// values in the same order.
impl PartialEq for RowKey {
	fn eq(&self, other: &Self) -> bool {
		match (&self.names, &other.names) {
			(Some(left), Some(right)) => {
				left.len() == right.len()
					&& left
						.iter()
						.zip(&self.values)
						.all(|(name, value)| other.named(name) == Some(value))
					&& right
						.iter()
						.zip(&other.values)
						.all(|(name, value)| self.named(name) == Some(value))
			}
			_ => self.values == other.values,
		}
	}
}

/// Ordered row identities for a whole rendered page, sharing one column list:
/// remembers which logical data rows correspond to which rendered rows across a
/// round trip.
#[derive(Clone, Debug, PartialEq)]
pub struct RowKeySet {
	names: Option<Vec<String>>,
	keys: Vec<RowKey>,
}

impl RowKeySet {
	/// A set of positional keys.
	#[must_use]
	pub fn positional() -> Self {
		Self {
			names: None,
			keys: Vec::new(),
		}
	}

	/// A set of keys over the given columns.
	#[must_use]
	pub fn named(names: Vec<String>) -> Self {
		Self {
			names: Some(names),
			keys: Vec::new(),
		}
	}

	/// Builds one key per row, in row order.
	///
	/// # Errors
	///
	/// [`ConfigurationError::MissingKeyColumn`] as for [`RowKey::extract`].
	pub fn extract_from<R: KeyedRow>(
		names: Vec<String>,
		rows: &[R],
	) -> Result<Self, ConfigurationError> {
		let mut keys = Vec::with_capacity(rows.len());
		for row in rows {
			keys.push(RowKey::extract(row, &names)?);
		}
		Ok(Self {
			names: Some(names),
			keys,
		})
	}

	pub fn push(&mut self, key: RowKey) {
		self.keys.push(key);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&RowKey> {
		self.keys.get(index)
	}

	pub fn iter(&self) -> core::slice::Iter<'_, RowKey> {
		self.keys.iter()
	}

	fn blank_key(&self) -> RowKey {
		RowKey {
			names: self.names.as_ref().map(|names| names.iter().cloned().collect()),
			values: Values::new(),
		}
	}

	/// `None` when the set is empty; otherwise one values-only list per key, in
	/// row order.
	#[must_use]
	pub fn save(&self) -> Option<State> {
		if self.keys.is_empty() {
			return None;
		}
		Some(State::List(
			self.keys
				.iter()
				.map(|key| key.save().unwrap_or_else(State::null))
				.collect(),
		))
	}

	/// Rebuilds the keys under the remembered column list.
	///
	/// # Errors
	///
	/// [`MalformedPayload`] as for [`RowKey::restore`].
	pub fn restore(&mut self, state: &State) -> Result<(), MalformedPayload> {
		let mut keys = Vec::new();
		for entry in decode::list(state)? {
			let mut key = self.blank_key();
			if let Some(entry) = decode::optional(entry) {
				key.restore(entry)?;
			}
			keys.push(key);
		}
		self.keys = keys;
		Ok(())
	}
}

impl<'a> IntoIterator for &'a RowKeySet {
	type Item = &'a RowKey;
	type IntoIter = core::slice::Iter<'a, RowKey>;

	fn into_iter(self) -> Self::IntoIter {
		self.keys.iter()
	}
}
