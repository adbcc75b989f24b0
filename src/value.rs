use serde::{Deserialize, Serialize};

/// Scalar leaf of a persisted payload.
///
/// Only the handful of shapes that widget state actually takes are representable:
/// primitives, text and closed-enum discriminants ([`Value::Tag`]). Anything richer
/// belongs to the caller, not to the persistence layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
	/// Placeholder for "nothing was persisted in this slot".
	Null,
	Bool(bool),
	Int(i64),
	Uint(u64),
	Float(f64),
	Text(String),
	/// Discriminant of a closed enum, e.g. the kind tag written next to a
	/// polymorphic node's payload.
	Tag(u32),
}

impl Value {
	/// Human-readable name of the variant, for diagnostics.
	#[must_use]
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Uint(_) => "uint",
			Value::Float(_) => "float",
			Value::Text(_) => "text",
			Value::Tag(_) => "tag",
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}
impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(value.into())
	}
}
impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}
impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::Uint(value)
	}
}
impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}
impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_owned())
	}
}
impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

/// One node of a persisted payload tree: either a scalar or an ordered list of
/// further payloads.
///
/// This is the entire wire shape of the crate. `save` implementations produce it,
/// `restore` implementations consume it, and the outer transport is free to armor
/// it however it likes (both variants round-trip through serde). The structure is
/// opaque to the transport and must be echoed back verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum State {
	Value(Value),
	List(Vec<State>),
}

impl State {
	/// A [`Value::Null`] leaf, marking a slot whose owner had nothing to persist.
	#[must_use]
	pub fn null() -> Self {
		State::Value(Value::Null)
	}

	/// Wraps a scalar.
	#[must_use]
	pub fn scalar(value: impl Into<Value>) -> Self {
		State::Value(value.into())
	}
}

impl From<Value> for State {
	fn from(value: Value) -> Self {
		State::Value(value)
	}
}
