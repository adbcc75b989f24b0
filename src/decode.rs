//! Destructuring helpers for persisted payloads.
//!
//! Every `restore` implementation, in this crate or downstream, goes through these
//! instead of matching [`State`] by hand, so shape mismatches surface as uniform
//! [`MalformedPayload`] values.

use crate::error::MalformedPayload;
use crate::value::{State, Value};

/// # Errors
///
/// [`MalformedPayload::UnexpectedValue`] if `state` is a scalar.
pub fn list(state: &State) -> Result<&[State], MalformedPayload> {
	match state {
		State::List(items) => Ok(items),
		State::Value(_) => Err(MalformedPayload::UnexpectedValue("list")),
	}
}

/// # Errors
///
/// [`MalformedPayload::WrongArity`] if the list holds fewer than `expected` elements.
pub fn list_at_least(state: &State, expected: usize) -> Result<&[State], MalformedPayload> {
	let items = list(state)?;
	if items.len() < expected {
		return Err(MalformedPayload::WrongArity {
			expected,
			found: items.len(),
		});
	}
	Ok(items)
}

/// # Errors
///
/// [`MalformedPayload::WrongArity`] unless the list holds exactly two elements.
pub fn pair(state: &State) -> Result<(&State, &State), MalformedPayload> {
	let items = list(state)?;
	if items.len() != 2 {
		return Err(MalformedPayload::WrongArity {
			expected: 2,
			found: items.len(),
		});
	}
	Ok((&items[0], &items[1]))
}

/// # Errors
///
/// [`MalformedPayload::UnexpectedValue`] if `state` is a list.
pub fn value(state: &State) -> Result<&Value, MalformedPayload> {
	match state {
		State::Value(value) => Ok(value),
		State::List(_) => Err(MalformedPayload::UnexpectedValue("scalar")),
	}
}

/// Reads a structural marker slot.
///
/// # Errors
///
/// [`MalformedPayload::UnexpectedMarker`] unless the slot holds a boolean.
pub fn marker(state: &State) -> Result<bool, MalformedPayload> {
	match value(state) {
		Ok(Value::Bool(marker)) => Ok(*marker),
		_ => Err(MalformedPayload::UnexpectedMarker),
	}
}

/// `None` for a [`Value::Null`] slot, `Some(state)` otherwise.
#[must_use]
pub fn optional(state: &State) -> Option<&State> {
	match state {
		State::Value(Value::Null) => None,
		_ => Some(state),
	}
}

/// # Errors
///
/// [`MalformedPayload::UnexpectedValue`] unless the slot holds text.
pub fn text(state: &State) -> Result<&str, MalformedPayload> {
	match value(state)? {
		Value::Text(text) => Ok(text),
		_ => Err(MalformedPayload::UnexpectedValue("text")),
	}
}

/// # Errors
///
/// [`MalformedPayload::UnexpectedValue`] unless the slot holds an unsigned integer.
pub fn uint(state: &State) -> Result<u64, MalformedPayload> {
	match value(state)? {
		Value::Uint(raw) => Ok(*raw),
		_ => Err(MalformedPayload::UnexpectedValue("unsigned integer")),
	}
}

/// # Errors
///
/// [`MalformedPayload::UnexpectedValue`] unless the slot holds a kind tag.
pub fn tag(state: &State) -> Result<u32, MalformedPayload> {
	match value(state)? {
		Value::Tag(raw) => Ok(*raw),
		_ => Err(MalformedPayload::UnexpectedValue("kind tag")),
	}
}
