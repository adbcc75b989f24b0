use thiserror::Error;

/// A payload handed to a `restore` implementation does not have the shape the
/// matching `save` would have produced.
///
/// Persisted payloads are assumed tamper-evident upstream, so hitting one of these
/// indicates a programming error or a corrupted transport. Callers are expected to
/// treat it as fatal for the surrounding request; nothing in this crate retries.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MalformedPayload {
	#[error("payload list has {found} element(s) where {expected} were expected")]
	WrongArity { expected: usize, found: usize },
	#[error("expected {0} at this position in the payload")]
	UnexpectedValue(&'static str),
	#[error("the structural marker slot does not hold a boolean")]
	UnexpectedMarker,
	#[error("delta entry targets baseline index {index}, but only {len} node(s) are present")]
	IndexOutOfRange { index: u64, len: usize },
	#[error("no node kind is registered for tag {0}")]
	UnknownTag(u32),
	#[error("payload was saved by a {found} node but is being restored into a {expected} node")]
	WrongKind {
		expected: &'static str,
		found: &'static str,
	},
}

/// A paging window was asked for page-count math it cannot perform, or a key
/// column was declared that the row cannot supply.
///
/// Always surfaced to the caller, never retried or swallowed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigurationError {
	#[error("the row source does not expose a count; supply a counted source or enable custom paging")]
	UncountedSource,
	#[error("key column {0:?} is missing from the row")]
	MissingKeyColumn(String),
}
