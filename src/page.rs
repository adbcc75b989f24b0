use crate::collection::DiffCollection;
use crate::error::ConfigurationError;
use crate::node::Node;
use core::slice;

/// An ordered, restartably enumerable supply of rows.
///
/// `len` returns `None` for sources that cannot count themselves without
/// enumerating; standard paging needs a count for its page math and reports
/// [`ConfigurationError::UncountedSource`] when it is missing.
pub trait RowSource {
	type Row;
	type Rows: Iterator<Item = Self::Row>;

	/// Starts a fresh enumeration from the beginning of the source.
	fn rows(&self) -> Self::Rows;

	fn len(&self) -> Option<usize>;
}

impl<'a, T> RowSource for &'a [T] {
	type Row = &'a T;
	type Rows = slice::Iter<'a, T>;

	fn rows(&self) -> Self::Rows {
		(*self).iter()
	}

	fn len(&self) -> Option<usize> {
		Some(<[T]>::len(self))
	}
}

impl<'a, T> RowSource for &'a Vec<T> {
	type Row = &'a T;
	type Rows = slice::Iter<'a, T>;

	fn rows(&self) -> Self::Rows {
		(*self).as_slice().iter()
	}

	fn len(&self) -> Option<usize> {
		Some(Vec::len(self))
	}
}

/// A differential collection pages like any other counted source; the window
/// sees the current (post-restore, post-mutation) node list, nothing else.
impl<'a, T: Node> RowSource for &'a DiffCollection<T> {
	type Row = &'a T;
	type Rows = slice::Iter<'a, T>;

	fn rows(&self) -> Self::Rows {
		(*self).iter()
	}

	fn len(&self) -> Option<usize> {
		Some(DiffCollection::len(self))
	}
}

/// Adapts a closure producing an iterator into a count-less [`RowSource`].
pub struct Uncounted<F>(pub F);

impl<F, I> RowSource for Uncounted<F>
where
	F: Fn() -> I,
	I: Iterator,
{
	type Row = I::Item;
	type Rows = I;

	fn rows(&self) -> Self::Rows {
		(self.0)()
	}

	fn len(&self) -> Option<usize> {
		None
	}
}

/// Read-only window that yields one page of a row source without materializing
/// the rest.
///
/// Not persisted: page size and index are ordinary widget fields owned by the
/// caller; this type only does the bounded enumeration and the page math.
///
/// A page size of `0` disables paging, making the window hand through the whole
/// source. Under custom paging the source is assumed to already hold exactly the
/// current page, and [`PagedWindow::set_virtual_count`] supplies the logical
/// total for page-count math instead of the source's own count.
#[derive(Debug)]
pub struct PagedWindow<S> {
	source: S,
	page_size: usize,
	page_index: usize,
	custom_paging: bool,
	virtual_count: usize,
}

impl<S: RowSource> PagedWindow<S> {
	/// Paging starts out disabled.
	#[must_use]
	pub fn new(source: S) -> Self {
		Self {
			source,
			page_size: 0,
			page_index: 0,
			custom_paging: false,
			virtual_count: 0,
		}
	}

	#[must_use]
	pub fn page_size(&self) -> usize {
		self.page_size
	}

	pub fn set_page_size(&mut self, page_size: usize) {
		self.page_size = page_size;
	}

	#[must_use]
	pub fn page_index(&self) -> usize {
		self.page_index
	}

	pub fn set_page_index(&mut self, page_index: usize) {
		self.page_index = page_index;
	}

	pub fn set_custom_paging(&mut self, custom_paging: bool) {
		self.custom_paging = custom_paging;
	}

	pub fn set_virtual_count(&mut self, virtual_count: usize) {
		self.virtual_count = virtual_count;
	}

	#[must_use]
	pub fn is_paging_enabled(&self) -> bool {
		self.page_size > 0
	}

	#[must_use]
	pub fn is_custom_paging_enabled(&self) -> bool {
		self.is_paging_enabled() && self.custom_paging
	}

	/// The logical total used for page math.
	fn total(&self) -> Result<usize, ConfigurationError> {
		if self.is_custom_paging_enabled() {
			Ok(self.virtual_count)
		} else {
			self.source.len().ok_or(ConfigurationError::UncountedSource)
		}
	}

	/// Counts the source by enumerating it when it cannot count itself.
	fn source_count(&self) -> usize {
		self.source
			.len()
			.unwrap_or_else(|| self.source.rows().count())
	}

	/// Number of items the *current page* will yield; the source's total only
	/// when paging is disabled, or under custom paging, where the source is the
	/// page.
	///
	/// # Errors
	///
	/// [`ConfigurationError::UncountedSource`] under standard paging with a
	/// count-less source.
	pub fn count(&self) -> Result<usize, ConfigurationError> {
		if !self.is_paging_enabled() || self.is_custom_paging_enabled() {
			return Ok(self.source_count());
		}
		let total = self.source.len().ok_or(ConfigurationError::UncountedSource)?;
		let start = self.page_index.saturating_mul(self.page_size);
		Ok(total.saturating_sub(start).min(self.page_size))
	}

	/// `ceil(total / page_size)` while paging is enabled and the total is
	/// non-zero; `1` otherwise.
	///
	/// # Errors
	///
	/// [`ConfigurationError::UncountedSource`] under standard paging with a
	/// count-less source.
	pub fn page_count(&self) -> Result<usize, ConfigurationError> {
		if !self.is_paging_enabled() {
			return Ok(1);
		}
		let total = self.total()?;
		if total == 0 {
			return Ok(1);
		}
		Ok(total.div_ceil(self.page_size))
	}

	#[must_use]
	pub fn is_first_page(&self) -> bool {
		!self.is_paging_enabled() || self.page_index == 0
	}

	/// # Errors
	///
	/// [`ConfigurationError::UncountedSource`] under standard paging with a
	/// count-less source.
	pub fn is_last_page(&self) -> Result<bool, ConfigurationError> {
		if !self.is_paging_enabled() {
			return Ok(true);
		}
		Ok(self.page_index + 1 >= self.page_count()?)
	}

	/// Index, within the logical total, of the first row of the current page.
	#[must_use]
	pub fn first_index_in_page(&self) -> usize {
		if self.is_paging_enabled() && !self.is_custom_paging_enabled() {
			self.page_index.saturating_mul(self.page_size)
		} else {
			0
		}
	}

	/// Starts a fresh, finite enumeration of the current page.
	///
	/// Skips `page_index * page_size` rows and yields up to `page_size` more,
	/// unless paging is disabled or custom paging is enabled, in which case
	/// everything the source provides is yielded. A page index past the end
	/// yields nothing; it is not an error.
	pub fn produce(&self) -> PageRows<S::Rows> {
		if self.is_paging_enabled() && !self.is_custom_paging_enabled() {
			PageRows {
				rows: self.source.rows(),
				skip: self.page_index.saturating_mul(self.page_size),
				remaining: Some(self.page_size),
			}
		} else {
			PageRows {
				rows: self.source.rows(),
				skip: 0,
				remaining: None,
			}
		}
	}
}

/// Lazy enumeration of one page; see [`PagedWindow::produce`].
pub struct PageRows<I> {
	rows: I,
	skip: usize,
	remaining: Option<usize>,
}

impl<I: Iterator> Iterator for PageRows<I> {
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		while self.skip > 0 {
			self.skip -= 1;
			self.rows.next()?;
		}
		match &mut self.remaining {
			Some(0) => None,
			Some(remaining) => {
				*remaining -= 1;
				self.rows.next()
			}
			None => self.rows.next(),
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let (lower, upper) = self.rows.size_hint();
		let lower = lower.saturating_sub(self.skip);
		let upper = upper.map(|upper| upper.saturating_sub(self.skip));
		match self.remaining {
			Some(remaining) => (lower.min(remaining), Some(upper.map_or(remaining, |upper| upper.min(remaining)))),
			None => (lower, upper),
		}
	}
}
