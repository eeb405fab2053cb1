//! Key paths for flattened form entries.
//!
//! A path is a list of tagged segments. Object keys render as the key,
//! array positions as `[index]`, and a segment is followed by `.` only when
//! its delimiter flag is set. Keeping the flag on the segment means the
//! rendering rule lives in one place:
//!
//! ```text
//! entries ─► Key{entries, .}   items ─► Key{items}   0 ─► Index{0, .}   name ─► Key{name}
//!                         "entries." + "items" + "[0]." + "name"
//! ```

use crate::value::FormValue;
use std::fmt;

/// One step of a traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
	/// Position inside an array, rendered `[index]`.
	Index { index: usize, delimiter: bool },
	/// Key inside an object, rendered verbatim.
	Key { key: String, delimiter: bool },
}

impl PathSegment {
	/// Segment for an object key whose value is `child`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formdata::{FormValue, PathSegment};
	///
	/// let child: FormValue = [("name", "x")].into_iter().collect();
	/// assert_eq!(PathSegment::key("country", &child).to_string(), "country.");
	/// assert_eq!(PathSegment::key("street", &FormValue::from("x")).to_string(), "street");
	/// ```
	pub fn key(key: impl Into<String>, child: &FormValue) -> Self {
		Self::Key {
			key: key.into(),
			delimiter: child.is_non_empty_object(),
		}
	}

	/// Segment for an array position whose element is `child`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formdata::{FormValue, PathSegment};
	///
	/// let child: FormValue = [("code", "A")].into_iter().collect();
	/// assert_eq!(PathSegment::index(0, &child).to_string(), "[0].");
	/// assert_eq!(PathSegment::index(3, &FormValue::from("x")).to_string(), "[3]");
	/// ```
	pub fn index(index: usize, child: &FormValue) -> Self {
		Self::Index {
			index,
			delimiter: child.is_non_empty_object(),
		}
	}

	pub fn has_delimiter(&self) -> bool {
		match self {
			Self::Index { delimiter, .. } | Self::Key { delimiter, .. } => *delimiter,
		}
	}
}

impl fmt::Display for PathSegment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Index { index, .. } => write!(f, "[{}]", index)?,
			Self::Key { key, .. } => f.write_str(key)?,
		}
		if self.has_delimiter() {
			f.write_str(".")?;
		}
		Ok(())
	}
}

/// Ordered list of segments from the root to a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPath {
	segments: Vec<PathSegment>,
}

impl FormPath {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, segment: PathSegment) {
		self.segments.push(segment);
	}

	pub fn pop(&mut self) -> Option<PathSegment> {
		self.segments.pop()
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	/// Insert an object key in front of the path.
	///
	/// The new segment carries a delimiter only when the path it now leads
	/// into starts with another key, so `[0]` never gets a `.` in front.
	pub fn prepend_key(&mut self, key: impl Into<String>) {
		let delimiter = matches!(self.segments.first(), Some(PathSegment::Key { .. }));
		self.segments.insert(
			0,
			PathSegment::Key {
				key: key.into(),
				delimiter,
			},
		);
	}

	/// Insert an array position in front of the path.
	pub fn prepend_index(&mut self, index: usize) {
		let delimiter = matches!(self.segments.first(), Some(PathSegment::Key { .. }));
		self.segments
			.insert(0, PathSegment::Index { index, delimiter });
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}
}

impl fmt::Display for FormPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for segment in &self.segments {
			write!(f, "{}", segment)?;
		}
		Ok(())
	}
}

impl FromIterator<PathSegment> for FormPath {
	fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
		Self {
			segments: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn key(key: &str, delimiter: bool) -> PathSegment {
		PathSegment::Key {
			key: key.to_string(),
			delimiter,
		}
	}

	fn index(index: usize, delimiter: bool) -> PathSegment {
		PathSegment::Index { index, delimiter }
	}

	#[rstest]
	#[case(vec![key("street", false)], "street")]
	#[case(vec![key("country", true), key("code", false)], "country.code")]
	#[case(vec![key("ids", false), index(1, false)], "ids[1]")]
	#[case(vec![key("codes", false), index(0, true), key("code", false)], "codes[0].code")]
	#[case(
		vec![key("entries", true), key("items", false), index(1, true), key("name", false)],
		"entries.items[1].name"
	)]
	#[case(vec![key("grid", false), index(0, false), index(2, false)], "grid[0][2]")]
	#[case(vec![], "")]
	fn test_render(#[case] segments: Vec<PathSegment>, #[case] expected: &str) {
		let path: FormPath = segments.into_iter().collect();

		assert_eq!(path.to_string(), expected);
	}

	#[rstest]
	fn test_push_pop() {
		// Arrange
		let mut path = FormPath::new();

		// Act
		path.push(key("a", true));
		path.push(key("b", false));
		let popped = path.pop();

		// Assert
		assert_eq!(popped, Some(key("b", false)));
		assert_eq!(path.segments().len(), 1);
	}

	#[rstest]
	fn test_prepend_builds_same_rendering_as_traversal() {
		// Arrange
		let mut path = FormPath::new();

		// Act
		path.prepend_key("name");
		path.prepend_index(0);
		path.prepend_key("items");
		path.prepend_key("entries");

		// Assert
		assert_eq!(path.to_string(), "entries.items[0].name");
	}
}
