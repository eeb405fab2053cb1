use crate::path::FormPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Errors raised while building form data from a typed value.
#[derive(Debug, thiserror::Error)]
pub enum FormDataError {
	#[error("Failed to convert value into form data: {0}")]
	Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FormDataError>;

/// Message used when a required field has no entry.
pub const REQUIRED_MESSAGE: &str = "Required";

/// A field that could not be decoded from form data.
///
/// The path is rendered with the same dot/bracket notation the serializer
/// produces, so it names the offending form key directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDecodeError {
	path: FormPath,
	message: String,
}

impl FormDecodeError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			path: FormPath::new(),
			message: message.into(),
		}
	}

	pub fn path(&self) -> &FormPath {
		&self.path
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub(crate) fn under_key(mut self, key: &str) -> Self {
		self.path.prepend_key(key);
		self
	}

	pub(crate) fn under_index(mut self, index: usize) -> Self {
		self.path.prepend_index(index);
		self
	}
}

impl fmt::Display for FormDecodeError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			f.write_str(&self.message)
		} else {
			write!(f, "{}: {}", self.path, self.message)
		}
	}
}

impl std::error::Error for FormDecodeError {}

impl serde::de::Error for FormDecodeError {
	fn custom<T: fmt::Display>(msg: T) -> Self {
		Self::new(msg.to_string())
	}

	fn missing_field(field: &'static str) -> Self {
		Self::new(REQUIRED_MESSAGE).under_key(field)
	}
}

/// Field path to error messages.
///
/// Form-level errors use the empty path. `Display` renders the first message
/// of each field as a JSON object, e.g. `{"test":"Required"}`.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::FieldErrors;
///
/// let mut errors = FieldErrors::new();
/// errors.add("test", "Required");
/// assert_eq!(errors.to_string(), r#"{"test":"Required"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.0.entry(field.into()).or_default().push(message.into());
	}

	pub fn get(&self, field: &str) -> Option<&[String]> {
		self.0.get(field).map(Vec::as_slice)
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// First message per field.
	pub fn first_messages(&self) -> BTreeMap<&str, &str> {
		self.0
			.iter()
			.filter_map(|(field, messages)| {
				messages
					.first()
					.map(|message| (field.as_str(), message.as_str()))
			})
			.collect()
	}
}

impl fmt::Display for FieldErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rendered = serde_json::to_string(&self.first_messages()).map_err(|_| fmt::Error)?;
		f.write_str(&rendered)
	}
}

impl std::error::Error for FieldErrors {}

impl From<FormDecodeError> for FieldErrors {
	fn from(error: FormDecodeError) -> Self {
		let mut errors = Self::new();
		errors.add(error.path.to_string(), error.message);
		errors
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::de::Error as _;

	#[rstest]
	fn test_missing_field_is_required() {
		let error = FormDecodeError::missing_field("test");

		assert_eq!(error.path().to_string(), "test");
		assert_eq!(error.message(), REQUIRED_MESSAGE);
		assert_eq!(error.to_string(), "test: Required");
	}

	#[rstest]
	fn test_nested_path_rendering() {
		// Arrange
		let error = FormDecodeError::missing_field("name");

		// Act
		let error = error.under_index(1).under_key("items");

		// Assert
		assert_eq!(error.path().to_string(), "items[1].name");
	}

	#[rstest]
	fn test_field_errors_display_first_message_per_field() {
		// Arrange
		let mut errors = FieldErrors::new();
		errors.add("b", "Expected number");
		errors.add("a", "Required");
		errors.add("a", "Too short");

		// Act
		let rendered = errors.to_string();

		// Assert
		assert_eq!(rendered, r#"{"a":"Required","b":"Expected number"}"#);
	}

	#[rstest]
	fn test_field_errors_from_decode_error() {
		let errors = FieldErrors::from(FormDecodeError::missing_field("test"));

		assert_eq!(errors.get("test"), Some(&["Required".to_string()][..]));
	}

	#[rstest]
	fn test_field_errors_serialize_all_messages() {
		let mut errors = FieldErrors::new();
		errors.add("a", "x");
		errors.add("a", "y");

		let json = serde_json::to_value(&errors).unwrap();

		assert_eq!(json, serde_json::json!({"a": ["x", "y"]}));
	}
}
