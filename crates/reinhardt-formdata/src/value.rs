//! Nested plain-data input accepted by the serializer.

use crate::error::{FormDataError, Result};
use crate::form_data::FormData;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

/// A JSON-like value with dates, an explicit `undefined`, and a pass-through
/// slot for an already-built [`FormData`].
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::FormValue;
/// use serde_json::json;
///
/// let value = FormValue::from(json!({"name": "Item 1", "tags": ["a"]}));
/// assert!(value.is_non_empty_object());
///
/// let value: FormValue = [("name", "Item 1")].into_iter().collect();
/// assert!(value.is_object());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormValue {
	#[default]
	Undefined,
	Null,
	Bool(bool),
	Number(Number),
	String(String),
	Date(DateTime<Utc>),
	Array(Vec<FormValue>),
	Object(IndexMap<String, FormValue>),
	FormData(FormData),
}

impl FormValue {
	/// Convert any serializable value through its JSON representation.
	///
	/// Date types that serialize as strings stay strings; build
	/// [`FormValue::Date`] directly to get timestamp rendering. Non-finite
	/// floats serialize as JSON null and are dropped; use `From<f64>` to keep
	/// infinities.
	pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
		serde_json::to_value(value)
			.map(Self::from)
			.map_err(FormDataError::Serialize)
	}

	pub fn is_object(&self) -> bool {
		matches!(self, Self::Object(_))
	}

	/// True for an object with at least one key. A path segment pointing at
	/// such a value is followed by a `.` delimiter.
	pub fn is_non_empty_object(&self) -> bool {
		matches!(self, Self::Object(map) if !map.is_empty())
	}

	/// Truthiness of a leaf.
	///
	/// `undefined`, `null`, `false`, numeric zero, NaN and the empty string are
	/// falsy. Containers and dates are always truthy.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Undefined | Self::Null => false,
			Self::Bool(b) => *b,
			Self::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
			Self::String(s) => !s.is_empty(),
			Self::Date(_) | Self::Array(_) | Self::Object(_) | Self::FormData(_) => true,
		}
	}
}

impl From<serde_json::Value> for FormValue {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => Self::Number(n),
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) => {
				Self::Array(items.into_iter().map(Self::from).collect())
			}
			serde_json::Value::Object(map) => Self::Object(
				map.into_iter()
					.map(|(key, value)| (key, Self::from(value)))
					.collect(),
			),
		}
	}
}

impl From<bool> for FormValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

macro_rules! impl_from_integer {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for FormValue {
				fn from(value: $ty) -> Self {
					Self::Number(Number::from(value))
				}
			}
		)*
	};
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// Infinities have no JSON number form and are kept as the text a browser
// submits for them. NaN is falsy and becomes null.
impl From<f64> for FormValue {
	fn from(value: f64) -> Self {
		match Number::from_f64(value) {
			Some(number) => Self::Number(number),
			None if value.is_nan() => Self::Null,
			None if value.is_sign_positive() => Self::String("Infinity".to_string()),
			None => Self::String("-Infinity".to_string()),
		}
	}
}

impl From<f32> for FormValue {
	fn from(value: f32) -> Self {
		Self::from(f64::from(value))
	}
}

impl From<String> for FormValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&str> for FormValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<DateTime<Utc>> for FormValue {
	fn from(value: DateTime<Utc>) -> Self {
		Self::Date(value)
	}
}

impl From<FormData> for FormValue {
	fn from(value: FormData) -> Self {
		Self::FormData(value)
	}
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
	fn from(value: Vec<T>) -> Self {
		Self::Array(value.into_iter().map(Into::into).collect())
	}
}

impl<K: Into<String>, V: Into<FormValue>> FromIterator<(K, V)> for FormValue {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self::Object(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}
