//! Ordered multi-map of form entries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Flat form submission data.
///
/// Entries keep insertion order and a key may appear more than once, the same
/// way a browser `FormData` or an urlencoded body behaves.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::FormData;
///
/// let mut form = FormData::new();
/// form.append("tags", "a");
/// form.append("tags", "b");
///
/// assert_eq!(form.get("tags"), Some("a"));
/// assert_eq!(form.get_all("tags"), vec!["a", "b"]);
/// assert_eq!(form.to_urlencoded(), "tags=a&tags=b");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
	entries: Vec<(String, String)>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an entry, keeping any existing entries for the same key.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.entries.push((key.into(), value.into()));
	}

	/// Set the value for a key.
	///
	/// The first existing entry for the key is overwritten in place and every
	/// later entry for it is removed. If the key is absent, the entry is
	/// appended.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formdata::FormData;
	///
	/// let mut form = FormData::new();
	/// form.append("a", "1");
	/// form.append("b", "2");
	/// form.append("a", "3");
	/// form.set("a", "x");
	///
	/// assert_eq!(form.to_urlencoded(), "a=x&b=2");
	/// ```
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter().position(|(k, _)| *k == key) {
			Some(first) => {
				self.entries[first].1 = value;
				let mut index = 0;
				self.entries.retain(|(k, _)| {
					let keep = index <= first || *k != key;
					index += 1;
					keep
				});
			}
			None => self.entries.push((key, value)),
		}
	}

	/// First value stored for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Every value stored for `key`, in insertion order.
	pub fn get_all(&self, key: &str) -> Vec<&str> {
		self.entries
			.iter()
			.filter(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
			.collect()
	}

	pub fn has(&self, key: &str) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	/// Remove every entry for `key`.
	pub fn delete(&mut self, key: &str) {
		self.entries.retain(|(k, _)| k != key);
	}

	/// Distinct keys in first-appearance order.
	pub fn keys(&self) -> Vec<&str> {
		let mut keys: Vec<&str> = Vec::new();
		for (key, _) in &self.entries {
			if !keys.contains(&key.as_str()) {
				keys.push(key);
			}
		}
		keys
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Encode as an `application/x-www-form-urlencoded` string.
	pub fn to_urlencoded(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new())
			.extend_pairs(self.iter())
			.finish()
	}

	/// Decode an `application/x-www-form-urlencoded` body.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formdata::FormData;
	///
	/// let form = FormData::from_urlencoded(b"name=John+Doe&city=K%C3%B6ln");
	/// assert_eq!(form.get("name"), Some("John Doe"));
	/// assert_eq!(form.get("city"), Some("Köln"));
	/// ```
	pub fn from_urlencoded(input: &[u8]) -> Self {
		url::form_urlencoded::parse(input)
			.map(|(k, v)| (k.into_owned(), v.into_owned()))
			.collect()
	}
}

impl fmt::Display for FormData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_urlencoded())
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormData {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		self.entries
			.extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
	}
}

impl IntoIterator for FormData {
	type Item = (String, String);
	type IntoIter = std::vec::IntoIter<(String, String)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}

// Serialized as a sequence of pairs so urlencoded serializers keep duplicates.
impl Serialize for FormData {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(self.entries.iter())
	}
}

impl<'de> Deserialize<'de> for FormData {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Vec::<(String, String)>::deserialize(deserializer).map(|entries| Self { entries })
	}
}
