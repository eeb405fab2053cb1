//! Typed decoding of flat form data.
//!
//! Keys are parsed with the grammar the serializer emits (`a.b[0].c`) into a
//! [`FormTree`], which then drives a `serde` deserializer. Leaves are always
//! strings, so scalar requests coerce them:
//!
//! - `bool`: `on` / `true` are true, `off` / `false` are false
//! - integers and floats are parsed from the text
//! - `Option<T>`: an empty string (or a missing field) is `None`
//! - a lone leaf requested as a sequence becomes a one-element sequence
//! - `()` accepts anything, which lets `()` stand for "no schema"
//!
//! Decoding is not the inverse of serialization: falsy values dropped by the
//! serializer come back as missing fields.

use crate::error::{FieldErrors, FormDecodeError};
use crate::form_data::FormData;
use crate::path::PathSegment;
use indexmap::IndexMap;
use serde::de::value::StringDeserializer;
use serde::de::{
	self, DeserializeOwned, DeserializeSeed, Deserializer as _, MapAccess, SeqAccess, Visitor,
};
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, FormDecodeError>;

/// Decode form data into `T`.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::{FormData, from_form_data};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Signup {
///     test: String,
///     checkbox: bool,
/// }
///
/// let form = FormData::from_urlencoded(b"test=data&checkbox=on");
/// let signup: Signup = from_form_data(&form).unwrap();
/// assert_eq!(signup, Signup { test: "data".into(), checkbox: true });
/// ```
pub fn from_form_data<T: DeserializeOwned>(form: &FormData) -> Result<T> {
	T::deserialize(Decoder::root(FormTree::from_form_data(form), &[]))
}

/// Decode form data into `T`, reporting every failing field instead of only
/// the first.
///
/// Each failing path is recorded and then decoded as a neutral value on the
/// next pass, until a pass produces no new failure.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::{FormData, validate_form_data};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug)]
/// struct Contact {
///     name: String,
///     email: String,
///     age: u8,
/// }
///
/// let form = FormData::from_urlencoded(b"age=old");
/// let errors = validate_form_data::<Contact>(&form).unwrap_err();
/// assert_eq!(
///     errors.to_string(),
///     r#"{"age":"Expected number","email":"Required","name":"Required"}"#
/// );
/// ```
pub fn validate_form_data<T: DeserializeOwned>(
	form: &FormData,
) -> std::result::Result<T, FieldErrors> {
	let tree = FormTree::from_form_data(form);
	let mut errors = FieldErrors::new();
	let mut filled: Vec<Vec<KeySegment>> = Vec::new();

	loop {
		let error = match T::deserialize(Decoder::root(tree.clone(), &filled)) {
			Ok(value) if errors.is_empty() => return Ok(value),
			Ok(_) => return Err(errors),
			Err(error) => error,
		};
		let at: Vec<KeySegment> = error.path().segments().iter().map(KeySegment::from).collect();
		// Failures under a filled path restate an error already recorded.
		if filled.iter().any(|path| at.starts_with(path)) {
			return Err(errors);
		}
		errors.add(error.path().to_string(), error.message());
		if at.is_empty() {
			return Err(errors);
		}
		filled.push(at);
	}
}

/// [`validate_form_data`] over key/value pairs.
pub fn validate_pairs<T, I, K, V>(pairs: I) -> std::result::Result<T, FieldErrors>
where
	T: DeserializeOwned,
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	let form: FormData = pairs.into_iter().collect();
	validate_form_data(&form)
}

/// Decode key/value pairs (route parameters, query strings) into `T`.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::from_pairs;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Params {
///     test: String,
/// }
///
/// let error = from_pairs::<Params, _, _, _>(Vec::<(String, String)>::new()).err().unwrap();
/// assert_eq!(error.to_string(), "test: Required");
/// ```
pub fn from_pairs<T, I, K, V>(pairs: I) -> Result<T>
where
	T: DeserializeOwned,
	I: IntoIterator<Item = (K, V)>,
	K: Into<String>,
	V: Into<String>,
{
	let form: FormData = pairs.into_iter().collect();
	from_form_data(&form)
}

/// Nested view of flat form entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTree {
	Leaf(String),
	Map(IndexMap<String, FormTree>),
	Seq(Vec<FormTree>),
}

impl FormTree {
	/// Build the tree for a whole form. The root is always a map.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_formdata::{FormData, FormTree};
	///
	/// let form: FormData = [("items[0].name", "Item 1"), ("title", "Entries")]
	///     .into_iter()
	///     .collect();
	/// let FormTree::Map(root) = FormTree::from_form_data(&form) else { unreachable!() };
	/// assert!(matches!(root["items"], FormTree::Seq(_)));
	/// assert_eq!(root["title"], FormTree::Leaf("Entries".into()));
	/// ```
	pub fn from_form_data(form: &FormData) -> Self {
		let mut root = Node::Map(IndexMap::new());
		for (key, value) in form.iter() {
			let segments = parse_key(key).unwrap_or_else(|| vec![KeySegment::Field(key.to_string())]);
			insert(&mut root, &segments, value.to_string());
		}
		root.into_tree()
	}

	fn kind(&self) -> &'static str {
		match self {
			Self::Leaf(_) => "string",
			Self::Map(_) => "object",
			Self::Seq(_) => "array",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySegment {
	Field(String),
	Index(usize),
}

impl From<&PathSegment> for KeySegment {
	fn from(segment: &PathSegment) -> Self {
		match segment {
			PathSegment::Key { key, .. } => Self::Field(key.clone()),
			PathSegment::Index { index, .. } => Self::Index(*index),
		}
	}
}

/// Split `entries.items[0].name` into segments.
///
/// Returns `None` for keys that do not follow the grammar (empty names,
/// non-numeric or unterminated brackets, a leading index); such keys are
/// used verbatim as a single field name.
fn parse_key(key: &str) -> Option<Vec<KeySegment>> {
	let mut segments = Vec::new();
	let mut chars = key.chars().peekable();
	let mut name = String::new();

	loop {
		match chars.next() {
			Some('.') => {
				if name.is_empty() {
					// A dot directly after `]` is the delimiter itself and must
					// lead into a name.
					let after_index = matches!(segments.last(), Some(KeySegment::Index(_)));
					if !after_index || matches!(chars.peek(), None | Some('.') | Some('[')) {
						return None;
					}
					continue;
				}
				segments.push(KeySegment::Field(std::mem::take(&mut name)));
				if chars.peek().is_none() {
					return None;
				}
			}
			Some('[') => {
				if !name.is_empty() {
					segments.push(KeySegment::Field(std::mem::take(&mut name)));
				}
				if segments.is_empty() {
					return None;
				}
				let mut digits = String::new();
				loop {
					match chars.next() {
						Some(']') => break,
						Some(c) if c.is_ascii_digit() => digits.push(c),
						_ => return None,
					}
				}
				segments.push(KeySegment::Index(digits.parse().ok()?));
				if !matches!(chars.peek(), None | Some('.') | Some('[')) {
					return None;
				}
			}
			Some(c) => name.push(c),
			None => {
				if !name.is_empty() {
					segments.push(KeySegment::Field(name));
				}
				break;
			}
		}
	}

	if segments.is_empty() { None } else { Some(segments) }
}

/// Mutable tree used while inserting entries. Array positions are kept
/// sparse until the end so out-of-order indices still land in order.
#[derive(Debug)]
enum Node {
	Leaf(Vec<String>),
	Map(IndexMap<String, Node>),
	Indexed(BTreeMap<usize, Node>),
}

impl Node {
	fn into_tree(self) -> FormTree {
		match self {
			Node::Leaf(mut values) => {
				if values.len() == 1 {
					FormTree::Leaf(values.remove(0))
				} else {
					FormTree::Seq(values.into_iter().map(FormTree::Leaf).collect())
				}
			}
			Node::Map(map) => FormTree::Map(
				map.into_iter()
					.map(|(key, node)| (key, node.into_tree()))
					.collect(),
			),
			Node::Indexed(items) => {
				FormTree::Seq(items.into_values().map(Node::into_tree).collect())
			}
		}
	}
}

// A key used both as a leaf and as a container keeps whichever shape was
// written last.
fn insert(node: &mut Node, segments: &[KeySegment], value: String) {
	match segments.split_first() {
		None => {
			if let Node::Leaf(values) = node {
				values.push(value);
				return;
			}
			*node = Node::Leaf(vec![value]);
		}
		Some((KeySegment::Field(name), rest)) => {
			if let Node::Map(map) = node {
				let child = map
					.entry(name.clone())
					.or_insert_with(|| Node::Leaf(Vec::new()));
				insert(child, rest, value);
				return;
			}
			*node = Node::Map(IndexMap::new());
			insert(node, segments, value);
		}
		Some((KeySegment::Index(index), rest)) => {
			if let Node::Indexed(items) = node {
				let child = items
					.entry(*index)
					.or_insert_with(|| Node::Leaf(Vec::new()));
				insert(child, rest, value);
				return;
			}
			*node = Node::Indexed(BTreeMap::new());
			insert(node, segments, value);
		}
	}
}

fn expected(what: &str, found: &FormTree) -> FormDecodeError {
	FormDecodeError::new(format!("Expected {}, received {}", what, found.kind()))
}

/// Deserializer over one node of a [`FormTree`].
///
/// Nodes whose path is listed in `filled` decode as [`Filler`], which lets a
/// later pass get past fields that already reported an error.
struct Decoder<'a> {
	tree: Option<FormTree>,
	path: Vec<KeySegment>,
	filled: &'a [Vec<KeySegment>],
}

impl<'a> Decoder<'a> {
	fn root(tree: FormTree, filled: &'a [Vec<KeySegment>]) -> Self {
		Self {
			tree: Some(tree),
			path: Vec::new(),
			filled,
		}
	}

	fn child(
		path: &[KeySegment],
		segment: KeySegment,
		tree: Option<FormTree>,
		filled: &'a [Vec<KeySegment>],
	) -> Self {
		let mut path = path.to_vec();
		path.push(segment);
		let tree = if filled.contains(&path) { None } else { tree };
		Self { tree, path, filled }
	}
}

macro_rules! deserialize_parsed {
	($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
		$(
			fn $method<V>(self, visitor: V) -> Result<V::Value>
			where
				V: Visitor<'de>,
			{
				match self.tree {
					Some(FormTree::Leaf(text)) => match text.trim().parse::<$ty>() {
						Ok(parsed) => visitor.$visit(parsed),
						Err(_) => Err(FormDecodeError::new("Expected number")),
					},
					Some(other) => Err(expected("number", &other)),
					None => Filler.$method(visitor),
				}
			}
		)*
	};
}

impl<'de> de::Deserializer<'de> for Decoder<'_> {
	type Error = FormDecodeError;

	fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) => visitor.visit_string(text),
			Some(FormTree::Map(map)) => {
				visitor.visit_map(TreeMapAccess::new(map, &[], self.path, self.filled))
			}
			Some(FormTree::Seq(items)) => {
				visitor.visit_seq(TreeSeqAccess::new(items, self.path, self.filled))
			}
			None => Filler.deserialize_any(visitor),
		}
	}

	fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) => match text.as_str() {
				"on" | "true" => visitor.visit_bool(true),
				"off" | "false" => visitor.visit_bool(false),
				_ => Err(FormDecodeError::new("Expected boolean")),
			},
			Some(other) => Err(expected("boolean", &other)),
			None => Filler.deserialize_bool(visitor),
		}
	}

	deserialize_parsed! {
		deserialize_i8 => visit_i8: i8,
		deserialize_i16 => visit_i16: i16,
		deserialize_i32 => visit_i32: i32,
		deserialize_i64 => visit_i64: i64,
		deserialize_i128 => visit_i128: i128,
		deserialize_u8 => visit_u8: u8,
		deserialize_u16 => visit_u16: u16,
		deserialize_u32 => visit_u32: u32,
		deserialize_u64 => visit_u64: u64,
		deserialize_u128 => visit_u128: u128,
		deserialize_f32 => visit_f32: f32,
		deserialize_f64 => visit_f64: f64,
	}

	fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		self.deserialize_string(visitor)
	}

	fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		self.deserialize_string(visitor)
	}

	fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) => visitor.visit_string(text),
			Some(other) => Err(expected("string", &other)),
			None => Filler.deserialize_string(visitor),
		}
	}

	fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		self.deserialize_byte_buf(visitor)
	}

	fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) => visitor.visit_byte_buf(text.into_bytes()),
			Some(other) => Err(expected("string", &other)),
			None => Filler.deserialize_byte_buf(visitor),
		}
	}

	fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) if text.is_empty() => visitor.visit_none(),
			Some(other) => visitor.visit_some(Decoder {
				tree: Some(other),
				path: self.path,
				filled: self.filled,
			}),
			None => visitor.visit_none(),
		}
	}

	fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_unit()
	}

	fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_unit()
	}

	fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Seq(items)) => {
				visitor.visit_seq(TreeSeqAccess::new(items, self.path, self.filled))
			}
			Some(leaf @ FormTree::Leaf(_)) => {
				visitor.visit_seq(TreeSeqAccess::new(vec![leaf], self.path, self.filled))
			}
			Some(other) => Err(expected("array", &other)),
			None => Filler.deserialize_seq(visitor),
		}
	}

	fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		if self.tree.is_none() {
			return Filler.deserialize_tuple(len, visitor);
		}
		self.deserialize_seq(visitor)
	}

	fn deserialize_tuple_struct<V>(
		self,
		name: &'static str,
		len: usize,
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		if self.tree.is_none() {
			return Filler.deserialize_tuple_struct(name, len, visitor);
		}
		self.deserialize_seq(visitor)
	}

	fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Map(map)) => {
				visitor.visit_map(TreeMapAccess::new(map, &[], self.path, self.filled))
			}
			Some(other) => Err(expected("object", &other)),
			None => Filler.deserialize_map(visitor),
		}
	}

	fn deserialize_struct<V>(
		self,
		name: &'static str,
		fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Map(map)) => {
				visitor.visit_map(TreeMapAccess::new(map, fields, self.path, self.filled))
			}
			Some(other) => Err(expected("object", &other)),
			None => Filler.deserialize_struct(name, fields, visitor),
		}
	}

	fn deserialize_enum<V>(
		self,
		name: &'static str,
		variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match self.tree {
			Some(FormTree::Leaf(text)) => {
				visitor.visit_enum(StringDeserializer::<FormDecodeError>::new(text))
			}
			Some(other) => Err(expected("string", &other)),
			None => Filler.deserialize_enum(name, variants, visitor),
		}
	}

	fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		self.deserialize_string(visitor)
	}

	fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_unit()
	}
}

/// Map access over one level of the tree. Errors raised by a value are
/// prefixed with its key so the final error names the full path.
struct TreeMapAccess<'a> {
	iter: std::vec::IntoIter<(String, Option<FormTree>)>,
	pending: Option<(String, Option<FormTree>)>,
	path: Vec<KeySegment>,
	filled: &'a [Vec<KeySegment>],
}

impl<'a> TreeMapAccess<'a> {
	/// Absent `fields` that are filled are appended so the struct sees them.
	fn new(
		map: IndexMap<String, FormTree>,
		fields: &[&str],
		path: Vec<KeySegment>,
		filled: &'a [Vec<KeySegment>],
	) -> Self {
		let absent: Vec<(String, Option<FormTree>)> = fields
			.iter()
			.filter(|field| !map.contains_key(**field))
			.filter(|field| {
				let mut at = path.clone();
				at.push(KeySegment::Field(field.to_string()));
				filled.contains(&at)
			})
			.map(|field| (field.to_string(), None))
			.collect();
		let entries: Vec<(String, Option<FormTree>)> = map
			.into_iter()
			.map(|(key, tree)| (key, Some(tree)))
			.chain(absent)
			.collect();
		Self {
			iter: entries.into_iter(),
			pending: None,
			path,
			filled,
		}
	}
}

impl<'de> MapAccess<'de> for TreeMapAccess<'_> {
	type Error = FormDecodeError;

	fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
	where
		K: DeserializeSeed<'de>,
	{
		match self.iter.next() {
			Some((key, value)) => {
				let decoded = seed.deserialize(StringDeserializer::<FormDecodeError>::new(key.clone()))?;
				self.pending = Some((key, value));
				Ok(Some(decoded))
			}
			None => Ok(None),
		}
	}

	fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
	where
		V: DeserializeSeed<'de>,
	{
		let (key, value) = self
			.pending
			.take()
			.ok_or_else(|| FormDecodeError::new("Form value requested before its key"))?;
		let decoder =
			Decoder::child(&self.path, KeySegment::Field(key.clone()), value, self.filled);
		seed.deserialize(decoder).map_err(|e| e.under_key(&key))
	}

	fn size_hint(&self) -> Option<usize> {
		Some(self.iter.len())
	}
}

struct TreeSeqAccess<'a> {
	iter: std::iter::Enumerate<std::vec::IntoIter<FormTree>>,
	path: Vec<KeySegment>,
	filled: &'a [Vec<KeySegment>],
}

impl<'a> TreeSeqAccess<'a> {
	fn new(items: Vec<FormTree>, path: Vec<KeySegment>, filled: &'a [Vec<KeySegment>]) -> Self {
		Self {
			iter: items.into_iter().enumerate(),
			path,
			filled,
		}
	}
}

impl<'de> SeqAccess<'de> for TreeSeqAccess<'_> {
	type Error = FormDecodeError;

	fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
	where
		T: DeserializeSeed<'de>,
	{
		match self.iter.next() {
			Some((index, item)) => {
				let decoder =
					Decoder::child(&self.path, KeySegment::Index(index), Some(item), self.filled);
				seed.deserialize(decoder)
					.map(Some)
					.map_err(|e| e.under_index(index))
			}
			None => Ok(None),
		}
	}

	fn size_hint(&self) -> Option<usize> {
		Some(self.iter.len())
	}
}

/// Neutral value of whatever type is requested. Stands in for fields whose
/// error is already recorded; the decoded result is thrown away.
#[derive(Debug, Clone, Copy)]
struct Filler;

macro_rules! fill_with {
	($($method:ident => $visit:ident($($value:expr)?)),* $(,)?) => {
		$(
			fn $method<V>(self, visitor: V) -> Result<V::Value>
			where
				V: Visitor<'de>,
			{
				visitor.$visit($($value)?)
			}
		)*
	};
}

impl<'de> de::Deserializer<'de> for Filler {
	type Error = FormDecodeError;

	fill_with! {
		deserialize_any => visit_unit(),
		deserialize_bool => visit_bool(false),
		deserialize_i8 => visit_i8(0),
		deserialize_i16 => visit_i16(0),
		deserialize_i32 => visit_i32(0),
		deserialize_i64 => visit_i64(0),
		deserialize_i128 => visit_i128(0),
		deserialize_u8 => visit_u8(0),
		deserialize_u16 => visit_u16(0),
		deserialize_u32 => visit_u32(0),
		deserialize_u64 => visit_u64(0),
		deserialize_u128 => visit_u128(0),
		deserialize_f32 => visit_f32(0.0),
		deserialize_f64 => visit_f64(0.0),
		deserialize_char => visit_char(' '),
		deserialize_str => visit_str(""),
		deserialize_string => visit_string(String::new()),
		deserialize_identifier => visit_str(""),
		deserialize_bytes => visit_bytes(&[]),
		deserialize_byte_buf => visit_byte_buf(Vec::new()),
		deserialize_option => visit_none(),
		deserialize_unit => visit_unit(),
		deserialize_ignored_any => visit_unit(),
	}

	fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_unit()
	}

	fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_newtype_struct(self)
	}

	fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_seq(FillerSeq(0))
	}

	fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_seq(FillerSeq(len))
	}

	fn deserialize_tuple_struct<V>(
		self,
		_name: &'static str,
		len: usize,
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_seq(FillerSeq(len))
	}

	fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_map(FillerMap(NO_FIELDS.iter()))
	}

	fn deserialize_struct<V>(
		self,
		_name: &'static str,
		fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		visitor.visit_map(FillerMap(fields.iter()))
	}

	fn deserialize_enum<V>(
		self,
		_name: &'static str,
		variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value>
	where
		V: Visitor<'de>,
	{
		match variants.first() {
			Some(variant) => {
				visitor.visit_enum(StringDeserializer::<FormDecodeError>::new(variant.to_string()))
			}
			None => Err(FormDecodeError::new("Expected a variant")),
		}
	}
}

struct FillerSeq(usize);

impl<'de> SeqAccess<'de> for FillerSeq {
	type Error = FormDecodeError;

	fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
	where
		T: DeserializeSeed<'de>,
	{
		if self.0 == 0 {
			return Ok(None);
		}
		self.0 -= 1;
		seed.deserialize(Filler).map(Some)
	}
}

const NO_FIELDS: &[&str] = &[];

struct FillerMap(std::slice::Iter<'static, &'static str>);

impl<'de> MapAccess<'de> for FillerMap {
	type Error = FormDecodeError;

	fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
	where
		K: DeserializeSeed<'de>,
	{
		match self.0.next() {
			Some(field) => seed
				.deserialize(StringDeserializer::<FormDecodeError>::new(field.to_string()))
				.map(Some),
			None => Ok(None),
		}
	}

	fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
	where
		V: DeserializeSeed<'de>,
	{
		seed.deserialize(Filler)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::Deserialize;
	use std::collections::HashMap;

	fn form(pairs: &[(&str, &str)]) -> FormData {
		pairs.iter().copied().collect()
	}

	#[rstest]
	#[case("name", Some(vec![KeySegment::Field("name".into())]))]
	#[case(
		"country.code",
		Some(vec![KeySegment::Field("country".into()), KeySegment::Field("code".into())])
	)]
	#[case("ids[2]", Some(vec![KeySegment::Field("ids".into()), KeySegment::Index(2)]))]
	#[case(
		"codes[0].code",
		Some(vec![
			KeySegment::Field("codes".into()),
			KeySegment::Index(0),
			KeySegment::Field("code".into()),
		])
	)]
	#[case(
		"grid[0][1]",
		Some(vec![KeySegment::Field("grid".into()), KeySegment::Index(0), KeySegment::Index(1)])
	)]
	#[case("a..b", None)]
	#[case(".a", None)]
	#[case("a.", None)]
	#[case("[0]", None)]
	#[case("a[x]", None)]
	#[case("a[]", None)]
	#[case("a[0", None)]
	#[case("a[0]b", None)]
	#[case("", None)]
	fn test_parse_key(#[case] key: &str, #[case] expected: Option<Vec<KeySegment>>) {
		assert_eq!(parse_key(key), expected);
	}

	#[rstest]
	fn test_malformed_key_is_kept_verbatim() {
		// Arrange
		let key = "special!@#$%^&*()_+-=[]{}|;':,.<>?";
		let form = form(&[(key, "value")]);

		// Act
		let decoded: HashMap<String, String> = from_form_data(&form).unwrap();

		// Assert
		assert_eq!(decoded.get(key).map(String::as_str), Some("value"));
	}

	#[rstest]
	fn test_tree_compacts_sparse_indices_in_order() {
		// Arrange
		let form = form(&[("ids[5]", "c"), ("ids[0]", "a"), ("ids[2]", "b")]);

		// Act
		let ids: HashMap<String, Vec<String>> = from_form_data(&form).unwrap();

		// Assert
		assert_eq!(ids["ids"], vec!["a", "b", "c"]);
	}

	#[rstest]
	fn test_repeated_key_becomes_sequence() {
		// Arrange
		#[derive(Deserialize)]
		struct Tags {
			tag: Vec<String>,
		}
		let form = form(&[("tag", "a"), ("tag", "b")]);

		// Act
		let tags: Tags = from_form_data(&form).unwrap();

		// Assert
		assert_eq!(tags.tag, vec!["a", "b"]);
	}

	#[rstest]
	fn test_single_leaf_as_sequence() {
		#[derive(Deserialize)]
		struct Tags {
			tag: Vec<String>,
		}

		let tags: Tags = from_form_data(&form(&[("tag", "only")])).unwrap();

		assert_eq!(tags.tag, vec!["only"]);
	}

	#[rstest]
	fn test_nested_structures() {
		// Arrange
		#[derive(Deserialize, Debug, PartialEq)]
		struct Item {
			name: String,
			value: u32,
		}
		#[derive(Deserialize, Debug, PartialEq)]
		struct Entries {
			title: String,
			items: Vec<Item>,
		}
		#[derive(Deserialize, Debug, PartialEq)]
		struct Payload {
			entries: Entries,
		}
		let form = form(&[
			("entries.title", "Entries"),
			("entries.items[0].name", "Item 1"),
			("entries.items[0].value", "1"),
			("entries.items[1].name", "Item 2"),
			("entries.items[1].value", "2"),
		]);

		// Act
		let payload: Payload = from_form_data(&form).unwrap();

		// Assert
		assert_eq!(
			payload,
			Payload {
				entries: Entries {
					title: "Entries".into(),
					items: vec![
						Item {
							name: "Item 1".into(),
							value: 1,
						},
						Item {
							name: "Item 2".into(),
							value: 2,
						},
					],
				},
			}
		);
	}

	#[rstest]
	#[case("on", true)]
	#[case("true", true)]
	#[case("off", false)]
	#[case("false", false)]
	fn test_bool_coercion(#[case] raw: &str, #[case] expected: bool) {
		#[derive(Deserialize)]
		struct Flag {
			flag: bool,
		}

		let flag: Flag = from_form_data(&form(&[("flag", raw)])).unwrap();

		assert_eq!(flag.flag, expected);
	}

	#[rstest]
	fn test_invalid_bool_reports_path() {
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Flag {
			flag: bool,
		}

		let error = from_form_data::<Flag>(&form(&[("flag", "maybe")])).unwrap_err();

		assert_eq!(error.to_string(), "flag: Expected boolean");
	}

	#[rstest]
	fn test_number_coercion_and_error_path() {
		// Arrange
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Line {
			qty: u32,
			price: f64,
		}
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Order {
			lines: Vec<Line>,
		}

		// Act
		let ok: Order = from_form_data(&form(&[
			("lines[0].qty", "3"),
			("lines[0].price", " 9.5 "),
		]))
		.unwrap();
		let error = from_form_data::<Order>(&form(&[
			("lines[0].qty", "3"),
			("lines[0].price", "1"),
			("lines[1].qty", "many"),
			("lines[1].price", "1"),
		]))
		.unwrap_err();

		// Assert
		assert_eq!(ok.lines[0].qty, 3);
		assert_eq!(ok.lines[0].price, 9.5);
		assert_eq!(error.path().to_string(), "lines[1].qty");
		assert_eq!(error.message(), "Expected number");
	}

	#[rstest]
	fn test_optional_fields() {
		// Arrange
		#[derive(Deserialize, Debug, PartialEq)]
		struct Profile {
			nickname: Option<String>,
			age: Option<u8>,
			bio: Option<String>,
		}

		// Act
		let profile: Profile = from_form_data(&form(&[("nickname", ""), ("age", "30")])).unwrap();

		// Assert
		assert_eq!(
			profile,
			Profile {
				nickname: None,
				age: Some(30),
				bio: None,
			}
		);
	}

	#[rstest]
	fn test_missing_nested_field_is_required() {
		// Arrange
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Country {
			name: String,
			code: String,
		}
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Address {
			country: Country,
		}

		// Act
		let error = from_form_data::<Address>(&form(&[("country.name", "United States")]))
			.unwrap_err();

		// Assert
		assert_eq!(error.path().to_string(), "country.code");
		assert_eq!(error.message(), "Required");
	}

	#[rstest]
	fn test_unit_enum_from_leaf() {
		#[derive(Deserialize, Debug, PartialEq)]
		#[serde(rename_all = "lowercase")]
		enum Role {
			Admin,
			Member,
		}
		#[derive(Deserialize)]
		struct Invite {
			role: Role,
		}

		let invite: Invite = from_form_data(&form(&[("role", "member")])).unwrap();

		assert_eq!(invite.role, Role::Member);
	}

	#[rstest]
	fn test_unit_accepts_anything() {
		from_form_data::<()>(&form(&[("anything", "goes")])).unwrap();
		from_pairs::<(), _, _, _>(Vec::<(String, String)>::new()).unwrap();
	}

	#[rstest]
	fn test_leaf_and_container_conflict_keeps_last_shape() {
		let tree = FormTree::from_form_data(&form(&[("a", "1"), ("a.b", "2")]));

		let FormTree::Map(root) = tree else {
			panic!("root must be a map");
		};
		assert!(matches!(root["a"], FormTree::Map(_)));
	}

	#[rstest]
	fn test_validate_collects_every_failing_field() {
		// Arrange
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Line {
			qty: u32,
			sku: String,
		}
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Order {
			customer: String,
			express: bool,
			lines: Vec<Line>,
		}
		let form = form(&[
			("express", "maybe"),
			("lines[0].qty", "2"),
			("lines[0].sku", "A-1"),
			("lines[1].qty", "many"),
		]);

		// Act
		let errors = validate_form_data::<Order>(&form).unwrap_err();

		// Assert
		assert_eq!(
			errors.to_string(),
			concat!(
				r#"{"customer":"Required","express":"Expected boolean","#,
				r#""lines[1].qty":"Expected number","lines[1].sku":"Required"}"#
			)
		);
	}

	#[rstest]
	fn test_validate_reports_missing_nested_struct_once() {
		// Arrange
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Country {
			name: String,
			code: String,
		}
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Address {
			street: String,
			country: Country,
		}

		// Act
		let errors = validate_form_data::<Address>(&form(&[("street", "Main")])).unwrap_err();

		// Assert
		assert_eq!(errors.len(), 1);
		assert_eq!(errors.get("country"), Some(&["Required".to_string()][..]));
	}

	#[rstest]
	fn test_validate_returns_value_when_form_is_valid() {
		#[derive(Deserialize, Debug, PartialEq)]
		struct Flag {
			flag: bool,
			#[serde(default)]
			note: String,
		}

		let flag: Flag = validate_form_data(&form(&[("flag", "on")])).unwrap();

		assert_eq!(
			flag,
			Flag {
				flag: true,
				note: String::new(),
			}
		);
	}

	#[rstest]
	fn test_validate_pairs_reports_all_missing_keys() {
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Params {
			id: u64,
			slug: String,
		}

		let errors = validate_pairs::<Params, _, _, _>(Vec::<(String, String)>::new()).unwrap_err();

		assert_eq!(errors.to_string(), r#"{"id":"Required","slug":"Required"}"#);
	}

	#[rstest]
	fn test_struct_from_leaf_is_type_error() {
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Inner {
			x: String,
		}
		#[derive(Deserialize, Debug)]
		#[allow(dead_code)]
		struct Outer {
			inner: Inner,
		}

		let error = from_form_data::<Outer>(&form(&[("inner", "flat")])).unwrap_err();

		assert_eq!(error.to_string(), "inner: Expected object, received string");
	}
}
