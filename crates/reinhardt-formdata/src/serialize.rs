//! Object-to-form-data serialization.
//!
//! Nested values are flattened into entries whose keys spell out the path
//! from the root:
//!
//! | Input | Entry |
//! |-------|-------|
//! | `{street: "1234 Main St"}` | `street=1234 Main St` |
//! | `{country: {code: "US"}}` | `country.code=US` |
//! | `{ids: ["1", "2"]}` | `ids[0]=1`, `ids[1]=2` |
//! | `{entries: {items: [{name: "Item 1"}]}}` | `entries.items[0].name=Item 1` |
//! | `{agree: true}` | `agree=on` |
//!
//! Falsy leaves (`null`, `undefined`, `false`, `0`, `""`) and empty containers
//! produce no entry at all. The serializer never fails.

use crate::error::Result;
use crate::form_data::FormData;
use crate::path::{FormPath, PathSegment};
use crate::value::FormValue;
use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::Number;

/// Value appended for a `true` leaf, the same value a checked HTML checkbox
/// submits.
pub const CHECKBOX_ON: &str = "on";

/// Flatten `value` into form data.
///
/// An input that already is [`FormData`] is returned unchanged. Any top-level
/// input that is not an object yields an empty container.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::serialize_to_form_data;
/// use serde_json::json;
///
/// let form = serialize_to_form_data(json!({
///     "codes": [{"code": "A"}, {"code": "B"}],
///     "agree": true,
///     "note": null
/// }));
///
/// assert_eq!(form.get("codes[0].code"), Some("A"));
/// assert_eq!(form.get("codes[1].code"), Some("B"));
/// assert_eq!(form.get("agree"), Some("on"));
/// assert!(!form.has("note"));
///
/// let empty = serialize_to_form_data(json!(["not", "an", "object"]));
/// assert!(empty.is_empty());
/// ```
pub fn serialize_to_form_data(value: impl Into<FormValue>) -> FormData {
	match value.into() {
		FormValue::FormData(form) => form,
		value @ FormValue::Object(_) => {
			let mut form = FormData::new();
			let mut path = FormPath::new();
			serialize_value(&value, &mut path, &mut form);
			form
		}
		_ => FormData::new(),
	}
}

/// Flatten any serializable value.
///
/// Fails only when `T`'s own `Serialize` implementation fails.
///
/// # Examples
///
/// ```
/// use reinhardt_formdata::to_form_data;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Item {
///     name: String,
///     value: u32,
/// }
///
/// #[derive(Serialize)]
/// struct Order {
///     items: Vec<Item>,
/// }
///
/// let order = Order {
///     items: vec![Item { name: "Item 1".into(), value: 1 }],
/// };
/// let form = to_form_data(&order).unwrap();
/// assert_eq!(form.get("items[0].name"), Some("Item 1"));
/// assert_eq!(form.get("items[0].value"), Some("1"));
/// ```
pub fn to_form_data<T: Serialize + ?Sized>(value: &T) -> Result<FormData> {
	FormValue::from_serialize(value).map(serialize_to_form_data)
}

fn serialize_value(value: &FormValue, path: &mut FormPath, form: &mut FormData) {
	match value {
		FormValue::Object(entries) => {
			for (key, child) in entries {
				path.push(PathSegment::key(key.as_str(), child));
				serialize_value(child, path, form);
				path.pop();
			}
		}
		FormValue::Array(items) => {
			for (index, child) in items.iter().enumerate() {
				path.push(PathSegment::index(index, child));
				serialize_value(child, path, form);
				path.pop();
			}
		}
		// Nested containers are opaque: they expose no keys to walk.
		FormValue::FormData(_) => {}
		leaf => match render_leaf(leaf) {
			Some(rendered) => form.append(path.to_string(), rendered),
			None => tracing::trace!(path = %path, "skipping falsy form value"),
		},
	}
}

fn render_leaf(value: &FormValue) -> Option<String> {
	if !value.is_truthy() {
		return None;
	}
	match value {
		FormValue::Date(date) => Some(date.to_rfc3339_opts(SecondsFormat::Millis, true)),
		FormValue::Bool(true) => Some(CHECKBOX_ON.to_string()),
		FormValue::Number(number) => Some(render_number(number)),
		FormValue::String(text) => Some(text.clone()),
		_ => None,
	}
}

/// Render a number the way a browser stringifies it: integral floats carry
/// no fraction (`10`, not `10.0`), and magnitudes outside `[1e-6, 1e21)` use
/// an exponent with an explicit sign (`1e+21`, `1.5e-7`).
fn render_number(number: &Number) -> String {
	match number.as_f64() {
		Some(value) if number.is_f64() => render_float(value),
		_ => number.to_string(),
	}
}

fn render_float(value: f64) -> String {
	let magnitude = value.abs();
	if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
		return value.to_string();
	}
	let rendered = format!("{:e}", value);
	match rendered.split_once('e') {
		Some((mantissa, exponent)) if !exponent.starts_with('-') => {
			format!("{}e+{}", mantissa, exponent)
		}
		_ => rendered,
	}
}
