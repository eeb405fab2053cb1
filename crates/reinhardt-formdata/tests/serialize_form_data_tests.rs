//! Form-data serialization tests
//!
//! Flattening of nested objects into dot/bracket keyed entries, and decoding
//! those entries back into typed values.

use reinhardt_formdata::{FormData, FormValue, from_form_data, serialize_to_form_data, to_form_data};
use rstest::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[fixture]
fn address() -> serde_json::Value {
	json!({
		"street": "1234 Main St",
		"city": "Springfield",
		"state": "IL",
		"country": {
			"name": "United States",
			"code": "US"
		}
	})
}

#[rstest]
fn test_existing_form_data_is_returned_unchanged() {
	// Arrange
	let mut form = FormData::new();
	form.set("test", "data");

	// Act
	let result = serialize_to_form_data(form.clone());

	// Assert
	assert_eq!(result, form);
}

#[rstest]
fn test_serialize_array() {
	let result = serialize_to_form_data(json!({"testIds": ["1", "2", "3"]}));

	assert_eq!(result.get("testIds[0]"), Some("1"));
	assert_eq!(result.get("testIds[1]"), Some("2"));
	assert_eq!(result.get("testIds[2]"), Some("3"));
}

#[rstest]
fn test_serialize_object(address: serde_json::Value) {
	let result = serialize_to_form_data(address);

	assert_eq!(result.get("street"), Some("1234 Main St"));
	assert_eq!(result.get("city"), Some("Springfield"));
	assert_eq!(result.get("state"), Some("IL"));
	assert_eq!(result.get("country.name"), Some("United States"));
	assert_eq!(result.get("country.code"), Some("US"));
	assert_eq!(result.len(), 5);
}

#[rstest]
fn test_serialize_object_with_nested_arrays() {
	// Arrange
	let input = json!({
		"street": "1234 Main St",
		"city": {
			"details": {"name": "Springfield", "zip": "62701"},
			"country": {"name": "United States", "code": "US"}
		},
		"codes": [
			{"code": "A", "description": "Code A"},
			{"code": "B", "description": "Code B"}
		],
		"entries": {
			"title": "Entries",
			"items": [
				{"name": "Item 1", "value": "1"},
				{"name": "Item 2", "value": "2"}
			]
		}
	});

	// Act
	let result = serialize_to_form_data(input);

	// Assert
	assert_eq!(result.get("city.details.name"), Some("Springfield"));
	assert_eq!(result.get("city.details.zip"), Some("62701"));
	assert_eq!(result.get("city.country.name"), Some("United States"));
	assert_eq!(result.get("city.country.code"), Some("US"));
	assert_eq!(result.get("street"), Some("1234 Main St"));
	assert_eq!(result.get("codes[0].code"), Some("A"));
	assert_eq!(result.get("codes[0].description"), Some("Code A"));
	assert_eq!(result.get("codes[1].code"), Some("B"));
	assert_eq!(result.get("codes[1].description"), Some("Code B"));
	assert_eq!(result.get("entries.title"), Some("Entries"));
	assert_eq!(result.get("entries.items[0].name"), Some("Item 1"));
	assert_eq!(result.get("entries.items[0].value"), Some("1"));
	assert_eq!(result.get("entries.items[1].name"), Some("Item 2"));
	assert_eq!(result.get("entries.items[1].value"), Some("2"));
}

#[rstest]
fn test_null_and_undefined_values_are_skipped() {
	// Arrange
	let input: FormValue = [
		("street", FormValue::Null),
		("city", FormValue::Undefined),
		("state", FormValue::from("IL")),
		(
			"country",
			[("name", "United States"), ("code", "US")]
				.into_iter()
				.collect(),
		),
	]
	.into_iter()
	.collect();

	// Act
	let result = serialize_to_form_data(input);

	// Assert
	assert!(!result.has("street"));
	assert!(!result.has("city"));
	assert_eq!(result.get("state"), Some("IL"));
	assert_eq!(result.get("country.name"), Some("United States"));
	assert_eq!(result.get("country.code"), Some("US"));
}

#[rstest]
#[case(json!({}))]
#[case(json!({"items": []}))]
#[case(json!({"meta": {}}))]
fn test_empty_containers_produce_no_entries(#[case] input: serde_json::Value) {
	assert!(serialize_to_form_data(input).is_empty());
}

#[rstest]
fn test_mixed_types() {
	let result = serialize_to_form_data(json!({
		"string": "test",
		"number": 123,
		"boolean": true,
		"nullValue": null
	}));

	assert_eq!(result.get("string"), Some("test"));
	assert_eq!(result.get("number"), Some("123"));
	assert_eq!(result.get("boolean"), Some("on"));
	assert_eq!(result.get("nullValue"), None);
}

#[rstest]
fn test_deeply_nested_objects() {
	let result = serialize_to_form_data(json!({
		"level1": {"level2": {"level3": {"level4": "deepValue"}}}
	}));

	assert_eq!(result.get("level1.level2.level3.level4"), Some("deepValue"));
}

#[rstest]
fn test_special_characters_in_keys() {
	let key = "special!@#$%^&*()_+-=[]{}|;':,.<>?";

	let result = serialize_to_form_data(json!({ key: "value" }));

	assert_eq!(result.get(key), Some("value"));
}

#[rstest]
fn test_array_of_objects() {
	let result = serialize_to_form_data(json!({
		"items": [
			{"name": "Item 1", "value": "1"},
			{"name": "Item 2", "value": "2"}
		]
	}));

	assert_eq!(result.get("items[0].name"), Some("Item 1"));
	assert_eq!(result.get("items[0].value"), Some("1"));
	assert_eq!(result.get("items[1].name"), Some("Item 2"));
	assert_eq!(result.get("items[1].value"), Some("2"));
}

#[rstest]
fn test_urlencoded_wire_form() {
	// Arrange
	let form = serialize_to_form_data(json!({"codes": [{"code": "A B"}]}));

	// Act
	let encoded = form.to_urlencoded();
	let decoded = FormData::from_urlencoded(encoded.as_bytes());

	// Assert
	assert_eq!(encoded, "codes%5B0%5D.code=A+B");
	assert_eq!(decoded, form);
}

#[rstest]
fn test_serialized_form_decodes_into_typed_value(address: serde_json::Value) {
	// Arrange
	#[derive(Deserialize, Debug, PartialEq)]
	struct Country {
		name: String,
		code: String,
	}
	#[derive(Deserialize, Debug, PartialEq)]
	struct Address {
		street: String,
		city: String,
		state: String,
		country: Country,
	}

	// Act
	let form = serialize_to_form_data(address);
	let decoded: Address = from_form_data(&form).unwrap();

	// Assert
	assert_eq!(
		decoded,
		Address {
			street: "1234 Main St".into(),
			city: "Springfield".into(),
			state: "IL".into(),
			country: Country {
				name: "United States".into(),
				code: "US".into(),
			},
		}
	);
}

#[rstest]
fn test_checkbox_value_decodes_as_true() {
	// Arrange
	#[derive(Deserialize)]
	struct Consent {
		agree: bool,
		#[serde(default)]
		newsletter: bool,
	}

	// Act
	let form = serialize_to_form_data(json!({"agree": true, "newsletter": false}));
	let consent: Consent = from_form_data(&form).unwrap();

	// Assert
	assert!(consent.agree);
	assert!(!consent.newsletter);
}

#[rstest]
fn test_typed_float_fields_render_like_browser_numbers() {
	// Arrange
	#[derive(Serialize)]
	struct Quote {
		price: f64,
		discount: f32,
		ceiling: f64,
		ratio: f64,
	}
	let quote = Quote {
		price: 10.0,
		discount: 0.5,
		ceiling: 1e21,
		ratio: f64::INFINITY,
	};

	// Act
	let form = to_form_data(&quote).unwrap();

	// Assert
	assert_eq!(form.get("price"), Some("10"));
	assert_eq!(form.get("discount"), Some("0.5"));
	assert_eq!(form.get("ceiling"), Some("1e+21"));
	// Serde's JSON model has no infinity; the field becomes null and is dropped.
	assert!(!form.has("ratio"));
}
