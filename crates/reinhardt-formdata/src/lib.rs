//! # Reinhardt Form Data
//!
//! Flat form-data handling for action submissions.
//!
//! ## Components
//!
//! - **FormData**: Ordered key/value multi-map, the wire shape of a form submission
//! - **FormValue**: Nested plain-data input (objects, arrays, primitives, dates)
//! - **serialize_to_form_data**: Flattens a `FormValue` into `FormData` using
//!   dot and bracket-index key paths (`entries.items[0].name`)
//! - **from_form_data**: Decodes `FormData` back into a typed value with form
//!   coercion (`"on"` checkboxes, numeric strings, empty optionals)
//! - **validate_form_data**: Same decoding, but collects an error for every
//!   failing field
//!
//! ## Example
//!
//! ```
//! use reinhardt_formdata::serialize_to_form_data;
//! use serde_json::json;
//!
//! let form = serialize_to_form_data(json!({
//!     "street": "1234 Main St",
//!     "country": { "name": "United States", "code": "US" }
//! }));
//!
//! assert_eq!(form.get("street"), Some("1234 Main St"));
//! assert_eq!(form.get("country.name"), Some("United States"));
//! assert_eq!(form.get("country.code"), Some("US"));
//! ```

pub mod de;
pub mod error;
pub mod form_data;
pub mod path;
pub mod serialize;
pub mod value;

pub use de::{FormTree, from_form_data, from_pairs, validate_form_data, validate_pairs};
pub use error::{FieldErrors, FormDataError, FormDecodeError, Result};
pub use form_data::FormData;
pub use path::{FormPath, PathSegment};
pub use serialize::{serialize_to_form_data, to_form_data};
pub use value::FormValue;
