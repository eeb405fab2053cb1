use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, LOCATION};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Outgoing response produced by action helpers.
///
/// A response raised as an error (see `ActionError::Response` in the server
/// crate) is handed back to the framework untouched, which is how redirects
/// and early exits escape a mutation.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a response with the given status and an empty body.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::ACCEPTED);
	/// assert_eq!(response.status, StatusCode::ACCEPTED);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// 302 Found pointing at `location`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::redirect("/contacts/1");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(
	///     response.headers.get("location").unwrap().to_str().unwrap(),
	///     "/contacts/1"
	/// );
	/// ```
	pub fn redirect(location: impl AsRef<str>) -> Self {
		Self::new(StatusCode::FOUND).with_location(location.as_ref())
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Add a header. Names or values that are not valid HTTP are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}

	pub fn with_location(mut self, location: &str) -> Self {
		if let Ok(value) = HeaderValue::from_str(location) {
			self.headers.insert(LOCATION, value);
		}
		self
	}

	/// Set a JSON body and the `application/json` content type.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"user": "test"})).unwrap();
	///
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// assert_eq!(response.json_body::<serde_json::Value>().unwrap(), json!({"user": "test"}));
	/// ```
	pub fn with_json<T: Serialize + ?Sized>(mut self, data: &T) -> Result<Self, serde_json::Error> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Decode the body as JSON.
	pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}
}
