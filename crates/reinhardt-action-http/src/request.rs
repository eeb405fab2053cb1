use bytes::Bytes;
use futures_util::future::ready;
use futures_util::stream::once;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use reinhardt_formdata::FormData;

/// Media type of an urlencoded form body.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Media type of a multipart form body.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Errors raised while building or reading a [`Request`].
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
	#[error("Invalid URI: {0}")]
	InvalidUri(String),
	#[error("Invalid header: {0}")]
	InvalidHeader(String),
	#[error("Unsupported media type for form data: {0}")]
	UnsupportedMediaType(String),
	#[error("Malformed multipart body: {0}")]
	Multipart(String),
}

pub type Result<T> = std::result::Result<T, RequestError>;

/// Incoming request as seen by action and loader helpers.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Request {
	/// Start building a request. Defaults to `GET /`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Request;
	/// use http::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/contacts?sort=name")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/contacts");
	/// assert_eq!(request.method, Method::POST);
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Raw query string, without the leading `?`.
	pub fn query(&self) -> Option<&str> {
		self.uri.query()
	}

	/// URL-decoded query parameters in request order.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/search?q=John%20Doe&tag=a&tag=b")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(
	///     request.query_params(),
	///     vec![
	///         ("q".to_string(), "John Doe".to_string()),
	///         ("tag".to_string(), "a".to_string()),
	///         ("tag".to_string(), "b".to_string()),
	///     ]
	/// );
	/// ```
	pub fn query_params(&self) -> Vec<(String, String)> {
		self.query()
			.map(|query| {
				url::form_urlencoded::parse(query.as_bytes())
					.map(|(key, value)| (key.into_owned(), value.into_owned()))
					.collect()
			})
			.unwrap_or_default()
	}

	/// Media type of the body, lowercased and without parameters.
	pub fn content_type(&self) -> Option<String> {
		self.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(';').next())
			.map(|essence| essence.trim().to_ascii_lowercase())
			.filter(|essence| !essence.is_empty())
	}

	/// Read the submitted form.
	///
	/// `GET` and `HEAD` requests carry their form in the query string. Other
	/// methods must send an urlencoded or multipart body; an empty body
	/// without a content type reads as an empty form. Multipart file parts
	/// are skipped, only text fields are kept.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Request;
	/// use http::Method;
	///
	/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/")
	///     .header("content-type", "application/x-www-form-urlencoded")
	///     .body("test=data&checkbox=on")
	///     .build()
	///     .unwrap();
	///
	/// let form = request.form_data().await.unwrap();
	/// assert_eq!(form.get("test"), Some("data"));
	/// assert_eq!(form.get("checkbox"), Some("on"));
	/// # });
	/// ```
	pub async fn form_data(&self) -> Result<FormData> {
		if self.method == Method::GET || self.method == Method::HEAD {
			return Ok(FormData::from_urlencoded(
				self.query().unwrap_or_default().as_bytes(),
			));
		}

		match self.content_type() {
			Some(media_type) if media_type == FORM_URLENCODED => {
				Ok(FormData::from_urlencoded(&self.body))
			}
			Some(media_type) if media_type == MULTIPART_FORM_DATA => self.multipart_form().await,
			None if self.body.is_empty() => Ok(FormData::new()),
			Some(media_type) => Err(RequestError::UnsupportedMediaType(media_type)),
			None => Err(RequestError::UnsupportedMediaType("(none)".to_string())),
		}
	}

	async fn multipart_form(&self) -> Result<FormData> {
		let content_type = self
			.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.unwrap_or_default();
		let boundary = multer::parse_boundary(content_type)
			.map_err(|e| RequestError::Multipart(format!("Failed to parse boundary: {}", e)))?;

		// multer reads from a stream; the body is already buffered.
		let stream = once(ready(Ok::<_, std::io::Error>(self.body.clone())));
		let mut multipart = multer::Multipart::new(stream, boundary);

		let mut form = FormData::new();
		while let Some(field) = multipart
			.next_field()
			.await
			.map_err(|e| RequestError::Multipart(e.to_string()))?
		{
			let name = field
				.name()
				.ok_or_else(|| RequestError::Multipart("Field name missing".to_string()))?
				.to_string();
			if let Some(file_name) = field.file_name() {
				tracing::debug!(field = %name, file_name, "skipping multipart file part");
				continue;
			}
			let text = field
				.text()
				.await
				.map_err(|e| RequestError::Multipart(e.to_string()))?;
			form.append(name, text);
		}
		Ok(form)
	}
}

/// Builder for [`Request`].
///
/// Invalid URIs or headers are reported by [`RequestBuilder::build`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
	error: Option<RequestError>,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.insert(name, value);
			}
			_ => {
				self.error
					.get_or_insert(RequestError::InvalidHeader(name.to_string()));
			}
		}
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers.extend(headers);
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Use `form` as an urlencoded body and set the matching content type.
	pub fn form(mut self, form: &FormData) -> Self {
		self.body = Bytes::from(form.to_urlencoded());
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_URLENCODED));
		self
	}

	pub fn build(self) -> Result<Request> {
		if let Some(error) = self.error {
			return Err(error);
		}
		let uri = match self.uri {
			Some(raw) => raw
				.parse::<Uri>()
				.map_err(|e| RequestError::InvalidUri(format!("{}: {}", raw, e)))?,
			None => Uri::from_static("/"),
		};
		Ok(Request {
			method: self.method,
			uri,
			headers: self.headers,
			body: self.body,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn post(content_type: Option<&str>, body: &'static str) -> Request {
		let mut builder = Request::builder().method(Method::POST).uri("/").body(body);
		if let Some(content_type) = content_type {
			builder = builder.header("content-type", content_type);
		}
		builder.build().unwrap()
	}

	#[rstest]
	fn test_default_request_is_get_root() {
		let request = Request::builder().build().unwrap();

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert!(request.query_params().is_empty());
	}

	#[rstest]
	fn test_invalid_uri_is_reported() {
		let result = Request::builder().uri("http://[::1").build();

		assert!(matches!(result, Err(RequestError::InvalidUri(_))));
	}

	#[rstest]
	fn test_invalid_header_is_reported() {
		let result = Request::builder().header("bad header", "x").build();

		assert!(matches!(result, Err(RequestError::InvalidHeader(name)) if name == "bad header"));
	}

	#[rstest]
	#[case(Some("application/x-www-form-urlencoded"))]
	#[case(Some("Application/X-WWW-Form-Urlencoded; charset=UTF-8"))]
	#[tokio::test]
	async fn test_urlencoded_body_is_read(#[case] content_type: Option<&str>) {
		// Arrange
		let request = post(content_type, "name=Item+1&codes%5B0%5D.code=A");

		// Act
		let form = request.form_data().await.unwrap();

		// Assert
		assert_eq!(form.get("name"), Some("Item 1"));
		assert_eq!(form.get("codes[0].code"), Some("A"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_empty_body_without_content_type_is_empty_form() {
		let form = post(None, "").form_data().await.unwrap();

		assert!(form.is_empty());
	}

	#[rstest]
	#[case(Some("application/json"), "{}", "application/json")]
	#[case(Some("text/plain"), "a=b", "text/plain")]
	#[case(None, "a=b", "(none)")]
	#[tokio::test]
	async fn test_other_media_types_are_rejected(
		#[case] content_type: Option<&str>,
		#[case] body: &'static str,
		#[case] reported: &str,
	) {
		let error = post(content_type, body).form_data().await.unwrap_err();

		assert!(matches!(error, RequestError::UnsupportedMediaType(ref media) if media == reported));
	}

	#[rstest]
	#[case(Method::GET)]
	#[case(Method::HEAD)]
	#[tokio::test]
	async fn test_get_and_head_read_query_string(#[case] method: Method) {
		// Arrange
		let request = Request::builder()
			.method(method)
			.uri("/contacts?q=ada&page=2")
			.body("ignored=1")
			.build()
			.unwrap();

		// Act
		let form = request.form_data().await.unwrap();

		// Assert
		assert_eq!(form.get("q"), Some("ada"));
		assert_eq!(form.get("page"), Some("2"));
		assert!(!form.has("ignored"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_builder_form_sets_body_and_content_type() {
		// Arrange
		let form: FormData = [("test", "data"), ("checkbox", "on")].into_iter().collect();

		// Act
		let request = Request::builder()
			.method(Method::POST)
			.form(&form)
			.build()
			.unwrap();

		// Assert
		assert_eq!(request.content_type().as_deref(), Some(FORM_URLENCODED));
		assert_eq!(request.form_data().await.unwrap(), form);
	}

	const MULTIPART_BODY: &str = concat!(
		"--X-BOUNDARY\r\n",
		"Content-Disposition: form-data; name=\"test\"\r\n",
		"\r\n",
		"data\r\n",
		"--X-BOUNDARY\r\n",
		"Content-Disposition: form-data; name=\"codes[0].code\"\r\n",
		"\r\n",
		"A\r\n",
		"--X-BOUNDARY\r\n",
		"Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n",
		"Content-Type: image/png\r\n",
		"\r\n",
		"PNG\r\n",
		"--X-BOUNDARY--\r\n",
	);

	#[rstest]
	#[tokio::test]
	async fn test_multipart_text_fields_are_read() {
		// Arrange
		let request = post(Some("multipart/form-data; boundary=X-BOUNDARY"), MULTIPART_BODY);

		// Act
		let form = request.form_data().await.unwrap();

		// Assert
		assert_eq!(
			form.iter().collect::<Vec<_>>(),
			vec![("test", "data"), ("codes[0].code", "A")]
		);
		assert!(!form.has("avatar"));
	}

	#[rstest]
	#[case("multipart/form-data", "--x--")]
	#[case("multipart/form-data; boundary=x", "not multipart at all")]
	#[tokio::test]
	async fn test_malformed_multipart_is_reported(
		#[case] content_type: &str,
		#[case] body: &'static str,
	) {
		let error = post(Some(content_type), body).form_data().await.unwrap_err();

		assert!(matches!(error, RequestError::Multipart(_)));
	}
}
