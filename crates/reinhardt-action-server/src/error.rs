use reinhardt_action_http::{
	RequestError, RespondWithErrorOptions, Response, respond_with_error,
};
use reinhardt_formdata::FieldErrors;

/// Errors raised by action and loader setup, or by user callbacks.
///
/// Only [`ActionError::Response`] survives a mutation unchanged; every other
/// error a mutation returns is reshaped into a 500 error response.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
	/// A finished response to hand back as-is (redirects, early exits).
	#[error("Response raised with status {}", .0.status)]
	Response(Response),

	#[error(transparent)]
	Request(#[from] RequestError),

	#[error("Request body of {size} bytes exceeds the limit of {limit} bytes")]
	PayloadTooLarge { size: usize, limit: usize },

	#[error("{0}")]
	InvalidParams(FieldErrors),

	#[error("{0}")]
	InvalidQuery(FieldErrors),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ActionError>;

impl ActionError {
	/// Raise `response` from a callback.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::Response;
	/// use reinhardt_action_server::ActionError;
	///
	/// let error = ActionError::response(Response::redirect("/login"));
	/// assert_eq!(error.to_string(), "Response raised with status 302 Found");
	/// ```
	pub fn response(response: Response) -> Self {
		Self::Response(response)
	}

	/// Plain failure with a message.
	pub fn msg(message: impl Into<String>) -> Self {
		Self::Other(anyhow::Error::msg(message.into()))
	}

	/// HTTP status this error maps to when rendered.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::Response(response) => response.status.as_u16(),
			Self::Request(RequestError::UnsupportedMediaType(_)) => 415,
			Self::Request(_) | Self::InvalidParams(_) | Self::InvalidQuery(_) => 400,
			Self::PayloadTooLarge { .. } => 413,
			Self::Other(_) => 500,
		}
	}

	/// Render as a response. Raised responses pass through; everything else
	/// becomes an error response carrying the error text.
	pub fn into_response(self) -> Response {
		match self {
			Self::Response(response) => response,
			error => respond_with_error(
				(),
				RespondWithErrorOptions::new()
					.code(error.status_code())
					.message(error.to_string()),
			)
			.into_response(),
		}
	}
}

impl From<Response> for ActionError {
	fn from(response: Response) -> Self {
		Self::Response(response)
	}
}
