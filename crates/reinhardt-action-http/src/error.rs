//! Tagged error results.
//!
//! Actions and loaders answer with either their own value or an error object
//! of the shape
//!
//! ```json
//! {"status": "error", "type": "error", "result": null, "code": 500, "message": "..."}
//! ```
//!
//! Clients tell the two apart with [`is_error_response`].

use crate::response::Response;
use crate::submission::{Submission, SubmissionReply};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code used when none is given.
pub const DEFAULT_ERROR_CODE: u16 = 500;

/// Message and code of an invalid submission reply.
pub const INVALID_SUBMISSION: &str = "invalid_submission";
pub const INVALID_SUBMISSION_CODE: u16 = 400;

/// Discriminator carried in the `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
	#[default]
	Error,
	InvalidSubmission,
}

/// The constant `"status": "error"` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorStatus {
	#[default]
	#[serde(rename = "error")]
	Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse<T> {
	pub status: ErrorStatus,
	#[serde(rename = "type")]
	pub error_type: ErrorType,
	pub result: T,
	pub code: u16,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

/// Optional overrides for [`respond_with_error`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RespondWithErrorOptions {
	pub code: Option<u16>,
	pub message: Option<String>,
	pub error_type: Option<ErrorType>,
}

impl RespondWithErrorOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn code(mut self, code: u16) -> Self {
		self.code = Some(code);
		self
	}

	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn error_type(mut self, error_type: ErrorType) -> Self {
		self.error_type = Some(error_type);
		self
	}
}

/// Wrap `result` in the error shape.
///
/// # Examples
///
/// ```
/// use reinhardt_action_http::{RespondWithErrorOptions, respond_with_error};
/// use serde_json::json;
///
/// let error = respond_with_error((), RespondWithErrorOptions::new().message("Not allowed").code(403));
///
/// assert_eq!(
///     serde_json::to_value(&error).unwrap(),
///     json!({"status": "error", "type": "error", "result": null, "code": 403, "message": "Not allowed"})
/// );
/// ```
pub fn respond_with_error<T>(result: T, options: RespondWithErrorOptions) -> ErrorResponse<T> {
	ErrorResponse {
		status: ErrorStatus::Error,
		error_type: options.error_type.unwrap_or_default(),
		result,
		code: options.code.unwrap_or(DEFAULT_ERROR_CODE),
		message: options.message,
	}
}

/// 400 reply for a submission that failed validation.
pub fn invalid_submission<T>(submission: &Submission<T>) -> ErrorResponse<SubmissionReply> {
	respond_with_error(
		submission.reply(),
		RespondWithErrorOptions::new()
			.code(INVALID_SUBMISSION_CODE)
			.message(INVALID_SUBMISSION)
			.error_type(ErrorType::InvalidSubmission),
	)
}

/// True when `response` is an object tagged `"status": "error"`.
///
/// # Examples
///
/// ```
/// use reinhardt_action_http::is_error_response;
/// use serde_json::json;
///
/// assert!(is_error_response(&json!({"status": "error"})));
/// assert!(!is_error_response(&json!({"status": "success"})));
/// assert!(!is_error_response(&json!({"user": {"name": "John Doe"}})));
/// assert!(!is_error_response(&json!(null)));
/// ```
pub fn is_error_response(response: &Value) -> bool {
	response
		.as_object()
		.and_then(|object| object.get("status"))
		.and_then(Value::as_str)
		== Some("error")
}

pub fn is_success_response(response: &Value) -> bool {
	!is_error_response(response)
}

impl<T> ErrorResponse<T> {
	pub fn status_code(&self) -> StatusCode {
		StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
	}
}

impl<T: Serialize> ErrorResponse<T> {
	/// Render as an HTTP response whose status is the error code.
	pub fn into_response(self) -> Response {
		let status = self.status_code();
		Response::new(status)
			.with_json(&self)
			.unwrap_or_else(|_| Response::internal_server_error())
	}
}

impl<T: Serialize> From<ErrorResponse<T>> for Response {
	fn from(error: ErrorResponse<T>) -> Self {
		error.into_response()
	}
}
