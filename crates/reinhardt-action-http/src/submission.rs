//! Typed form submissions.
//!
//! A submission pairs the raw [`FormData`] that was posted with either the
//! decoded value or the field errors that prevented decoding. The raw
//! payload is kept in both cases so a failed form can be re-rendered with the
//! user's input.

use reinhardt_formdata::{FieldErrors, FormData, validate_form_data};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of decoding a form body into `T`.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
	Success { value: T, payload: FormData },
	Error { errors: FieldErrors, payload: FormData },
}

/// Successful submission handed to a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessfulSubmission<T> {
	pub value: T,
	pub payload: FormData,
}

/// Decode `payload` into `T`.
///
/// # Examples
///
/// ```
/// use reinhardt_action_http::parse_submission;
/// use reinhardt_formdata::FormData;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Contact {
///     name: String,
/// }
///
/// let ok = parse_submission::<Contact>([("name", "Ada")].into_iter().collect());
/// assert_eq!(ok.value(), Some(&Contact { name: "Ada".into() }));
///
/// let failed = parse_submission::<Contact>(FormData::new());
/// assert_eq!(failed.errors().unwrap().to_string(), r#"{"name":"Required"}"#);
/// ```
pub fn parse_submission<T: DeserializeOwned>(payload: FormData) -> Submission<T> {
	match validate_form_data::<T>(&payload) {
		Ok(value) => Submission::Success { value, payload },
		Err(errors) => {
			tracing::debug!(errors = %errors, "form submission rejected");
			Submission::Error { errors, payload }
		}
	}
}

impl<T> Submission<T> {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	pub fn payload(&self) -> &FormData {
		match self {
			Self::Success { payload, .. } | Self::Error { payload, .. } => payload,
		}
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Success { value, .. } => Some(value),
			Self::Error { .. } => None,
		}
	}

	pub fn errors(&self) -> Option<&FieldErrors> {
		match self {
			Self::Success { .. } => None,
			Self::Error { errors, .. } => Some(errors),
		}
	}

	/// Split into the successful submission or the failed one.
	pub fn into_result(self) -> Result<SuccessfulSubmission<T>, Self> {
		match self {
			Self::Success { value, payload } => Ok(SuccessfulSubmission { value, payload }),
			failed @ Self::Error { .. } => Err(failed),
		}
	}

	/// Run an additional check over a decoded value.
	///
	/// Failed submissions pass through unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::parse_submission;
	/// use reinhardt_formdata::FieldErrors;
	/// use serde::Deserialize;
	///
	/// #[derive(Deserialize)]
	/// struct Signup {
	///     password: String,
	///     confirm: String,
	/// }
	///
	/// let submission = parse_submission::<Signup>(
	///     [("password", "a"), ("confirm", "b")].into_iter().collect(),
	/// )
	/// .refine(|signup| {
	///     let mut errors = FieldErrors::new();
	///     if signup.password != signup.confirm {
	///         errors.add("confirm", "Passwords do not match");
	///     }
	///     if errors.is_empty() { Ok(()) } else { Err(errors) }
	/// });
	///
	/// assert!(!submission.is_success());
	/// ```
	pub fn refine<F>(self, check: F) -> Self
	where
		F: FnOnce(&T) -> Result<(), FieldErrors>,
	{
		match self {
			Self::Success { value, payload } => match check(&value) {
				Ok(()) => Self::Success { value, payload },
				Err(errors) => Self::Error { errors, payload },
			},
			failed => failed,
		}
	}

	/// Reply sent back to the client for this submission.
	pub fn reply(&self) -> SubmissionReply {
		match self {
			Self::Success { payload, .. } => SubmissionReply::new(ReplyStatus::Success, payload, None),
			Self::Error { errors, payload } => {
				SubmissionReply::new(ReplyStatus::Error, payload, Some(errors.clone()))
			}
		}
	}
}

impl<T> SuccessfulSubmission<T> {
	pub fn reply(&self) -> SubmissionReply {
		SubmissionReply::new(ReplyStatus::Success, &self.payload, None)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
	Success,
	Error,
}

/// Client-facing summary of a submission.
///
/// `initial_value` echoes the posted fields (a string, or an array of
/// strings for repeated keys) so the form can be filled again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReply {
	pub status: ReplyStatus,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub initial_value: Option<Map<String, Value>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<FieldErrors>,
}

impl SubmissionReply {
	fn new(status: ReplyStatus, payload: &FormData, error: Option<FieldErrors>) -> Self {
		Self {
			status,
			initial_value: Some(initial_value(payload)),
			error,
		}
	}
}

fn initial_value(payload: &FormData) -> Map<String, Value> {
	payload
		.keys()
		.into_iter()
		.map(|key| {
			let mut values = payload.get_all(key);
			let value = if values.len() == 1 {
				Value::String(values.remove(0).to_string())
			} else {
				Value::Array(
					values
						.into_iter()
						.map(|value| Value::String(value.to_string()))
						.collect(),
				)
			};
			(key.to_string(), value)
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[derive(Debug, Deserialize, PartialEq)]
	struct Signup {
		test: String,
		checkbox: bool,
	}

	fn payload(pairs: &[(&str, &str)]) -> FormData {
		pairs.iter().copied().collect()
	}

	#[rstest]
	fn test_parse_successful_submission() {
		// Arrange
		let form = payload(&[("test", "data"), ("checkbox", "on")]);

		// Act
		let submission = parse_submission::<Signup>(form.clone());

		// Assert
		assert_eq!(
			submission,
			Submission::Success {
				value: Signup {
					test: "data".into(),
					checkbox: true,
				},
				payload: form,
			}
		);
	}

	#[rstest]
	fn test_parse_failed_submission_keeps_payload() {
		// Arrange
		let form = payload(&[("checkbox", "on")]);

		// Act
		let submission = parse_submission::<Signup>(form.clone());

		// Assert
		assert!(!submission.is_success());
		assert_eq!(submission.payload(), &form);
		assert_eq!(
			submission.errors().unwrap().get("test"),
			Some(&["Required".to_string()][..])
		);
	}

	#[rstest]
	fn test_failed_submission_reports_every_field() {
		// Arrange
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct Contact {
			name: String,
			email: String,
			age: Option<u8>,
		}

		// Act
		let submission = parse_submission::<Contact>(payload(&[("age", "old")]));

		// Assert
		let errors = submission.errors().unwrap();
		assert_eq!(errors.len(), 3);
		assert_eq!(errors.get("name"), Some(&["Required".to_string()][..]));
		assert_eq!(errors.get("email"), Some(&["Required".to_string()][..]));
		assert_eq!(errors.get("age"), Some(&["Expected number".to_string()][..]));
	}

	#[rstest]
	fn test_into_result() {
		let ok = parse_submission::<Signup>(payload(&[("test", "x"), ("checkbox", "off")]));
		let failed = parse_submission::<Signup>(FormData::new());

		let ok = ok.into_result().unwrap();
		assert_eq!(ok.value.test, "x");
		assert!(!ok.value.checkbox);
		assert!(failed.into_result().is_err());
	}

	#[rstest]
	fn test_refine_success_passes_through() {
		let submission = parse_submission::<Signup>(payload(&[("test", "x"), ("checkbox", "on")]))
			.refine(|_| Ok(()));

		assert!(submission.is_success());
	}

	#[rstest]
	fn test_refine_does_not_run_on_failed_submission() {
		let submission = parse_submission::<Signup>(FormData::new())
			.refine(|_| panic!("check must not run"));

		assert!(!submission.is_success());
	}

	#[rstest]
	fn test_error_reply_shape() {
		// Arrange
		let submission =
			parse_submission::<Signup>(payload(&[("checkbox", "on"), ("tag", "a"), ("tag", "b")]));

		// Act
		let reply = serde_json::to_value(submission.reply()).unwrap();

		// Assert
		assert_eq!(
			reply,
			json!({
				"status": "error",
				"initialValue": {"checkbox": "on", "tag": ["a", "b"]},
				"error": {"test": ["Required"]}
			})
		);
	}

	#[rstest]
	fn test_success_reply_has_no_error() {
		let submission = parse_submission::<Signup>(payload(&[("test", "x"), ("checkbox", "on")]));

		let reply = serde_json::to_value(submission.reply()).unwrap();

		assert_eq!(
			reply,
			json!({
				"status": "success",
				"initialValue": {"test": "x", "checkbox": "on"}
			})
		);
	}
}
