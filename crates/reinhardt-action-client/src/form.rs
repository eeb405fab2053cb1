//! Action handle with client-side validation.

use crate::action::{ActionReply, UseAction, UseActionOptions};
use crate::error::Result;
use crate::fetcher::Fetcher;
use reinhardt_action_http::{Submission, parse_submission};
use reinhardt_formdata::{FieldErrors, FormData, to_form_data};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

type FormSubmitCallback<S> = Box<dyn Fn(&S) + Send + Sync>;

/// Options for [`ActionForm`]. `S` is the form's value type, `T` the
/// action's success payload.
pub struct ActionFormOptions<S, T = Value> {
	pub action: UseActionOptions<T>,
	pub default_value: Option<S>,
	on_form_submit: Option<FormSubmitCallback<S>>,
}

impl<S, T> ActionFormOptions<S, T> {
	pub fn new(action: UseActionOptions<T>) -> Self {
		Self {
			action,
			default_value: None,
			on_form_submit: None,
		}
	}

	pub fn default_value(mut self, value: S) -> Self {
		self.default_value = Some(value);
		self
	}

	/// Called with the validated value before the form is sent.
	pub fn on_form_submit(mut self, callback: impl Fn(&S) + Send + Sync + 'static) -> Self {
		self.on_form_submit = Some(Box::new(callback));
		self
	}
}

/// Result of [`ActionForm::submit_form`].
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmit<T> {
	/// Client-side validation failed; nothing was sent.
	Invalid(FieldErrors),
	Submitted(ActionReply<T>),
}

/// [`UseAction`] plus validation of the form against `S` before sending.
pub struct ActionForm<F, S, T = Value> {
	action: UseAction<F, T>,
	default_value: Option<S>,
	on_form_submit: Option<FormSubmitCallback<S>>,
}

impl<F, S: fmt::Debug, T> fmt::Debug for ActionForm<F, S, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionForm")
			.field("action", &self.action)
			.field("default_value", &self.default_value)
			.finish_non_exhaustive()
	}
}

impl<F, S, T> ActionForm<F, S, T>
where
	F: Fetcher,
	S: DeserializeOwned + Serialize,
	T: DeserializeOwned,
{
	pub fn new(fetcher: F, options: ActionFormOptions<S, T>) -> Self {
		Self {
			action: UseAction::new(fetcher, options.action),
			default_value: options.default_value,
			on_form_submit: options.on_form_submit,
		}
	}

	pub fn action(&self) -> &UseAction<F, T> {
		&self.action
	}

	pub fn default_value(&self) -> Option<&S> {
		self.default_value.as_ref()
	}

	/// The default value flattened into form fields, for pre-filling inputs.
	pub fn default_form_data(&self) -> Result<Option<FormData>> {
		self.default_value
			.as_ref()
			.map(|value| to_form_data(value).map_err(Into::into))
			.transpose()
	}

	/// Decode `form` into `S` with the same rules the server uses.
	pub fn validate(&self, form: FormData) -> Submission<S> {
		parse_submission(form)
	}

	/// Validate `form`, then send it unchanged when it decodes.
	pub async fn submit_form(&mut self, form: FormData) -> Result<FormSubmit<T>> {
		match self.validate(form) {
			Submission::Success { value, payload } => {
				if let Some(on_form_submit) = &self.on_form_submit {
					on_form_submit(&value);
				}
				let reply = self.action.submit_form_data(payload).await?;
				Ok(FormSubmit::Submitted(reply))
			}
			Submission::Error { errors, .. } => Ok(FormSubmit::Invalid(errors)),
		}
	}

	/// Serialize `value` and submit it without validation.
	pub async fn submit(&mut self, value: &S) -> Result<ActionReply<T>> {
		self.action.submit(value).await
	}
}
