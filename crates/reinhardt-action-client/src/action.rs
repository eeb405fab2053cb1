//! Client handle for submitting values to an action.

use crate::error::Result;
use crate::fetcher::{Fetcher, SubmitOptions};
use reinhardt_action_http::{ActionConfig, ActionMethod, ErrorResponse, is_success_response};
use reinhardt_formdata::{FormData, to_form_data};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

type SuccessCallback<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&Value) + Send + Sync>;

/// Options for [`UseAction`]. `T` is the success payload type.
pub struct UseActionOptions<T = Value> {
	pub path: Option<String>,
	pub method: ActionMethod,
	on_success: Option<SuccessCallback<T>>,
	on_error: Option<ErrorCallback>,
}

impl<T> Default for UseActionOptions<T> {
	fn default() -> Self {
		Self {
			path: None,
			method: ActionMethod::default(),
			on_success: None,
			on_error: None,
		}
	}
}

impl<T> fmt::Debug for UseActionOptions<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UseActionOptions")
			.field("path", &self.path)
			.field("method", &self.method)
			.field("on_success", &self.on_success.is_some())
			.field("on_error", &self.on_error.is_some())
			.finish()
	}
}

impl<T> UseActionOptions<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Options using the configured default method.
	pub fn from_config(config: &ActionConfig) -> Self {
		Self::new().method(config.default_method)
	}

	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn method(mut self, method: ActionMethod) -> Self {
		self.method = method;
		self
	}

	pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
		self.on_success = Some(Box::new(callback));
		self
	}

	/// Called with the raw reply when it is an error response.
	pub fn on_error(mut self, callback: impl Fn(&Value) + Send + Sync + 'static) -> Self {
		self.on_error = Some(Box::new(callback));
		self
	}

	fn submit_options(&self) -> SubmitOptions {
		SubmitOptions {
			method: self.method,
			action: self.path.clone(),
		}
	}
}

/// Decoded reply of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionReply<T> {
	Success(T),
	/// Raw error object, tagged `"status": "error"`.
	Error(Value),
}

impl<T> ActionReply<T> {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	/// The error as a typed [`ErrorResponse`], if it has that shape.
	pub fn error_response(&self) -> Option<ErrorResponse<Value>> {
		match self {
			Self::Error(value) => serde_json::from_value(value.clone()).ok(),
			Self::Success(_) => None,
		}
	}
}

/// Serializes values into form data, submits them through a [`Fetcher`] and
/// dispatches the reply to the success or error callback.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reinhardt_action_client::{ClientError, Fetcher, SubmitOptions, UseAction, UseActionOptions};
/// use reinhardt_formdata::FormData;
/// use serde_json::{Value, json};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Fetcher for Echo {
///     async fn submit(&self, form: FormData, _: SubmitOptions) -> Result<Value, ClientError> {
///         Ok(json!({"received": form.get("key")}))
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut action = UseAction::new(Echo, UseActionOptions::<Value>::new().path("/test"));
/// let reply = action.submit(&json!({"key": "value"})).await.unwrap();
///
/// assert!(reply.is_success());
/// assert_eq!(action.data(), Some(&json!({"received": "value"})));
/// # });
/// ```
pub struct UseAction<F, T = Value> {
	fetcher: F,
	options: UseActionOptions<T>,
	data: Option<Value>,
}

impl<F, T> fmt::Debug for UseAction<F, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UseAction")
			.field("options", &self.options)
			.field("data", &self.data)
			.finish_non_exhaustive()
	}
}

impl<F: Fetcher, T: DeserializeOwned> UseAction<F, T> {
	pub fn new(fetcher: F, options: UseActionOptions<T>) -> Self {
		Self {
			fetcher,
			options,
			data: None,
		}
	}

	pub fn fetcher(&self) -> &F {
		&self.fetcher
	}

	pub fn options(&self) -> &UseActionOptions<T> {
		&self.options
	}

	/// Latest reply received, as raw JSON.
	pub fn data(&self) -> Option<&Value> {
		self.data.as_ref()
	}

	/// Serialize `value` and submit it.
	pub async fn submit<D: Serialize + ?Sized>(&mut self, value: &D) -> Result<ActionReply<T>> {
		let form = to_form_data(value)?;
		self.submit_form_data(form).await
	}

	/// Submit already-built form data.
	pub async fn submit_form_data(&mut self, form: FormData) -> Result<ActionReply<T>> {
		let options = self.options.submit_options();
		tracing::debug!(
			method = %options.method,
			action = options.action.as_deref().unwrap_or(""),
			entries = form.len(),
			"submitting action"
		);
		let reply = self.fetcher.submit(form, options).await?;
		self.data = Some(reply.clone());
		self.dispatch(reply)
	}

	fn dispatch(&self, reply: Value) -> Result<ActionReply<T>> {
		if is_success_response(&reply) {
			let value: T = serde_json::from_value(reply)?;
			if let Some(on_success) = &self.options.on_success {
				on_success(&value);
			}
			Ok(ActionReply::Success(value))
		} else {
			tracing::debug!("action replied with an error response");
			if let Some(on_error) = &self.options.on_error {
				on_error(&reply);
			}
			Ok(ActionReply::Error(reply))
		}
	}
}
