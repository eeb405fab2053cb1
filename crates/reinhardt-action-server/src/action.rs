//! Form actions.
//!
//! [`setup_action`] turns an incoming request into typed arguments and runs
//! a mutation over them:
//!
//! 1. the body size is checked against [`ActionConfig::max_body_size`]
//! 2. the form body is decoded into `S`; on failure the action answers with
//!    a 400 `invalid_submission` reply and nothing else runs
//! 3. route params decode into `P` and the query string into `Q` (`()` skips
//!    either); failures propagate as [`ActionError::InvalidParams`] /
//!    [`ActionError::InvalidQuery`]
//! 4. the middleware runs and its output becomes `extra`
//! 5. the mutation runs; a raised [`ActionError::Response`] propagates and any
//!    other error becomes a 500 error reply
//!
//! The schema types come from the mutation's argument annotation:
//!
//! ```
//! use reinhardt_action_http::Request;
//! use reinhardt_action_server::{ActionArgs, ActionArguments, ActionOutcome, setup_action};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Signup {
//!     test: String,
//!     checkbox: bool,
//! }
//!
//! # tokio_test(async {
//! let request = Request::builder()
//!     .method(http::Method::POST)
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("test=data&checkbox=on")
//!     .build()
//!     .unwrap();
//!
//! let outcome = setup_action(ActionArgs::new(request), |args: ActionArguments<Signup>| async move {
//!     Ok(format!("{} {}", args.submission.value.test, args.submission.value.checkbox))
//! })
//! .await
//! .unwrap();
//!
//! assert!(matches!(outcome, ActionOutcome::Success(ref v) if v == "data true"));
//! # });
//! # fn tokio_test<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

use crate::error::{ActionError, Result};
use crate::middleware::ActionMiddleware;
use reinhardt_action_http::{
	ActionConfig, ErrorResponse, Request, RespondWithErrorOptions, Response, SubmissionReply,
	SuccessfulSubmission, invalid_submission, parse_submission, respond_with_error,
};
use reinhardt_formdata::validate_pairs;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;

/// Everything the framework hands to an action or loader.
#[derive(Debug, Clone)]
pub struct ActionArgs<C = ()> {
	pub request: Request,
	/// Route parameters extracted by the router.
	pub params: Vec<(String, String)>,
	pub context: C,
	pub config: ActionConfig,
}

impl ActionArgs<()> {
	pub fn new(request: Request) -> Self {
		Self {
			request,
			params: Vec::new(),
			context: (),
			config: ActionConfig::default(),
		}
	}
}

impl<C> ActionArgs<C> {
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.push((key.into(), value.into()));
		self
	}

	pub fn with_params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.params
			.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	pub fn with_context<D>(self, context: D) -> ActionArgs<D> {
		ActionArgs {
			request: self.request,
			params: self.params,
			context,
			config: self.config,
		}
	}

	pub fn with_config(mut self, config: ActionConfig) -> Self {
		self.config = config;
		self
	}
}

/// Arguments passed to a mutation.
#[derive(Debug, Clone)]
pub struct ActionArguments<S, P = (), Q = (), C = (), M = ()> {
	pub submission: SuccessfulSubmission<S>,
	pub request: Request,
	pub context: C,
	pub params: P,
	pub query: Q,
	/// Output of the middleware.
	pub extra: M,
}

impl<S, P, Q, C, M> ActionArguments<S, P, Q, C, M> {
	pub fn with_extra<N>(self, extra: N) -> ActionArguments<S, P, Q, C, N> {
		ActionArguments {
			submission: self.submission,
			request: self.request,
			context: self.context,
			params: self.params,
			query: self.query,
			extra,
		}
	}
}

/// Result of an action as seen by the client.
///
/// Serializes untagged: either the mutation's own value or an error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutcome<T> {
	Success(T),
	/// The form failed validation (400).
	Invalid(ErrorResponse<SubmissionReply>),
	/// The mutation failed (500).
	Failed(ErrorResponse<()>),
}

impl<T> ActionOutcome<T> {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Success(value) => Some(value),
			_ => None,
		}
	}

	pub fn into_value(self) -> Option<T> {
		match self {
			Self::Success(value) => Some(value),
			_ => None,
		}
	}
}

impl<T: Serialize> ActionOutcome<T> {
	/// Render as JSON: 200 for a value, the error code otherwise.
	pub fn into_response(self) -> Response {
		match self {
			Self::Success(value) => Response::ok()
				.with_json(&value)
				.unwrap_or_else(|_| Response::internal_server_error()),
			Self::Invalid(error) => error.into_response(),
			Self::Failed(error) => error.into_response(),
		}
	}
}

/// Run `mutation` over a validated form submission.
///
/// See the [module docs](self) for the full sequence.
pub async fn setup_action<S, P, Q, C, T, F, Fut>(
	args: ActionArgs<C>,
	mutation: F,
) -> Result<ActionOutcome<T>>
where
	S: DeserializeOwned + Sync,
	P: DeserializeOwned + Sync,
	Q: DeserializeOwned + Sync,
	C: Sync,
	F: FnOnce(ActionArguments<S, P, Q, C>) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	setup_action_with_middleware(args, &(), mutation).await
}

/// [`setup_action`] with a middleware whose output is passed to the
/// mutation as `extra`.
pub async fn setup_action_with_middleware<S, P, Q, C, M, T, F, Fut>(
	args: ActionArgs<C>,
	middleware: &M,
	mutation: F,
) -> Result<ActionOutcome<T>>
where
	S: DeserializeOwned + Sync,
	P: DeserializeOwned + Sync,
	Q: DeserializeOwned + Sync,
	C: Sync,
	M: ActionMiddleware<ActionArguments<S, P, Q, C>> + ?Sized,
	F: FnOnce(ActionArguments<S, P, Q, C, M::Output>) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let ActionArgs {
		request,
		params,
		context,
		config,
	} = args;

	if request.body.len() > config.max_body_size {
		return Err(ActionError::PayloadTooLarge {
			size: request.body.len(),
			limit: config.max_body_size,
		});
	}

	let form = request.form_data().await?;
	let submission = match parse_submission::<S>(form).into_result() {
		Ok(submission) => submission,
		Err(failed) => {
			tracing::debug!(path = request.path(), "action rejected invalid submission");
			return Ok(ActionOutcome::Invalid(invalid_submission(&failed)));
		}
	};

	let params = decode_params::<P>(params)?;
	let query = decode_query::<Q>(&request)?;

	let arguments = ActionArguments {
		submission,
		request,
		context,
		params,
		query,
		extra: (),
	};

	tracing::debug!(path = arguments.request.path(), "running action middleware");
	let extra = middleware.run(&arguments).await?;

	tracing::debug!(path = arguments.request.path(), "running action mutation");
	match mutation(arguments.with_extra(extra)).await {
		Ok(value) => Ok(ActionOutcome::Success(value)),
		Err(ActionError::Response(response)) => Err(ActionError::Response(response)),
		Err(error) => {
			tracing::warn!(error = %error, "action mutation failed");
			Ok(ActionOutcome::Failed(respond_with_error(
				(),
				RespondWithErrorOptions::new()
					.code(500)
					.message(error.to_string()),
			)))
		}
	}
}

pub(crate) fn decode_params<P: DeserializeOwned>(params: Vec<(String, String)>) -> Result<P> {
	validate_pairs(params).map_err(ActionError::InvalidParams)
}

pub(crate) fn decode_query<Q: DeserializeOwned>(request: &Request) -> Result<Q> {
	validate_pairs(request.query_params()).map_err(ActionError::InvalidQuery)
}
