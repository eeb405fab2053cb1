//! # Reinhardt Actions
//!
//! Typed form actions and loaders.
//!
//! A value is flattened into form data on the client, submitted to an
//! action, decoded and validated against a typed schema on the server, and
//! answered with either the action's result or a uniform error response.
//!
//! ## Crates
//!
//! - [`formdata`]: `FormData`, the object-to-form-data serializer and the
//!   typed form decoder
//! - [`http`]: request/response types, the error-response shape and
//!   submission typing shared by both halves
//! - [`server`] (feature `server`): `setup_action` / `setup_loader`
//! - [`client`] (feature `client`): `UseAction` / `ActionForm`
//!
//! ## Feature Flags
//!
//! - `server` (default) - Server-side action and loader setup
//! - `client` (default) - Client-side action handles
//! - `reqwest` - HTTP transport for client handles
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_actions::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Signup {
//!     email: String,
//!     newsletter: bool,
//! }
//!
//! let form = to_form_data(&serde_json::json!({
//!     "email": "ada@example.com",
//!     "newsletter": true,
//! }))
//! .unwrap();
//!
//! let submission: Submission<Signup> = parse_submission(form);
//! let signup = submission.value().unwrap();
//! assert_eq!(signup.email, "ada@example.com");
//! assert!(signup.newsletter);
//! ```

pub use reinhardt_action_http as http;
pub use reinhardt_formdata as formdata;

#[cfg(feature = "client")]
pub use reinhardt_action_client as client;
#[cfg(feature = "server")]
pub use reinhardt_action_server as server;

pub use reinhardt_action_http::{
	ActionConfig, ActionMethod, ErrorResponse, Request, Response, Submission, SubmissionReply,
	invalid_submission, parse_submission, respond_with_error,
};
pub use reinhardt_formdata::{
	FieldErrors, FormData, FormValue, from_form_data, to_form_data, validate_form_data,
};

#[cfg(feature = "server")]
pub use reinhardt_action_server::{
	ActionArgs, ActionArguments, ActionError, ActionMiddleware, ActionOutcome, LoaderArgs,
	LoaderArguments, setup_action, setup_action_with_middleware, setup_loader,
	setup_loader_with_middleware,
};

#[cfg(feature = "client")]
pub use reinhardt_action_client::{
	ActionForm, ActionFormOptions, ActionReply, Fetcher, FormSubmit, SubmitOptions, UseAction,
	UseActionOptions,
};
#[cfg(feature = "reqwest")]
pub use reinhardt_action_client::ReqwestFetcher;

/// Re-exports for `use reinhardt_actions::prelude::*`.
pub mod prelude {
	pub use crate::{
		ActionConfig, ActionMethod, ErrorResponse, FieldErrors, FormData, Request, Response,
		Submission, from_form_data, parse_submission, respond_with_error, to_form_data,
	};

	#[cfg(feature = "server")]
	pub use crate::{
		ActionArgs, ActionError, ActionMiddleware, ActionOutcome, setup_action, setup_loader,
	};

	#[cfg(feature = "client")]
	pub use crate::{ActionForm, ActionFormOptions, ActionReply, Fetcher, UseAction, UseActionOptions};
}
