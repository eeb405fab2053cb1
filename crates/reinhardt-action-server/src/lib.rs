//! # Reinhardt Action Server
//!
//! Server-side helpers for form actions and data loaders.
//!
//! ## Components
//!
//! - **setup_action**: Validates the form body, decodes params and query,
//!   runs middleware and the mutation, and reshapes mutation failures
//! - **setup_loader**: The same pipeline without a form body
//! - **ActionMiddleware**: Async hook whose output is attached to the callback arguments
//! - **ActionError**: Errors that propagate out of the helpers
//!
//! Both helpers take [`ActionArgs`], which bundles the request, route params,
//! an application context and the [`ActionConfig`].

pub mod action;
pub mod error;
pub mod loader;
pub mod middleware;

pub use action::{
	ActionArgs, ActionArguments, ActionOutcome, setup_action, setup_action_with_middleware,
};
pub use error::{ActionError, Result};
pub use loader::{LoaderArgs, LoaderArguments, setup_loader, setup_loader_with_middleware};
pub use middleware::ActionMiddleware;
pub use reinhardt_action_http::ActionConfig;
