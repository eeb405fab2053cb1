//! Middleware run between validation and the user callback.
//!
//! A middleware sees the fully decoded arguments and returns an extra value
//! (the current user, a database handle, ...) that is attached to the
//! arguments the callback receives as `extra`:
//!
//! ```rust
//! use async_trait::async_trait;
//! use reinhardt_action_server::{ActionError, ActionMiddleware, LoaderArguments};
//!
//! struct CurrentUser;
//!
//! #[async_trait]
//! impl ActionMiddleware<LoaderArguments> for CurrentUser {
//!     type Output = String;
//!
//!     async fn run(&self, args: &LoaderArguments) -> Result<String, ActionError> {
//!         Ok(args.request.headers
//!             .get("x-user")
//!             .and_then(|v| v.to_str().ok())
//!             .unwrap_or("anonymous")
//!             .to_string())
//!     }
//! }
//! ```

use crate::error::ActionError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait ActionMiddleware<Args: Sync>: Send + Sync {
	/// Value attached to the callback arguments.
	type Output: Send;

	/// Errors propagate to the caller of the setup function untouched.
	async fn run(&self, args: &Args) -> Result<Self::Output, ActionError>;
}

/// No middleware; the callback gets `extra: ()`.
#[async_trait]
impl<Args: Sync> ActionMiddleware<Args> for () {
	type Output = ();

	async fn run(&self, _args: &Args) -> Result<(), ActionError> {
		Ok(())
	}
}

#[async_trait]
impl<Args: Sync, M: ActionMiddleware<Args> + ?Sized> ActionMiddleware<Args> for Arc<M> {
	type Output = M::Output;

	async fn run(&self, args: &Args) -> Result<Self::Output, ActionError> {
		(**self).run(args).await
	}
}
