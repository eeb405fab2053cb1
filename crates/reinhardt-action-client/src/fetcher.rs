//! Transport seam between action handles and the network.

use crate::error::Result;
use async_trait::async_trait;
use reinhardt_action_http::ActionMethod;
use reinhardt_formdata::FormData;
use serde_json::Value;
use std::sync::Arc;

/// Where and how a form is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOptions {
	pub method: ActionMethod,
	/// Target path. `None` submits to the current route.
	pub action: Option<String>,
}

/// Sends a form to an action and returns its decoded JSON reply.
#[async_trait]
pub trait Fetcher: Send + Sync {
	async fn submit(&self, form: FormData, options: SubmitOptions) -> Result<Value>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
	async fn submit(&self, form: FormData, options: SubmitOptions) -> Result<Value> {
		(**self).submit(form, options).await
	}
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
	async fn submit(&self, form: FormData, options: SubmitOptions) -> Result<Value> {
		(**self).submit(form, options).await
	}
}
