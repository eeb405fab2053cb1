//! Data loaders.
//!
//! A loader has no form body: it decodes route params and the query string,
//! runs the middleware, then `load`. Unlike an action, a failing loader never
//! answers with a value; its error is raised as a 500 error response.

use crate::action::{ActionArgs, decode_params, decode_query};
use crate::error::{ActionError, Result};
use crate::middleware::ActionMiddleware;
use reinhardt_action_http::{Request, RespondWithErrorOptions, respond_with_error};
use serde::de::DeserializeOwned;
use std::future::Future;

/// Loaders receive the same framework arguments as actions.
pub type LoaderArgs<C = ()> = ActionArgs<C>;

/// Arguments passed to `load`.
#[derive(Debug, Clone)]
pub struct LoaderArguments<P = (), Q = (), C = (), M = ()> {
	pub request: Request,
	pub context: C,
	pub params: P,
	pub query: Q,
	/// Output of the middleware.
	pub extra: M,
}

impl<P, Q, C, M> LoaderArguments<P, Q, C, M> {
	pub fn with_extra<N>(self, extra: N) -> LoaderArguments<P, Q, C, N> {
		LoaderArguments {
			request: self.request,
			context: self.context,
			params: self.params,
			query: self.query,
			extra,
		}
	}
}

/// Decode params and query, then run `load`.
///
/// # Examples
///
/// ```
/// use reinhardt_action_http::Request;
/// use reinhardt_action_server::{LoaderArgs, LoaderArguments, setup_loader};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Page {
///     page: u32,
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let request = Request::builder().uri("/contacts?page=2").build().unwrap();
///
/// let page = setup_loader(LoaderArgs::new(request), |args: LoaderArguments<(), Page>| async move {
///     Ok(args.query.page)
/// })
/// .await
/// .unwrap();
///
/// assert_eq!(page, 2);
/// # });
/// ```
pub async fn setup_loader<P, Q, C, T, F, Fut>(args: LoaderArgs<C>, load: F) -> Result<T>
where
	P: DeserializeOwned + Sync,
	Q: DeserializeOwned + Sync,
	C: Sync,
	F: FnOnce(LoaderArguments<P, Q, C>) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	setup_loader_with_middleware(args, &(), load).await
}

/// [`setup_loader`] with a middleware whose output is passed to `load` as
/// `extra`.
pub async fn setup_loader_with_middleware<P, Q, C, M, T, F, Fut>(
	args: LoaderArgs<C>,
	middleware: &M,
	load: F,
) -> Result<T>
where
	P: DeserializeOwned + Sync,
	Q: DeserializeOwned + Sync,
	C: Sync,
	M: ActionMiddleware<LoaderArguments<P, Q, C>> + ?Sized,
	F: FnOnce(LoaderArguments<P, Q, C, M::Output>) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let ActionArgs {
		request,
		params,
		context,
		..
	} = args;

	let params = decode_params::<P>(params)?;
	let query = decode_query::<Q>(&request)?;

	let arguments = LoaderArguments {
		request,
		context,
		params,
		query,
		extra: (),
	};

	tracing::debug!(path = arguments.request.path(), "running loader middleware");
	let extra = middleware.run(&arguments).await?;

	tracing::debug!(path = arguments.request.path(), "running loader");
	match load(arguments.with_extra(extra)).await {
		Ok(value) => Ok(value),
		Err(ActionError::Response(response)) => Err(ActionError::Response(response)),
		Err(error) => {
			tracing::warn!(error = %error, "loader failed");
			let response = respond_with_error(
				(),
				RespondWithErrorOptions::new()
					.code(500)
					.message(error.to_string()),
			)
			.into_response();
			Err(ActionError::Response(response))
		}
	}
}
