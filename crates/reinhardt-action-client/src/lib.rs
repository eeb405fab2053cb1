//! # Reinhardt Action Client
//!
//! Client-side handles for form actions.
//!
//! ## Components
//!
//! - **UseAction**: Serializes a value into form data, submits it and
//!   dispatches the reply to `on_success` / `on_error`
//! - **ActionForm**: `UseAction` with validation of the form before it is sent
//! - **Fetcher**: The transport seam; implement it for tests or custom clients
//! - **ReqwestFetcher** (feature `reqwest`): HTTP transport over `reqwest`

pub mod action;
pub mod error;
pub mod fetcher;
pub mod form;
#[cfg(feature = "reqwest")]
pub mod reqwest_fetcher;

pub use action::{ActionReply, UseAction, UseActionOptions};
pub use error::{ClientError, Result};
pub use fetcher::{Fetcher, SubmitOptions};
pub use form::{ActionForm, ActionFormOptions, FormSubmit};
#[cfg(feature = "reqwest")]
pub use reqwest_fetcher::ReqwestFetcher;
