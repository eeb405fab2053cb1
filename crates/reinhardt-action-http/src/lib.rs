//! # Reinhardt Action HTTP
//!
//! HTTP-facing types shared by the action server and client crates.
//!
//! ## Components
//!
//! - **Request / Response**: Minimal request and response types built on `http`
//! - **ErrorResponse**: The tagged `{status: "error", ...}` reply shape and its classifier
//! - **Submission**: A decoded form body, or the field errors that stopped it
//! - **ActionConfig**: Body size limit and default submit method, loadable from TOML
//!
//! ## Example
//!
//! ```
//! use reinhardt_action_http::{Request, invalid_submission, parse_submission};
//! use http::{Method, StatusCode};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Contact {
//!     name: String,
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let request = Request::builder()
//!     .method(Method::POST)
//!     .header("content-type", "application/x-www-form-urlencoded")
//!     .body("email=a%40b.c")
//!     .build()
//!     .unwrap();
//!
//! let submission = parse_submission::<Contact>(request.form_data().await.unwrap());
//! let response = invalid_submission(&submission).into_response();
//! assert_eq!(response.status, StatusCode::BAD_REQUEST);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod method;
pub mod request;
pub mod response;
pub mod submission;

pub use config::{ActionConfig, ConfigError, DEFAULT_MAX_BODY_SIZE};
pub use error::{
	ErrorResponse, ErrorStatus, ErrorType, RespondWithErrorOptions, invalid_submission,
	is_error_response, is_success_response, respond_with_error,
};
pub use method::{ActionMethod, UnsupportedMethod};
pub use request::{FORM_URLENCODED, MULTIPART_FORM_DATA, Request, RequestBuilder, RequestError};
pub use response::Response;
pub use submission::{
	ReplyStatus, Submission, SubmissionReply, SuccessfulSubmission, parse_submission,
};
