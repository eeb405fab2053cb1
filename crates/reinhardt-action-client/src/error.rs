use reinhardt_formdata::FormDataError;

/// Errors raised while submitting an action from the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
	#[error(transparent)]
	FormData(#[from] FormDataError),

	#[error("Failed to decode action reply: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("Invalid action URL: {0}")]
	InvalidUrl(String),

	/// Transport failure reported by a custom [`Fetcher`](crate::Fetcher).
	#[error("Action request failed: {0}")]
	Transport(String),

	#[cfg(feature = "reqwest")]
	#[error("Action request failed: {0}")]
	Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
