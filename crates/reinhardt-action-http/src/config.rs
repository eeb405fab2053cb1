//! Settings shared by action servers and clients.
//!
//! Loaded from TOML, every key optional:
//!
//! ```toml
//! max_body_size = 1048576
//! default_method = "POST"
//! ```

use crate::method::ActionMethod;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default limit on an action request body (1 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
	/// Largest form body, in bytes, an action will read.
	pub max_body_size: usize,
	/// Method used by client handles that do not pick one.
	pub default_method: ActionMethod,
}

impl Default for ActionConfig {
	fn default() -> Self {
		Self {
			max_body_size: DEFAULT_MAX_BODY_SIZE,
			default_method: ActionMethod::default(),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("Failed to read config file {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("Failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),
}

impl ActionConfig {
	/// Parse configuration from a TOML string.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_action_http::{ActionConfig, ActionMethod};
	///
	/// let config = ActionConfig::from_toml_str("default_method = \"PUT\"").unwrap();
	/// assert_eq!(config.default_method, ActionMethod::Put);
	/// assert_eq!(config.max_body_size, 1024 * 1024);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	/// Load configuration from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
		self.max_body_size = max_body_size;
		self
	}

	pub fn with_default_method(mut self, method: ActionMethod) -> Self {
		self.default_method = method;
		self
	}
}
