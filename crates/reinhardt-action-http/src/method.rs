use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Methods an action form may be submitted with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionMethod {
	Get,
	#[default]
	Post,
	Put,
	Patch,
	Delete,
}

impl ActionMethod {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Patch => "PATCH",
			Self::Delete => "DELETE",
		}
	}

	pub fn as_http(&self) -> Method {
		match self {
			Self::Get => Method::GET,
			Self::Post => Method::POST,
			Self::Put => Method::PUT,
			Self::Patch => Method::PATCH,
			Self::Delete => Method::DELETE,
		}
	}

	/// `GET` submissions travel in the query string instead of the body.
	pub fn sends_body(&self) -> bool {
		!matches!(self, Self::Get)
	}
}

impl fmt::Display for ActionMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported action method: {0}")]
pub struct UnsupportedMethod(pub String);

impl FromStr for ActionMethod {
	type Err = UnsupportedMethod;

	/// Case-insensitive, like HTML `method` attributes.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_uppercase().as_str() {
			"GET" => Ok(Self::Get),
			"POST" => Ok(Self::Post),
			"PUT" => Ok(Self::Put),
			"PATCH" => Ok(Self::Patch),
			"DELETE" => Ok(Self::Delete),
			_ => Err(UnsupportedMethod(s.to_string())),
		}
	}
}
