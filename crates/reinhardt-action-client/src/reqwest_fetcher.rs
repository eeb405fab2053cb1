//! [`Fetcher`] backed by `reqwest`.

use crate::error::{ClientError, Result};
use crate::fetcher::{Fetcher, SubmitOptions};
use async_trait::async_trait;
use reinhardt_action_http::FORM_URLENCODED;
use reinhardt_formdata::FormData;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

/// Sends forms over HTTP relative to a base URL.
///
/// `GET` submissions replace the query string of the target URL; every other
/// method sends an urlencoded body. Replies are decoded as JSON whatever
/// their status, since error responses carry the error shape.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
	client: reqwest::Client,
	base_url: Url,
}

impl ReqwestFetcher {
	pub fn new(base_url: &str) -> Result<Self> {
		Self::with_client(reqwest::Client::new(), base_url)
	}

	pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
		let base_url =
			Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
		Ok(Self { client, base_url })
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	fn target(&self, action: Option<&str>) -> Result<Url> {
		match action {
			Some(path) => self
				.base_url
				.join(path)
				.map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e))),
			None => Ok(self.base_url.clone()),
		}
	}
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
	async fn submit(&self, form: FormData, options: SubmitOptions) -> Result<Value> {
		let mut url = self.target(options.action.as_deref())?;
		let method = options.method.as_http();

		let request = if options.method.sends_body() {
			self.client
				.request(method, url)
				.header(CONTENT_TYPE, FORM_URLENCODED)
				.body(form.to_urlencoded())
		} else {
			let query = form.to_urlencoded();
			url.set_query((!query.is_empty()).then_some(query.as_str()));
			self.client.request(method, url)
		};

		let response = request.header(ACCEPT, "application/json").send().await?;
		tracing::debug!(status = %response.status(), "action reply received");
		Ok(response.json::<Value>().await?)
	}
}
