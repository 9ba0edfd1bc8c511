use async_trait::async_trait;

use crate::error::{Error, Result};

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
	pub status: u16,
	pub body: Vec<u8>,
}

impl HttpResponse {
	pub fn is_ok(&self) -> bool {
		self.status == 200
	}
}

/// HTTP capability used for directory queries and reachability probes.
///
/// Implementations must be safe to share between concurrent probe tasks.
/// Dropping a returned future must abandon the request; cancellation of
/// in-flight probes relies on it.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn get(&self, url: &str) -> Result<HttpResponse>;

	/// POST a JSON body.
	async fn post(&self, url: &str, body: String) -> Result<HttpResponse>;
}

/// Default transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	client: reqwest::Client,
}

impl ReqwestTransport {
	/// Build a transport. Devices usually serve self-signed certificates,
	/// so `accept_invalid_certs` is needed to reach most https candidates.
	pub fn new(accept_invalid_certs: bool) -> Result<Self> {
		let client = reqwest::Client::builder()
			.danger_accept_invalid_certs(accept_invalid_certs)
			.build()
			.map_err(Error::transport)?;
		Ok(Self { client })
	}

	pub fn from_client(client: reqwest::Client) -> Self {
		Self { client }
	}

	async fn read(response: reqwest::Response) -> Result<HttpResponse> {
		let status = response.status().as_u16();
		let body = response.bytes()
			.await
			.map_err(Error::transport)?;
		Ok(HttpResponse { status, body: body.to_vec() })
	}
}

#[async_trait]
impl Transport for ReqwestTransport {
	async fn get(&self, url: &str) -> Result<HttpResponse> {
		let response = self.client.get(url)
			.send()
			.await
			.map_err(Error::transport)?;
		Self::read(response).await
	}

	async fn post(&self, url: &str, body: String) -> Result<HttpResponse> {
		let response = self.client.post(url)
			.header(reqwest::header::CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await
			.map_err(Error::transport)?;
		Self::read(response).await
	}
}
