use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::addr_type::AddressType;
use crate::directory::{self, is_present, ServerKind, DEFAULT_SERVER_URL};
use crate::error::{Error, Result};
use crate::probe::{self, ProbeSummary, DEFAULT_TIMEOUT};
use crate::record::{Info, Record};
use crate::transport::{ReqwestTransport, Transport};
use crate::urls::candidate_urls;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
	/// Deadline for the whole probe phase. Zero means the default (2 s).
	pub timeout: Duration,
	/// Directory endpoint
	pub server_url: String,
	/// Which portal pair to query
	pub server_kind: ServerKind,
	/// Accept self-signed certificates on https candidates
	pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			timeout: DEFAULT_TIMEOUT,
			server_url: DEFAULT_SERVER_URL.to_string(),
			server_kind: ServerKind::Dsm,
			accept_invalid_certs: false,
		}
	}
}

/// Resolves identifiers through the directory and probes the candidates.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct Client {
	transport: Arc<dyn Transport>,
	config: ClientConfig,
}

impl Client {
	/// Build a client using the default reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::new(config.accept_invalid_certs)?;
		Ok(Self::with_transport(config, Arc::new(transport)))
	}

	/// Build a client on top of a caller supplied transport.
	pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
		Self { transport, config }
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Fetch the topology for `id` and build the ranked candidate set.
	///
	/// Surrounding whitespace is not part of an identifier.
	pub async fn get_info(&self, id: &str, cancel: &CancellationToken) -> Result<Info> {
		let id = id.trim();
		if id.is_empty() {
			return Err(Error::InvalidId);
		}

		let fetch = directory::fetch_server_info(
			self.transport.as_ref(), &self.config.server_url, self.config.server_kind, id,
		);
		let (secure, insecure) = tokio::select! {
			_ = cancel.cancelled() => return Err(Error::Cancelled),
			result = fetch => result?,
		};

		if !is_present(&secure.server.server_id) {
			return Err(Error::InvalidId);
		}

		let mut info = Info::new(secure.server.server_id.clone());
		for t in AddressType::ALL {
			let descriptor = if t.is_secure() { &secure } else { &insecure };
			for url in candidate_urls(descriptor, t) {
				info.insert(Record::new(url, t));
			}
		}

		debug!(id, server_id = %info.server_id, candidates = info.len(), "built candidate set");
		Ok(info)
	}

	/// Probe every record of `info` and update its state.
	///
	/// Running out of time is not an error; records that did not report
	/// stay `Unknown`.
	pub async fn update_state(&self, info: &mut Info, cancel: &CancellationToken) -> Result<ProbeSummary> {
		probe::update_state(self.transport.clone(), info, self.config.timeout, cancel).await
	}

	/// Probe a single URL, returning the identity digest it reports.
	pub async fn ping(&self, url: &str) -> Result<String> {
		crate::ping::ping(self.transport.as_ref(), url).await
	}

	/// Resolve `id` into verified, reachable URLs, most preferred first.
	pub async fn resolve(&self, id: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
		let mut info = self.get_info(id, cancel).await?;
		self.update_state(&mut info, cancel).await?;

		let urls = info.reachable_urls();
		if urls.is_empty() {
			return Err(Error::CannotAccess);
		}
		Ok(urls)
	}
}

/// Resolve `id` with a default configured client.
pub async fn resolve(id: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
	Client::new(ClientConfig::default())?.resolve(id, cancel).await
}
