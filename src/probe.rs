//! Concurrent reachability probing of every candidate record.
//!
//! One task is spawned per record. Each task probes its URL, verifies the
//! reported identity and sends a single outcome to the collector, which
//! writes it into the record. The collector stops as soon as one of these
//! happens:
//!
//! 1. every dispatched record has reported,
//! 2. the deadline expires (not an error, unreported records stay `Unknown`),
//! 3. the caller's token is cancelled (reported as [`Error::Cancelled`]).
//!
//! In every case the remaining tasks are told to stop and the whole task
//! set is joined before returning, so no probe outlives the call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::identity::verify_id;
use crate::ping::ping;
use crate::record::{ConnState, Info};
use crate::transport::Transport;

/// Deadline for the whole probe phase when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// How a probe phase ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
	/// Records a probe was started for
	pub dispatched: usize,
	/// Outcomes applied before the phase ended
	pub reported: usize,
	/// The deadline expired before every record reported
	pub timed_out: bool,
}

/// Outcome of one probe, addressed by record index
#[derive(Debug)]
struct Outcome {
	index: usize,
	state: ConnState,
}

/// Probe a single URL and classify the result.
async fn probe_url(transport: &dyn Transport, server_id: &str, url: &str) -> ConnState {
	match ping(transport, url).await {
		Ok(digest) if verify_id(server_id, &digest) => ConnState::Ok,
		Ok(digest) => {
			debug!(url, digest = %digest, "identity mismatch");
			ConnState::InvalidServer
		}
		Err(e) => {
			debug!(url, error = %e, "probe failed");
			ConnState::ConnectFailed
		}
	}
}

/// Probe every record of `info` concurrently and update its state in place.
///
/// A zero `timeout` means [`DEFAULT_TIMEOUT`].
pub async fn update_state(
	transport: Arc<dyn Transport>,
	info: &mut Info,
	timeout: Duration,
	cancel: &CancellationToken,
) -> Result<ProbeSummary> {
	if cancel.is_cancelled() {
		return Err(Error::Cancelled);
	}

	let timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };
	let dispatched = info.len();
	let server_id: Arc<str> = Arc::from(info.server_id.as_str());

	// Child of the caller's token: fires on caller cancellation and when
	// the collector gives up on the remaining tasks.
	let stop = cancel.child_token();
	let (tx, mut rx) = mpsc::channel::<Outcome>(1);
	let mut tasks = JoinSet::new();

	for (index, record) in info.records().iter().enumerate() {
		let transport = transport.clone();
		let server_id = server_id.clone();
		let url = record.url.clone();
		let tx = tx.clone();
		let stop = stop.clone();

		tasks.spawn(async move {
			let state = tokio::select! {
				_ = stop.cancelled() => return,
				state = probe_url(transport.as_ref(), &server_id, &url) => state,
			};

			// Late outcomes are dropped once the collector has stopped
			tokio::select! {
				biased;
				_ = stop.cancelled() => {}
				_ = tx.send(Outcome { index, state }) => {}
			}
		});
	}
	drop(tx);

	debug!(dispatched, timeout_ms = timeout.as_millis() as u64, "probes dispatched");

	let deadline = tokio::time::sleep(timeout);
	tokio::pin!(deadline);

	let mut reported = 0;
	let mut timed_out = false;
	let mut cancelled = false;

	while reported < dispatched {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => {
				cancelled = true;
				break;
			}
			outcome = rx.recv() => match outcome {
				Some(Outcome { index, state }) => {
					let record = &mut info.records_mut()[index];
					record.state = state;
					reported += 1;
					debug!(url = %record.url, addr_type = %record.addr_type, %state, "probe finished");
				}
				// Every sender is gone; only happens once tasks were stopped
				None => break,
			},
			_ = &mut deadline => {
				timed_out = true;
				break;
			}
		}
	}

	drop(rx);
	stop.cancel();
	while let Some(joined) = tasks.join_next().await {
		if let Err(e) = joined {
			if e.is_panic() {
				warn!(error = %e, "probe task panicked");
			}
		}
	}

	if cancelled {
		debug!(reported, dispatched, "probing cancelled");
		return Err(Error::Cancelled);
	}

	info!(dispatched, reported, timed_out, "probing finished");
	Ok(ProbeSummary { dispatched, reported, timed_out })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::addr_type::AddressType;
	use crate::directory::fixtures::{PING_INVALID, PING_SUCCESS};
	use crate::ping::PING_PATH;
	use crate::record::Record;
	use crate::transport::mock::{MockResponse, MockTransport};
	use crate::transport::HttpResponse;
	use async_trait::async_trait;
	use std::sync::atomic::{AtomicUsize, Ordering};

	const SERVER_ID: &str = "030344165";

	fn ping_url(url: &str) -> String {
		format!("{}{}", url, PING_PATH)
	}

	fn info_with(urls: &[(&str, AddressType)]) -> Info {
		let mut info = Info::new(SERVER_ID);
		for (url, t) in urls {
			info.insert(Record::new(*url, *t));
		}
		info
	}

	fn states(info: &Info) -> Vec<ConnState> {
		info.records().iter().map(|r| r.state).collect()
	}

	#[tokio::test(start_paused = true)]
	async fn test_all_outcomes_applied_without_waiting_for_deadline() {
		let transport = MockTransport::new()
			.with(ping_url("https://10.0.0.1:5001"), MockResponse::ok(PING_SUCCESS))
			.with(ping_url("https://1.2.3.4:5001"), MockResponse::ok(PING_INVALID))
			.with(ping_url("http://10.0.0.1:5000"), MockResponse::status(404, "nope"));
		let mut info = info_with(&[
			("https://10.0.0.1:5001", AddressType::HttpsLanIpv4),
			("https://1.2.3.4:5001", AddressType::HttpsWanIpv4),
			("http://10.0.0.1:5000", AddressType::HttpLanIpv4),
			("http://1.2.3.4:5000", AddressType::HttpWanIpv4),
		]);

		let start = tokio::time::Instant::now();
		let summary = update_state(
			Arc::new(transport), &mut info, Duration::from_secs(30), &CancellationToken::new(),
		).await.unwrap();

		assert!(start.elapsed() < Duration::from_secs(30));
		assert_eq!(summary, ProbeSummary { dispatched: 4, reported: 4, timed_out: false });
		assert_eq!(states(&info), vec![
			ConnState::Ok,
			ConnState::InvalidServer,
			ConnState::ConnectFailed,
			ConnState::ConnectFailed,
		]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_deadline_leaves_slow_probes_unknown() {
		let transport = MockTransport::new()
			.with(ping_url("https://10.0.0.1:5001"), MockResponse::ok(PING_SUCCESS)
				.delayed(Duration::from_millis(100)))
			.with(ping_url("https://1.2.3.4:5001"), MockResponse::ok(PING_SUCCESS)
				.delayed(Duration::from_secs(2)));
		let mut info = info_with(&[
			("https://10.0.0.1:5001", AddressType::HttpsLanIpv4),
			("https://1.2.3.4:5001", AddressType::HttpsWanIpv4),
		]);

		let summary = update_state(
			Arc::new(transport), &mut info, Duration::from_millis(500), &CancellationToken::new(),
		).await.unwrap();

		assert!(summary.timed_out);
		assert_eq!(summary.reported, 1);
		assert_eq!(states(&info), vec![ConnState::Ok, ConnState::Unknown]);
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancellation_discards_outcomes() {
		let transport = MockTransport::new()
			.with(ping_url("https://10.0.0.1:5001"), MockResponse::ok(PING_SUCCESS)
				.delayed(Duration::from_secs(10)))
			.with(ping_url("http://10.0.0.1:5000"), MockResponse::ok(PING_SUCCESS)
				.delayed(Duration::from_secs(10)));
		let mut info = info_with(&[
			("https://10.0.0.1:5001", AddressType::HttpsLanIpv4),
			("http://10.0.0.1:5000", AddressType::HttpLanIpv4),
		]);

		let cancel = CancellationToken::new();
		let trigger = cancel.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(500)).await;
			trigger.cancel();
		});

		let result = update_state(Arc::new(transport), &mut info, Duration::from_secs(2), &cancel).await;

		assert!(matches!(result, Err(Error::Cancelled)));
		assert_eq!(states(&info), vec![ConnState::Unknown, ConnState::Unknown]);
	}

	#[tokio::test]
	async fn test_already_cancelled() {
		let mut info = info_with(&[("http://10.0.0.1:5000", AddressType::HttpLanIpv4)]);
		let cancel = CancellationToken::new();
		cancel.cancel();

		let result = update_state(Arc::new(MockTransport::new()), &mut info, DEFAULT_TIMEOUT, &cancel).await;
		assert!(matches!(result, Err(Error::Cancelled)));
	}

	#[tokio::test]
	async fn test_empty_info() {
		let mut info = Info::new(SERVER_ID);
		let summary = update_state(
			Arc::new(MockTransport::new()), &mut info, DEFAULT_TIMEOUT, &CancellationToken::new(),
		).await.unwrap();
		assert_eq!(summary, ProbeSummary { dispatched: 0, reported: 0, timed_out: false });
	}

	#[tokio::test]
	async fn test_duplicate_urls_each_updated() {
		let transport = MockTransport::new()
			.with(ping_url("http://10.0.0.1:5000"), MockResponse::ok(PING_SUCCESS));
		let mut info = info_with(&[
			("http://10.0.0.1:5000", AddressType::HttpLanIpv4),
			("http://10.0.0.1:5000", AddressType::HttpLanIpv4),
		]);

		update_state(Arc::new(transport), &mut info, DEFAULT_TIMEOUT, &CancellationToken::new())
			.await
			.unwrap();
		assert_eq!(states(&info), vec![ConnState::Ok, ConnState::Ok]);
	}

	/// Transport whose requests never finish on their own; counts how many
	/// are still alive.
	#[derive(Default)]
	struct StalledTransport {
		live: Arc<AtomicUsize>,
	}

	struct LiveGuard(Arc<AtomicUsize>);

	impl Drop for LiveGuard {
		fn drop(&mut self) {
			self.0.fetch_sub(1, Ordering::SeqCst);
		}
	}

	#[async_trait]
	impl Transport for StalledTransport {
		async fn get(&self, _url: &str) -> Result<HttpResponse> {
			self.live.fetch_add(1, Ordering::SeqCst);
			let _guard = LiveGuard(self.live.clone());
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(HttpResponse { status: 200, body: PING_SUCCESS.as_bytes().to_vec() })
		}

		async fn post(&self, _url: &str, _body: String) -> Result<HttpResponse> {
			Err(Error::PingFailure)
		}
	}

	fn stalled_info() -> Info {
		info_with(&[
			("https://10.0.0.1:5001", AddressType::HttpsLanIpv4),
			("https://10.0.0.2:5001", AddressType::HttpsLanIpv4),
			("http://10.0.0.1:5000", AddressType::HttpLanIpv4),
			("http://1.2.3.4:5000", AddressType::HttpWanIpv4),
			("http://5.6.7.8:5000", AddressType::HttpWanIpv4),
		])
	}

	#[tokio::test(start_paused = true)]
	async fn test_cancel_waits_for_inflight_requests() {
		let transport = StalledTransport::default();
		let live = transport.live.clone();
		let mut info = stalled_info();

		let cancel = CancellationToken::new();
		let trigger = cancel.clone();
		tokio::spawn(async move {
			tokio::time::sleep(Duration::from_millis(100)).await;
			trigger.cancel();
		});

		let result = update_state(Arc::new(transport), &mut info, Duration::from_secs(2), &cancel).await;

		assert!(matches!(result, Err(Error::Cancelled)));
		assert_eq!(live.load(Ordering::SeqCst), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn test_deadline_waits_for_inflight_requests() {
		let transport = StalledTransport::default();
		let live = transport.live.clone();
		let mut info = stalled_info();

		let summary = update_state(
			Arc::new(transport), &mut info, Duration::from_millis(300), &CancellationToken::new(),
		).await.unwrap();

		assert_eq!(summary, ProbeSummary { dispatched: 5, reported: 0, timed_out: true });
		assert_eq!(live.load(Ordering::SeqCst), 0);
		assert!(states(&info).iter().all(|s| *s == ConnState::Unknown));
	}

	#[tokio::test(start_paused = true)]
	async fn test_zero_timeout_uses_default() {
		let transport = MockTransport::new()
			.with(ping_url("http://10.0.0.1:5000"), MockResponse::ok(PING_SUCCESS)
				.delayed(Duration::from_secs(1)));
		let mut info = info_with(&[("http://10.0.0.1:5000", AddressType::HttpLanIpv4)]);

		let summary = update_state(
			Arc::new(transport), &mut info, Duration::ZERO, &CancellationToken::new(),
		).await.unwrap();

		assert!(!summary.timed_out);
		assert_eq!(states(&info), vec![ConnState::Ok]);
	}
}
