use serde::Deserialize;

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Path and query appended to a candidate URL for a reachability probe
pub const PING_PATH: &str = "/webman/pingpong.cgi?action=cors&quickconnect=true";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PingResponse {
	success: bool,
	ezid: String,
}

/// Probe `url` and return the identity digest the device reported.
///
/// A non-200 status or `success: false` yields [`Error::PingFailure`]; an
/// unreadable body yields [`Error::Parse`].
pub async fn ping(transport: &dyn Transport, url: &str) -> Result<String> {
	let target = format!("{}{}", url, PING_PATH);
	let response = transport.get(&target).await?;

	if !response.is_ok() {
		return Err(Error::PingFailure);
	}

	let pong: PingResponse = serde_json::from_slice(&response.body).map_err(|_| Error::Parse)?;
	if !pong.success {
		return Err(Error::PingFailure);
	}

	Ok(pong.ezid)
}
