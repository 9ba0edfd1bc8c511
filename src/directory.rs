use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::transport::Transport;

/// Directory endpoint used when no override is configured
pub const DEFAULT_SERVER_URL: &str = "http://global.quickconnect.to/Serv.php";

/// Marker the directory uses for fields it has no value for
pub const NULL_VALUE: &str = "NULL";

/// True when a directory string field carries a real value.
pub fn is_present(value: &str) -> bool {
	!value.is_empty() && value != NULL_VALUE
}

/// Directory command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	GetServerInfo,
	/// Tunnel negotiation. Can be encoded but is never issued.
	RequestTunnel,
}

impl Command {
	pub fn as_str(self) -> &'static str {
		match self {
			Command::GetServerInfo => "get_server_info",
			Command::RequestTunnel => "request_tunnel",
		}
	}
}

impl FromStr for Command {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"get_server_info" => Ok(Command::GetServerInfo),
			"request_tunnel" => Ok(Command::RequestTunnel),
			_ => Err(Error::UnknownCommand),
		}
	}
}

/// Kind of service being located; selects the directory portal names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerKind {
	#[default]
	Dsm,
	Photo,
}

impl ServerKind {
	/// Portal ids for the (secure, insecure) descriptor pair
	pub fn portal_ids(self) -> (&'static str, &'static str) {
		match self {
			ServerKind::Dsm => ("dsm_portal_https", "dsm_portal"),
			ServerKind::Photo => ("photo_portal_https", "photo_portal_http"),
		}
	}
}

impl FromStr for ServerKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"dsm" => Ok(ServerKind::Dsm),
			"photo" => Ok(ServerKind::Photo),
			_ => Err(Error::UnknownServerType),
		}
	}
}

impl fmt::Display for ServerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ServerKind::Dsm => f.write_str("dsm"),
			ServerKind::Photo => f.write_str("photo"),
		}
	}
}

/// One command object of a directory query
#[derive(Debug, Serialize)]
struct ServerQuery<'a> {
	version: u32,
	command: &'a str,
	stop_when_error: bool,
	stop_when_success: bool,
	id: &'a str,
	#[serde(rename = "serverID")]
	server_id: &'a str,
	is_gofile: bool,
}

impl<'a> ServerQuery<'a> {
	fn new(command: Command, portal: &'a str, server_id: &'a str) -> Self {
		Self {
			version: 1,
			command: command.as_str(),
			stop_when_error: false,
			stop_when_success: false,
			id: portal,
			server_id,
			is_gofile: false,
		}
	}
}

/// Build the JSON body for a directory query: one command object for the
/// secure portal followed by one for the insecure portal.
pub fn request_body(command: Command, kind: ServerKind, server_id: &str) -> Result<String> {
	let (secure, insecure) = kind.portal_ids();
	let queries = [
		ServerQuery::new(command, secure, server_id),
		ServerQuery::new(command, insecure, server_id),
	];
	serde_json::to_string(&queries).map_err(|_| Error::Parse)
}

/// Treat an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Topology snapshot for one service (secure or insecure) of a device
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
	#[serde(deserialize_with = "nullable")]
	pub command: String,
	pub errno: i64,
	pub server: Server,
	pub service: Service,
	pub version: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Server {
	#[serde(rename = "serverID", deserialize_with = "nullable")]
	pub server_id: String,
	#[serde(deserialize_with = "nullable")]
	pub ddns: String,
	#[serde(deserialize_with = "nullable")]
	pub fqdn: String,
	#[serde(deserialize_with = "nullable")]
	pub external: External,
	#[serde(rename = "interface", deserialize_with = "nullable")]
	pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct External {
	#[serde(deserialize_with = "nullable")]
	pub ip: String,
	#[serde(deserialize_with = "nullable")]
	pub ipv6: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Interface {
	#[serde(deserialize_with = "nullable")]
	pub ip: String,
	#[serde(deserialize_with = "nullable")]
	pub ipv6: Vec<Ipv6Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ipv6Entry {
	#[serde(deserialize_with = "nullable")]
	pub address: String,
	#[serde(deserialize_with = "nullable")]
	pub scope: String,
}

/// Service ports, plus relay details that only the reserved tunnel
/// address types would use.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Service {
	pub port: u16,
	#[serde(rename = "ext_port")]
	pub alt_port: u16,
	#[serde(deserialize_with = "nullable")]
	pub relay_ip: String,
	#[serde(deserialize_with = "nullable")]
	pub relay_ipv6: String,
	pub relay_port: u16,
	#[serde(deserialize_with = "nullable")]
	pub https_ip: String,
	pub https_port: u16,
}

impl Service {
	/// The alternate port, if one is configured and differs from the primary.
	pub fn distinct_alt_port(&self) -> Option<u16> {
		if self.alt_port != 0 && self.alt_port != self.port {
			Some(self.alt_port)
		} else {
			None
		}
	}
}

/// Decode and validate a directory response body.
///
/// Returns the (secure, insecure) descriptor pair.
pub fn parse_response(body: &[u8]) -> Result<(ServerInfo, ServerInfo)> {
	let info: Vec<ServerInfo> = serde_json::from_slice(body).map_err(|_| Error::Parse)?;

	let [secure, insecure]: [ServerInfo; 2] = info.try_into().map_err(|_| Error::Parse)?;

	for descriptor in [&secure, &insecure] {
		if descriptor.errno != 0 {
			warn!(errno = descriptor.errno, command = %descriptor.command, "directory returned an error");
			return Err(Error::Directory { errno: descriptor.errno });
		}
	}

	Ok((secure, insecure))
}

/// Query the directory for the topology of `server_id`.
pub async fn fetch_server_info(
	transport: &dyn Transport,
	server_url: &str,
	kind: ServerKind,
	server_id: &str,
) -> Result<(ServerInfo, ServerInfo)> {
	let body = request_body(Command::GetServerInfo, kind, server_id)?;

	debug!(url = server_url, %kind, server_id, "querying directory");
	let response = transport.post(server_url, body).await?;

	parse_response(&response.body)
}
