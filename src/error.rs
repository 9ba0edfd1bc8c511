use thiserror::Error;

/// Errors returned by directory lookups and resolution.
///
/// Per-URL probe failures never show up here; they are recorded as the
/// [`ConnState`](crate::record::ConnState) of the affected record.
#[derive(Debug, Error)]
pub enum Error {
	#[error("operation cancelled")]
	Cancelled,
	#[error("invalid server ID")]
	InvalidId,
	#[error("cannot access any URLs")]
	CannotAccess,
	#[error("response parse error")]
	Parse,
	#[error("ping response failure")]
	PingFailure,
	#[error("unknown command")]
	UnknownCommand,
	#[error("unknown server type")]
	UnknownServerType,
	#[error("get_server_info returned errno={errno}")]
	Directory { errno: i64 },
	#[error("transport error: {0}")]
	Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
	/// Wrap a transport level failure, keeping it reachable through `source()`.
	pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Error::Transport(err.into())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
