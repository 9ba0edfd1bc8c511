use std::fmt;

use crate::addr_type::AddressType;

/// Result of the most recent reachability probe of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnState {
	#[default]
	Unknown,
	Ok,
	ConnectFailed,
	InvalidServer,
}

impl fmt::Display for ConnState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			ConnState::Unknown => "unknown",
			ConnState::Ok => "ok",
			ConnState::ConnectFailed => "connect failed",
			ConnState::InvalidServer => "invalid server",
		};
		f.write_str(s)
	}
}

/// One candidate URL for reaching the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	pub url: String,
	pub addr_type: AddressType,
	pub state: ConnState,
}

impl Record {
	pub fn new(url: impl Into<String>, addr_type: AddressType) -> Self {
		Self { url: url.into(), addr_type, state: ConnState::Unknown }
	}
}

/// Candidate records for one device, kept sorted by address type
#[derive(Debug, Clone, Default)]
pub struct Info {
	pub server_id: String,
	records: Vec<Record>,
}

impl Info {
	pub fn new(server_id: impl Into<String>) -> Self {
		Self { server_id: server_id.into(), records: Vec::with_capacity(16) }
	}

	/// Insert a record after every record of the same or higher priority.
	///
	/// Records of equal type keep their arrival order. URLs are not
	/// de-duplicated.
	pub fn insert(&mut self, record: Record) {
		let i = self.records.partition_point(|r| r.addr_type <= record.addr_type);
		self.records.insert(i, record);
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	pub(crate) fn records_mut(&mut self) -> &mut [Record] {
		&mut self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// URLs whose last probe succeeded, in priority order.
	pub fn reachable_urls(&self) -> Vec<String> {
		self.records.iter()
			.filter(|r| r.state == ConnState::Ok)
			.map(|r| r.url.clone())
			.collect()
	}
}
