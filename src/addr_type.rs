use std::fmt;

/// URL scheme used to reach a candidate address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
	Https,
	Http,
}

impl Scheme {
	pub fn as_str(self) -> &'static str {
		match self {
			Scheme::Https => "https",
			Scheme::Http => "http",
		}
	}
}

/// Where a candidate address lives relative to the device.
///
/// The `Smart*` localities and `Tunnel` are placeholders for mechanisms
/// that have no candidate generation yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locality {
	SmartLanIpv4,
	SmartLanIpv6,
	LanIpv4,
	LanIpv6,
	Fqdn,
	Ddns,
	SmartHost,
	SmartWanIpv6,
	SmartWanIpv4,
	WanIpv6,
	WanIpv4,
	Tunnel,
}

/// Candidate address type. The discriminant is the priority: lower values
/// are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum AddressType {
	HttpsSmartLanIpv4 = 0,
	HttpsSmartLanIpv6,
	HttpsLanIpv4,
	HttpsLanIpv6,
	HttpsFqdn,
	HttpsDdns,
	HttpsSmartHost,
	HttpsSmartWanIpv6,
	HttpsSmartWanIpv4,
	HttpsWanIpv6,
	HttpsWanIpv4,
	HttpLanIpv4,
	HttpLanIpv6,
	HttpFqdn,
	HttpDdns,
	HttpWanIpv6,
	HttpWanIpv4,
	HttpsTun,
	HttpTun,
}

/// Static properties of one address type
#[derive(Debug, Clone, Copy)]
struct Traits {
	scheme: Scheme,
	locality: Locality,
	reserved: bool,
}

const fn traits(scheme: Scheme, locality: Locality, reserved: bool) -> Traits {
	Traits { scheme, locality, reserved }
}

/// The secure tunnel is ranked after every insecure address but is still
/// reached over https. It is the only type whose scheme does not follow
/// the secure/insecure ordinal boundary.
pub const SECURE_TUNNEL: AddressType = AddressType::HttpsTun;

/// First insecure ordinal. Everything below it is secure, plus [`SECURE_TUNNEL`].
pub const FIRST_INSECURE: AddressType = AddressType::HttpLanIpv4;

// Indexed by ordinal; must stay in declaration order.
const TABLE: [Traits; AddressType::COUNT] = {
	use Locality::*;
	use Scheme::*;
	[
		traits(Https, SmartLanIpv4, true),
		traits(Https, SmartLanIpv6, true),
		traits(Https, LanIpv4, false),
		traits(Https, LanIpv6, false),
		traits(Https, Fqdn, false),
		traits(Https, Ddns, false),
		traits(Https, SmartHost, true),
		traits(Https, SmartWanIpv6, true),
		traits(Https, SmartWanIpv4, true),
		traits(Https, WanIpv6, false),
		traits(Https, WanIpv4, false),
		traits(Http, LanIpv4, false),
		traits(Http, LanIpv6, false),
		traits(Http, Fqdn, false),
		traits(Http, Ddns, false),
		traits(Http, WanIpv6, false),
		traits(Http, WanIpv4, false),
		// SECURE_TUNNEL
		traits(Https, Tunnel, true),
		traits(Http, Tunnel, true),
	]
};

impl AddressType {
	pub const COUNT: usize = 19;

	/// Every address type in ascending priority order.
	pub const ALL: [AddressType; AddressType::COUNT] = [
		AddressType::HttpsSmartLanIpv4,
		AddressType::HttpsSmartLanIpv6,
		AddressType::HttpsLanIpv4,
		AddressType::HttpsLanIpv6,
		AddressType::HttpsFqdn,
		AddressType::HttpsDdns,
		AddressType::HttpsSmartHost,
		AddressType::HttpsSmartWanIpv6,
		AddressType::HttpsSmartWanIpv4,
		AddressType::HttpsWanIpv6,
		AddressType::HttpsWanIpv4,
		AddressType::HttpLanIpv4,
		AddressType::HttpLanIpv6,
		AddressType::HttpFqdn,
		AddressType::HttpDdns,
		AddressType::HttpWanIpv6,
		AddressType::HttpWanIpv4,
		AddressType::HttpsTun,
		AddressType::HttpTun,
	];

	pub fn ordinal(self) -> u8 {
		self as u8
	}

	fn traits(self) -> Traits {
		TABLE[self as usize]
	}

	pub fn scheme(self) -> Scheme {
		self.traits().scheme
	}

	pub fn locality(self) -> Locality {
		self.traits().locality
	}

	/// True for types kept as priority slots only; they never produce URLs.
	pub fn is_reserved(self) -> bool {
		self.traits().reserved
	}

	/// Whether candidates of this type are served by the secure (https)
	/// service descriptor.
	pub fn is_secure(self) -> bool {
		self.scheme() == Scheme::Https
	}

	/// Short human readable label, e.g. `https-lan-ipv4`.
	pub fn label(self) -> &'static str {
		match self {
			AddressType::HttpsSmartLanIpv4 => "https-smart-lan-ipv4",
			AddressType::HttpsSmartLanIpv6 => "https-smart-lan-ipv6",
			AddressType::HttpsLanIpv4 => "https-lan-ipv4",
			AddressType::HttpsLanIpv6 => "https-lan-ipv6",
			AddressType::HttpsFqdn => "https-fqdn",
			AddressType::HttpsDdns => "https-ddns",
			AddressType::HttpsSmartHost => "https-smart-host",
			AddressType::HttpsSmartWanIpv6 => "https-smart-wan-ipv6",
			AddressType::HttpsSmartWanIpv4 => "https-smart-wan-ipv4",
			AddressType::HttpsWanIpv6 => "https-wan-ipv6",
			AddressType::HttpsWanIpv4 => "https-wan-ipv4",
			AddressType::HttpLanIpv4 => "http-lan-ipv4",
			AddressType::HttpLanIpv6 => "http-lan-ipv6",
			AddressType::HttpFqdn => "http-fqdn",
			AddressType::HttpDdns => "http-ddns",
			AddressType::HttpWanIpv6 => "http-wan-ipv6",
			AddressType::HttpWanIpv4 => "http-wan-ipv4",
			AddressType::HttpsTun => "https-tunnel",
			AddressType::HttpTun => "http-tunnel",
		}
	}
}

impl fmt::Display for AddressType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}
