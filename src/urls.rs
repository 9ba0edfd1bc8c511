use std::net::{IpAddr, Ipv4Addr};

use crate::addr_type::{AddressType, Locality};
use crate::directory::{is_present, ServerInfo};

/// Scope string the directory uses for link-local IPv6 addresses
const LINK_SCOPE: &str = "link";

fn is_private_v4(ip: Ipv4Addr) -> bool {
	let o = ip.octets();
	o[0] == 10
		|| (o[0] == 172 && o[1] & 0xf0 == 16)
		|| (o[0] == 192 && o[1] == 168)
}

/// Report whether an address is private: RFC 1918 for IPv4, unique local
/// (fc00::/7) for IPv6. Unparseable input is not private.
pub fn is_private_ip(addr: &str) -> bool {
	match addr.parse::<IpAddr>() {
		Ok(IpAddr::V4(ip)) => is_private_v4(ip),
		Ok(IpAddr::V6(ip)) => match ip.to_ipv4_mapped() {
			Some(v4) => is_private_v4(v4),
			None => ip.octets()[0] & 0xfe == 0xfc,
		},
		Err(_) => false,
	}
}

fn host_url(scheme: &str, host: &str, port: u16) -> String {
	format!("{}://{}:{}", scheme, host, port)
}

fn ipv6_url(scheme: &str, addr: &str, port: u16) -> String {
	format!("{}://[{}]:{}", scheme, addr, port)
}

/// Interface IPv4 addresses that are present, in interface order
fn interface_ips(info: &ServerInfo) -> impl Iterator<Item = &str> {
	info.server.interfaces.iter()
		.map(|ifc| ifc.ip.as_str())
		.filter(|ip| is_present(ip))
}

/// Interface IPv6 entries whose link-local status matches `link`
fn interface_ipv6(info: &ServerInfo, link: bool) -> impl Iterator<Item = &str> {
	info.server.interfaces.iter()
		.flat_map(|ifc| ifc.ipv6.iter())
		.filter(move |entry| (entry.scope == LINK_SCOPE) == link)
		.map(|entry| entry.address.as_str())
}

/// A named host on the primary port, then on the alternate port if distinct
fn named_host_urls(info: &ServerInfo, scheme: &str, host: &str) -> Vec<String> {
	if !is_present(host) {
		return Vec::new();
	}
	let mut urls = vec![host_url(scheme, host, info.service.port)];
	if let Some(alt) = info.service.distinct_alt_port() {
		urls.push(host_url(scheme, host, alt));
	}
	urls
}

/// Generate the candidate URLs of one address type from a topology
/// descriptor.
///
/// Output follows the descriptor's interface order. Reserved types yield
/// nothing.
pub fn candidate_urls(info: &ServerInfo, addr_type: AddressType) -> Vec<String> {
	if addr_type.is_reserved() {
		return Vec::new();
	}

	let scheme = addr_type.scheme().as_str();
	let port = info.service.port;
	let alt_port = info.service.distinct_alt_port();

	match addr_type.locality() {
		Locality::LanIpv4 => interface_ips(info)
			.filter(|ip| is_private_ip(ip))
			.map(|ip| host_url(scheme, ip, port))
			.collect(),

		Locality::WanIpv4 => {
			let mut urls: Vec<String> = interface_ips(info)
				.filter(|ip| !is_private_ip(ip))
				.map(|ip| host_url(scheme, ip, port))
				.collect();

			let external = info.server.external.ip.as_str();
			if is_present(external) && !is_private_ip(external) {
				urls.push(host_url(scheme, external, port));
				if let Some(alt) = alt_port {
					urls.push(host_url(scheme, external, alt));
				}
			}
			urls
		}

		Locality::LanIpv6 => interface_ipv6(info, true)
			.map(|addr| ipv6_url(scheme, addr, port))
			.collect(),

		Locality::WanIpv6 => {
			let mut urls = Vec::new();
			for addr in interface_ipv6(info, false) {
				urls.push(ipv6_url(scheme, addr, port));
				if let Some(alt) = alt_port {
					urls.push(ipv6_url(scheme, addr, alt));
				}
			}
			urls
		}

		Locality::Fqdn => named_host_urls(info, scheme, &info.server.fqdn),
		Locality::Ddns => named_host_urls(info, scheme, &info.server.ddns),

		Locality::SmartLanIpv4
		| Locality::SmartLanIpv6
		| Locality::SmartHost
		| Locality::SmartWanIpv6
		| Locality::SmartWanIpv4
		| Locality::Tunnel => Vec::new(),
	}
}
