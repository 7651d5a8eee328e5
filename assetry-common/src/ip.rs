//! IPv4 integer arithmetic

use std::net::Ipv4Addr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid ipv4 address: {0}")]
pub struct InvalidIpv4(pub String);

pub fn ipv4_to_int(addr: &str) -> Result<u32, InvalidIpv4> {
    addr.trim()
        .parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| InvalidIpv4(addr.to_string()))
}

pub fn int_to_ipv4(number: u32) -> String {
    Ipv4Addr::from(number).to_string()
}

/// 10.0.0.0/8, 172.16.0.0/12 and 192.168.0.0/16.
pub fn is_private_ipv4(addr: &str) -> bool {
    addr.trim()
        .parse::<Ipv4Addr>()
        .map(|ip| ip.is_private())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_conversion() {
        assert_eq!(ipv4_to_int("10.0.0.1").unwrap(), 167_772_161);
        assert_eq!(int_to_ipv4(167_772_161), "10.0.0.1");
        assert_eq!(ipv4_to_int("255.255.255.255").unwrap(), u32::MAX);
        assert!(ipv4_to_int("10.0.0").is_err());
        assert!(ipv4_to_int("fe80::1").is_err());
    }

    #[test]
    fn private_ranges() {
        assert!(is_private_ipv4("10.20.30.40"));
        assert!(is_private_ipv4("172.31.255.1"));
        assert!(is_private_ipv4("192.168.1.1"));
        assert!(!is_private_ipv4("172.32.0.1"));
        assert!(!is_private_ipv4("8.8.8.8"));
        assert!(!is_private_ipv4("not an ip"));
    }
}
