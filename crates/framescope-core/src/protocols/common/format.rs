use std::net::Ipv4Addr;

/// Lowercase, colon-separated hex octets.
pub(crate) fn mac(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Dotted-decimal form of a 4-byte address.
pub(crate) fn ipv4(bytes: &[u8]) -> Option<String> {
    let octets: [u8; 4] = bytes.try_into().ok()?;
    Some(Ipv4Addr::from(octets).to_string())
}

/// Contiguous lowercase hex.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn flag(set: bool) -> &'static str {
    if set { "Set" } else { "Not set" }
}

#[cfg(test)]
mod tests {
    use super::{flag, hex, ipv4, mac};

    #[test]
    fn mac_is_lowercase_colon_separated() {
        assert_eq!(
            mac(&[0x00, 0x1A, 0x2b, 0xFF, 0x10, 0x01]),
            "00:1a:2b:ff:10:01"
        );
    }

    #[test]
    fn ipv4_requires_four_bytes() {
        assert_eq!(ipv4(&[192, 168, 0, 1]).as_deref(), Some("192.168.0.1"));
        assert_eq!(ipv4(&[10, 0, 0]), None);
    }

    #[test]
    fn hex_and_flag() {
        assert_eq!(hex(&[0xde, 0xad, 0x01]), "dead01");
        assert_eq!(hex(&[]), "");
        assert_eq!(flag(true), "Set");
        assert_eq!(flag(false), "Not set");
    }
}
