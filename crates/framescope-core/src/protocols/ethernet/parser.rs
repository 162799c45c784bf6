use std::ops::Range;

use super::key;
use super::layout;
use crate::decode::DecodeError;
use crate::pdu::{Pdu, PduView, Protocol};
use crate::protocols::common::reader::HeaderReader;
use crate::protocols::registry::chainable;

pub fn parse_ethernet(frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
    let reader = HeaderReader::new(Protocol::Ethernet, frame, region);
    reader.require_len(layout::HEADER_LEN)?;

    let headers = vec![
        (key::DESTINATION, reader.bytes(layout::DESTINATION_RANGE)?),
        (key::SOURCE, reader.bytes(layout::SOURCE_RANGE)?),
        (key::ETHER_TYPE, reader.bytes(layout::ETHER_TYPE_RANGE)?),
    ];
    let payload = reader.rest(layout::HEADER_LEN)?;
    Ok(Pdu::new(Protocol::Ethernet, headers, payload))
}

/// Protocol named by an etherType. Also used by ARP's protocol type field.
pub fn protocol_from_ether_type(ether_type: u16) -> Protocol {
    match ether_type {
        layout::ETHERTYPE_IPV4 => Protocol::Ipv4,
        layout::ETHERTYPE_ARP => Protocol::Arp,
        layout::ETHERTYPE_IPV6 => Protocol::Ipv6,
        layout::ETHERTYPE_VLAN => Protocol::Vlan,
        layout::ETHERTYPE_LLDP => Protocol::Lldp,
        _ => Protocol::Unknown,
    }
}

pub fn next_protocol(pdu: &PduView<'_>) -> Protocol {
    pdu.uint(key::ETHER_TYPE)
        .map(|value| chainable(protocol_from_ether_type(value as u16)))
        .unwrap_or(Protocol::Unknown)
}

#[cfg(test)]
mod tests {
    use super::{parse_ethernet, protocol_from_ether_type};
    use crate::decode::DecodeError;
    use crate::pdu::{Header, Protocol};
    use crate::protocols::ethernet::key;

    fn frame(ether_type: u16) -> Vec<u8> {
        let mut frame = vec![0u8; 18];
        frame[..6].copy_from_slice(&[0xff; 6]);
        frame[6..12].copy_from_slice(&[0x02, 0x00, 0x5e, 0x10, 0x20, 0x30]);
        frame[12..14].copy_from_slice(&ether_type.to_be_bytes());
        frame
    }

    #[test]
    fn parse_fixed_header() {
        let frame = frame(0x0800);
        let pdu = parse_ethernet(&frame, 0..frame.len()).unwrap();
        assert_eq!(pdu.protocol(), Protocol::Ethernet);
        assert_eq!(pdu.header(key::DESTINATION), Some(Header::bytes(0, 6)));
        assert_eq!(pdu.header(key::SOURCE), Some(Header::bytes(6, 6)));
        assert_eq!(pdu.header(key::ETHER_TYPE), Some(Header::bytes(12, 2)));
        assert_eq!(pdu.payload(), Header::bytes(14, 4));
    }

    #[test]
    fn parse_header_without_payload() {
        let frame = &frame(0x0806)[..14];
        let pdu = parse_ethernet(frame, 0..frame.len()).unwrap();
        assert!(pdu.payload().is_empty());
    }

    #[test]
    fn parse_short_frame() {
        let frame = [0u8; 13];
        let err = parse_ethernet(&frame, 0..frame.len()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedFrame {
                protocol: Protocol::Ethernet,
                needed: 14,
                actual: 13,
            }
        );
        assert!(parse_ethernet(&[], 0..0).is_err());
    }

    #[test]
    fn ether_type_mapping() {
        assert_eq!(protocol_from_ether_type(0x0800), Protocol::Ipv4);
        assert_eq!(protocol_from_ether_type(0x0806), Protocol::Arp);
        assert_eq!(protocol_from_ether_type(0x86dd), Protocol::Ipv6);
        assert_eq!(protocol_from_ether_type(0x1234), Protocol::Unknown);
    }
}
