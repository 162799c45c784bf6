use std::ops::Range;

use super::key;
use super::layout;
use crate::decode::DecodeError;
use crate::pdu::{Pdu, Protocol};
use crate::protocols::common::reader::HeaderReader;

/// Decode an ARP body. Bytes after the body (link-layer padding) become the
/// payload view; ARP never hands them to another decoder.
pub fn parse_arp(frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
    let reader = HeaderReader::new(Protocol::Arp, frame, region);
    reader.require_len(layout::FIXED_LEN)?;

    let hardware_len = reader.read_u8(layout::HARDWARE_LEN_OFFSET)?;
    let protocol_len = reader.read_u8(layout::PROTOCOL_LEN_OFFSET)?;
    let body_len = layout::body_len(hardware_len, protocol_len);
    reader.require_len(body_len)?;

    let hw = usize::from(hardware_len);
    let proto = usize::from(protocol_len);
    let sender_hw = layout::FIXED_LEN;
    let sender_proto = sender_hw + hw;
    let target_hw = sender_proto + proto;
    let target_proto = target_hw + hw;

    let headers = vec![
        (key::HARDWARE_TYPE, reader.bytes(layout::HARDWARE_TYPE_RANGE)?),
        (key::PROTOCOL_TYPE, reader.bytes(layout::PROTOCOL_TYPE_RANGE)?),
        (
            key::HARDWARE_LEN,
            reader.bytes(layout::HARDWARE_LEN_OFFSET..layout::HARDWARE_LEN_OFFSET + 1)?,
        ),
        (
            key::PROTOCOL_LEN,
            reader.bytes(layout::PROTOCOL_LEN_OFFSET..layout::PROTOCOL_LEN_OFFSET + 1)?,
        ),
        (key::OPERATION, reader.bytes(layout::OPERATION_RANGE)?),
        (key::SENDER_HARDWARE_ADDRESS, reader.bytes(sender_hw..sender_proto)?),
        (key::SENDER_PROTOCOL_ADDRESS, reader.bytes(sender_proto..target_hw)?),
        (key::TARGET_HARDWARE_ADDRESS, reader.bytes(target_hw..target_proto)?),
        (key::TARGET_PROTOCOL_ADDRESS, reader.bytes(target_proto..body_len)?),
    ];
    let payload = reader.rest(body_len)?;
    Ok(Pdu::new(Protocol::Arp, headers, payload))
}

#[cfg(test)]
mod tests {
    use super::parse_arp;
    use crate::decode::DecodeError;
    use crate::pdu::{Header, Protocol};
    use crate::protocols::arp::key;

    fn packet(hardware_len: u8, protocol_len: u8) -> Vec<u8> {
        let body = 8 + 2 * hardware_len as usize + 2 * protocol_len as usize;
        let mut packet = vec![0u8; body];
        packet[..8].copy_from_slice(&[0x00, 0x01, 0x08, 0x00, hardware_len, protocol_len, 0x00, 0x01]);
        packet
    }

    #[test]
    fn parse_standard_ethernet_ipv4() {
        let packet = packet(6, 4);
        assert_eq!(packet.len(), 28);
        let pdu = parse_arp(&packet, 0..packet.len()).unwrap();
        assert_eq!(pdu.protocol(), Protocol::Arp);
        assert_eq!(pdu.headers().len(), 9);
        assert_eq!(pdu.header(key::SENDER_HARDWARE_ADDRESS), Some(Header::bytes(8, 6)));
        assert_eq!(pdu.header(key::SENDER_PROTOCOL_ADDRESS), Some(Header::bytes(14, 4)));
        assert_eq!(pdu.header(key::TARGET_HARDWARE_ADDRESS), Some(Header::bytes(18, 6)));
        assert_eq!(pdu.header(key::TARGET_PROTOCOL_ADDRESS), Some(Header::bytes(24, 4)));
        assert!(pdu.payload().is_empty());
    }

    #[test]
    fn parse_short_packet() {
        let packet = packet(6, 4);
        let err = parse_arp(&packet[..27], 0..27).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedFrame {
                protocol: Protocol::Arp,
                needed: 28,
                actual: 27,
            }
        );
    }

    #[test]
    fn parse_short_fixed_part() {
        let err = parse_arp(&[0, 1, 8, 0, 6], 0..5).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedFrame { needed: 8, .. }));
    }

    #[test]
    fn parse_variable_lengths() {
        let packet = packet(8, 16);
        assert_eq!(packet.len(), 56);
        let pdu = parse_arp(&packet, 0..packet.len()).unwrap();
        assert_eq!(pdu.header(key::SENDER_HARDWARE_ADDRESS), Some(Header::bytes(8, 8)));
        assert_eq!(pdu.header(key::SENDER_PROTOCOL_ADDRESS), Some(Header::bytes(16, 16)));
        assert_eq!(pdu.header(key::TARGET_PROTOCOL_ADDRESS), Some(Header::bytes(40, 16)));
    }

    #[test]
    fn trailing_padding_is_payload() {
        let mut packet = packet(6, 4);
        packet.extend_from_slice(&[0u8; 18]);
        let pdu = parse_arp(&packet, 0..packet.len()).unwrap();
        assert_eq!(pdu.payload(), Header::bytes(28, 18));
    }

    #[test]
    fn region_offsets_are_absolute() {
        let mut frame = vec![0xeeu8; 14];
        frame.extend_from_slice(&packet(6, 4));
        let pdu = parse_arp(&frame, 14..frame.len()).unwrap();
        assert_eq!(pdu.header(key::HARDWARE_TYPE), Some(Header::bytes(14, 2)));
        assert_eq!(pdu.header(key::TARGET_PROTOCOL_ADDRESS), Some(Header::bytes(38, 4)));
    }
}
