use std::ops::Range;

use super::key;
use super::layout;
use crate::decode::DecodeError;
use crate::pdu::{Pdu, PduView, Protocol};
use crate::protocols::common::reader::HeaderReader;
use crate::protocols::registry::chainable;

/// Decode an IPv4 header. The payload is everything after the header,
/// independent of the total length field.
pub fn parse_ipv4(frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
    let reader = HeaderReader::new(Protocol::Ipv4, frame, region);
    reader.require_len(layout::BASE_HEADER_LEN)?;

    let ihl = reader.read_bits(layout::IHL_BITS)? as u8;
    let header_len = layout::header_len(ihl);
    reader.require_len(header_len)?;

    let mut headers = vec![
        (key::VERSION, reader.bits(layout::VERSION_BITS)?),
        (key::HEADER_LENGTH, reader.bits(layout::IHL_BITS)?),
        (key::DSCP, reader.bits(layout::DSCP_BITS)?),
        (key::ECN, reader.bits(layout::ECN_BITS)?),
        (key::TOTAL_LENGTH, reader.bytes(layout::TOTAL_LENGTH_RANGE)?),
        (key::IDENTIFICATION, reader.bytes(layout::IDENTIFICATION_RANGE)?),
        (key::FLAGS, reader.bits(layout::FLAGS_BITS)?),
        (key::FRAGMENT_OFFSET, reader.bits(layout::FRAGMENT_OFFSET_BITS)?),
        (key::TTL, reader.bytes(layout::TTL_RANGE)?),
        (key::PROTOCOL, reader.bytes(layout::PROTOCOL_RANGE)?),
        (key::HEADER_CHECKSUM, reader.bytes(layout::CHECKSUM_RANGE)?),
        (key::SOURCE, reader.bytes(layout::SOURCE_RANGE)?),
        (key::DESTINATION, reader.bytes(layout::DESTINATION_RANGE)?),
    ];
    if header_len > layout::BASE_HEADER_LEN {
        headers.push((
            key::OPTIONS,
            reader.bytes(layout::BASE_HEADER_LEN..header_len)?,
        ));
    }
    let payload = reader.rest(header_len)?;
    Ok(Pdu::new(Protocol::Ipv4, headers, payload))
}

/// Protocol carried for an IP protocol number.
pub fn protocol_from_ip_number(number: u8) -> Protocol {
    match number {
        layout::IP_PROTO_ICMP => Protocol::Icmp,
        layout::IP_PROTO_TCP => Protocol::Tcp,
        layout::IP_PROTO_UDP => Protocol::Udp,
        _ => Protocol::Unknown,
    }
}

pub fn next_protocol(pdu: &PduView<'_>) -> Protocol {
    pdu.uint(key::PROTOCOL)
        .map(|number| chainable(protocol_from_ip_number(number as u8)))
        .unwrap_or(Protocol::Unknown)
}
