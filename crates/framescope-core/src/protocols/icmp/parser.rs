use std::ops::Range;

use super::key;
use super::layout::{self, MessageLayout};
use crate::decode::DecodeError;
use crate::pdu::{Pdu, Protocol};
use crate::protocols::common::reader::HeaderReader;

pub fn parse_icmp(frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
    let reader = HeaderReader::new(Protocol::Icmp, frame, region);
    reader.require_len(layout::PREFIX_LEN)?;

    let message_type = reader.read_u8(layout::TYPE_OFFSET)?;
    let message_layout = MessageLayout::for_type(message_type);
    reader.require_len(message_layout.min_len())?;

    let mut headers = vec![
        (
            key::TYPE,
            reader.bytes(layout::TYPE_OFFSET..layout::TYPE_OFFSET + 1)?,
        ),
        (
            key::CODE,
            reader.bytes(layout::CODE_OFFSET..layout::CODE_OFFSET + 1)?,
        ),
        (key::CHECKSUM, reader.bytes(layout::CHECKSUM_RANGE)?),
    ];

    let body_end = match message_layout {
        MessageLayout::Echo => {
            headers.push((key::IDENTIFIER, reader.bytes(layout::IDENTIFIER_RANGE)?));
            headers.push((key::SEQUENCE_NUMBER, reader.bytes(layout::SEQUENCE_RANGE)?));
            headers.push((key::DATA, reader.rest(layout::BODY_OFFSET)?));
            reader.len()
        }
        MessageLayout::Timestamp => {
            headers.push((key::IDENTIFIER, reader.bytes(layout::IDENTIFIER_RANGE)?));
            headers.push((key::SEQUENCE_NUMBER, reader.bytes(layout::SEQUENCE_RANGE)?));
            headers.push((key::ORIGINATE_TIMESTAMP, reader.bytes(layout::ORIGINATE_RANGE)?));
            headers.push((key::RECEIVE_TIMESTAMP, reader.bytes(layout::RECEIVE_RANGE)?));
            headers.push((key::TRANSMIT_TIMESTAMP, reader.bytes(layout::TRANSMIT_RANGE)?));
            layout::TRANSMIT_RANGE.end
        }
        MessageLayout::ParameterProblem => {
            headers.push((key::POINTER, reader.bytes(layout::POINTER_RANGE)?));
            headers.push((key::UNUSED, reader.bytes(layout::PARAMETER_UNUSED_RANGE)?));
            headers.push((key::ORIGINAL_DATAGRAM, reader.rest(layout::BODY_OFFSET)?));
            reader.len()
        }
        MessageLayout::Error => {
            headers.push((key::UNUSED, reader.bytes(layout::ERROR_UNUSED_RANGE)?));
            headers.push((key::ORIGINAL_DATAGRAM, reader.rest(layout::BODY_OFFSET)?));
            reader.len()
        }
        MessageLayout::Other => layout::PREFIX_LEN,
    };

    let payload = reader.rest(body_end)?;
    Ok(Pdu::new(Protocol::Icmp, headers, payload))
}

#[cfg(test)]
mod tests {
    use super::parse_icmp;
    use crate::decode::DecodeError;
    use crate::pdu::{Header, Protocol};
    use crate::protocols::icmp::key;

    fn icmp(message_type: u8, len: usize) -> Vec<u8> {
        let mut message = vec![0u8; len];
        message[0] = message_type;
        message
    }

    #[test]
    fn parse_echo_request() {
        let message = icmp(8, 12);
        let pdu = parse_icmp(&message, 0..message.len()).unwrap();
        assert_eq!(pdu.header(key::IDENTIFIER), Some(Header::bytes(4, 2)));
        assert_eq!(pdu.header(key::SEQUENCE_NUMBER), Some(Header::bytes(6, 2)));
        assert_eq!(pdu.header(key::DATA), Some(Header::bytes(8, 4)));
        assert!(pdu.payload().is_empty());
        assert_eq!(pdu.payload().offset(), 12);
    }

    #[test]
    fn parse_echo_without_data() {
        let message = icmp(0, 8);
        let pdu = parse_icmp(&message, 0..message.len()).unwrap();
        let data = pdu.header(key::DATA).unwrap();
        assert!(data.is_empty());
        assert_eq!(data.offset(), 8);
    }

    #[test]
    fn parse_timestamp_with_trailer() {
        let message = icmp(13, 24);
        let pdu = parse_icmp(&message, 0..message.len()).unwrap();
        assert_eq!(pdu.header(key::ORIGINATE_TIMESTAMP), Some(Header::bytes(8, 4)));
        assert_eq!(pdu.header(key::RECEIVE_TIMESTAMP), Some(Header::bytes(12, 4)));
        assert_eq!(pdu.header(key::TRANSMIT_TIMESTAMP), Some(Header::bytes(16, 4)));
        assert_eq!(pdu.payload(), Header::bytes(20, 4));
        assert_eq!(pdu.header(key::DATA), None);
    }

    #[test]
    fn parse_short_timestamp() {
        let message = icmp(14, 19);
        let err = parse_icmp(&message, 0..message.len()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::TruncatedFrame {
                protocol: Protocol::Icmp,
                needed: 20,
                actual: 19,
            }
        );
    }

    #[test]
    fn parse_parameter_problem() {
        let message = icmp(12, 36);
        let pdu = parse_icmp(&message, 0..message.len()).unwrap();
        assert_eq!(pdu.header(key::POINTER), Some(Header::bytes(4, 1)));
        assert_eq!(pdu.header(key::UNUSED), Some(Header::bytes(5, 3)));
        assert_eq!(pdu.header(key::ORIGINAL_DATAGRAM), Some(Header::bytes(8, 28)));
    }

    #[test]
    fn parse_error_messages() {
        for message_type in [3, 4, 5, 11] {
            let message = icmp(message_type, 8);
            let pdu = parse_icmp(&message, 0..message.len()).unwrap();
            assert_eq!(pdu.header(key::UNUSED), Some(Header::bytes(4, 4)));
            assert_eq!(pdu.header(key::ORIGINAL_DATAGRAM), Some(Header::bytes(8, 0)));
            assert!(parse_icmp(&message[..7], 0..7).is_err());
        }
    }

    #[test]
    fn parse_other_type_keeps_remainder_as_payload() {
        let message = icmp(42, 10);
        let pdu = parse_icmp(&message, 0..message.len()).unwrap();
        assert_eq!(pdu.headers().len(), 3);
        assert_eq!(pdu.payload(), Header::bytes(4, 6));
    }

    #[test]
    fn parse_short_prefix() {
        let err = parse_icmp(&[8, 0, 0], 0..3).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedFrame { needed: 4, actual: 3, .. }));
    }
}
