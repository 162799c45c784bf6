use time::{Duration, Time};

use super::layout::{self, MessageLayout};
use super::{IcmpDecoder, key, message_layout};
use crate::breakdown::Breakdown;
use crate::pdu::{HeaderKey, PduView};
use crate::protocols::common::format;
use crate::protocols::ipv4::Ipv4Decoder;
use crate::protocols::{FieldError, HeaderDecoder};

pub fn header_name(key: HeaderKey) -> &'static str {
    match key {
        key::TYPE => "Type",
        key::CODE => "Code",
        key::CHECKSUM => "Checksum",
        key::IDENTIFIER => "Identifier",
        key::SEQUENCE_NUMBER => "Sequence Number",
        key::DATA => "Data",
        key::ORIGINATE_TIMESTAMP => "Originate Timestamp",
        key::RECEIVE_TIMESTAMP => "Receive Timestamp",
        key::TRANSMIT_TIMESTAMP => "Transmit Timestamp",
        key::POINTER => "Pointer",
        key::UNUSED => "Unused",
        key::ORIGINAL_DATAGRAM => "Original Datagram",
        _ => "Unknown",
    }
}

pub fn type_name(message_type: u8) -> Option<&'static str> {
    let name = match message_type {
        layout::TYPE_ECHO_REPLY => "Echo Reply",
        layout::TYPE_DESTINATION_UNREACHABLE => "Destination Unreachable",
        layout::TYPE_SOURCE_QUENCH => "Source Quench",
        layout::TYPE_REDIRECT => "Redirect Message",
        layout::TYPE_ECHO_REQUEST => "Echo Request",
        layout::TYPE_TIME_EXCEEDED => "Time Exceeded",
        layout::TYPE_PARAMETER_PROBLEM => "Parameter Problem",
        layout::TYPE_TIMESTAMP => "Timestamp",
        layout::TYPE_TIMESTAMP_REPLY => "Timestamp Reply",
        _ => return None,
    };
    Some(name)
}

/// Name of a code for the message types that define one.
pub fn code_name(message_type: u8, code: u8) -> Option<&'static str> {
    let name = match (message_type, code) {
        (layout::TYPE_DESTINATION_UNREACHABLE, code) => match code {
            0 => "Net Unreachable",
            1 => "Host Unreachable",
            2 => "Protocol Unreachable",
            3 => "Port Unreachable",
            4 => "Fragmentation Needed and Don't Fragment was Set",
            5 => "Source Route Failed",
            6 => "Destination Network Unknown",
            7 => "Destination Host Unknown",
            8 => "Source Host Isolated",
            9 => "Destination Network Administratively Prohibited",
            10 => "Destination Host Administratively Prohibited",
            11 => "Destination Network Unreachable for Type of Service",
            12 => "Destination Host Unreachable for Type of Service",
            13 => "Communication Administratively Prohibited",
            14 => "Host Precedence Violation",
            15 => "Precedence Cutoff in Effect",
            _ => return None,
        },
        (layout::TYPE_REDIRECT, code) => match code {
            0 => "Redirect Datagram for the Network",
            1 => "Redirect Datagram for the Host",
            2 => "Redirect Datagram for the Type of Service and Network",
            3 => "Redirect Datagram for the Type of Service and Host",
            _ => return None,
        },
        (layout::TYPE_TIME_EXCEEDED, code) => match code {
            0 => "Time to Live Exceeded in Transit",
            1 => "Fragment Reassembly Time Exceeded",
            _ => return None,
        },
        (layout::TYPE_PARAMETER_PROBLEM, code) => match code {
            0 => "Pointer Indicates the Error",
            1 => "Missing a Required Option",
            2 => "Bad Length",
            _ => return None,
        },
        _ => return None,
    };
    Some(name)
}

/// Milliseconds since midnight UT as `HH:MM:SS.mmm UTC`.
///
/// # Examples
/// ```
/// use framescope_core::protocols::icmp::render::format_timestamp;
///
/// assert_eq!(format_timestamp(45_296_789), "12:34:56.789 UTC");
/// assert_eq!(format_timestamp(0x8000_0001), "non-standard (0x80000001)");
/// ```
pub fn format_timestamp(millis: u32) -> String {
    if millis & layout::NON_STANDARD_TIMESTAMP != 0 || millis >= layout::MILLIS_PER_DAY {
        return format!("non-standard (0x{millis:08x})");
    }
    let time = Time::MIDNIGHT + Duration::milliseconds(i64::from(millis));
    format!(
        "{:02}:{:02}:{:02}.{:03} UTC",
        time.hour(),
        time.minute(),
        time.second(),
        time.millisecond()
    )
}

pub fn render(key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
    let field = header_name(key);
    let value = pdu.value(key).ok_or(FieldError::Absent { field })?;
    let number = pdu.uint(key).unwrap_or_default();
    match key {
        key::TYPE => Ok(type_name(number as u8)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown ({number})"))),
        key::CODE => {
            let message_type = pdu.uint(key::TYPE).unwrap_or_default() as u8;
            Ok(code_name(message_type, number as u8)
                .map(str::to_string)
                .unwrap_or_else(|| number.to_string()))
        }
        key::CHECKSUM | key::IDENTIFIER | key::SEQUENCE_NUMBER => Ok(format!("0x{number:04x}")),
        key::ORIGINATE_TIMESTAMP | key::RECEIVE_TIMESTAMP | key::TRANSMIT_TIMESTAMP => {
            Ok(format_timestamp(number as u32))
        }
        key::POINTER => Ok(number.to_string()),
        key::DATA | key::UNUSED | key::ORIGINAL_DATAGRAM => Ok(format::hex(&value)),
        _ => Err(FieldError::Absent { field }),
    }
}

/// The embedded datagram decoded as IPv4, when it holds a full header.
fn original_datagram_rows(pdu: &PduView<'_>) -> Vec<Breakdown> {
    let Some(span) = pdu.span(key::ORIGINAL_DATAGRAM) else {
        return Vec::new();
    };
    let decoder = Ipv4Decoder;
    match decoder.parse(pdu.frame(), span.byte_range()) {
        Ok(inner) => decoder.breakdown(&PduView::detached(pdu.frame(), &inner)),
        Err(_) => Vec::new(),
    }
}

pub fn breakdown(decoder: &IcmpDecoder, pdu: &PduView<'_>) -> Vec<Breakdown> {
    let message_type = pdu.uint(key::TYPE).unwrap_or_default() as u8;
    let code = pdu.uint(key::CODE).unwrap_or_default();
    let mut code_row = Breakdown::field(decoder, key::CODE, pdu);
    if code_name(message_type, code as u8).is_some() {
        code_row = code_row.with_description(code.to_string());
    }
    let mut rows = vec![
        Breakdown::field(decoder, key::TYPE, pdu),
        code_row,
        Breakdown::field(decoder, key::CHECKSUM, pdu),
    ];
    let body: &[HeaderKey] = match message_layout(pdu) {
        MessageLayout::Echo => &[key::IDENTIFIER, key::SEQUENCE_NUMBER, key::DATA],
        MessageLayout::Timestamp => &[
            key::IDENTIFIER,
            key::SEQUENCE_NUMBER,
            key::ORIGINATE_TIMESTAMP,
            key::RECEIVE_TIMESTAMP,
            key::TRANSMIT_TIMESTAMP,
        ],
        MessageLayout::ParameterProblem => &[key::POINTER, key::UNUSED],
        MessageLayout::Error => &[key::UNUSED],
        MessageLayout::Other => &[],
    };
    rows.extend(body.iter().map(|key| Breakdown::field(decoder, *key, pdu)));

    if pdu.span(key::ORIGINAL_DATAGRAM).is_some() {
        rows.push(
            Breakdown::field(decoder, key::ORIGINAL_DATAGRAM, pdu)
                .with_children(original_datagram_rows(pdu)),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{code_name, format_timestamp, type_name};
    use crate::decode::decode_frame;
    use crate::pdu::Protocol;
    use crate::protocols::icmp::key;

    fn frame(icmp: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xff; 6];
        frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend_from_slice(&[0x08, 0x00]);
        let total = (20 + icmp.len()) as u16;
        frame.extend_from_slice(&[0x45, 0x00]);
        frame.extend_from_slice(&total.to_be_bytes());
        frame.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 64, 1, 0x00, 0x00]);
        frame.extend_from_slice(&[10, 0, 0, 1, 10, 0, 0, 2]);
        frame.extend_from_slice(icmp);
        frame
    }

    #[test]
    fn render_echo_request() {
        let frame = frame(&[8, 0, 0xf7, 0xfd, 0x12, 0x34, 0x00, 0x07, 0xca, 0xfe]);
        let chain = decode_frame(&frame).unwrap();
        let icmp = chain.last().unwrap();
        assert_eq!(icmp.protocol(), Protocol::Icmp);
        assert_eq!(icmp.render(key::TYPE), "Echo Request");
        assert_eq!(icmp.render(key::CODE), "0");
        assert_eq!(icmp.render(key::CHECKSUM), "0xf7fd");
        assert_eq!(icmp.render(key::IDENTIFIER), "0x1234");
        assert_eq!(icmp.render(key::SEQUENCE_NUMBER), "0x0007");
        assert_eq!(icmp.render(key::DATA), "cafe");
        let rows = icmp.breakdown();
        assert_eq!(rows[1].name, "Code");
        assert_eq!(rows[1].value, "0");
        assert_eq!(rows[1].description, None);
        assert_eq!(
            icmp.significant_headers(),
            vec![key::TYPE, key::CODE, key::IDENTIFIER]
        );
    }

    #[test]
    fn render_timestamps() {
        let mut message = vec![13, 0, 0, 0, 0, 1, 0, 2];
        message.extend_from_slice(&45_296_789u32.to_be_bytes());
        message.extend_from_slice(&0u32.to_be_bytes());
        message.extend_from_slice(&0x8000_0000u32.to_be_bytes());
        let frame = frame(&message);
        let chain = decode_frame(&frame).unwrap();
        let icmp = chain.last().unwrap();
        assert_eq!(icmp.render(key::TYPE), "Timestamp");
        assert_eq!(icmp.render(key::ORIGINATE_TIMESTAMP), "12:34:56.789 UTC");
        assert_eq!(icmp.render(key::RECEIVE_TIMESTAMP), "00:00:00.000 UTC");
        assert_eq!(
            icmp.render(key::TRANSMIT_TIMESTAMP),
            "non-standard (0x80000000)"
        );
        assert_eq!(icmp.breakdown().len(), 8);
    }

    #[test]
    fn timestamp_past_midnight_is_non_standard() {
        assert_eq!(format_timestamp(86_399_999), "23:59:59.999 UTC");
        assert_eq!(format_timestamp(86_400_000), "non-standard (0x05265c00)");
    }

    #[test]
    fn render_destination_unreachable_with_datagram() {
        let mut message = vec![3, 3, 0, 0, 0, 0, 0, 0];
        message.extend_from_slice(&[0x45, 0x00, 0x00, 0x1c, 0, 0, 0, 0, 64, 17, 0, 0]);
        message.extend_from_slice(&[10, 0, 0, 2, 10, 0, 0, 1]);
        message.extend_from_slice(&[0x30, 0x39, 0x00, 0x35, 0x00, 0x08, 0x00, 0x00]);
        let frame = frame(&message);
        let chain = decode_frame(&frame).unwrap();
        let icmp = chain.last().unwrap();
        assert_eq!(icmp.render(key::CODE), "Port Unreachable");
        assert_eq!(icmp.significant_headers(), vec![key::TYPE, key::CODE]);

        let rows = icmp.breakdown();
        assert_eq!(rows[1].value, "Port Unreachable");
        assert_eq!(rows[1].description.as_deref(), Some("3"));
        let datagram = rows.last().unwrap();
        assert_eq!(datagram.name, "Original Datagram");
        let inner: Vec<_> = datagram
            .children
            .iter()
            .map(|row| (row.name.as_str(), row.value.as_str()))
            .collect();
        assert!(inner.contains(&("Protocol", "UDP")));
        assert!(inner.contains(&("Source", "10.0.0.2")));
    }

    #[test]
    fn short_original_datagram_has_no_children() {
        let frame = frame(&[11, 0, 0, 0, 0, 0, 0, 0, 0x45, 0x00]);
        let chain = decode_frame(&frame).unwrap();
        let rows = chain.last().unwrap().breakdown();
        let datagram = rows.last().unwrap();
        assert_eq!(datagram.value, "4500");
        assert!(datagram.children.is_empty());
    }

    #[test]
    fn parameter_problem_pointer() {
        let frame = frame(&[12, 0, 0, 0, 9, 0, 0, 0]);
        let chain = decode_frame(&frame).unwrap();
        let icmp = chain.last().unwrap();
        assert_eq!(icmp.render(key::POINTER), "9");
        assert_eq!(icmp.render(key::CODE), "Pointer Indicates the Error");
        assert_eq!(
            icmp.significant_headers(),
            vec![key::TYPE, key::CODE, key::POINTER]
        );
        assert_eq!(icmp.render(key::IDENTIFIER), "Identifier not present");
    }

    #[test]
    fn name_tables() {
        assert_eq!(type_name(0), Some("Echo Reply"));
        assert_eq!(type_name(9), None);
        assert_eq!(code_name(5, 1), Some("Redirect Datagram for the Host"));
        assert_eq!(code_name(11, 2), None);
        assert_eq!(code_name(8, 0), None);
    }
}
