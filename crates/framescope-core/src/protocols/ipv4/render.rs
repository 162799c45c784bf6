use super::{Ipv4Decoder, key, layout, parser};
use crate::breakdown::Breakdown;
use crate::pdu::{HeaderKey, PduView, Protocol};
use crate::protocols::FieldError;
use crate::protocols::common::format;

pub fn header_name(key: HeaderKey) -> &'static str {
    match key {
        key::SOURCE => "Source",
        key::DESTINATION => "Destination",
        key::VERSION => "Version",
        key::HEADER_LENGTH => "Header Length",
        key::DSCP => "Differentiated Services",
        key::ECN => "Explicit Congestion Notification",
        key::TOTAL_LENGTH => "Total Length",
        key::IDENTIFICATION => "Identification",
        key::FLAGS => "Flags",
        key::FRAGMENT_OFFSET => "Fragment Offset",
        key::TTL => "Time to Live",
        key::PROTOCOL => "Protocol",
        key::HEADER_CHECKSUM => "Header Checksum",
        key::OPTIONS => "Options",
        _ => "Unknown",
    }
}

pub fn dscp_name(dscp: u8) -> String {
    let name = match dscp {
        0 => "CS0",
        8 => "CS1",
        16 => "CS2",
        24 => "CS3",
        32 => "CS4",
        40 => "CS5",
        48 => "CS6",
        56 => "CS7",
        10 => "AF11",
        12 => "AF12",
        14 => "AF13",
        18 => "AF21",
        20 => "AF22",
        22 => "AF23",
        26 => "AF31",
        28 => "AF32",
        30 => "AF33",
        34 => "AF41",
        36 => "AF42",
        38 => "AF43",
        46 => "EF",
        _ => return format!("Unknown (DSCP {dscp})"),
    };
    name.to_string()
}

pub fn ecn_name(ecn: u8) -> &'static str {
    match ecn & 0b11 {
        0 => "Not-ECT",
        1 => "ECT(1)",
        2 => "ECT(2)",
        _ => "Congestion Experienced",
    }
}

fn protocol_label(number: u8) -> String {
    match parser::protocol_from_ip_number(number) {
        Protocol::Unknown => number.to_string(),
        protocol => protocol.short_name().to_string(),
    }
}

pub fn render(key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
    let field = header_name(key);
    let value = pdu.value(key).ok_or(FieldError::Absent { field })?;
    let number = pdu.uint(key).unwrap_or_default();
    match key {
        key::SOURCE | key::DESTINATION => format::ipv4(&value).ok_or(FieldError::Unsupported {
            field,
            reason: "Address is not four bytes long".to_string(),
        }),
        key::VERSION
        | key::HEADER_LENGTH
        | key::TOTAL_LENGTH
        | key::FRAGMENT_OFFSET
        | key::TTL => Ok(number.to_string()),
        key::DSCP => Ok(dscp_name(number as u8)),
        key::ECN => Ok(ecn_name(number as u8).to_string()),
        key::IDENTIFICATION => Ok(format!("0x{number:04x} ({number})")),
        key::FLAGS => Ok(format!("{number:03b}")),
        key::PROTOCOL => Ok(protocol_label(number as u8)),
        key::HEADER_CHECKSUM => Ok(format!("0x{number:04x}")),
        key::OPTIONS => Ok(format::hex(&value)),
        _ => Err(FieldError::Absent { field }),
    }
}

fn flag_rows(flags: u64) -> Vec<Breakdown> {
    [
        ("Reserved bit", layout::FLAG_RESERVED),
        ("Don't fragment", layout::FLAG_DONT_FRAGMENT),
        ("More fragments", layout::FLAG_MORE_FRAGMENTS),
    ]
    .into_iter()
    .map(|(name, mask)| Breakdown::new(name, format::flag(flags & mask != 0)))
    .collect()
}

pub fn breakdown(decoder: &Ipv4Decoder, pdu: &PduView<'_>) -> Vec<Breakdown> {
    let ihl = pdu.uint(key::HEADER_LENGTH).unwrap_or_default();
    let dscp = pdu.uint(key::DSCP).unwrap_or_default();
    let flags = pdu.uint(key::FLAGS).unwrap_or_default();
    let fragment_offset = pdu.uint(key::FRAGMENT_OFFSET).unwrap_or_default();
    let protocol = pdu.uint(key::PROTOCOL).unwrap_or_default();

    let mut rows = vec![
        Breakdown::field(decoder, key::VERSION, pdu),
        Breakdown::field(decoder, key::HEADER_LENGTH, pdu)
            .with_description(format!("{} bytes", ihl * 4)),
        Breakdown::field(decoder, key::DSCP, pdu).with_description(format!("DSCP {dscp}")),
        Breakdown::field(decoder, key::ECN, pdu),
        Breakdown::field(decoder, key::TOTAL_LENGTH, pdu),
        Breakdown::field(decoder, key::IDENTIFICATION, pdu),
        Breakdown::field(decoder, key::FLAGS, pdu).with_children(flag_rows(flags)),
        Breakdown::field(decoder, key::FRAGMENT_OFFSET, pdu)
            .with_description(format!("{} bytes", fragment_offset * 8)),
        Breakdown::field(decoder, key::TTL, pdu),
        Breakdown::field(decoder, key::PROTOCOL, pdu).with_description(protocol.to_string()),
        Breakdown::field(decoder, key::HEADER_CHECKSUM, pdu),
        Breakdown::field(decoder, key::SOURCE, pdu),
        Breakdown::field(decoder, key::DESTINATION, pdu),
    ];
    if pdu.span(key::OPTIONS).is_some() {
        rows.push(Breakdown::field(decoder, key::OPTIONS, pdu));
    }
    rows
}
