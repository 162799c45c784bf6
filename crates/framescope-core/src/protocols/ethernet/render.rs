use super::{EthernetDecoder, key, parser};
use crate::breakdown::Breakdown;
use crate::pdu::{HeaderKey, PduView, Protocol};
use crate::protocols::FieldError;
use crate::protocols::common::format;

pub fn header_name(key: HeaderKey) -> &'static str {
    match key {
        key::DESTINATION => "Destination",
        key::SOURCE => "Source",
        key::ETHER_TYPE => "Type",
        _ => "Unknown",
    }
}

/// Short protocol name for an etherType, or its hex value when unmapped.
pub fn ether_type_label(ether_type: u16) -> String {
    match parser::protocol_from_ether_type(ether_type) {
        Protocol::Unknown => format!("0x{ether_type:04x}"),
        protocol => protocol.short_name().to_string(),
    }
}

pub fn render(key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
    let field = header_name(key);
    let value = pdu.value(key).ok_or(FieldError::Absent { field })?;
    match key {
        key::DESTINATION | key::SOURCE => Ok(format::mac(&value)),
        key::ETHER_TYPE => {
            let ether_type = pdu.uint(key).unwrap_or_default() as u16;
            Ok(ether_type_label(ether_type))
        }
        _ => Err(FieldError::Absent { field }),
    }
}

pub fn breakdown(decoder: &EthernetDecoder, pdu: &PduView<'_>) -> Vec<Breakdown> {
    let ether_type = pdu.uint(key::ETHER_TYPE).unwrap_or_default();
    vec![
        Breakdown::field(decoder, key::DESTINATION, pdu),
        Breakdown::field(decoder, key::SOURCE, pdu),
        Breakdown::field(decoder, key::ETHER_TYPE, pdu)
            .with_description(format!("0x{ether_type:04x}")),
    ]
}
