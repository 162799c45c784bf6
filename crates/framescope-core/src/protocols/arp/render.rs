use super::{ArpDecoder, key, layout};
use crate::breakdown::Breakdown;
use crate::pdu::{HeaderKey, PduView, Protocol};
use crate::protocols::FieldError;
use crate::protocols::common::format;
use crate::protocols::ethernet;

pub fn header_name(key: HeaderKey) -> &'static str {
    match key {
        key::HARDWARE_TYPE => "Hardware Type",
        key::PROTOCOL_TYPE => "Protocol Type",
        key::HARDWARE_LEN => "Hardware Length",
        key::PROTOCOL_LEN => "Protocol Length",
        key::OPERATION => "Operation",
        key::SENDER_HARDWARE_ADDRESS => "Sender Hardware Address",
        key::SENDER_PROTOCOL_ADDRESS => "Sender Protocol Address",
        key::TARGET_HARDWARE_ADDRESS => "Target Hardware Address",
        key::TARGET_PROTOCOL_ADDRESS => "Target Protocol Address",
        _ => "Unknown",
    }
}

/// IANA hardware type names.
pub fn hardware_type_name(htype: u16) -> Option<&'static str> {
    let name = match htype {
        1 => "Ethernet (10Mb)",
        2 => "Experimental Ethernet (3Mb)",
        3 => "Amateur Radio AX.25",
        4 => "Proteon ProNET Token Ring",
        5 => "Chaos",
        6 => "IEEE 802 Networks",
        7 => "ARCNET",
        8 => "Hyperchannel",
        9 => "Lanstar",
        10 => "Autonet Short Address",
        11 => "LocalTalk",
        12 => "LocalNet (IBM PCNet or SYTEK LocalNET)",
        13 => "Ultra link",
        14 => "SMDS",
        15 => "Frame Relay",
        16 => "Asynchronous Transmission Mode (ATM)",
        17 => "HDLC",
        18 => "Fibre Channel",
        19 => "Asynchronous Transmission Mode (ATM) 2",
        20 => "Serial Line",
        21 => "Asynchronous Transmission Mode (ATM) 3",
        22 => "MIL-STD-188-220",
        23 => "Metricom",
        24 => "IEEE 1394.1995",
        25 => "MAPOS",
        26 => "Twinaxial",
        27 => "EUI-64",
        28 => "HIPARP",
        29 => "IP and ARP over ISO 7816-3",
        30 => "ARPSec",
        31 => "IPsec tunnel",
        32 => "InfiniBand (TM)",
        33 => "TIA-102 Project 25 Common Air Interface (CAI)",
        34 => "Wiegand Interface",
        35 => "Pure IP",
        36 => "HW_EXP1",
        37 => "HFI",
        _ => return None,
    };
    Some(name)
}

pub fn operation_name(opcode: u16) -> Option<&'static str> {
    let name = match opcode {
        1 => "ARP Request",
        2 => "ARP Reply",
        3 => "RARP Request",
        4 => "RARP Reply",
        5 => "DRARP Request",
        6 => "DRARP Reply",
        7 => "DRARP error",
        8 => "InARP Request",
        9 => "InARP Reply",
        _ => return None,
    };
    Some(name)
}

fn hardware_address(field: &'static str, value: &[u8], pdu: &PduView<'_>) -> Result<String, FieldError> {
    let htype = pdu.uint(key::HARDWARE_TYPE).unwrap_or_default();
    if htype != u64::from(layout::HTYPE_ETHERNET) || value.len() != layout::MAC_LEN {
        return Err(FieldError::Unsupported {
            field,
            reason: "Non-Ethernet hardware addresses are not supported".to_string(),
        });
    }
    Ok(format::mac(value))
}

fn protocol_address(field: &'static str, value: &[u8], pdu: &PduView<'_>) -> Result<String, FieldError> {
    let ptype = pdu.uint(key::PROTOCOL_TYPE).unwrap_or_default() as u16;
    let unsupported = || FieldError::Unsupported {
        field,
        reason: "Non-IPv4 protocol addresses are not supported".to_string(),
    };
    if ethernet::protocol_from_ether_type(ptype) != Protocol::Ipv4 || value.len() != layout::IPV4_LEN {
        return Err(unsupported());
    }
    format::ipv4(value).ok_or_else(unsupported)
}

pub fn render(key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
    let field = header_name(key);
    let value = pdu.value(key).ok_or(FieldError::Absent { field })?;
    let number = pdu.uint(key).unwrap_or_default();
    match key {
        key::HARDWARE_TYPE => Ok(hardware_type_name(number as u16)
            .map(str::to_string)
            .unwrap_or_else(|| number.to_string())),
        key::PROTOCOL_TYPE => Ok(ethernet::render::ether_type_label(number as u16)),
        key::HARDWARE_LEN | key::PROTOCOL_LEN => Ok(number.to_string()),
        key::OPERATION => Ok(operation_name(number as u16)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Unknown ({number})"))),
        key::SENDER_HARDWARE_ADDRESS | key::TARGET_HARDWARE_ADDRESS => {
            hardware_address(field, &value, pdu)
        }
        key::SENDER_PROTOCOL_ADDRESS | key::TARGET_PROTOCOL_ADDRESS => {
            protocol_address(field, &value, pdu)
        }
        _ => Err(FieldError::Absent { field }),
    }
}

fn operation_description(pdu: &PduView<'_>) -> Option<String> {
    match pdu.uint(key::OPERATION)? as u16 {
        layout::OP_REQUEST => {
            let target = render(key::TARGET_PROTOCOL_ADDRESS, pdu).ok()?;
            Some(format!("Who has the address {target}?"))
        }
        layout::OP_REPLY => {
            let sender = render(key::SENDER_PROTOCOL_ADDRESS, pdu).ok()?;
            Some(format!("I'm the one who has the address {sender}"))
        }
        _ => None,
    }
}

pub fn breakdown(decoder: &ArpDecoder, pdu: &PduView<'_>) -> Vec<Breakdown> {
    let mut operation = Breakdown::field(decoder, key::OPERATION, pdu);
    if let Some(description) = operation_description(pdu) {
        operation = operation.with_description(description);
    }
    vec![
        Breakdown::field(decoder, key::HARDWARE_TYPE, pdu),
        Breakdown::field(decoder, key::PROTOCOL_TYPE, pdu),
        Breakdown::field(decoder, key::HARDWARE_LEN, pdu),
        Breakdown::field(decoder, key::PROTOCOL_LEN, pdu),
        operation,
        Breakdown::field(decoder, key::SENDER_HARDWARE_ADDRESS, pdu),
        Breakdown::field(decoder, key::SENDER_PROTOCOL_ADDRESS, pdu),
        Breakdown::field(decoder, key::TARGET_HARDWARE_ADDRESS, pdu),
        Breakdown::field(decoder, key::TARGET_PROTOCOL_ADDRESS, pdu),
    ]
}

#[cfg(test)]
mod tests {
    use super::{hardware_type_name, operation_name};
    use crate::decode::decode_frame;
    use crate::pdu::Protocol;
    use crate::protocols::arp::key;

    fn arp_frame(htype: u16, ptype: u16, opcode: u16) -> Vec<u8> {
        let mut frame = vec![0xff; 6];
        frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend_from_slice(&[0x08, 0x06]);
        frame.extend_from_slice(&htype.to_be_bytes());
        frame.extend_from_slice(&ptype.to_be_bytes());
        frame.extend_from_slice(&[6, 4]);
        frame.extend_from_slice(&opcode.to_be_bytes());
        frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        frame.extend_from_slice(&[192, 168, 1, 1]);
        frame.extend_from_slice(&[0x00; 6]);
        frame.extend_from_slice(&[192, 168, 1, 20]);
        frame
    }

    #[test]
    fn render_request() {
        let frame = arp_frame(1, 0x0800, 1);
        let chain = decode_frame(&frame).unwrap();
        assert_eq!(chain.protocols(), vec![Protocol::Ethernet, Protocol::Arp]);
        let arp = chain.last().unwrap();
        assert_eq!(arp.render(key::HARDWARE_TYPE), "Ethernet (10Mb)");
        assert_eq!(arp.render(key::PROTOCOL_TYPE), "IPv4");
        assert_eq!(arp.render(key::HARDWARE_LEN), "6");
        assert_eq!(arp.render(key::OPERATION), "ARP Request");
        assert_eq!(arp.render(key::SENDER_HARDWARE_ADDRESS), "02:00:00:00:00:01");
        assert_eq!(arp.render(key::SENDER_PROTOCOL_ADDRESS), "192.168.1.1");
        assert_eq!(arp.render(key::TARGET_PROTOCOL_ADDRESS), "192.168.1.20");
    }

    #[test]
    fn request_and_reply_descriptions() {
        let frame = arp_frame(1, 0x0800, 1);
        let chain = decode_frame(&frame).unwrap();
        let rows = chain.last().unwrap().breakdown();
        assert_eq!(rows.len(), 9);
        assert_eq!(rows[4].name, "Operation");
        assert_eq!(
            rows[4].description.as_deref(),
            Some("Who has the address 192.168.1.20?")
        );

        let frame = arp_frame(1, 0x0800, 2);
        let chain = decode_frame(&frame).unwrap();
        let rows = chain.last().unwrap().breakdown();
        assert_eq!(
            rows[4].description.as_deref(),
            Some("I'm the one who has the address 192.168.1.1")
        );
    }

    #[test]
    fn unsupported_addressing_is_explained() {
        let frame = arp_frame(6, 0x0800, 1);
        let chain = decode_frame(&frame).unwrap();
        let arp = chain.last().unwrap();
        assert_eq!(arp.render(key::HARDWARE_TYPE), "IEEE 802 Networks");
        assert_eq!(
            arp.render(key::SENDER_HARDWARE_ADDRESS),
            "Non-Ethernet hardware addresses are not supported"
        );
        assert_eq!(arp.render(key::SENDER_PROTOCOL_ADDRESS), "192.168.1.1");

        let frame = arp_frame(1, 0x86dd, 1);
        let chain = decode_frame(&frame).unwrap();
        let arp = chain.last().unwrap();
        assert_eq!(arp.render(key::PROTOCOL_TYPE), "IPv6");
        assert_eq!(
            arp.render(key::TARGET_PROTOCOL_ADDRESS),
            "Non-IPv4 protocol addresses are not supported"
        );
    }

    #[test]
    fn no_description_without_ipv4_addresses() {
        for opcode in [1, 2] {
            let frame = arp_frame(1, 0x86dd, opcode);
            let chain = decode_frame(&frame).unwrap();
            let rows = chain.last().unwrap().breakdown();
            assert_eq!(rows[4].name, "Operation");
            assert_eq!(rows[4].description, None);
        }
    }

    #[test]
    fn name_tables() {
        assert_eq!(hardware_type_name(37), Some("HFI"));
        assert_eq!(hardware_type_name(38), None);
        assert_eq!(operation_name(9), Some("InARP Reply"));
        assert_eq!(operation_name(0), None);
    }
}
