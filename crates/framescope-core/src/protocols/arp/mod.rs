//! ARP decoding.
//!
//! The fixed part carries the hardware and protocol address lengths, which
//! size the four variable-length address fields that follow. Addresses are
//! rendered only for Ethernet hardware and IPv4 protocol addressing; anything
//! else is reported as unsupported. ARP never chains to another layer.

pub mod layout;
pub mod parser;
pub mod render;

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};
use crate::protocols::{FieldError, HeaderDecoder};

pub mod key {
    use crate::pdu::HeaderKey;

    pub const HARDWARE_TYPE: HeaderKey = HeaderKey(0);
    pub const PROTOCOL_TYPE: HeaderKey = HeaderKey(1);
    pub const HARDWARE_LEN: HeaderKey = HeaderKey(2);
    pub const PROTOCOL_LEN: HeaderKey = HeaderKey(3);
    pub const OPERATION: HeaderKey = HeaderKey(4);
    pub const SENDER_HARDWARE_ADDRESS: HeaderKey = HeaderKey(5);
    pub const SENDER_PROTOCOL_ADDRESS: HeaderKey = HeaderKey(6);
    pub const TARGET_HARDWARE_ADDRESS: HeaderKey = HeaderKey(7);
    pub const TARGET_PROTOCOL_ADDRESS: HeaderKey = HeaderKey(8);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArpDecoder;

impl HeaderDecoder for ArpDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Arp
    }

    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
        parser::parse_arp(frame, region)
    }

    fn next_protocol(&self, _pdu: &PduView<'_>) -> Protocol {
        Protocol::Unknown
    }

    fn significant_headers(&self, _pdu: &PduView<'_>) -> Vec<HeaderKey> {
        vec![
            key::OPERATION,
            key::SENDER_PROTOCOL_ADDRESS,
            key::TARGET_PROTOCOL_ADDRESS,
        ]
    }

    fn endpoints(&self) -> Option<(HeaderKey, HeaderKey)> {
        Some((key::SENDER_PROTOCOL_ADDRESS, key::TARGET_PROTOCOL_ADDRESS))
    }

    fn header_name(&self, key: HeaderKey) -> &'static str {
        render::header_name(key)
    }

    fn try_render(&self, key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
        render::render(key, pdu)
    }

    fn breakdown(&self, pdu: &PduView<'_>) -> Vec<Breakdown> {
        render::breakdown(self, pdu)
    }
}
