//! Ethernet II decoding.
//!
//! The header is a fixed 14 bytes: destination MAC, source MAC and the
//! etherType selecting the next layer. Everything after it is payload.

pub mod layout;
pub mod parser;
pub mod render;

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};
use crate::protocols::{FieldError, HeaderDecoder};

pub use parser::protocol_from_ether_type;

pub mod key {
    use crate::pdu::HeaderKey;

    pub const DESTINATION: HeaderKey = HeaderKey(0);
    pub const SOURCE: HeaderKey = HeaderKey(1);
    pub const ETHER_TYPE: HeaderKey = HeaderKey(2);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EthernetDecoder;

impl HeaderDecoder for EthernetDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Ethernet
    }

    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
        parser::parse_ethernet(frame, region)
    }

    fn next_protocol(&self, pdu: &PduView<'_>) -> Protocol {
        parser::next_protocol(pdu)
    }

    fn significant_headers(&self, _pdu: &PduView<'_>) -> Vec<HeaderKey> {
        vec![key::DESTINATION, key::SOURCE, key::ETHER_TYPE]
    }

    fn endpoints(&self) -> Option<(HeaderKey, HeaderKey)> {
        Some((key::SOURCE, key::DESTINATION))
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
