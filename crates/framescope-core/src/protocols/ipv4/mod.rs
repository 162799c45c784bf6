//! IPv4 decoding.
//!
//! Sub-byte fields (version, IHL, DSCP, ECN, flags and fragment offset) are
//! bit-granular views, so every field of the base header is its own
//! non-overlapping header. Options are kept as one undecoded view.

pub mod layout;
pub mod parser;
pub mod render;

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};
use crate::protocols::{FieldError, HeaderDecoder};

pub use parser::protocol_from_ip_number;

pub mod key {
    use crate::pdu::HeaderKey;

    pub const SOURCE: HeaderKey = HeaderKey(0);
    pub const DESTINATION: HeaderKey = HeaderKey(1);
    pub const VERSION: HeaderKey = HeaderKey(2);
    pub const HEADER_LENGTH: HeaderKey = HeaderKey(3);
    pub const DSCP: HeaderKey = HeaderKey(4);
    pub const ECN: HeaderKey = HeaderKey(5);
    pub const TOTAL_LENGTH: HeaderKey = HeaderKey(6);
    pub const IDENTIFICATION: HeaderKey = HeaderKey(7);
    pub const FLAGS: HeaderKey = HeaderKey(8);
    pub const FRAGMENT_OFFSET: HeaderKey = HeaderKey(9);
    pub const TTL: HeaderKey = HeaderKey(10);
    pub const PROTOCOL: HeaderKey = HeaderKey(11);
    pub const HEADER_CHECKSUM: HeaderKey = HeaderKey(12);
    pub const OPTIONS: HeaderKey = HeaderKey(13);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ipv4Decoder;

impl HeaderDecoder for Ipv4Decoder {
    fn protocol(&self) -> Protocol {
        Protocol::Ipv4
    }

    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
        parser::parse_ipv4(frame, region)
    }

    fn next_protocol(&self, pdu: &PduView<'_>) -> Protocol {
        parser::next_protocol(pdu)
    }

    fn significant_headers(&self, _pdu: &PduView<'_>) -> Vec<HeaderKey> {
        vec![key::SOURCE, key::DESTINATION, key::PROTOCOL]
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
