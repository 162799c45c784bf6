//! ICMP decoding.
//!
//! A 4-byte prefix (type, code, checksum) is followed by a body whose layout
//! depends on the message type; see [`layout::MessageLayout`]. Error messages
//! carry the start of the offending datagram, which is kept as one view and
//! decoded as IPv4 only for the breakdown. ICMP never chains further.

pub mod layout;
pub mod parser;
pub mod render;

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};
use crate::protocols::{FieldError, HeaderDecoder};

use layout::MessageLayout;

pub mod key {
    use crate::pdu::HeaderKey;

    pub const TYPE: HeaderKey = HeaderKey(0);
    pub const CODE: HeaderKey = HeaderKey(1);
    pub const CHECKSUM: HeaderKey = HeaderKey(2);
    pub const IDENTIFIER: HeaderKey = HeaderKey(3);
    pub const SEQUENCE_NUMBER: HeaderKey = HeaderKey(4);
    pub const DATA: HeaderKey = HeaderKey(5);
    pub const ORIGINATE_TIMESTAMP: HeaderKey = HeaderKey(6);
    pub const RECEIVE_TIMESTAMP: HeaderKey = HeaderKey(7);
    pub const TRANSMIT_TIMESTAMP: HeaderKey = HeaderKey(8);
    pub const POINTER: HeaderKey = HeaderKey(9);
    pub const UNUSED: HeaderKey = HeaderKey(10);
    pub const ORIGINAL_DATAGRAM: HeaderKey = HeaderKey(11);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IcmpDecoder;

pub(crate) fn message_layout(pdu: &PduView<'_>) -> MessageLayout {
    MessageLayout::for_type(pdu.uint(key::TYPE).unwrap_or_default() as u8)
}

impl HeaderDecoder for IcmpDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Icmp
    }

    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
        parser::parse_icmp(frame, region)
    }

    fn next_protocol(&self, _pdu: &PduView<'_>) -> Protocol {
        Protocol::Unknown
    }

    fn significant_headers(&self, pdu: &PduView<'_>) -> Vec<HeaderKey> {
        match message_layout(pdu) {
            MessageLayout::Echo | MessageLayout::Timestamp => {
                vec![key::TYPE, key::CODE, key::IDENTIFIER]
            }
            MessageLayout::ParameterProblem => vec![key::TYPE, key::CODE, key::POINTER],
            MessageLayout::Error | MessageLayout::Other => vec![key::TYPE, key::CODE],
        }
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
