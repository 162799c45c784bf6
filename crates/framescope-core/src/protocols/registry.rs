//! Protocol to decoder dispatch.

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};
use crate::protocols::arp::ArpDecoder;
use crate::protocols::ethernet::EthernetDecoder;
use crate::protocols::icmp::IcmpDecoder;
use crate::protocols::ipv4::Ipv4Decoder;
use crate::protocols::{FieldError, HeaderDecoder};

/// Every protocol the crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Ethernet(EthernetDecoder),
    Arp(ArpDecoder),
    Ipv4(Ipv4Decoder),
    Icmp(IcmpDecoder),
}

/// Decoder for `protocol`, or `None` when the protocol is only named.
pub fn decoder_for(protocol: Protocol) -> Option<Decoder> {
    match protocol {
        Protocol::Ethernet => Some(Decoder::Ethernet(EthernetDecoder)),
        Protocol::Arp => Some(Decoder::Arp(ArpDecoder)),
        Protocol::Ipv4 => Some(Decoder::Ipv4(Ipv4Decoder)),
        Protocol::Icmp => Some(Decoder::Icmp(IcmpDecoder)),
        _ => None,
    }
}

/// `protocol` if the chain can continue into it, `Unknown` otherwise.
pub fn chainable(protocol: Protocol) -> Protocol {
    if decoder_for(protocol).is_some() {
        protocol
    } else {
        Protocol::Unknown
    }
}

impl Decoder {
    fn inner(&self) -> &dyn HeaderDecoder {
        match self {
            Decoder::Ethernet(decoder) => decoder,
            Decoder::Arp(decoder) => decoder,
            Decoder::Ipv4(decoder) => decoder,
            Decoder::Icmp(decoder) => decoder,
        }
    }
}

impl HeaderDecoder for Decoder {
    fn protocol(&self) -> Protocol {
        self.inner().protocol()
    }

    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError> {
        self.inner().parse(frame, region)
    }

    fn next_protocol(&self, pdu: &PduView<'_>) -> Protocol {
        self.inner().next_protocol(pdu)
    }

    fn significant_headers(&self, pdu: &PduView<'_>) -> Vec<HeaderKey> {
        self.inner().significant_headers(pdu)
    }

    fn endpoints(&self) -> Option<(HeaderKey, HeaderKey)> {
        self.inner().endpoints()
    }

    fn header_name(&self, key: HeaderKey) -> &'static str {
        self.inner().header_name(key)
    }

    fn try_render(&self, key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError> {
        self.inner().try_render(key, pdu)
    }

    fn breakdown(&self, pdu: &PduView<'_>) -> Vec<Breakdown> {
        self.inner().breakdown(pdu)
    }
}

#[cfg(test)]
mod tests {
    use super::{chainable, decoder_for};
    use crate::pdu::Protocol;
    use crate::protocols::HeaderDecoder;

    #[test]
    fn decoders_report_their_protocol() {
        for protocol in [Protocol::Ethernet, Protocol::Arp, Protocol::Ipv4, Protocol::Icmp] {
            let decoder = decoder_for(protocol).unwrap();
            assert_eq!(decoder.protocol(), protocol);
        }
    }

    #[test]
    fn named_only_protocols_end_the_chain() {
        for protocol in [
            Protocol::Unknown,
            Protocol::Ipv6,
            Protocol::Tcp,
            Protocol::Udp,
            Protocol::Vlan,
            Protocol::Lldp,
        ] {
            assert!(decoder_for(protocol).is_none());
            assert_eq!(chainable(protocol), Protocol::Unknown);
        }
        assert_eq!(chainable(Protocol::Icmp), Protocol::Icmp);
    }
}
