//! Decoded frame model.
//!
//! A captured frame decodes into a [`PduChain`]: the frame buffer plus an
//! ordered list of [`Pdu`] layers. Layers never copy frame bytes; every header
//! is a [`Header`] view (a bit range) into the frame, and `prev`/`next` are
//! indices into the chain rather than pointers.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::bits;
use crate::breakdown::Breakdown;
use crate::protocols::HeaderDecoder;
use crate::protocols::registry::{Decoder, decoder_for};

/// Protocols known to the decoder. Only some of them have a decoder; the rest
/// are named for rendering and end the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Protocol {
    Unknown,
    Ethernet,
    Arp,
    Ipv4,
    Ipv6,
    Icmp,
    Tcp,
    Udp,
    Vlan,
    Lldp,
}

impl Protocol {
    /// Every named protocol, excluding `Unknown`.
    pub const NAMED: [Protocol; 9] = [
        Protocol::Ethernet,
        Protocol::Arp,
        Protocol::Ipv4,
        Protocol::Ipv6,
        Protocol::Icmp,
        Protocol::Tcp,
        Protocol::Udp,
        Protocol::Vlan,
        Protocol::Lldp,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Protocol::Unknown => "Unknown",
            Protocol::Ethernet => "Ethernet",
            Protocol::Arp => "ARP",
            Protocol::Ipv4 => "IPv4",
            Protocol::Ipv6 => "IPv6",
            Protocol::Icmp => "ICMP",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Vlan => "VLAN",
            Protocol::Lldp => "LLDP",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Protocol::Unknown => "Unknown Protocol",
            Protocol::Ethernet => "Ethernet Protocol",
            Protocol::Arp => "Address Resolution Protocol",
            Protocol::Ipv4 => "Internet Protocol version 4",
            Protocol::Ipv6 => "Internet Protocol version 6",
            Protocol::Icmp => "Internet Control Message Protocol",
            Protocol::Tcp => "Transmission Control Protocol",
            Protocol::Udp => "User Datagram Protocol",
            Protocol::Vlan => "Virtual Local Area Network",
            Protocol::Lldp => "Link Layer Discovery Protocol",
        }
    }

    /// Case-insensitive lookup by short name. `Unknown` is never matched.
    ///
    /// # Examples
    /// ```
    /// use framescope_core::Protocol;
    ///
    /// assert_eq!(Protocol::from_short_name("icmp"), Some(Protocol::Icmp));
    /// assert_eq!(Protocol::from_short_name("unknown"), None);
    /// ```
    pub fn from_short_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::NAMED
            .iter()
            .copied()
            .find(|protocol| protocol.short_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Decoder-scoped header identifier. Values are only meaningful together with
/// the protocol of the PDU that carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HeaderKey(pub u8);

/// Non-owning view into the frame buffer, measured in bits so that sub-byte
/// fields are views too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Header {
    bit_offset: usize,
    bit_len: usize,
}

impl Header {
    /// View of `len` whole bytes starting at byte `offset`.
    pub fn bytes(offset: usize, len: usize) -> Self {
        Self {
            bit_offset: offset * 8,
            bit_len: len * 8,
        }
    }

    /// View of `bit_len` bits starting at absolute bit `bit_offset`.
    pub fn bits(bit_offset: usize, bit_len: usize) -> Self {
        Self {
            bit_offset,
            bit_len,
        }
    }

    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn bit_range(&self) -> Range<usize> {
        self.bit_offset..self.bit_offset + self.bit_len
    }

    /// Whole bytes touched by the view.
    pub fn byte_range(&self) -> Range<usize> {
        let start = self.bit_offset / 8;
        let end = (self.bit_offset + self.bit_len).div_ceil(8).max(start);
        start..end
    }

    pub fn offset(&self) -> usize {
        self.bit_offset / 8
    }

    pub fn len(&self) -> usize {
        self.byte_range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit_offset % 8 == 0 && self.bit_len % 8 == 0
    }

    pub fn overlaps(&self, other: &Header) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a = self.bit_range();
        let b = other.bit_range();
        a.start < b.end && b.start < a.end
    }

    /// The bytes touched by the view, unmasked. Empty if the view falls
    /// outside `frame`.
    pub fn raw<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        frame.get(self.byte_range()).unwrap_or(&[])
    }

    /// The field value: borrowed for byte-aligned views, extracted through
    /// [`bits::extract`] otherwise.
    pub fn value<'a>(&self, frame: &'a [u8]) -> Cow<'a, [u8]> {
        let raw = self.raw(frame);
        if self.is_byte_aligned() {
            return Cow::Borrowed(raw);
        }
        let start = self.bit_offset % 8;
        Cow::Owned(bits::extract(raw, start, start + self.bit_len))
    }
}

/// One decoded protocol layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    protocol: Protocol,
    headers: Vec<(HeaderKey, Header)>,
    payload: Header,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Pdu {
    pub(crate) fn new(protocol: Protocol, headers: Vec<(HeaderKey, Header)>, payload: Header) -> Self {
        Self {
            protocol,
            headers,
            payload,
            prev: None,
            next: None,
        }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Headers in decode order.
    pub fn headers(&self) -> &[(HeaderKey, Header)] {
        &self.headers
    }

    pub fn header(&self, key: HeaderKey) -> Option<Header> {
        self.headers
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, header)| *header)
    }

    /// The undecoded remainder handed to the next layer.
    pub fn payload(&self) -> Header {
        self.payload
    }

    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }
}

/// A decoded frame: the frame buffer and its layers, outermost first.
///
/// `B` is either a borrowed slice (views valid while the capture buffer lives)
/// or an owned `Vec<u8>` obtained through [`PduChain::into_owned`].
#[derive(Debug, Clone)]
pub struct PduChain<B> {
    frame: B,
    pdus: Vec<Pdu>,
}

impl<B: AsRef<[u8]>> PduChain<B> {
    pub(crate) fn new(frame: B, mut pdus: Vec<Pdu>) -> Self {
        let count = pdus.len();
        for (index, pdu) in pdus.iter_mut().enumerate() {
            pdu.prev = index.checked_sub(1);
            pdu.next = (index + 1 < count).then_some(index + 1);
        }
        Self { frame, pdus }
    }

    pub fn frame(&self) -> &[u8] {
        self.frame.as_ref()
    }

    pub fn pdus(&self) -> &[Pdu] {
        &self.pdus
    }

    pub fn len(&self) -> usize {
        self.pdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pdus.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PduView<'_>> {
        (index < self.pdus.len()).then(|| PduView {
            frame: self.frame.as_ref(),
            pdus: &self.pdus,
            index,
        })
    }

    /// The outermost layer.
    pub fn head(&self) -> Option<PduView<'_>> {
        self.get(0)
    }

    /// The innermost decoded layer.
    pub fn last(&self) -> Option<PduView<'_>> {
        self.pdus.len().checked_sub(1).and_then(|index| self.get(index))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = PduView<'_>> {
        (0..self.pdus.len()).filter_map(|index| self.get(index))
    }

    pub fn protocols(&self) -> Vec<Protocol> {
        self.pdus.iter().map(Pdu::protocol).collect()
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.pdus.iter().any(|pdu| pdu.protocol == protocol)
    }

    /// Copy the frame bytes so the chain can outlive the capture buffer.
    pub fn into_owned(self) -> PduChain<Vec<u8>> {
        PduChain {
            frame: self.frame.as_ref().to_vec(),
            pdus: self.pdus,
        }
    }

    pub fn into_frame(self) -> B {
        self.frame
    }
}

impl<B: AsRef<[u8]>, C: AsRef<[u8]>> PartialEq<PduChain<C>> for PduChain<B> {
    fn eq(&self, other: &PduChain<C>) -> bool {
        self.pdus == other.pdus && self.frame.as_ref() == other.frame.as_ref()
    }
}

/// Borrowed handle on one layer of a chain, with access to the frame bytes
/// and to its neighbours.
#[derive(Clone, Copy)]
pub struct PduView<'a> {
    frame: &'a [u8],
    pdus: &'a [Pdu],
    index: usize,
}

impl<'a> PduView<'a> {
    /// View of a PDU that is not linked into a chain yet.
    pub(crate) fn detached(frame: &'a [u8], pdu: &'a Pdu) -> Self {
        Self {
            frame,
            pdus: std::slice::from_ref(pdu),
            index: 0,
        }
    }

    pub fn pdu(&self) -> &'a Pdu {
        &self.pdus[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> &'a [u8] {
        self.frame
    }

    pub fn protocol(&self) -> Protocol {
        self.pdu().protocol
    }

    pub fn span(&self, key: HeaderKey) -> Option<Header> {
        self.pdu().header(key)
    }

    /// Bytes touched by a header, without masking sub-byte fields.
    pub fn raw(&self, key: HeaderKey) -> Option<&'a [u8]> {
        self.span(key).map(|header| header.raw(self.frame))
    }

    pub fn value(&self, key: HeaderKey) -> Option<Cow<'a, [u8]>> {
        self.span(key).map(|header| header.value(self.frame))
    }

    /// A header read as a big-endian unsigned integer.
    pub fn uint(&self, key: HeaderKey) -> Option<u64> {
        self.value(key).map(|value| bits::to_u64(&value))
    }

    pub fn payload(&self) -> &'a [u8] {
        self.pdu().payload.raw(self.frame)
    }

    pub fn next(&self) -> Option<PduView<'a>> {
        self.pdu().next.map(|index| PduView { index, ..*self })
    }

    pub fn prev(&self) -> Option<PduView<'a>> {
        self.pdu().prev.map(|index| PduView { index, ..*self })
    }

    pub fn decoder(&self) -> Option<Decoder> {
        decoder_for(self.protocol())
    }

    pub fn render(&self, key: HeaderKey) -> String {
        self.decoder()
            .map(|decoder| decoder.render(key, self))
            .unwrap_or_default()
    }

    pub fn significant_headers(&self) -> Vec<HeaderKey> {
        self.decoder()
            .map(|decoder| decoder.significant_headers(self))
            .unwrap_or_default()
    }

    pub fn breakdown(&self) -> Vec<Breakdown> {
        self.decoder()
            .map(|decoder| decoder.breakdown(self))
            .unwrap_or_default()
    }
}

impl fmt::Debug for PduView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PduView")
            .field("index", &self.index)
            .field("protocol", &self.protocol())
            .finish()
    }
}
