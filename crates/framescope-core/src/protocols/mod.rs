//! Protocol header decoders.
//!
//! Each protocol follows a layered structure:
//! - `layout`: byte and bit offsets (source of truth)
//! - `parser`: slicing a region of the frame into header views
//! - `render`: header names, human-readable values and breakdowns
//!
//! Bounds checks go through `common::reader`, so a short region always
//! surfaces as [`DecodeError::TruncatedFrame`] instead of a panic. Decoders are
//! stateless; `registry` maps a [`Protocol`] to the decoder for it.

use std::ops::Range;

use crate::breakdown::Breakdown;
use crate::decode::DecodeError;
use crate::pdu::{HeaderKey, Pdu, PduView, Protocol};

pub mod arp;
pub(crate) mod common;
pub mod ethernet;
pub mod icmp;
pub mod ipv4;
pub mod registry;

pub use common::error::FieldError;

/// Capabilities shared by every protocol decoder.
pub trait HeaderDecoder {
    fn protocol(&self) -> Protocol;

    /// Decode the header found at `region` of `frame`.
    ///
    /// # Errors
    /// Returns [`DecodeError::TruncatedFrame`] when the region is shorter than
    /// the header, including length-field dependent parts.
    fn parse(&self, frame: &[u8], region: Range<usize>) -> Result<Pdu, DecodeError>;

    /// Protocol carried in the payload, or `Unknown` when the chain ends here.
    fn next_protocol(&self, pdu: &PduView<'_>) -> Protocol;

    /// Headers worth showing in a one-line summary.
    fn significant_headers(&self, pdu: &PduView<'_>) -> Vec<HeaderKey>;

    /// Header keys holding the layer's source and destination addresses.
    fn endpoints(&self) -> Option<(HeaderKey, HeaderKey)> {
        None
    }

    fn header_name(&self, key: HeaderKey) -> &'static str;

    fn try_render(&self, key: HeaderKey, pdu: &PduView<'_>) -> Result<String, FieldError>;

    /// Human-readable value, or the reason it cannot be shown.
    fn render(&self, key: HeaderKey, pdu: &PduView<'_>) -> String {
        match self.try_render(key, pdu) {
            Ok(value) => value,
            Err(err) => err.to_string(),
        }
    }

    fn breakdown(&self, pdu: &PduView<'_>) -> Vec<Breakdown>;
}
