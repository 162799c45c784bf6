//! Frame to PDU chain decoding.

use thiserror::Error;
use tracing::trace;

use crate::pdu::{PduChain, PduView, Protocol};
use crate::protocols::HeaderDecoder;
use crate::protocols::registry::decoder_for;

/// Errors raised while decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A layer's region is shorter than its header.
    #[error("{protocol} header truncated: need {needed} bytes, got {actual}")]
    TruncatedFrame {
        protocol: Protocol,
        needed: usize,
        actual: usize,
    },
}

/// Decode a raw link-layer frame, starting at Ethernet.
///
/// Each layer is decoded from the previous layer's payload until a layer
/// names a protocol without a decoder. A truncated layer anywhere aborts the
/// whole frame; no partial chain is returned.
///
/// # Errors
/// Returns [`DecodeError::TruncatedFrame`] for frames shorter than any header
/// on the chain, including empty frames.
///
/// # Examples
/// ```
/// use framescope_core::{Protocol, decode_frame};
///
/// let mut frame = vec![0xff; 12];
/// frame.extend_from_slice(&[0x88, 0xcc]);
/// let chain = decode_frame(frame.as_slice())?;
/// assert_eq!(chain.protocols(), vec![Protocol::Ethernet]);
/// # Ok::<(), framescope_core::DecodeError>(())
/// ```
pub fn decode_frame<B: AsRef<[u8]>>(frame: B) -> Result<PduChain<B>, DecodeError> {
    let bytes = frame.as_ref();
    let mut pdus = Vec::new();
    let mut protocol = Protocol::Ethernet;
    let mut region = 0..bytes.len();

    while let Some(decoder) = decoder_for(protocol) {
        let pdu = decoder.parse(bytes, region.clone())?;
        let payload = pdu.payload().byte_range();
        let next = decoder.next_protocol(&PduView::detached(bytes, &pdu));
        trace!(
            protocol = %protocol,
            offset = region.start,
            headers = pdu.headers().len(),
            next = %next,
            "decoded layer"
        );
        pdus.push(pdu);
        region = payload;
        protocol = next;
    }

    Ok(PduChain::new(frame, pdus))
}
