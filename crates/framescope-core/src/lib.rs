//! Framescope core library: decoding captured link-layer frames into
//! protocol layers.
//!
//! A frame is decoded into a [`PduChain`] starting at Ethernet. Each layer is
//! produced by a stateless decoder (layout/parser/render) and holds header
//! views into the frame rather than copies; `bits` extracts sub-byte fields.
//! The `breakdown` helpers turn a chain into text, summaries or JSON records.
//! I/O is isolated in `source`, and `pipeline` runs capture and rendering on
//! separate threads.
//!
//! Invariants:
//! - A layer's headers and payload cover its region without gaps or overlap.
//! - A frame that is truncated at any layer yields no chain at all.
//! - Decoder tables are immutable; decoding is side-effect free.
//!
//! # Examples
//! ```
//! use framescope_core::{Protocol, decode_frame, format_chain};
//!
//! let mut frame = vec![0xff; 6];
//! frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06]);
//! frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
//! frame.extend_from_slice(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x01, 10, 0, 0, 1]);
//! frame.extend_from_slice(&[0x00; 6]);
//! frame.extend_from_slice(&[10, 0, 0, 2]);
//!
//! let chain = decode_frame(frame.as_slice())?;
//! assert_eq!(chain.protocols(), vec![Protocol::Ethernet, Protocol::Arp]);
//! assert!(format_chain(&chain).contains("Who has the address 10.0.0.2?"));
//! # Ok::<(), framescope_core::DecodeError>(())
//! ```

pub mod bits;
pub mod protocols;

mod breakdown;
mod config;
mod decode;
mod filter;
mod pdu;
mod pipeline;
mod source;

pub use breakdown::{
    Breakdown, FrameRecord, FrameSummary, LayerRecord, format_chain, layer_title, ts_to_rfc3339,
};
pub use config::{
    CaptureConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_READ_BUFFER_SIZE, DEFAULT_READ_TIMEOUT,
};
pub use decode::{DecodeError, decode_frame};
pub use filter::{FilterError, ProtocolFilter};
pub use pdu::{Header, HeaderKey, Pdu, PduChain, PduView, Protocol};
pub use pipeline::{
    DecodedFrame, PipelineError, PipelineStats, RenderError, Renderer, StopSignal, run_pipeline,
};
pub use protocols::registry::{Decoder, decoder_for};
pub use protocols::{FieldError, HeaderDecoder};
pub use source::{
    Frame, FrameSource, InterfaceSource, PcapFileSource, SourceError, list_interfaces,
};
