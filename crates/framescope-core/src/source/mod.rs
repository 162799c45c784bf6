//! Frame sources.
//!
//! A source yields raw link-layer frames one at a time. Live capture binds a
//! network interface; replay reads a pcap or pcapng file. All I/O of the crate
//! lives here.

mod interface;
mod pcap;

pub use interface::{InterfaceSource, list_interfaces};
pub use pcap::PcapFileSource;

use thiserror::Error;

/// A captured frame, starting at the Ethernet header.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Capture time in seconds since the Unix epoch, when known.
    pub ts: Option<f64>,
    pub data: Vec<u8>,
}

pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    /// [`SourceError::Timeout`] means no frame arrived in time and the caller
    /// may retry; every other error ends the capture.
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        (**self).next_frame()
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error: {0}")]
    Pcap(String),
    #[error("network interface not found: {name}")]
    InterfaceNotFound { name: String },
    #[error("interface {name} does not provide an Ethernet channel")]
    UnsupportedChannel { name: String },
    #[error("timed out waiting for a frame")]
    Timeout,
}

impl SourceError {
    /// Idle read; the source is still usable.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SourceError::Timeout)
    }
}

impl From<pcap::error::PcapSourceError> for SourceError {
    fn from(value: pcap::error::PcapSourceError) -> Self {
        match value {
            pcap::error::PcapSourceError::Io(err) => SourceError::Io(err),
            pcap::error::PcapSourceError::Pcap { context, message } => {
                SourceError::Pcap(format!("{context}: {message}"))
            }
        }
    }
}
