//! PCAP/PCAPNG replay source.
//!
//! Replays the frames of a capture file through the [`FrameSource`] interface.
//! Only Ethernet link types are handed out; other frames are skipped.
//!
//! [`FrameSource`]: crate::source::FrameSource

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapFileSource;
