use std::fmt::Display;

use thiserror::Error;

/// Failures while replaying a capture file.
#[derive(Debug, Error)]
pub enum PcapSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PCAP parse error ({context}): {message}")]
    Pcap {
        context: &'static str,
        message: String,
    },
}

impl PcapSourceError {
    /// Wrap a pcap-parser error with the step that produced it.
    pub fn pcap(context: &'static str, err: impl Display) -> Self {
        PcapSourceError::Pcap {
            context,
            message: err.to_string(),
        }
    }
}
