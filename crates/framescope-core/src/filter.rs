use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::pdu::{PduChain, Protocol};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown protocol: {name}")]
    UnknownProtocol { name: String },
}

/// Set of protocols a frame must contain to be shown.
///
/// # Examples
/// ```
/// use framescope_core::{Protocol, ProtocolFilter};
///
/// let filter = ProtocolFilter::parse("arp, ICMP")?;
/// assert!(filter.contains(Protocol::Icmp));
/// assert!(!filter.contains(Protocol::Ipv4));
/// # Ok::<(), framescope_core::FilterError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolFilter {
    protocols: BTreeSet<Protocol>,
}

impl ProtocolFilter {
    /// Filter that passes every frame.
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list of short protocol names, ignoring case
    /// and empty entries.
    ///
    /// # Errors
    /// Returns [`FilterError::UnknownProtocol`] for the first name that does
    /// not match a protocol.
    pub fn parse(list: &str) -> Result<Self, FilterError> {
        let protocols = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                Protocol::from_short_name(name).ok_or_else(|| FilterError::UnknownProtocol {
                    name: name.to_string(),
                })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { protocols })
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn contains(&self, protocol: Protocol) -> bool {
        self.protocols.contains(&protocol)
    }

    pub fn protocols(&self) -> impl Iterator<Item = Protocol> + '_ {
        self.protocols.iter().copied()
    }

    /// An empty filter passes everything; otherwise any decoded layer must
    /// match.
    pub fn matches<B: AsRef<[u8]>>(&self, chain: &PduChain<B>) -> bool {
        self.is_empty() || chain.pdus().iter().any(|pdu| self.contains(pdu.protocol()))
    }
}

impl FromStr for ProtocolFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
