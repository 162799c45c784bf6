use std::io;

use pnet_datalink::{Channel, DataLinkReceiver, NetworkInterface};
use time::OffsetDateTime;
use tracing::info;

use crate::config::CaptureConfig;
use crate::source::{Frame, FrameSource, SourceError};

/// Live capture on a network interface through a raw link-layer channel.
pub struct InterfaceSource {
    name: String,
    rx: Box<dyn DataLinkReceiver>,
}

impl std::fmt::Debug for InterfaceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Names of the interfaces visible to the capture backend.
pub fn list_interfaces() -> Vec<String> {
    pnet_datalink::interfaces()
        .into_iter()
        .map(|iface| iface.name)
        .collect()
}

fn find_interface(name: &str) -> Result<NetworkInterface, SourceError> {
    pnet_datalink::interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| SourceError::InterfaceNotFound {
            name: name.to_string(),
        })
}

impl InterfaceSource {
    /// Bind `name` for capture.
    ///
    /// # Errors
    /// `InterfaceNotFound` for an unknown name, `UnsupportedChannel` when the
    /// backend does not hand out an Ethernet channel, and `Io` when the
    /// channel cannot be opened (usually missing privileges).
    pub fn open(name: &str, config: &CaptureConfig) -> Result<Self, SourceError> {
        let iface = find_interface(name)?;

        let mut channel_config = pnet_datalink::Config::default();
        channel_config.read_timeout = config.read_timeout;
        channel_config.read_buffer_size = config.read_buffer_size;
        channel_config.promiscuous = config.promiscuous;

        let rx = match pnet_datalink::channel(&iface, channel_config)? {
            Channel::Ethernet(_tx, rx) => rx,
            _ => {
                return Err(SourceError::UnsupportedChannel {
                    name: name.to_string(),
                });
            }
        };
        info!(interface = name, "capture channel open");
        Ok(Self {
            name: name.to_string(),
            rx,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FrameSource for InterfaceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        match self.rx.next() {
            Ok(data) => {
                let now = OffsetDateTime::now_utc();
                let ts = now.unix_timestamp_nanos() as f64 * 1e-9;
                Ok(Some(Frame {
                    ts: Some(ts),
                    data: data.to_vec(),
                }))
            }
            Err(err) if matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Err(SourceError::Timeout)
            }
            Err(err) => Err(SourceError::Io(err)),
        }
    }
}
