use std::fs::File;
use std::path::Path;

use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapError, PcapNGReader};
use tracing::debug;

use crate::source::{Frame, FrameSource, SourceError};

use super::error::PcapSourceError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
    read_magic_and_rewind,
};

/// Replays Ethernet frames from a legacy pcap or pcapng file.
pub struct PcapFileSource {
    inner: PcapReader,
    skipped: u64,
}

impl std::fmt::Debug for PcapFileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PcapFileSource")
            .field("skipped", &self.skipped)
            .finish_non_exhaustive()
    }
}

enum PcapReader {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Linktype,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

/// A captured record before link-type filtering.
struct Record {
    linktype: Linktype,
    frame: Frame,
}

impl PcapFileSource {
    /// Open a capture file; the format is detected from its magic bytes.
    ///
    /// # Errors
    /// Returns `SourceError::Io` if the file cannot be read and
    /// `SourceError::Pcap` if its header is malformed.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let inner = create_reader(file)?;
        Ok(Self { inner, skipped: 0 })
    }

    /// Frames dropped so far because their link type is not Ethernet.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl FrameSource for PcapFileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        while let Some(record) = next_record(&mut self.inner)? {
            if record.linktype == Linktype::ETHERNET {
                return Ok(Some(record.frame));
            }
            self.skipped += 1;
            debug!(
                linktype = record.linktype.0,
                len = record.frame.data.len(),
                "skipping non-Ethernet frame"
            );
        }
        Ok(None)
    }
}

fn create_reader(mut file: File) -> Result<PcapReader, PcapSourceError> {
    let magic = read_magic_and_rewind(&mut file)?;

    if is_pcapng_magic(&magic) {
        let reader = PcapNGReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcapng reader init", e))?;
        Ok(PcapReader::Ng {
            reader,
            linktypes: Vec::new(),
        })
    } else {
        let reader = LegacyPcapReader::new(layout::PCAP_READER_BUFFER_SIZE, file)
            .map_err(|e| PcapSourceError::pcap("pcap reader init", e))?;
        Ok(PcapReader::Legacy {
            reader,
            linktype: Linktype::ETHERNET,
        })
    }
}

fn next_record(reader: &mut PcapReader) -> Result<Option<Record>, PcapSourceError> {
    loop {
        match reader {
            PcapReader::Legacy { reader, linktype } => match reader.next() {
                Ok((offset, block)) => {
                    let record = match block {
                        PcapBlockOwned::LegacyHeader(header) => {
                            *linktype = header.network;
                            None
                        }
                        PcapBlockOwned::Legacy(packet) => Some(Record {
                            linktype: *linktype,
                            frame: Frame {
                                ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
                                data: packet.data.to_vec(),
                            },
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if record.is_some() {
                        return Ok(record);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::pcap("pcap reader refill", e))?;
                }
                Err(e) => return Err(PcapSourceError::pcap("pcap reader next", e)),
            },
            PcapReader::Ng { reader, linktypes } => match reader.next() {
                Ok((offset, block)) => {
                    let record = match block {
                        PcapBlockOwned::NG(Block::SectionHeader(_)) => {
                            linktypes.clear();
                            None
                        }
                        PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                            linktypes.push(intf.linktype);
                            None
                        }
                        PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(Record {
                            linktype: linktype_for_interface(linktypes, packet.if_id),
                            frame: Frame {
                                ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
                                data: packet.data.to_vec(),
                            },
                        }),
                        PcapBlockOwned::NG(Block::SimplePacket(packet)) => Some(Record {
                            linktype: linktype_for_interface(linktypes, 0),
                            frame: Frame {
                                ts: None,
                                data: packet.data.to_vec(),
                            },
                        }),
                        _ => None,
                    };
                    reader.consume(offset);
                    if record.is_some() {
                        return Ok(record);
                    }
                }
                Err(PcapError::Eof) => return Ok(None),
                Err(PcapError::Incomplete(_)) => {
                    reader
                        .refill()
                        .map_err(|e| PcapSourceError::pcap("pcapng reader refill", e))?;
                }
                Err(e) => return Err(PcapSourceError::pcap("pcapng reader next", e)),
            },
        }
    }
}
