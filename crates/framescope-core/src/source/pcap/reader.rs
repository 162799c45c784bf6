use std::io::{Read, Seek, SeekFrom};

use pcap_parser::Linktype;

use super::error::PcapSourceError;
use super::layout;

/// Read the magic bytes and rewind the reader to the start.
///
/// # Errors
/// Returns `PcapSourceError::Io` when the file is shorter than four bytes or
/// cannot be rewound.
pub fn read_magic_and_rewind<R: Read + Seek>(reader: &mut R) -> Result<[u8; 4], PcapSourceError> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(magic)
}

pub fn is_pcapng_magic(magic: &[u8; 4]) -> bool {
    magic == &layout::PCAPNG_MAGIC
}

/// Link type of a pcapng interface; unknown interface ids count as Ethernet.
pub fn linktype_for_interface(linktypes: &[Linktype], if_id: u32) -> Linktype {
    linktypes
        .get(if_id as usize)
        .copied()
        .unwrap_or(Linktype::ETHERNET)
}

/// Seconds from a legacy record's split timestamp.
pub fn legacy_ts_to_seconds(ts_sec: u32, ts_usec: u32) -> f64 {
    f64::from(ts_sec) + f64::from(ts_usec) * 1e-6
}

/// Seconds from a pcapng high/low timestamp in microseconds.
pub fn pcapng_ts_to_seconds(ts_high: u32, ts_low: u32) -> f64 {
    let ts = (u64::from(ts_high) << 32) | u64::from(ts_low);
    ts as f64 * 1e-6
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use pcap_parser::Linktype;

    use super::{
        is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
        read_magic_and_rewind,
    };
    use crate::source::pcap::error::PcapSourceError;

    #[test]
    fn detect_pcapng_magic() {
        assert!(is_pcapng_magic(&[0x0a, 0x0d, 0x0d, 0x0a]));
        assert!(!is_pcapng_magic(&[0xd4, 0xc3, 0xb2, 0xa1]));
    }

    #[test]
    fn read_magic_rewinds() {
        let mut cursor = Cursor::new([0xd4, 0xc3, 0xb2, 0xa1, 0x02]);
        let magic = read_magic_and_rewind(&mut cursor).unwrap();
        assert_eq!(magic, [0xd4, 0xc3, 0xb2, 0xa1]);
        let mut buf = [0u8; 1];
        cursor.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 0xd4);
    }

    #[test]
    fn read_magic_too_short() {
        let mut cursor = Cursor::new([0x0a, 0x0d]);
        let err = read_magic_and_rewind(&mut cursor).unwrap_err();
        assert!(matches!(err, PcapSourceError::Io(_)));
    }

    #[test]
    fn linktype_defaults_to_ethernet() {
        let linktypes = [Linktype::RAW];
        assert_eq!(linktype_for_interface(&linktypes, 0), Linktype::RAW);
        assert_eq!(linktype_for_interface(&linktypes, 3), Linktype::ETHERNET);
    }

    #[test]
    fn timestamps_in_seconds() {
        assert!((legacy_ts_to_seconds(2, 250_000) - 2.25).abs() < 1e-9);
        assert!((pcapng_ts_to_seconds(0, 1_500_000) - 1.5).abs() < 1e-9);
    }
}
