/// Buffer size handed to the pcap-parser readers.
pub const PCAP_READER_BUFFER_SIZE: usize = 65536;

/// Section header block type, as it appears at the start of a pcapng file.
pub const PCAPNG_MAGIC: [u8; 4] = [0x0a, 0x0d, 0x0d, 0x0a];
